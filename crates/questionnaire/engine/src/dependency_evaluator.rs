//! Dependency evaluator: decides whether an item may be presented
//!
//! The evaluator checks an item's declared prerequisite against the
//! answer store. It does NOT produce side effects. A reference that
//! cannot be resolved to a `done` answer is unsatisfied, never an error.

use questionnaire_types::{AnswerStore, Dependency, Item};

/// Evaluates item dependencies against recorded answers
#[derive(Clone, Copy, Debug, Default)]
pub struct DependencyEvaluator;

impl DependencyEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Whether `item` may be presented given the current answers
    pub fn is_satisfied(&self, item: &Item, store: &AnswerStore) -> bool {
        self.check(item, store).is_satisfied()
    }

    /// Evaluate an item's dependency, reporting why it is unsatisfied
    pub fn check(&self, item: &Item, store: &AnswerStore) -> DependencyResult {
        match &item.dependency {
            None => DependencyResult::Satisfied,
            Some(dependency) => self.evaluate(dependency, store),
        }
    }

    /// Evaluate a dependency.
    ///
    /// Satisfied iff the referenced item has a state, is `done`, and at
    /// least one recorded answer matches the expected predicate.
    pub fn evaluate(&self, dependency: &Dependency, store: &AnswerStore) -> DependencyResult {
        let Some(state) = store.get(&dependency.question) else {
            return DependencyResult::Unsatisfied(UnsatisfiedReason::Unanswered);
        };
        if !state.done {
            return DependencyResult::Unsatisfied(UnsatisfiedReason::NotDone);
        }
        if state
            .answer
            .iter()
            .any(|actual| dependency.operator.matches(actual, &dependency.answer))
        {
            DependencyResult::Satisfied
        } else {
            DependencyResult::Unsatisfied(UnsatisfiedReason::Mismatch)
        }
    }
}

/// Result of evaluating a dependency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependencyResult {
    Satisfied,
    Unsatisfied(UnsatisfiedReason),
}

impl DependencyResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }
}

/// Why a dependency is not satisfied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsatisfiedReason {
    /// The referenced item has never been answered
    Unanswered,
    /// The referenced item has no valid answer
    NotDone,
    /// No recorded answer matches the expected value
    Mismatch,
}

impl std::fmt::Display for UnsatisfiedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Unanswered => "prerequisite unanswered",
            Self::NotDone => "prerequisite not done",
            Self::Mismatch => "prerequisite answer does not match",
        };
        write!(f, "{}", reason)
    }
}
