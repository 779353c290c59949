//! Page resolver: maps a page slot onto the item actually shown
//!
//! Starting from a 1-based slot, the resolver walks the category's items in
//! the direction of travel and returns the first item whose dependency is
//! satisfied. It is a pure function of (tree, slot, store, direction):
//! resolving the same slot twice over an unchanged store yields the same
//! item, and the walk never allocates or mutates.

use crate::dependency_evaluator::{DependencyEvaluator, DependencyResult};
use questionnaire_types::{AnswerStore, Direction, Item, QuestionnaireTree};

/// A resolved page: the slot actually landed on and its item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPage<'t> {
    /// 1-based slot of `item` within its category
    pub page_index: usize,
    pub item: &'t Item,
}

/// Outcome of a page walk
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution<'t> {
    Found(ResolvedPage<'t>),
    /// The forward walk ran past the last item of the category
    NoMoreItems,
    /// The backward walk ran past the first item of the category
    BeginningOfCategory,
}

impl<'t> Resolution<'t> {
    pub fn found(self) -> Option<ResolvedPage<'t>> {
        match self {
            Self::Found(page) => Some(page),
            Self::NoMoreItems | Self::BeginningOfCategory => None,
        }
    }

    fn exhausted(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self::NoMoreItems,
            Direction::Backward => Self::BeginningOfCategory,
        }
    }
}

/// Resolves page slots to visible items
#[derive(Clone, Copy, Debug, Default)]
pub struct PageResolver {
    evaluator: DependencyEvaluator,
}

impl PageResolver {
    pub fn new() -> Self {
        Self {
            evaluator: DependencyEvaluator::new(),
        }
    }

    /// Resolve the slot `page_index` of category `category_index`.
    ///
    /// Forward walks start at `page_index` (0 is treated as 1); backward
    /// walks start at `page_index` clamped to the last slot, and slot 0
    /// reports [`Resolution::BeginningOfCategory`] immediately. An unknown
    /// category is exhausted in either direction.
    pub fn resolve<'t>(
        &self,
        tree: &'t QuestionnaireTree,
        category_index: usize,
        page_index: usize,
        store: &AnswerStore,
        direction: Direction,
    ) -> Resolution<'t> {
        let Some(category) = tree.category(category_index) else {
            return Resolution::exhausted(direction);
        };
        let items = category.items.as_slice();

        let found = match direction {
            Direction::Forward => {
                let start = page_index.saturating_sub(1);
                items
                    .iter()
                    .enumerate()
                    .skip(start)
                    .find(|(_, item)| self.is_visible(item, store))
            }
            Direction::Backward => {
                let end = page_index.min(items.len());
                items[..end]
                    .iter()
                    .enumerate()
                    .rev()
                    .find(|(_, item)| self.is_visible(item, store))
            }
        };

        match found {
            Some((index, item)) => Resolution::Found(ResolvedPage {
                page_index: index + 1,
                item,
            }),
            None => Resolution::exhausted(direction),
        }
    }

    /// First visible page of a category
    pub fn first_page<'t>(
        &self,
        tree: &'t QuestionnaireTree,
        category_index: usize,
        store: &AnswerStore,
    ) -> Option<ResolvedPage<'t>> {
        self.resolve(tree, category_index, 1, store, Direction::Forward)
            .found()
    }

    /// Last visible page of a category
    pub fn last_page<'t>(
        &self,
        tree: &'t QuestionnaireTree,
        category_index: usize,
        store: &AnswerStore,
    ) -> Option<ResolvedPage<'t>> {
        let len = tree.category(category_index)?.len();
        self.resolve(tree, category_index, len, store, Direction::Backward)
            .found()
    }

    /// Children of a group page that are currently shown
    pub fn visible_children<'a>(
        &'a self,
        item: &'a Item,
        store: &'a AnswerStore,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        item.items
            .iter()
            .filter(move |child| self.evaluator.is_satisfied(child, store))
    }

    pub fn is_visible(&self, item: &Item, store: &AnswerStore) -> bool {
        let result = self.evaluator.check(item, store);
        if let DependencyResult::Unsatisfied(reason) = result {
            tracing::debug!(link_id = %item.link_id, %reason, "Skipping item");
        }
        result.is_satisfied()
    }
}
