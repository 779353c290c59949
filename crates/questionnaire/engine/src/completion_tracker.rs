//! Completion tracker: derives the confirm affordance from recorded answers
//!
//! The tracker is evaluated on every answer change, so the confirm control
//! flips between Unanswered and Answered as the user types, not only when
//! navigating.

use crate::config::ForwardArrowPolicy;
use crate::page_resolver::PageResolver;
use questionnaire_types::{AnswerStore, ConfirmState, Item, ItemType};

/// Derives confirm state and per-control gates
#[derive(Clone, Copy, Debug, Default)]
pub struct CompletionTracker {
    resolver: PageResolver,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self {
            resolver: PageResolver::new(),
        }
    }

    /// Visual state of the confirm control for `item`
    pub fn confirm_state(&self, item: &Item, store: &AnswerStore) -> ConfirmState {
        if self.is_answered(item, store) {
            ConfirmState::Answered
        } else {
            ConfirmState::Unanswered
        }
    }

    /// Whether the confirm control may advance past `item`.
    ///
    /// Only items that demand an answer can block it.
    pub fn can_confirm(&self, item: &Item, store: &AnswerStore) -> bool {
        !self.demands_answer(item, store) || self.is_answered(item, store)
    }

    /// Whether the forward arrow may advance past `item`
    pub fn can_forward(&self, item: &Item, store: &AnswerStore, policy: ForwardArrowPolicy) -> bool {
        match policy {
            ForwardArrowPolicy::AlwaysAllowed => true,
            ForwardArrowPolicy::RespectRequired => self.can_confirm(item, store),
        }
    }

    /// Answered rule.
    ///
    /// - display: always answered
    /// - leaf: `done`, and for required items every recorded value passes
    ///   the type validity rule
    /// - group: every visible child that demands an answer is answered, and
    ///   at least one visible answerable child is answered
    pub fn is_answered(&self, item: &Item, store: &AnswerStore) -> bool {
        match item.item_type {
            ItemType::Display => true,
            ItemType::Group => {
                let mut answered_any = false;
                for child in self.resolver.visible_children(item, store) {
                    if child.item_type == ItemType::Display {
                        continue;
                    }
                    let answered = self.is_answered(child, store);
                    if !answered && self.demands_answer(child, store) {
                        return false;
                    }
                    answered_any |= answered;
                }
                answered_any
            }
            _ => self.leaf_answered(item, store),
        }
    }

    /// Whether `item` must be answered before confirming.
    ///
    /// Groups demand an answer when any visible descendant does.
    pub fn demands_answer(&self, item: &Item, store: &AnswerStore) -> bool {
        match item.item_type {
            ItemType::Display => false,
            ItemType::Group => self
                .resolver
                .visible_children(item, store)
                .any(|child| self.demands_answer(child, store)),
            _ => item.required,
        }
    }

    fn leaf_answered(&self, item: &Item, store: &AnswerStore) -> bool {
        let Some(state) = store.get(&item.link_id) else {
            return false;
        };
        if !state.done {
            return false;
        }
        !item.required
            || (!state.answer.is_empty() && state.answer.iter().all(|v| v.is_valid_for(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire_types::{AnswerValue, Dependency, ItemState};

    fn conditional_group() -> Item {
        Item::group("4.1", "Conditional question")
            .with_child(Item::new("4.1.1", "Decimal (expected 1.5)", ItemType::Decimal).required())
            .with_child(
                Item::new("4.1.2", "Free text only on expected input", ItemType::Text)
                    .required()
                    .with_dependency(Dependency::equals("4.1.1", AnswerValue::Decimal(1.5))),
            )
    }

    #[test]
    fn test_optional_leaf() {
        let tracker = CompletionTracker::new();
        let item = Item::new("1.1", "Free text", ItemType::Text);
        let mut store = AnswerStore::new();

        assert_eq!(tracker.confirm_state(&item, &store), ConfirmState::Unanswered);
        assert!(tracker.can_confirm(&item, &store));

        store
            .set_answer(&item, vec![AnswerValue::String("some text".into())])
            .unwrap();
        assert_eq!(tracker.confirm_state(&item, &store), ConfirmState::Answered);
    }

    #[test]
    fn test_required_decimal_toggles() {
        let tracker = CompletionTracker::new();
        let item = Item::new("2.2", "Required decimal", ItemType::Decimal).required();
        let mut store = AnswerStore::new();

        assert!(!tracker.can_confirm(&item, &store));

        store.set_answer(&item, vec![AnswerValue::Decimal(3.25)]).unwrap();
        assert!(tracker.can_confirm(&item, &store));
        assert!(tracker.confirm_state(&item, &store).is_answered());

        store.clear_answer(&item.link_id);
        assert!(!tracker.can_confirm(&item, &store));
        assert_eq!(tracker.confirm_state(&item, &store), ConfirmState::Unanswered);
    }

    #[test]
    fn test_required_seeded_with_invalid_value() {
        let tracker = CompletionTracker::new();
        let item = Item::new("2.1", "Required text", ItemType::Text).required();
        let mut store = AnswerStore::new();
        store.record("2.1", ItemState::new(vec![AnswerValue::String(" ".into())], true));

        assert!(!tracker.is_answered(&item, &store));
    }

    #[test]
    fn test_display_always_answered() {
        let tracker = CompletionTracker::new();
        let item = Item::display("1.9", "Thank you");
        let store = AnswerStore::new();
        assert!(tracker.confirm_state(&item, &store).is_answered());
        assert!(tracker.can_confirm(&item, &store));
    }

    #[test]
    fn test_group_with_conditional_child() {
        let tracker = CompletionTracker::new();
        let group = conditional_group();
        let decimal = &group.items[0];
        let text = &group.items[1];
        let mut store = AnswerStore::new();

        assert!(!tracker.can_confirm(&group, &store));

        // Unexpected value: the conditional child stays hidden
        store.set_answer(decimal, vec![AnswerValue::Decimal(2.0)]).unwrap();
        assert!(tracker.confirm_state(&group, &store).is_answered());

        // Expected value: the conditional child appears and must be answered
        store.set_answer(decimal, vec![AnswerValue::Decimal(1.5)]).unwrap();
        assert_eq!(tracker.confirm_state(&group, &store), ConfirmState::Unanswered);
        assert!(!tracker.can_confirm(&group, &store));

        store
            .set_answer(text, vec![AnswerValue::String("abc".into())])
            .unwrap();
        assert!(tracker.confirm_state(&group, &store).is_answered());
        assert!(tracker.can_confirm(&group, &store));
    }

    #[test]
    fn test_optional_group_needs_one_answer_for_state() {
        let tracker = CompletionTracker::new();
        let group = Item::group("3.2", "Options")
            .with_child(Item::new("3.2.1", "Option A", ItemType::Boolean))
            .with_child(Item::new("3.2.2", "Option B", ItemType::Boolean));
        let mut store = AnswerStore::new();

        assert_eq!(tracker.confirm_state(&group, &store), ConfirmState::Unanswered);
        assert!(tracker.can_confirm(&group, &store));

        store
            .set_answer(&group.items[0], vec![AnswerValue::Boolean(true)])
            .unwrap();
        assert!(tracker.confirm_state(&group, &store).is_answered());
    }

    #[test]
    fn test_forward_policies() {
        let tracker = CompletionTracker::new();
        let item = Item::new("2.1", "Required text", ItemType::Text).required();
        let store = AnswerStore::new();

        assert!(tracker.can_forward(&item, &store, ForwardArrowPolicy::AlwaysAllowed));
        assert!(!tracker.can_forward(&item, &store, ForwardArrowPolicy::RespectRequired));
    }
}
