//! Property tests: visibility and navigation invariants over generated questionnaires.
//!
//! Every generated questionnaire starts with a trigger category holding one
//! boolean item `0.1`. The remaining categories hold text items that are
//! either ungated or gated on `0.1` being true or false.

use proptest::prelude::*;
use questionnaire_engine::{
    DependencyEvaluator, EngineConfig, NavigationController, PageResolver, QuestionnaireSession,
};
use questionnaire_types::{
    AnswerStore, AnswerValue, Category, Dependency, Direction, Item, ItemState, ItemType,
    NavigationPosition, QuestionnaireTree,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
enum Action {
    Open,
    Confirm,
    Forward,
    Back,
    Close,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Open),
        Just(Action::Confirm),
        Just(Action::Forward),
        Just(Action::Back),
        Just(Action::Close),
    ]
}

/// Per category, per item: no gate, or the trigger value that reveals it
fn arb_layout() -> impl Strategy<Value = Vec<Vec<Option<bool>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of(any::<bool>()), 0..8),
        1..4,
    )
}

/// Trigger state: absent, or (value, done)
fn arb_trigger() -> impl Strategy<Value = Option<(bool, bool)>> {
    prop::option::of(any::<(bool, bool)>())
}

fn build_tree(layout: &[Vec<Option<bool>>]) -> QuestionnaireTree {
    let mut categories =
        vec![Category::new("0", "Trigger").with_item(Item::new("0.1", "Trigger", ItemType::Boolean))];
    for (c, gates) in layout.iter().enumerate() {
        let mut category = Category::new(format!("{}", c + 1), "Generated");
        for (i, gate) in gates.iter().enumerate() {
            let mut item = Item::new(format!("{}.{}", c + 1, i + 1), "Generated", ItemType::Text);
            if let Some(expected) = gate {
                item = item.with_dependency(Dependency::equals("0.1", AnswerValue::Boolean(*expected)));
            }
            category = category.with_item(item);
        }
        categories.push(category);
    }
    QuestionnaireTree::new(categories).unwrap()
}

fn build_store(trigger: Option<(bool, bool)>) -> AnswerStore {
    let mut store = AnswerStore::new();
    if let Some((value, done)) = trigger {
        store.record("0.1", ItemState::new(vec![AnswerValue::Boolean(value)], done));
    }
    store
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Items without a dependency are shown whatever the store holds.
    #[test]
    fn ungated_items_always_satisfied(trigger in arb_trigger()) {
        let store = build_store(trigger);
        let item = Item::new("1.1", "Plain", ItemType::Text);
        prop_assert!(DependencyEvaluator::new().is_satisfied(&item, &store));
    }

    /// A prerequisite that is absent or not done never satisfies, whatever its answer.
    #[test]
    fn unfinished_prerequisite_never_satisfies(expected in any::<bool>(), recorded in any::<bool>(), present in any::<bool>()) {
        let store = if present {
            build_store(Some((recorded, false)))
        } else {
            AnswerStore::new()
        };
        let item = Item::new("1.1", "Gated", ItemType::Text)
            .with_dependency(Dependency::equals("0.1", AnswerValue::Boolean(expected)));
        prop_assert!(!DependencyEvaluator::new().is_satisfied(&item, &store));
    }

    /// Stepping forward over a skip run and back again lands on the starting item.
    #[test]
    fn forward_then_back_round_trips(layout in arb_layout(), trigger in arb_trigger()) {
        let tree = build_tree(&layout);
        let store = build_store(trigger);
        let resolver = PageResolver::new();

        for category_index in 0..tree.category_count() {
            let len = tree.category(category_index).map_or(0, |c| c.len());
            for page in 1..=len {
                let Some(start) = resolver
                    .resolve(&tree, category_index, page, &store, Direction::Forward)
                    .found()
                else {
                    continue;
                };
                if start.page_index != page {
                    continue;
                }
                if let Some(next) = resolver
                    .resolve(&tree, category_index, page + 1, &store, Direction::Forward)
                    .found()
                {
                    let back = resolver
                        .resolve(&tree, category_index, next.page_index - 1, &store, Direction::Backward)
                        .found();
                    prop_assert_eq!(back.map(|p| p.page_index), Some(page));
                }
            }
        }
    }

    /// Confirming on the last visible item of the questionnaire hides the modal.
    #[test]
    fn confirm_on_final_item_hides(layout in arb_layout(), trigger in arb_trigger()) {
        let tree = build_tree(&layout);
        let store = build_store(trigger);
        let resolver = PageResolver::new();

        // The trigger category is never empty, so some item is always visible
        let last = (0..tree.category_count())
            .rev()
            .find_map(|c| resolver.last_page(&tree, c, &store).map(|p| NavigationPosition::new(c, p.page_index)))
            .unwrap();

        let mut controller = NavigationController::new(EngineConfig::default());
        controller.open_at(&tree, &store, last);
        prop_assert_eq!(controller.position(), Some(last));
        prop_assert!(controller.is_last_page(&tree, &store));

        prop_assert!(controller.confirm(&tree, &store).is_completed());
        prop_assert!(!controller.is_visible());
        prop_assert!(!controller.view(&tree, &store).visible);
    }

    /// After any action sequence the shown item is visible, and close hides
    /// the modal without touching the answers.
    #[test]
    fn actions_keep_visible_item_and_close_hides(
        layout in arb_layout(),
        trigger in arb_trigger(),
        actions in prop::collection::vec(arb_action(), 1..40),
    ) {
        let tree = build_tree(&layout);
        let store = build_store(trigger);
        let evaluator = DependencyEvaluator::new();
        let mut session = QuestionnaireSession::new(tree, EngineConfig::default()).with_store(store);

        for action in actions {
            let update = match action {
                Action::Open => session.open(),
                Action::Confirm => session.confirm(),
                Action::Forward => session.forward(),
                Action::Back => session.back(),
                Action::Close => session.close(),
            };
            if let Some(item) = session.controller().current_item(session.tree()) {
                prop_assert!(evaluator.is_satisfied(item, session.store()));
                prop_assert!(update.view.visible);
            } else {
                prop_assert!(!update.view.visible);
            }
        }

        let version = session.store().version();
        session.open();
        let update = session.close();
        prop_assert!(!update.view.visible);
        prop_assert!(!session.is_visible());
        prop_assert_eq!(session.store().version(), version);
    }
}
