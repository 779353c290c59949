//! Questionnaire session: the entry point for a rendering frontend
//!
//! A session owns one questionnaire tree, the participant's answer store,
//! a navigation controller and its history. It:
//! 1. Routes user actions (open, confirm, forward, back, close)
//! 2. Records answers and re-resolves the current page
//! 3. Pushes a fresh [`ModalView`] to every subscriber after each action
//!
//! The session NEVER renders. It hands views to subscribers and the
//! frontend draws them.

use crate::config::EngineConfig;
use crate::history::{HistoryRecord, NavigationEvent, NavigationHistory};
use crate::navigation::{NavigationController, TransitionOutcome};
use questionnaire_types::*;
use serde::Serialize;

/// Receives the modal view after every session action
pub trait ViewSubscriber: Send {
    fn on_view(&mut self, view: &ModalView);
}

impl<F> ViewSubscriber for F
where
    F: FnMut(&ModalView) + Send,
{
    fn on_view(&mut self, view: &ModalView) {
        self(view)
    }
}

/// Result of a session action: what the transition did and what to show now
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionUpdate {
    pub outcome: TransitionOutcome,
    pub view: ModalView,
}

impl SessionUpdate {
    pub fn is_blocked(&self) -> bool {
        self.outcome.is_blocked()
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_completed()
    }
}

/// One participant working through one questionnaire
pub struct QuestionnaireSession {
    id: SessionId,
    tree: QuestionnaireTree,
    store: AnswerStore,
    controller: NavigationController,
    history: NavigationHistory,
    subscribers: Vec<Box<dyn ViewSubscriber>>,
}

impl QuestionnaireSession {
    pub fn new(tree: QuestionnaireTree, config: EngineConfig) -> Self {
        let history = NavigationHistory::new(config.history_limit);
        let id = SessionId::generate();
        tracing::info!(
            session = %id.short(),
            categories = tree.category_count(),
            items = tree.item_count(),
            "Questionnaire session created"
        );
        Self {
            id,
            tree,
            store: AnswerStore::new(),
            controller: NavigationController::new(config),
            history,
            subscribers: Vec::new(),
        }
    }

    /// Continue from previously stored answers
    pub fn with_store(mut self, store: AnswerStore) -> Self {
        self.store = store;
        self
    }

    /// Open at a previously stored position instead of the start
    pub fn with_resume_position(mut self, position: NavigationPosition) -> Self {
        self.controller = self.controller.resuming_at(position);
        self
    }

    pub fn subscribe(&mut self, subscriber: impl ViewSubscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn open(&mut self) -> SessionUpdate {
        let outcome = self.controller.open(&self.tree, &self.store);
        if let TransitionOutcome::Opened { at } = outcome {
            tracing::info!(session = %self.id.short(), position = %at, "Questionnaire opened");
        }
        self.apply(NavigationEvent::Open, outcome)
    }

    /// Open at a specific position, e.g. a category chosen from an overview
    pub fn open_at(&mut self, position: NavigationPosition) -> SessionUpdate {
        let outcome = self.controller.open_at(&self.tree, &self.store, position);
        self.apply(NavigationEvent::Open, outcome)
    }

    pub fn confirm(&mut self) -> SessionUpdate {
        let outcome = self.controller.confirm(&self.tree, &self.store);
        self.apply(NavigationEvent::Confirm, outcome)
    }

    pub fn forward(&mut self) -> SessionUpdate {
        let outcome = self.controller.forward(&self.tree, &self.store);
        self.apply(NavigationEvent::Forward, outcome)
    }

    pub fn back(&mut self) -> SessionUpdate {
        let outcome = self.controller.back(&self.tree, &self.store);
        self.apply(NavigationEvent::Back, outcome)
    }

    pub fn close(&mut self) -> SessionUpdate {
        let outcome = self.controller.close();
        if let TransitionOutcome::Closed { at } = outcome {
            tracing::info!(session = %self.id.short(), position = %at, "Questionnaire closed");
        }
        self.apply(NavigationEvent::Close, outcome)
    }

    // ── Answers ──────────────────────────────────────────────────────

    /// Record typed answers for an item and re-resolve the current page.
    ///
    /// The returned outcome is the reconcile: `Moved` when the change hid
    /// the current page.
    pub fn set_answer(
        &mut self,
        link_id: &LinkId,
        values: Vec<AnswerValue>,
    ) -> QuestionnaireResult<SessionUpdate> {
        let item = self
            .tree
            .find(link_id)
            .ok_or_else(|| QuestionnaireError::ItemNotFound(link_id.clone()))?;
        let done = self.store.set_answer(item, values)?;
        tracing::debug!(session = %self.id.short(), link_id = %link_id, done, "Answer recorded");
        Ok(self.answer_changed(link_id))
    }

    /// Record raw text input for an item.
    ///
    /// Blank input clears the answer. Input that does not parse for the
    /// item type also clears any previous answer, so the item is no longer
    /// `done`, and is reported as [`QuestionnaireError::InvalidInput`].
    pub fn set_input(
        &mut self,
        link_id: &LinkId,
        input: &str,
    ) -> QuestionnaireResult<SessionUpdate> {
        let item = self
            .tree
            .find(link_id)
            .ok_or_else(|| QuestionnaireError::ItemNotFound(link_id.clone()))?;
        if !item.is_answerable() {
            return Err(QuestionnaireError::NotAnswerable(link_id.clone()));
        }
        if input.trim().is_empty() {
            self.store.clear_answer(link_id);
            return Ok(self.answer_changed(link_id));
        }

        match AnswerValue::parse(item.item_type, input) {
            Ok(value) => {
                let done = self.store.set_answer(item, vec![value])?;
                tracing::debug!(session = %self.id.short(), link_id = %link_id, done, "Input recorded");
                Ok(self.answer_changed(link_id))
            }
            Err(err) => {
                tracing::warn!(session = %self.id.short(), link_id = %link_id, error = %err, "Rejected input");
                self.store.clear_answer(link_id);
                self.answer_changed(link_id);
                Err(err)
            }
        }
    }

    pub fn clear_answer(&mut self, link_id: &LinkId) -> QuestionnaireResult<SessionUpdate> {
        if !self.tree.contains(link_id) {
            return Err(QuestionnaireError::ItemNotFound(link_id.clone()));
        }
        self.store.clear_answer(link_id);
        Ok(self.answer_changed(link_id))
    }

    // ── Query methods ────────────────────────────────────────────────

    pub fn view(&self) -> ModalView {
        self.controller.view(&self.tree, &self.store)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn tree(&self) -> &QuestionnaireTree {
        &self.tree
    }

    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn position(&self) -> Option<NavigationPosition> {
        self.controller.position()
    }

    pub fn is_visible(&self) -> bool {
        self.controller.is_visible()
    }

    /// End the session, handing back the answers for persistence
    pub fn into_store(self) -> AnswerStore {
        self.store
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn answer_changed(&mut self, link_id: &LinkId) -> SessionUpdate {
        let outcome = self.controller.reconcile(&self.tree, &self.store);
        self.apply(
            NavigationEvent::AnswerChanged {
                link_id: link_id.clone(),
            },
            outcome,
        )
    }

    fn apply(&mut self, event: NavigationEvent, outcome: TransitionOutcome) -> SessionUpdate {
        self.history
            .record(HistoryRecord::new(event, outcome, self.store.version()));
        let view = self.view();
        for subscriber in &mut self.subscribers {
            subscriber.on_view(&view);
        }
        SessionUpdate { outcome, view }
    }
}

impl std::fmt::Debug for QuestionnaireSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionnaireSession")
            .field("id", &self.id)
            .field("state", &self.controller.state())
            .field("answers", &self.store.len())
            .field("history", &self.history.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn make_session() -> QuestionnaireSession {
        let tree = QuestionnaireTree::new(vec![Category::new("1", "Basics")
            .with_item(Item::new("1.1", "Decimal", ItemType::Decimal).required())
            .with_item(
                Item::new("1.2", "Only on 1.5", ItemType::Text)
                    .with_dependency(Dependency::equals("1.1", AnswerValue::Decimal(1.5))),
            )
            .with_item(Item::display("1.3", "Thank you"))])
        .unwrap();
        QuestionnaireSession::new(tree, EngineConfig::default())
    }

    #[test]
    fn test_open_and_confirm_gate() {
        let mut session = make_session();
        assert!(!session.view().visible);

        session.open();
        assert_eq!(session.position(), Some(NavigationPosition::start()));
        assert!(session.confirm().is_blocked());

        session.set_input(&LinkId::new("1.1"), "2").unwrap();
        assert!(session.view().confirm_enabled);
        let update = session.confirm();
        assert_eq!(
            update.outcome,
            TransitionOutcome::Moved {
                from: NavigationPosition::new(0, 1),
                to: NavigationPosition::new(0, 3)
            }
        );
        assert_eq!(update.view.current_link_id(), Some(&LinkId::new("1.3")));
    }

    #[test]
    fn test_set_input_comma_decimal_reveals_item() {
        let mut session = make_session();
        session.open();
        session.set_input(&LinkId::new("1.1"), "1,5").unwrap();
        session.confirm();
        assert_eq!(session.position(), Some(NavigationPosition::new(0, 2)));
    }

    #[test]
    fn test_invalid_input_clears_previous_answer() {
        let mut session = make_session();
        let link_id = LinkId::new("1.1");
        session.open();
        session.set_input(&link_id, "1.5").unwrap();
        assert!(session.store().is_done(&link_id));

        let err = session.set_input(&link_id, "abc").unwrap_err();
        assert!(matches!(err, QuestionnaireError::InvalidInput { .. }));
        assert!(!session.store().is_done(&link_id));
        assert!(!session.view().confirm_enabled);
    }

    #[test]
    fn test_blank_input_clears() {
        let mut session = make_session();
        let link_id = LinkId::new("1.1");
        session.set_input(&link_id, "3").unwrap();
        session.set_input(&link_id, "   ").unwrap();
        assert!(session.store().answers(&link_id).is_empty());
    }

    #[test]
    fn test_unknown_and_unanswerable_items() {
        let mut session = make_session();
        assert!(matches!(
            session.set_input(&LinkId::new("9.9"), "x"),
            Err(QuestionnaireError::ItemNotFound(_))
        ));
        assert!(matches!(
            session.set_input(&LinkId::new("1.3"), "x"),
            Err(QuestionnaireError::NotAnswerable(_))
        ));
        assert!(matches!(
            session.clear_answer(&LinkId::new("9.9")),
            Err(QuestionnaireError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_answer_change_moves_off_hidden_page() {
        let mut session = make_session();
        let decimal = LinkId::new("1.1");
        session.set_answer(&decimal, vec![AnswerValue::Decimal(1.5)]).unwrap();
        session.open_at(NavigationPosition::new(0, 2));
        assert_eq!(session.position(), Some(NavigationPosition::new(0, 2)));

        let update = session
            .set_answer(&decimal, vec![AnswerValue::Decimal(2.0)])
            .unwrap();
        assert_eq!(
            update.outcome,
            TransitionOutcome::Moved {
                from: NavigationPosition::new(0, 2),
                to: NavigationPosition::new(0, 3)
            }
        );
    }

    #[test]
    fn test_subscribers_receive_views() {
        let mut session = make_session();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |view: &ModalView| {
            sink.lock().unwrap().push(view.current_link_id().cloned());
        });

        session.open();
        session.set_input(&LinkId::new("1.1"), "1.5").unwrap();
        session.confirm();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].as_ref().map(LinkId::as_str), Some("1.2"));
    }

    #[test]
    fn test_history_records_every_action() {
        let mut session = make_session();
        session.open();
        session.back();
        session.close();

        let events: Vec<_> = session.history().records().map(|r| r.event.clone()).collect();
        assert_eq!(
            events,
            vec![NavigationEvent::Open, NavigationEvent::Back, NavigationEvent::Close]
        );
    }

    #[test]
    fn test_resume_with_stored_answers() {
        let tree = make_session().tree().clone();
        let mut store = AnswerStore::new();
        store.record("1.1", ItemState::answered(AnswerValue::Decimal(1.5)));

        let mut session = QuestionnaireSession::new(tree, EngineConfig::default())
            .with_store(store)
            .with_resume_position(NavigationPosition::new(0, 2));
        session.open();
        assert_eq!(session.position(), Some(NavigationPosition::new(0, 2)));
        assert!(session.into_store().is_done(&LinkId::new("1.1")));
    }
}
