//! Navigation controller: the page state machine behind the modal
//!
//! The controller is either `Hidden` or `Active` at a page slot. Every
//! transition re-resolves through the [`PageResolver`], so the active slot
//! always names an item whose dependency is satisfied. The answer store
//! is passed in by reference on every call; the controller never owns or
//! mutates it.

use crate::completion_tracker::CompletionTracker;
use crate::config::{CategoryBoundary, EngineConfig};
use crate::page_resolver::{PageResolver, Resolution};
use questionnaire_types::{
    AnswerStore, Direction, Item, ModalView, NavigationPosition, Progress, QuestionnaireTree,
};
use serde::{Deserialize, Serialize};

/// Visibility state of the modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// No current item
    Hidden,
    Active(NavigationPosition),
}

/// The control that requested an advance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Confirm,
    ForwardArrow,
}

/// What a transition did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The modal became visible
    Opened { at: NavigationPosition },
    Moved {
        from: NavigationPosition,
        to: NavigationPosition,
    },
    /// The control's gate does not hold for the current item
    Blocked {
        at: NavigationPosition,
        control: Control,
    },
    /// Advanced past the last visible item; the modal is hidden
    Completed { from: NavigationPosition },
    Closed { at: NavigationPosition },
    /// Nothing to do (e.g. back on the very first item)
    Unchanged,
}

impl TransitionOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Forward/back/open/close state machine over page slots
#[derive(Clone, Debug)]
pub struct NavigationController {
    config: EngineConfig,
    resolver: PageResolver,
    completion: CompletionTracker,
    state: ModalState,
    /// Where the next `open` starts
    resume_at: NavigationPosition,
}

impl NavigationController {
    pub fn new(config: EngineConfig) -> Self {
        let resume_at = config.start_position;
        Self {
            config,
            resolver: PageResolver::new(),
            completion: CompletionTracker::new(),
            state: ModalState::Hidden,
            resume_at,
        }
    }

    /// Start the next `open` at a stored position
    pub fn resuming_at(mut self, position: NavigationPosition) -> Self {
        self.resume_at = position;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn position(&self) -> Option<NavigationPosition> {
        match self.state {
            ModalState::Active(position) => Some(position),
            ModalState::Hidden => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, ModalState::Active(_))
    }

    pub fn resume_position(&self) -> NavigationPosition {
        self.resume_at
    }

    pub fn current_item<'t>(&self, tree: &'t QuestionnaireTree) -> Option<&'t Item> {
        self.current(tree).map(|(_, item)| item)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Show the modal at the stored position.
    ///
    /// A stale position (its item is now hidden) moves forward to the next
    /// visible item, or backward when nothing follows. When no item is
    /// visible at all the modal stays hidden. Opening an active modal
    /// re-resolves its current position.
    pub fn open(&mut self, tree: &QuestionnaireTree, store: &AnswerStore) -> TransitionOutcome {
        let previous = self.position();
        let requested = self.sanitize(tree, previous.unwrap_or(self.resume_at));

        match (self.settle(tree, store, requested), previous) {
            (Some(at), None) => {
                self.state = ModalState::Active(at);
                tracing::debug!(position = %at, "Modal opened");
                TransitionOutcome::Opened { at }
            }
            (Some(at), Some(from)) if at != from => {
                self.state = ModalState::Active(at);
                tracing::debug!(from = %from, to = %at, "Active position re-resolved");
                TransitionOutcome::Moved { from, to: at }
            }
            (Some(_), Some(_)) => TransitionOutcome::Unchanged,
            (None, Some(at)) => {
                self.hide(at);
                TransitionOutcome::Closed { at }
            }
            (None, None) => {
                tracing::warn!("No visible item to open the questionnaire at");
                TransitionOutcome::Unchanged
            }
        }
    }

    /// Jump to a position (e.g. a category picked from an overview) and open
    pub fn open_at(
        &mut self,
        tree: &QuestionnaireTree,
        store: &AnswerStore,
        position: NavigationPosition,
    ) -> TransitionOutcome {
        self.resume_at = position;
        self.state = ModalState::Hidden;
        self.open(tree, store)
    }

    /// Advance via the confirm control, gated by the completion rule
    pub fn confirm(&mut self, tree: &QuestionnaireTree, store: &AnswerStore) -> TransitionOutcome {
        let Some((at, item)) = self.current(tree) else {
            return TransitionOutcome::Unchanged;
        };
        if !self.completion.can_confirm(item, store) {
            tracing::debug!(link_id = %item.link_id, "Confirm blocked: answer required");
            return TransitionOutcome::Blocked {
                at,
                control: Control::Confirm,
            };
        }
        self.advance(tree, store, at)
    }

    /// Advance via the forward arrow, gated by the configured policy
    pub fn forward(&mut self, tree: &QuestionnaireTree, store: &AnswerStore) -> TransitionOutcome {
        let Some((at, item)) = self.current(tree) else {
            return TransitionOutcome::Unchanged;
        };
        if !self
            .completion
            .can_forward(item, store, self.config.forward_arrow)
        {
            tracing::debug!(link_id = %item.link_id, "Forward arrow blocked: answer required");
            return TransitionOutcome::Blocked {
                at,
                control: Control::ForwardArrow,
            };
        }
        self.advance(tree, store, at)
    }

    /// Step to the previous visible item; a no-op on the very first one
    pub fn back(&mut self, tree: &QuestionnaireTree, store: &AnswerStore) -> TransitionOutcome {
        let Some(from) = self.position() else {
            return TransitionOutcome::Unchanged;
        };
        let before = NavigationPosition::new(from.category_index, from.page_index.saturating_sub(1));
        match self.previous_visible(tree, store, before) {
            Some(to) => {
                self.state = ModalState::Active(to);
                tracing::debug!(from = %from, to = %to, "Moved back");
                TransitionOutcome::Moved { from, to }
            }
            None => TransitionOutcome::Unchanged,
        }
    }

    /// Hide the modal, remembering the position for the next `open`
    pub fn close(&mut self) -> TransitionOutcome {
        match self.state {
            ModalState::Active(at) => {
                self.hide(at);
                TransitionOutcome::Closed { at }
            }
            ModalState::Hidden => TransitionOutcome::Unchanged,
        }
    }

    /// Re-resolve after an answer change.
    ///
    /// If the current item is no longer visible the position moves to the
    /// next visible item (or the previous one when nothing follows).
    pub fn reconcile(&mut self, tree: &QuestionnaireTree, store: &AnswerStore) -> TransitionOutcome {
        if !self.is_visible() {
            return TransitionOutcome::Unchanged;
        }
        match self.current(tree) {
            Some((_, item)) if self.resolver.is_visible(item, store) => TransitionOutcome::Unchanged,
            _ => self.open(tree, store),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// No visible item precedes the current one
    pub fn is_first_page(&self, tree: &QuestionnaireTree, store: &AnswerStore) -> bool {
        self.position().is_some_and(|at| {
            let before = NavigationPosition::new(at.category_index, at.page_index.saturating_sub(1));
            self.previous_visible(tree, store, before).is_none()
        })
    }

    /// No visible item follows the current one; confirming here completes
    pub fn is_last_page(&self, tree: &QuestionnaireTree, store: &AnswerStore) -> bool {
        self.position().is_some_and(|at| {
            let after = NavigationPosition::new(at.category_index, at.page_index + 1);
            self.next_visible(tree, store, after).is_none()
        })
    }

    /// Snapshot for the rendering collaborator
    pub fn view(&self, tree: &QuestionnaireTree, store: &AnswerStore) -> ModalView {
        let Some((at, item)) = self.current(tree) else {
            return ModalView::hidden(store.version());
        };
        let total = tree.category(at.category_index).map_or(0, |c| c.len());

        ModalView {
            visible: true,
            current_item: Some(item.clone()),
            visible_children: self
                .resolver
                .visible_children(item, store)
                .map(|child| child.link_id.clone())
                .collect(),
            position: Some(at),
            confirm_state: self.completion.confirm_state(item, store),
            confirm_enabled: self.completion.can_confirm(item, store),
            forward_enabled: self
                .completion
                .can_forward(item, store, self.config.forward_arrow),
            is_first_page: self.is_first_page(tree, store),
            is_last_page: self.is_last_page(tree, store),
            progress: Progress::new(at.page_index, total),
            store_version: store.version(),
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn current<'t>(&self, tree: &'t QuestionnaireTree) -> Option<(NavigationPosition, &'t Item)> {
        let at = self.position()?;
        let item = tree.page(at.category_index, at.page_index)?;
        Some((at, item))
    }

    fn advance(
        &mut self,
        tree: &QuestionnaireTree,
        store: &AnswerStore,
        from: NavigationPosition,
    ) -> TransitionOutcome {
        let after = NavigationPosition::new(from.category_index, from.page_index + 1);
        match self.next_visible(tree, store, after) {
            Some(to) => {
                self.state = ModalState::Active(to);
                tracing::debug!(from = %from, to = %to, "Moved forward");
                TransitionOutcome::Moved { from, to }
            }
            None => {
                self.state = ModalState::Hidden;
                self.resume_at = self.config.start_position;
                tracing::info!(from = %from, "Questionnaire completed");
                TransitionOutcome::Completed { from }
            }
        }
    }

    fn hide(&mut self, at: NavigationPosition) {
        self.state = ModalState::Hidden;
        self.resume_at = at;
    }

    /// Replace a position whose category does not exist
    fn sanitize(&self, tree: &QuestionnaireTree, position: NavigationPosition) -> NavigationPosition {
        if position.category_index < tree.category_count() {
            return position;
        }
        tracing::warn!(
            position = %position,
            categories = tree.category_count(),
            "Stored position out of range, restarting"
        );
        self.config.start_position
    }

    /// Nearest visible slot from `at`, forward first
    fn settle(
        &self,
        tree: &QuestionnaireTree,
        store: &AnswerStore,
        at: NavigationPosition,
    ) -> Option<NavigationPosition> {
        self.next_visible(tree, store, at)
            .or_else(|| self.previous_visible(tree, store, at))
    }

    /// First visible slot at or after `from`
    fn next_visible(
        &self,
        tree: &QuestionnaireTree,
        store: &AnswerStore,
        from: NavigationPosition,
    ) -> Option<NavigationPosition> {
        let resolution = self.resolver.resolve(
            tree,
            from.category_index,
            from.page_index,
            store,
            Direction::Forward,
        );
        match resolution {
            Resolution::Found(page) => Some(NavigationPosition::new(
                from.category_index,
                page.page_index,
            )),
            _ if self.config.category_boundary == CategoryBoundary::CloseModal => None,
            _ => (from.category_index + 1..tree.category_count()).find_map(|category| {
                self.resolver
                    .first_page(tree, category, store)
                    .map(|page| NavigationPosition::new(category, page.page_index))
            }),
        }
    }

    /// Last visible slot at or before `from`
    fn previous_visible(
        &self,
        tree: &QuestionnaireTree,
        store: &AnswerStore,
        from: NavigationPosition,
    ) -> Option<NavigationPosition> {
        let resolution = self.resolver.resolve(
            tree,
            from.category_index,
            from.page_index,
            store,
            Direction::Backward,
        );
        match resolution {
            Resolution::Found(page) => Some(NavigationPosition::new(
                from.category_index,
                page.page_index,
            )),
            _ if self.config.category_boundary == CategoryBoundary::CloseModal => None,
            _ => (0..from.category_index.min(tree.category_count()))
                .rev()
                .find_map(|category| {
                    self.resolver
                        .last_page(tree, category, store)
                        .map(|page| NavigationPosition::new(category, page.page_index))
                }),
        }
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
