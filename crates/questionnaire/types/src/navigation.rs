//! Navigation vocabulary shared by the engine and its rendering collaborator
//!
//! A [`NavigationPosition`] names a page slot. A [`ModalView`] is the
//! snapshot handed to the renderer after every transition.

use crate::{Item, LinkId};
use serde::{Deserialize, Serialize};

// ── Session Identifier ───────────────────────────────────────────────

/// Unique identifier for a questionnaire session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// First eight characters, for log fields
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(index, _)| index);
        &self.0[..end]
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Position ─────────────────────────────────────────────────────────

/// A page slot: category index plus 1-based page index within the category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavigationPosition {
    pub category_index: usize,
    pub page_index: usize,
}

impl NavigationPosition {
    pub fn new(category_index: usize, page_index: usize) -> Self {
        Self {
            category_index,
            page_index,
        }
    }

    /// First page of the first category
    pub fn start() -> Self {
        Self::new(0, 1)
    }
}

impl Default for NavigationPosition {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for NavigationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category_index, self.page_index)
    }
}

/// Direction of a page walk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

// ── Confirm Affordance ───────────────────────────────────────────────

/// Visual state of the confirm control
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmState {
    #[default]
    Unanswered,
    Answered,
}

impl ConfirmState {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered)
    }
}

// ── View ─────────────────────────────────────────────────────────────

/// Progress through the current category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Current 1-based page slot
    pub page: usize,
    /// Page slots in the category
    pub total: usize,
}

impl Progress {
    pub fn new(page: usize, total: usize) -> Self {
        Self { page, total }
    }

    /// Fraction in `[0.0, 1.0]`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.page.min(self.total) as f64) / (self.total as f64)
        }
    }
}

/// Observable state delivered to the rendering collaborator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModalView {
    pub visible: bool,
    /// The page item, group children included
    pub current_item: Option<Item>,
    /// Children of a group page that are currently shown
    pub visible_children: Vec<LinkId>,
    pub position: Option<NavigationPosition>,
    pub confirm_state: ConfirmState,
    /// The confirm control may advance
    pub confirm_enabled: bool,
    /// The forward arrow may advance
    pub forward_enabled: bool,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub progress: Progress,
    /// Answer store version the view was computed from
    pub store_version: u64,
}

impl ModalView {
    /// The view of a closed modal
    pub fn hidden(store_version: u64) -> Self {
        Self {
            visible: false,
            current_item: None,
            visible_children: Vec::new(),
            position: None,
            confirm_state: ConfirmState::Unanswered,
            confirm_enabled: false,
            forward_enabled: false,
            is_first_page: false,
            is_last_page: false,
            progress: Progress::default(),
            store_version,
        }
    }

    pub fn current_link_id(&self) -> Option<&LinkId> {
        self.current_item.as_ref().map(|item| &item.link_id)
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current_item.as_ref().map(|item| item.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let a = NavigationPosition::new(0, 9);
        let b = NavigationPosition::new(1, 1);
        assert!(a < b);
        assert_eq!(NavigationPosition::default(), NavigationPosition::start());
        assert_eq!(b.to_string(), "1:1");
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(Progress::new(0, 0).fraction(), 0.0);
        assert_eq!(Progress::new(2, 4).fraction(), 0.5);
        assert_eq!(Progress::new(9, 4).fraction(), 1.0);
    }

    #[test]
    fn test_hidden_view() {
        let view = ModalView::hidden(7);
        assert!(!view.visible);
        assert!(view.current_link_id().is_none());
        assert_eq!(view.store_version, 7);
    }

    #[test]
    fn test_session_id_short() {
        let id = SessionId::generate();
        assert_eq!(id.short().len(), 8);
        assert_eq!(SessionId::new("abc").short(), "abc");
        // Cuts on a character boundary
        assert_eq!(SessionId::new("fragebögen-1").short(), "fragebög");
    }
}
