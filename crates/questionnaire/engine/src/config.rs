//! Engine configuration

use questionnaire_types::{NavigationPosition, QuestionnaireResult};
use serde::{Deserialize, Serialize};

/// Default number of navigation history records retained per session
pub const DEFAULT_HISTORY_LIMIT: usize = 512;

/// How the forward arrow treats required items
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardArrowPolicy {
    /// The arrow is an explicit skip and always advances
    #[default]
    AlwaysAllowed,
    /// The arrow follows the same gate as the confirm control
    RespectRequired,
}

/// What happens when navigation runs off the end of a category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBoundary {
    /// Continue into the neighbouring category
    #[default]
    Continue,
    /// Close the modal; back at the first page is a no-op
    CloseModal,
}

/// Configuration for the navigation engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forward_arrow: ForwardArrowPolicy,
    pub category_boundary: CategoryBoundary,
    /// Where the first `open` lands, and where a completed questionnaire
    /// reopens
    pub start_position: NavigationPosition,
    /// Maximum navigation history records kept per session
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            forward_arrow: ForwardArrowPolicy::default(),
            category_boundary: CategoryBoundary::default(),
            start_position: NavigationPosition::start(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> QuestionnaireResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_forward_arrow(mut self, policy: ForwardArrowPolicy) -> Self {
        self.forward_arrow = policy;
        self
    }

    pub fn with_category_boundary(mut self, boundary: CategoryBoundary) -> Self {
        self.category_boundary = boundary;
        self
    }

    pub fn with_start_position(mut self, position: NavigationPosition) -> Self {
        self.start_position = position;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
