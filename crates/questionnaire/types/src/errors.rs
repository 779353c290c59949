//! Error types for the questionnaire layer

use crate::{ItemType, LinkId};

/// Errors raised while loading a questionnaire or recording answers.
///
/// Navigation itself never fails: an unresolvable dependency is simply
/// unsatisfied, and out-of-range moves are no-ops.
#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("Item not found: {0}")]
    ItemNotFound(LinkId),

    #[error("Duplicate linkId: {0}")]
    DuplicateLinkId(LinkId),

    #[error("Malformed dependency: item '{item}' references unknown item '{references}'")]
    MalformedDependency { item: LinkId, references: LinkId },

    #[error("Item '{0}' depends on itself")]
    SelfDependency(LinkId),

    #[error(
        "Dependency of '{item}' expects a {value_kind} answer but '{references}' is of type {item_type}"
    )]
    DependencyTypeMismatch {
        item: LinkId,
        references: LinkId,
        item_type: ItemType,
        value_kind: &'static str,
    },

    #[error("Item '{0}' cannot hold an answer")]
    NotAnswerable(LinkId),

    #[error("Item '{item}' of type {item_type} does not accept a {value_kind} answer")]
    AnswerTypeMismatch {
        item: LinkId,
        item_type: ItemType,
        value_kind: &'static str,
    },

    #[error("Cannot read '{input}' as {item_type}")]
    InvalidInput { item_type: ItemType, input: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for questionnaire operations
pub type QuestionnaireResult<T> = Result<T, QuestionnaireError>;
