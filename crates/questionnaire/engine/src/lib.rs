//! Questionnaire Navigation Engine
//!
//! The engine drives a one-item-per-page questionnaire modal. It decides
//! which item is shown, skips items whose dependency is not satisfied,
//! gates the confirm control on required answers and re-resolves the
//! current page whenever an answer changes.
//!
//! # Key Principle
//!
//! **Visibility is derived, never stored.** Every transition re-reads the
//! answer store, so the shown item always reflects the latest answers.
//!
//! # Architecture
//!
//! The [`QuestionnaireSession`] composes specialized components:
//!
//! - [`DependencyEvaluator`]: Decides whether an item's prerequisite holds
//! - [`PageResolver`]: Maps a page slot to the next visible item
//! - [`CompletionTracker`]: Derives the confirm state and control gates
//! - [`NavigationController`]: The open/confirm/forward/back/close state machine
//! - [`NavigationHistory`]: Records every action for later replay
//!
//! # Example
//!
//! ```rust
//! use questionnaire_engine::{EngineConfig, QuestionnaireSession};
//! use questionnaire_types::*;
//!
//! let tree = QuestionnaireTree::new(vec![Category::new("1", "Intro")
//!     .with_item(Item::new("1.1", "Do you smoke?", ItemType::Boolean).required())
//!     .with_item(
//!         Item::new("1.2", "How many per day?", ItemType::Integer)
//!             .with_dependency(Dependency::equals("1.1", AnswerValue::Boolean(true))),
//!     )
//!     .with_item(Item::display("1.3", "Thank you"))])
//! .unwrap();
//!
//! let mut session = QuestionnaireSession::new(tree, EngineConfig::default());
//! session.open();
//! assert!(session.confirm().is_blocked());
//!
//! session.set_input(&LinkId::new("1.1"), "no").unwrap();
//! session.confirm();
//! assert_eq!(session.view().current_link_id(), Some(&LinkId::new("1.3")));
//! assert!(session.confirm().is_completed());
//! ```

#![deny(unsafe_code)]

pub mod completion_tracker;
pub mod config;
pub mod dependency_evaluator;
pub mod history;
pub mod navigation;
pub mod page_resolver;
pub mod session;

pub use completion_tracker::CompletionTracker;
pub use config::{CategoryBoundary, EngineConfig, ForwardArrowPolicy, DEFAULT_HISTORY_LIMIT};
pub use dependency_evaluator::{DependencyEvaluator, DependencyResult, UnsatisfiedReason};
pub use history::{HistoryRecord, NavigationEvent, NavigationHistory};
pub use navigation::{Control, ModalState, NavigationController, TransitionOutcome};
pub use page_resolver::{PageResolver, Resolution, ResolvedPage};
pub use session::{QuestionnaireSession, SessionUpdate, ViewSubscriber};
