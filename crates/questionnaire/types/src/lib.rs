//! Questionnaire Domain Types
//!
//! A questionnaire is a forest of **categories**, each an ordered sequence
//! of **items** rendered one item per page. Items can be gated by a
//! **dependency** on another item's answer; gated items stay hidden until
//! the prerequisite is answered as expected.
//!
//! # Key Concepts
//!
//! - **QuestionnaireTree**: The read-only category/item structure, indexed
//!   by linkId for constant-time cross-reference lookups.
//! - **Item**: A question (or a group of questions sharing one page),
//!   addressed by a hierarchical [`LinkId`] such as `"4.1.1"`.
//! - **Dependency**: A predicate over another item's recorded answer.
//! - **AnswerValue**: A typed answer in FHIR `value[x]` form.
//! - **AnswerStore**: The mutable linkId -> answer/done map.
//! - **ModalView**: What the rendering collaborator receives after every
//!   transition.
//!
//! # Design Principles
//!
//! 1. Structure is immutable once loaded. Authoring errors (dangling
//!    dependency references, duplicate linkIds) surface at load time.
//! 2. The answer store is plain data. It never decides visibility.
//! 3. `done` is derived from the type validity rule, never set blindly.

#![deny(unsafe_code)]

mod answer;
mod errors;
mod item;
mod navigation;
mod store;
mod tree;

pub use answer::*;
pub use errors::*;
pub use item::*;
pub use navigation::*;
pub use store::*;
pub use tree::*;
