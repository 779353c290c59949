//! The answer store: linkId -> recorded answer and completion flag
//!
//! Entries are created lazily on the first answer and are never removed;
//! clearing an answer keeps the entry with `done = false`. Every mutation
//! bumps the store version so observers can tell snapshots apart.

use crate::{AnswerValue, Item, LinkId, QuestionnaireError, QuestionnaireResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recorded answer state of a single item
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    /// Answer values, in entry order
    #[serde(default)]
    pub answer: Vec<AnswerValue>,
    /// True once a valid answer is recorded
    #[serde(default)]
    pub done: bool,
}

impl ItemState {
    pub fn new(answer: Vec<AnswerValue>, done: bool) -> Self {
        Self { answer, done }
    }

    /// A completed state holding a single value
    pub fn answered(value: AnswerValue) -> Self {
        Self::new(vec![value], true)
    }
}

/// Mutable map of answered items
#[derive(Clone, Debug, Default)]
pub struct AnswerStore {
    entries: HashMap<LinkId, ItemState>,
    version: u64,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a state directly, bypassing validation.
    ///
    /// Used when restoring a previously captured session.
    pub fn record(&mut self, link_id: impl Into<String>, state: ItemState) {
        self.entries.insert(LinkId::new(link_id), state);
        self.version += 1;
    }

    /// Record answer values for an item and derive its `done` flag.
    ///
    /// Returns the new `done` flag. Fails when the item cannot hold an
    /// answer or a value is of a kind the item type does not accept.
    pub fn set_answer(&mut self, item: &Item, values: Vec<AnswerValue>) -> QuestionnaireResult<bool> {
        if !item.is_answerable() {
            return Err(QuestionnaireError::NotAnswerable(item.link_id.clone()));
        }
        if let Some(rejected) = values.iter().find(|v| !item.item_type.accepts(v)) {
            return Err(QuestionnaireError::AnswerTypeMismatch {
                item: item.link_id.clone(),
                item_type: item.item_type,
                value_kind: rejected.kind(),
            });
        }

        let done = !values.is_empty() && values.iter().all(|v| v.is_valid_for(item));
        let state = self.entries.entry(item.link_id.clone()).or_default();
        state.answer = values;
        state.done = done;
        self.version += 1;
        Ok(done)
    }

    /// Clear the answer of an item, keeping its entry.
    ///
    /// Returns `false` if the item was never answered.
    pub fn clear_answer(&mut self, link_id: &LinkId) -> bool {
        match self.entries.get_mut(link_id) {
            Some(state) => {
                state.answer.clear();
                state.done = false;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, link_id: &LinkId) -> Option<&ItemState> {
        self.entries.get(link_id)
    }

    pub fn is_done(&self, link_id: &LinkId) -> bool {
        self.entries.get(link_id).is_some_and(|s| s.done)
    }

    pub fn answers(&self, link_id: &LinkId) -> &[AnswerValue] {
        self.entries
            .get(link_id)
            .map(|s| s.answer.as_slice())
            .unwrap_or(&[])
    }

    /// Number of items marked done
    pub fn done_count(&self) -> usize {
        self.entries.values().filter(|s| s.done).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Monotonic mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }
}
