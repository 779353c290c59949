//! Navigation history: an ordered, bounded log of session events
//!
//! Every user action on a session is recorded together with the
//! transition it produced, so a support tool can replay how a participant
//! moved through the questionnaire. The oldest records are dropped once
//! the configured limit is reached.

use crate::navigation::TransitionOutcome;
use chrono::{DateTime, Utc};
use questionnaire_types::{LinkId, NavigationPosition};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded log of navigation events for one session
#[derive(Clone, Debug)]
pub struct NavigationHistory {
    records: VecDeque<HistoryRecord>,
    limit: usize,
}

impl NavigationHistory {
    /// A history keeping at most `limit` records (0 disables recording)
    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    pub fn record(&mut self, record: HistoryRecord) {
        if self.limit == 0 {
            return;
        }
        tracing::trace!(
            event = %record.event,
            store_version = record.store_version,
            "Navigation recorded"
        );
        if self.records.len() == self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records from oldest to newest
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    /// Records whose transition moved onto or away from `position`
    pub fn visits(&self, position: NavigationPosition) -> Vec<&HistoryRecord> {
        self.records
            .iter()
            .filter(|r| r.involves(position))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One entry in the navigation history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub event: NavigationEvent,
    pub outcome: TransitionOutcome,
    /// Answer store version when the event was handled
    pub store_version: u64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(event: NavigationEvent, outcome: TransitionOutcome, store_version: u64) -> Self {
        Self {
            event,
            outcome,
            store_version,
            timestamp: Utc::now(),
        }
    }

    pub fn involves(&self, position: NavigationPosition) -> bool {
        match self.outcome {
            TransitionOutcome::Opened { at }
            | TransitionOutcome::Blocked { at, .. }
            | TransitionOutcome::Closed { at } => at == position,
            TransitionOutcome::Moved { from, to } => from == position || to == position,
            TransitionOutcome::Completed { from } => from == position,
            TransitionOutcome::Unchanged => false,
        }
    }
}

/// What triggered a recorded transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavigationEvent {
    Open,
    Confirm,
    Forward,
    Back,
    Close,
    /// An answer was recorded or cleared; the transition is the reconcile
    AnswerChanged { link_id: LinkId },
}

impl std::fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Confirm => write!(f, "confirm"),
            Self::Forward => write!(f, "forward"),
            Self::Back => write!(f, "back"),
            Self::Close => write!(f, "close"),
            Self::AnswerChanged { link_id } => write!(f, "answer_changed({})", link_id),
        }
    }
}
