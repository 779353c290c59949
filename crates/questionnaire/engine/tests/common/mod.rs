//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use questionnaire_engine::{EngineConfig, QuestionnaireSession};
use questionnaire_types::{AnswerStore, AnswerValue, ItemState, LinkId, QuestionnaireTree};

const REFERENCE: &str = include_str!("../fixtures/reference_questionnaire.json");

/// The four-category reference questionnaire
pub fn reference_tree() -> QuestionnaireTree {
    QuestionnaireTree::from_json(REFERENCE).expect("reference questionnaire loads")
}

pub fn reference_session(config: EngineConfig) -> QuestionnaireSession {
    QuestionnaireSession::new(reference_tree(), config)
}

pub fn link(id: &str) -> LinkId {
    LinkId::new(id)
}

/// A store with a single answered boolean
pub fn store_with_bool(id: &str, value: bool) -> AnswerStore {
    let mut store = AnswerStore::new();
    store.record(id, ItemState::answered(AnswerValue::Boolean(value)));
    store
}

/// Send `tracing` output to the test harness when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
