//! # Questionnaire Walkthrough Example
//!
//! This example drives the reference questionnaire the way a participant
//! would:
//! - Opening the modal
//! - Answering items, including a rejected input
//! - Watching conditional items appear and disappear
//! - Completing the questionnaire
//!
//! Run with: `RUST_LOG=questionnaire_engine=debug cargo run --example walkthrough`

use questionnaire_engine::{EngineConfig, QuestionnaireSession, SessionUpdate};
use questionnaire_types::{LinkId, ModalView, NavigationPosition, QuestionnaireTree};
use tracing_subscriber::EnvFilter;

const REFERENCE: &str = include_str!("../tests/fixtures/reference_questionnaire.json");

fn describe(view: &ModalView) -> String {
    match (view.position, view.current_link_id()) {
        (Some(position), Some(link_id)) => format!(
            "[{}] {} \"{}\" ({:?}, {}/{})",
            position,
            link_id,
            view.current_text().unwrap_or_default(),
            view.confirm_state,
            view.progress.page,
            view.progress.total
        ),
        _ => "(modal hidden)".to_string(),
    }
}

fn show(action: &str, update: &SessionUpdate) {
    println!("{:<28} {:?}", action, update.outcome);
    println!("{:<28} {}", "", describe(&update.view));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Questionnaire walkthrough\n");

    let tree = QuestionnaireTree::from_json(REFERENCE)?;
    println!(
        "Loaded {} categories, {} items\n",
        tree.category_count(),
        tree.item_count()
    );

    let mut session = QuestionnaireSession::new(tree, EngineConfig::default());
    session.subscribe(|view: &ModalView| {
        tracing::debug!(visible = view.visible, store_version = view.store_version, "View pushed");
    });

    show("open", &session.open());
    show("input 1.1", &session.set_input(&LinkId::new("1.1"), "Kopfschmerzen")?);
    show("confirm", &session.confirm());

    if let Err(err) = session.set_input(&LinkId::new("1.2"), "gestern") {
        println!("{:<28} rejected: {}", "input 1.2", err);
    }
    show("input 1.2", &session.set_input(&LinkId::new("1.2"), "01.03.2021")?);

    println!("\nRequired items");
    show("jump to category 2", &session.open_at(NavigationPosition::new(1, 1)));
    show("confirm (unanswered)", &session.confirm());
    show("forward arrow", &session.forward());
    show("input 2.2", &session.set_input(&LinkId::new("2.2"), "3,5")?);
    show("confirm", &session.confirm());

    println!("\nConditional items");
    show("confirm (display)", &session.confirm());
    show("input 3.2.1", &session.set_input(&LinkId::new("3.2.1"), "yes")?);
    show("confirm", &session.confirm());
    show("input 4.1.1", &session.set_input(&LinkId::new("4.1.1"), "1.5")?);
    show("input 4.1.2", &session.set_input(&LinkId::new("4.1.2"), "wie erwartet")?);
    show("confirm", &session.confirm());
    show("confirm", &session.confirm());
    show("back", &session.back());

    println!("\nFinishing");
    while session.is_visible() {
        show("forward arrow", &session.forward());
    }

    println!(
        "\n{} history records, {} answers ({} done)",
        session.history().len(),
        session.store().len(),
        session.store().done_count()
    );
    Ok(())
}
