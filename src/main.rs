//! Proctor Core - Demo Entry Point
//!
//! Runs one simulated proctoring session end to end: start, a burst of
//! violations, live monitoring output and the final report. Useful for
//! eyeballing the wire shapes without a frontend attached.

use std::sync::Arc;
use std::time::Duration;

use proctor_core::constants;
use proctor_core::logic::engine::{self, ProctoringEngine, SessionStart};
use proctor_core::{SessionMetadata, SessionStatus, ViolationEvent, ViolationKind};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let engine = Arc::new(ProctoringEngine::new());
    engine::spawn_sweeper(
        engine.clone(),
        Duration::from_secs(constants::get_sweep_interval_secs()),
    );

    let mut feed = engine.subscribe_supervisor("supervisor-1");

    let session = engine
        .start_session(
            SessionStart::new("demo-session", "exam-101", "student-42")
                .with_supervisor("supervisor-1")
                .with_metadata(SessionMetadata {
                    student_name: Some("Demo Student".to_string()),
                    ..Default::default()
                }),
        )
        .expect("session start");
    log::info!("session {} started", session.id);

    let now = chrono::Utc::now().timestamp_millis();
    for kind in [
        ViolationKind::TabSwitch,
        ViolationKind::TabSwitch,
        ViolationKind::PasteDetected,
        ViolationKind::MultipleFaces,
    ] {
        let outcome = engine
            .ingest(&ViolationEvent::new("demo-session", kind, now))
            .expect("ingest");
        log::info!(
            "score {} | action {} | {}",
            outcome.session_score,
            outcome.action,
            outcome.recommendations.join("; ")
        );
    }

    feed.pump();
    log::info!(
        "supervisor feed: {} update(s), {} alert(s)",
        feed.updates().len(),
        feed.alerts().len()
    );

    let report = engine
        .end_session("demo-session", SessionStatus::Completed)
        .expect("end session");
    println!(
        "{}",
        serde_json::to_string_pretty(&*report).expect("report json")
    );
}
