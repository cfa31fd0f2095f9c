//! Violation Ingestion
//!
//! Turns a validated detector event into a scored, appended violation and
//! a fresh advisory verdict. Everything happens in-memory under the
//! session's single-writer lock; no I/O on this path.

use chrono::Utc;

use crate::error::{ProctorError, ProctorResult};
use crate::logic::decision;
use crate::logic::ident::IdProvider;
use crate::logic::scoring::ScoringPolicy;
use crate::logic::session::{ProctoringSession, SessionRegistry, Violation};

use super::types::{IngestOutcome, ViolationEvent};

/// Score, append and re-evaluate one violation event.
///
/// The event is assumed already validated (`ViolationEvent::validate`);
/// the engine facade runs that check once, before any session lookup.
/// Fails with `NotFound` for an unknown session and `SessionTerminated`
/// for a frozen one; in both cases nothing is counted. On success the
/// counters and score are updated atomically with the append, and the
/// decision ladder is evaluated on the post-update state. Returns the
/// outcome together with a post-append session snapshot so callers can
/// broadcast state that already includes this violation.
pub fn ingest(
    registry: &SessionRegistry,
    policy: &ScoringPolicy,
    ids: &dyn IdProvider,
    event: &ViolationEvent,
) -> ProctorResult<(IngestOutcome, ProctoringSession)> {
    let (points, severity) = policy.resolve(&event.kind);
    let violation = Violation {
        id: ids.next_id(),
        session_id: event.session_id.clone(),
        kind: event.kind.clone(),
        points,
        severity,
        details: event.details.clone(),
        timestamp_ms: event.timestamp_ms,
        screenshot_ref: event.screenshot_ref.clone(),
        acknowledged: false,
        reviewer_note: None,
        acknowledged_at: None,
        created_at: Utc::now(),
    };

    let (outcome, snapshot) = registry.mutate(&event.session_id, |session| {
        if session.is_terminal() {
            return Err(ProctorError::SessionTerminated {
                session_id: session.id.clone(),
                status: session.status,
            });
        }

        session.record(violation.clone());
        let verdict = decision::decide(session);

        let outcome = IngestOutcome {
            violation: violation.clone(),
            session_score: session.violation_score,
            action: verdict.action,
            recommendations: verdict.recommendations,
        };
        Ok((outcome, session.clone()))
    })?;

    log::info!(
        "violation logged ({}): {} pts | session {} total: {} | action: {}",
        outcome.violation.kind,
        outcome.violation.points,
        event.session_id,
        outcome.session_score,
        outcome.action
    );
    Ok((outcome, snapshot))
}

/// Reviewer acknowledgment - the only post-insertion mutation a violation
/// supports. Allowed on terminal sessions: review happens after the exam,
/// and it touches none of the frozen score/counter state.
pub fn acknowledge(
    registry: &SessionRegistry,
    session_id: &str,
    violation_id: &str,
    note: Option<String>,
) -> ProctorResult<Violation> {
    registry.mutate(session_id, |session| {
        let violation = session
            .violations
            .iter_mut()
            .find(|v| v.id == violation_id)
            .ok_or_else(|| ProctorError::NotFound(format!("violation {}", violation_id)))?;
        violation.acknowledged = true;
        violation.reviewer_note = note;
        violation.acknowledged_at = Some(Utc::now());
        Ok(violation.clone())
    })
}

// ============================================================================
// TESTS
// ============================================================================
