//! Report Generator
//!
//! Builds the immutable end-of-exam report from a frozen session and
//! caches it, so repeat calls for the same session return the exact same
//! report object.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::constants::CRITICAL_HALT_COUNT;
use crate::error::{ProctorError, ProctorResult};
use crate::logic::decision;
use crate::logic::scoring::ViolationKind;
use crate::logic::session::{ProctoringSession, Violation};

use super::types::{overall_severity, FinalDecision, Report};
use super::types::{
    FLAG_DEVICE_CHANGE_DETECTED, FLAG_EXCESSIVE_TAB_SWITCHING,
    FLAG_MULTIPLE_CRITICAL_VIOLATIONS, FLAG_MULTIPLE_PEOPLE_DETECTED,
    FLAG_PHONE_USAGE_DETECTED, FLAG_SUSPICIOUS_PASTE_PATTERN,
};

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Default)]
pub struct ReportGenerator {
    cache: RwLock<HashMap<String, Arc<Report>>>,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the report for a terminal session, exactly once.
    ///
    /// Idempotent: repeat calls return the cached report. Generating for a
    /// session that is still ACTIVE/PAUSED is a caller bug.
    pub fn generate(&self, session: &ProctoringSession) -> ProctorResult<Arc<Report>> {
        if let Some(report) = self.cache.read().get(&session.id) {
            return Ok(report.clone());
        }
        if !session.is_terminal() {
            return Err(ProctorError::ValidationError(format!(
                "session {} is not terminal, no report to generate",
                session.id
            )));
        }

        let report = Arc::new(build_report(session));
        let mut cache = self.cache.write();
        // First writer wins if two callers raced past the read above
        let report = cache
            .entry(session.id.clone())
            .or_insert(report)
            .clone();
        log::info!(
            "report generated: {} | score: {} | decision: {}",
            report.session_id,
            report.violation_score,
            report.final_decision
        );
        Ok(report)
    }

    pub fn cached(&self, session_id: &str) -> Option<Arc<Report>> {
        self.cache.read().get(session_id).cloned()
    }

    /// Drop cached reports for swept sessions
    pub fn prune(&self, session_ids: &[String]) {
        if session_ids.is_empty() {
            return;
        }
        let mut cache = self.cache.write();
        for id in session_ids {
            cache.remove(id);
        }
    }
}

// ============================================================================
// REPORT CONSTRUCTION
// ============================================================================

/// Pure construction from a frozen session snapshot (deep copies only)
pub fn build_report(session: &ProctoringSession) -> Report {
    let score = session.violation_score;
    Report {
        session_id: session.id.clone(),
        exam_id: session.exam_id.clone(),
        student_id: session.student_id.clone(),
        supervisor_id: session.supervisor_id.clone(),
        exam_duration_minutes: session.duration_minutes(),
        start_time: session.start_time,
        end_time: session.end_time.unwrap_or(session.updated_at),
        total_violations: session.total_violations,
        critical_violations: session.critical_violations,
        high_violations: session.high_violations,
        violations_by_type: group_by_kind(&session.violations),
        violation_score: score,
        score_percentage: score.min(100),
        severity: overall_severity(score),
        final_decision: FinalDecision::from_score(score),
        recommendations: decision::recommendations(score),
        flagged_reasons: flag_reasons(session),
        violations: session.violations.clone(),
        metadata: session.metadata.clone(),
        created_at: session.created_at,
        completed_at: Utc::now(),
    }
}

fn group_by_kind(violations: &[Violation]) -> BTreeMap<String, u32> {
    let mut grouped = BTreeMap::new();
    for violation in violations {
        *grouped.entry(violation.kind.as_str().to_string()).or_insert(0) += 1;
    }
    grouped
}

/// Heuristic reasons a session is suspicious beyond its raw score
fn flag_reasons(session: &ProctoringSession) -> Vec<String> {
    let mut reasons = Vec::new();

    if session.critical_violations >= CRITICAL_HALT_COUNT {
        reasons.push(FLAG_MULTIPLE_CRITICAL_VIOLATIONS.to_string());
    }

    let has = |kind: &ViolationKind| session.violations.iter().any(|v| &v.kind == kind);

    if has(&ViolationKind::MultipleFaces) {
        reasons.push(FLAG_MULTIPLE_PEOPLE_DETECTED.to_string());
    }
    if has(&ViolationKind::PhoneDetected) {
        reasons.push(FLAG_PHONE_USAGE_DETECTED.to_string());
    }
    if has(&ViolationKind::PasteDetected) || has(&ViolationKind::PossiblePasteDetected) {
        reasons.push(FLAG_SUSPICIOUS_PASTE_PATTERN.to_string());
    }
    if has(&ViolationKind::TabSwitch) {
        reasons.push(FLAG_EXCESSIVE_TAB_SWITCHING.to_string());
    }
    if has(&ViolationKind::DeviceChange) {
        reasons.push(FLAG_DEVICE_CHANGE_DETECTED.to_string());
    }

    reasons
}

// ============================================================================
// TESTS
// ============================================================================
