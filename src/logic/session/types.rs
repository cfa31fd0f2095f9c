//! Session Types
//!
//! One `ProctoringSession` per exam attempt, plus the violations it owns.
//! No registry logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::scoring::{Severity, ViolationKind};

// ============================================================================
// SESSION STATUS
// ============================================================================

/// Lifecycle state of a proctoring session.
///
/// COMPLETED, CANCELLED and FLAGGED are terminal: once reached, the
/// violation sequence, counters and score are frozen forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
    Cancelled,
    Flagged,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "ACTIVE",
            SessionStatus::Paused => "PAUSED",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
            SessionStatus::Flagged => "FLAGGED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Cancelled | SessionStatus::Flagged
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SESSION METADATA
// ============================================================================

/// Opaque client metadata captured at session start, immutable thereafter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Display name for live dashboards (falls back to the student id)
    pub student_name: Option<String>,
    pub device_fingerprint: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// ============================================================================
// VIOLATION
// ============================================================================

/// One detected suspicious event, weighted at ingestion time.
///
/// `points` and `severity` are resolved from the scoring policy at the
/// moment of ingestion and never recomputed, so later policy changes do
/// not retroactively alter history. The acknowledgment fields are the only
/// ones a reviewer may mutate after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub points: u32,
    pub severity: Severity,
    /// Free-form detector payload, opaque to the engine
    pub details: serde_json::Value,
    /// Event time in epoch milliseconds (detector clock, not receive time)
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    pub screenshot_ref: Option<String>,
    pub acknowledged: bool,
    pub reviewer_note: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// PROCTORING SESSION
// ============================================================================

/// One exam attempt's integrity-monitoring record.
///
/// Invariant: `violation_score` always equals the sum of `points` over
/// `violations`; `record()` is the only mutation path that touches both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctoringSession {
    pub id: String,
    pub exam_id: String,
    pub student_id: String,
    pub supervisor_id: Option<String>,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub violation_score: u32,
    pub total_violations: u32,
    pub critical_violations: u32,
    pub high_violations: u32,
    pub violations: Vec<Violation>,
    #[serde(flatten)]
    pub metadata: SessionMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProctoringSession {
    pub fn new(
        id: String,
        exam_id: String,
        student_id: String,
        supervisor_id: Option<String>,
        metadata: SessionMetadata,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            exam_id,
            student_id,
            supervisor_id,
            status: SessionStatus::Active,
            start_time: now,
            end_time: None,
            violation_score: 0,
            total_violations: 0,
            critical_violations: 0,
            high_violations: 0,
            violations: Vec::new(),
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Append a violation and bump the aggregate counters.
    ///
    /// Must only be called while holding the session's write lock and only
    /// on a non-terminal session; the registry enforces both.
    pub fn record(&mut self, violation: Violation) {
        self.total_violations += 1;
        self.violation_score += violation.points;
        match violation.severity {
            Severity::Critical => self.critical_violations += 1,
            Severity::High => self.high_violations += 1,
            _ => {}
        }
        self.violations.push(violation);
        self.updated_at = Utc::now();
    }

    /// Running duration, up to `end_time` for terminal sessions
    pub fn duration_minutes(&self) -> i64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_minutes()
    }

    /// Display name for live dashboards
    pub fn display_name(&self) -> &str {
        self.metadata
            .student_name
            .as_deref()
            .unwrap_or(&self.student_id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(points: u32, severity: Severity) -> Violation {
        Violation {
            id: "v1".to_string(),
            session_id: "s1".to_string(),
            kind: ViolationKind::TabSwitch,
            points,
            severity,
            details: serde_json::json!({}),
            timestamp_ms: 1_700_000_000_000,
            screenshot_ref: None,
            acknowledged: false,
            reviewer_note: None,
            acknowledged_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_keeps_sum_invariant() {
        let mut session = ProctoringSession::new(
            "s1".to_string(),
            "e1".to_string(),
            "stu1".to_string(),
            None,
            SessionMetadata::default(),
        );
        session.record(violation(10, Severity::Medium));
        session.record(violation(30, Severity::Critical));
        session.record(violation(15, Severity::High));

        assert_eq!(session.violation_score, 55);
        assert_eq!(session.total_violations, 3);
        assert_eq!(session.critical_violations, 1);
        assert_eq!(session.high_violations, 1);
        let sum: u32 = session.violations.iter().map(|v| v.points).sum();
        assert_eq!(session.violation_score, sum);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SessionStatus::Active.is_terminal());
        assert!(!SessionStatus::Paused.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
        assert!(SessionStatus::Flagged.is_terminal());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let session = ProctoringSession::new(
            "s1".to_string(),
            "e1".to_string(),
            "stu1".to_string(),
            Some("sup1".to_string()),
            SessionMetadata::default(),
        );
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"examId\""));
        assert!(json.contains("\"violationScore\""));
        assert!(json.contains("\"supervisorId\""));
        assert!(json.contains("\"ACTIVE\""));
    }
}
