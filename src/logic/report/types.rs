//! Report Types
//!
//! Immutable end-of-exam report. A report deep-copies everything out of
//! its source session; it never changes after construction, even if the
//! session were mutated afterward by a bug.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{SCORE_HALT, SCORE_PAUSE, SCORE_WARNING};
use crate::logic::scoring::Severity;
use crate::logic::session::{SessionMetadata, Violation};

// ============================================================================
// FINAL DECISION
// ============================================================================

/// End-of-exam classification, computed once at report time.
///
/// Keyed on the violation score alone: unlike the live decision ladder it
/// does NOT apply the critical-violation override, so a session halted in
/// real time for two criticals at score 60 still finalizes as
/// REQUIRES_REVIEW. Intentional asymmetry, pending product clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalDecision {
    Approved,
    ApprovedWithWarning,
    RequiresReview,
    RejectedFlagged,
}

impl FinalDecision {
    pub fn from_score(score: u32) -> Self {
        if score >= SCORE_HALT {
            FinalDecision::RejectedFlagged
        } else if score >= SCORE_PAUSE {
            FinalDecision::RequiresReview
        } else if score >= SCORE_WARNING {
            FinalDecision::ApprovedWithWarning
        } else {
            FinalDecision::Approved
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FinalDecision::Approved => "APPROVED",
            FinalDecision::ApprovedWithWarning => "APPROVED_WITH_WARNING",
            FinalDecision::RequiresReview => "REQUIRES_REVIEW",
            FinalDecision::RejectedFlagged => "REJECTED_FLAGGED",
        }
    }
}

impl std::fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall severity rating of a whole session's score (coarser banding
/// than the per-violation point bands)
pub fn overall_severity(score: u32) -> Severity {
    if score >= SCORE_HALT {
        Severity::Critical
    } else if score >= SCORE_PAUSE {
        Severity::High
    } else if score >= SCORE_WARNING {
        Severity::Medium
    } else {
        Severity::Low
    }
}

// ============================================================================
// FLAG REASONS
// ============================================================================

pub const FLAG_MULTIPLE_CRITICAL_VIOLATIONS: &str = "MULTIPLE_CRITICAL_VIOLATIONS";
pub const FLAG_MULTIPLE_PEOPLE_DETECTED: &str = "MULTIPLE_PEOPLE_DETECTED";
pub const FLAG_PHONE_USAGE_DETECTED: &str = "PHONE_USAGE_DETECTED";
pub const FLAG_SUSPICIOUS_PASTE_PATTERN: &str = "SUSPICIOUS_PASTE_PATTERN";
pub const FLAG_EXCESSIVE_TAB_SWITCHING: &str = "EXCESSIVE_TAB_SWITCHING";
pub const FLAG_DEVICE_CHANGE_DETECTED: &str = "DEVICE_CHANGE_DETECTED";

// ============================================================================
// REPORT
// ============================================================================

/// Auditable end-of-exam report, handed to the persistence collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session_id: String,
    pub exam_id: String,
    pub student_id: String,
    pub supervisor_id: Option<String>,
    pub exam_duration_minutes: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    // Violations summary
    pub total_violations: u32,
    pub critical_violations: u32,
    pub high_violations: u32,
    /// Occurrence count per violation kind (sorted for stable output)
    pub violations_by_type: BTreeMap<String, u32>,

    // Scoring
    pub violation_score: u32,
    pub score_percentage: u32,
    pub severity: Severity,

    // Decision
    pub final_decision: FinalDecision,
    pub recommendations: Vec<String>,
    pub flagged_reasons: Vec<String>,

    // Details, in ingestion order
    pub violations: Vec<Violation>,

    // Device info
    #[serde(flatten)]
    pub metadata: SessionMetadata,

    // Metadata
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_decision_bands() {
        assert_eq!(FinalDecision::from_score(0), FinalDecision::Approved);
        assert_eq!(FinalDecision::from_score(29), FinalDecision::Approved);
        assert_eq!(
            FinalDecision::from_score(30),
            FinalDecision::ApprovedWithWarning
        );
        assert_eq!(FinalDecision::from_score(60), FinalDecision::RequiresReview);
        assert_eq!(FinalDecision::from_score(80), FinalDecision::RejectedFlagged);
        assert_eq!(FinalDecision::from_score(150), FinalDecision::RejectedFlagged);
    }

    #[test]
    fn test_overall_severity_bands() {
        assert_eq!(overall_severity(10), Severity::Low);
        assert_eq!(overall_severity(30), Severity::Medium);
        assert_eq!(overall_severity(60), Severity::High);
        assert_eq!(overall_severity(85), Severity::Critical);
    }
}
