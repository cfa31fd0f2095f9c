//! Decision Engine
//!
//! Pure function of the post-update session state. No I/O, no logging,
//! no clock - unit-testable in isolation.

use crate::constants::{CRITICAL_HALT_COUNT, SCORE_HALT, SCORE_PAUSE, SCORE_WARNING};
use crate::logic::session::ProctoringSession;

use super::types::{Action, Verdict};

// ============================================================================
// RECOMMENDATION CODES
// ============================================================================

pub const REC_EXAM_CANCELLED_FLAGGED: &str = "EXAM_CANCELLED_FLAGGED";
pub const REC_PROCTOR_REVIEW_REQUIRED: &str = "PROCTOR_REVIEW_REQUIRED";
pub const REC_STUDENT_NOTIFICATION_NEEDED: &str = "STUDENT_NOTIFICATION_NEEDED";
pub const REC_FLAG_FOR_REVIEW: &str = "FLAG_FOR_REVIEW";
pub const REC_PROCTOR_SHOULD_MONITOR: &str = "PROCTOR_SHOULD_MONITOR";
pub const REC_POSSIBLE_SUBMISSION_REJECTION: &str = "POSSIBLE_SUBMISSION_REJECTION";
pub const REC_CAUTION_WARNING: &str = "CAUTION_WARNING";
pub const REC_CONTINUE_WITH_MONITORING: &str = "CONTINUE_WITH_MONITORING";

// ============================================================================
// MAIN DECISION FUNCTION
// ============================================================================

/// Evaluate the halt/pause/warn ladder for a session.
///
/// The critical-violation override comes first: two CRITICAL violations
/// force HALT_AUTO even when the raw score alone would only justify PAUSE.
pub fn decide(session: &ProctoringSession) -> Verdict {
    Verdict {
        action: action_for(session),
        recommendations: recommendations(session.violation_score),
    }
}

fn action_for(session: &ProctoringSession) -> Action {
    if session.critical_violations >= CRITICAL_HALT_COUNT {
        return Action::HaltAuto;
    }
    let score = session.violation_score;
    if score >= SCORE_HALT {
        Action::HaltScore
    } else if score >= SCORE_PAUSE {
        Action::Pause
    } else if score >= SCORE_WARNING {
        Action::Warning
    } else {
        Action::Continue
    }
}

/// Recommendation codes derived from the score thresholds alone
pub fn recommendations(score: u32) -> Vec<String> {
    let mut recommendations = Vec::new();
    if score >= SCORE_HALT {
        recommendations.push(REC_EXAM_CANCELLED_FLAGGED.to_string());
        recommendations.push(REC_PROCTOR_REVIEW_REQUIRED.to_string());
        recommendations.push(REC_STUDENT_NOTIFICATION_NEEDED.to_string());
    } else if score >= SCORE_PAUSE {
        recommendations.push(REC_FLAG_FOR_REVIEW.to_string());
        recommendations.push(REC_PROCTOR_SHOULD_MONITOR.to_string());
        recommendations.push(REC_POSSIBLE_SUBMISSION_REJECTION.to_string());
    } else if score >= SCORE_WARNING {
        recommendations.push(REC_CAUTION_WARNING.to_string());
        recommendations.push(REC_CONTINUE_WITH_MONITORING.to_string());
    }
    recommendations
}

// ============================================================================
// TESTS
// ============================================================================
