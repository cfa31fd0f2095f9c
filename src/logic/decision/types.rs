//! Decision Types
//!
//! The engine's real-time advisory verdict after each ingested violation.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// ACTION
// ============================================================================

/// Advisory action for the exam-runner.
///
/// The engine only advises; actually pausing or halting the student's exam
/// UI is the exam-runner collaborator's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Continue,
    Warning,
    Pause,
    HaltScore,
    HaltAuto,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Continue => "CONTINUE",
            Action::Warning => "WARNING",
            Action::Pause => "PAUSE",
            Action::HaltScore => "HALT_SCORE",
            Action::HaltAuto => "HALT_AUTO",
        }
    }

    /// Both halt variants stop the exam
    pub fn is_halt(&self) -> bool {
        matches!(self, Action::HaltScore | Action::HaltAuto)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Complete decision result for one post-update session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub action: Action,
    pub recommendations: Vec<String>,
}
