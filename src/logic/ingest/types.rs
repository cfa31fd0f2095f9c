//! Ingestion Types
//!
//! Inbound detector event and the per-violation ingestion response.
//! No logic here beyond payload validation.

use serde::{Deserialize, Serialize};

use crate::error::{ProctorError, ProctorResult};
use crate::logic::decision::Action;
use crate::logic::scoring::ViolationKind;
use crate::logic::session::Violation;

// ============================================================================
// INBOUND EVENT
// ============================================================================

/// Raw violation event from the untrusted detector layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEvent {
    pub session_id: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(default)]
    pub details: serde_json::Value,
    /// Event time in epoch milliseconds (detector clock)
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    #[serde(default)]
    pub screenshot_ref: Option<String>,
}

impl ViolationEvent {
    pub fn new(session_id: &str, kind: ViolationKind, timestamp_ms: i64) -> Self {
        Self {
            session_id: session_id.to_string(),
            kind,
            details: serde_json::Value::Null,
            timestamp_ms,
            screenshot_ref: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_screenshot(mut self, screenshot_ref: &str) -> Self {
        self.screenshot_ref = Some(screenshot_ref.to_string());
        self
    }

    /// Reject malformed payloads before they touch any session state.
    ///
    /// Unknown-but-well-formed violation kinds are NOT an error; they
    /// fail open in the scoring policy instead.
    pub fn validate(&self) -> ProctorResult<()> {
        if self.session_id.trim().is_empty() {
            return Err(ProctorError::ValidationError(
                "missing sessionId".to_string(),
            ));
        }
        if self.kind.as_str().trim().is_empty() {
            return Err(ProctorError::ValidationError("missing type".to_string()));
        }
        if self.timestamp_ms <= 0 {
            return Err(ProctorError::ValidationError(
                "missing or invalid timestamp".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// INGESTION RESPONSE
// ============================================================================

/// What the exam-runner gets back for every accepted violation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub violation: Violation,
    pub session_score: u32,
    pub action: Action,
    pub recommendations: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
