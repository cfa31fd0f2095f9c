//! Live Channel Messages
//!
//! Wire shapes for the real-time monitoring fan-out: activity-feed
//! updates, violation alerts and the subscription acknowledgment.
//! No delivery logic here - only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::decision::Action;
use crate::logic::scoring::Severity;
use crate::logic::session::{ProctoringSession, SessionStatus, Violation};

// ============================================================================
// LIVE UPDATE (activity feed)
// ============================================================================

/// What happened, for the dashboard activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    SessionStarted,
    SessionCompleted,
    ViolationLogged,
    Progress,
}

/// One activity-feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveUpdate {
    pub kind: UpdateKind,
    pub session_id: String,
    pub exam_id: String,
    pub student_id: String,
    pub student_name: String,
    pub supervisor_id: Option<String>,
    pub status: SessionStatus,
    pub violation_score: u32,
    pub action: Option<Action>,
    pub progress: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl LiveUpdate {
    fn base(kind: UpdateKind, session: &ProctoringSession) -> Self {
        Self {
            kind,
            session_id: session.id.clone(),
            exam_id: session.exam_id.clone(),
            student_id: session.student_id.clone(),
            student_name: session.display_name().to_string(),
            supervisor_id: session.supervisor_id.clone(),
            status: session.status,
            violation_score: session.violation_score,
            action: None,
            progress: None,
            timestamp: Utc::now(),
        }
    }

    pub fn started(session: &ProctoringSession) -> Self {
        Self::base(UpdateKind::SessionStarted, session)
    }

    pub fn completed(session: &ProctoringSession) -> Self {
        Self::base(UpdateKind::SessionCompleted, session)
    }

    pub fn violation(session: &ProctoringSession, score: u32, action: Action) -> Self {
        let mut update = Self::base(UpdateKind::ViolationLogged, session);
        update.violation_score = score;
        update.action = Some(action);
        update
    }

    pub fn progress(session: &ProctoringSession, percent: u32) -> Self {
        let mut update = Self::base(UpdateKind::Progress, session);
        update.progress = Some(percent.min(100));
        update
    }
}

// ============================================================================
// LIVE ALERT
// ============================================================================

/// A violation enriched for the supervisor dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAlert {
    pub session_id: String,
    pub supervisor_id: Option<String>,
    pub student_name: String,
    pub severity: Severity,
    pub violation: Violation,
    pub timestamp: DateTime<Utc>,
}

impl LiveAlert {
    pub fn new(session: &ProctoringSession, violation: Violation) -> Self {
        Self {
            session_id: session.id.clone(),
            supervisor_id: session.supervisor_id.clone(),
            student_name: session.display_name().to_string(),
            severity: violation.severity,
            violation,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// SUBSCRIPTION ACK
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringAck {
    /// "global" or the supervisor id
    pub channel: String,
    pub subscriber_id: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// LIVE MESSAGE (envelope)
// ============================================================================

/// Envelope published over the monitoring channels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum LiveMessage {
    #[serde(rename = "live_update")]
    Update(LiveUpdate),
    #[serde(rename = "live_alert")]
    Alert(LiveAlert),
    #[serde(rename = "monitoring_connected")]
    Connected(MonitoringAck),
}

impl LiveMessage {
    /// Which supervisor channel this message is scoped to, if any
    pub fn supervisor_id(&self) -> Option<&str> {
        match self {
            LiveMessage::Update(update) => update.supervisor_id.as_deref(),
            LiveMessage::Alert(alert) => alert.supervisor_id.as_deref(),
            LiveMessage::Connected(_) => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
