//! Error handling

use crate::logic::session::SessionStatus;

pub type ProctorResult<T> = Result<T, ProctorError>;

/// Structured errors surfaced to the exam-runner collaborator.
///
/// `SessionTerminated` is deliberately distinct from `NotFound` so callers
/// can tell "session never existed" from "session is over" and stop
/// emitting further events for the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProctorError {
    // Resource errors
    NotFound(String),
    AlreadyExists(String),

    // Lifecycle errors
    SessionTerminated {
        session_id: String,
        status: SessionStatus,
    },

    // Validation errors
    ValidationError(String),
}

impl std::fmt::Display for ProctorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProctorError::NotFound(what) => write!(f, "not found: {}", what),
            ProctorError::AlreadyExists(what) => write!(f, "already exists: {}", what),
            ProctorError::SessionTerminated { session_id, status } => {
                write!(f, "session {} already terminated ({})", session_id, status.as_str())
            }
            ProctorError::ValidationError(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for ProctorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminated_is_distinct_from_not_found() {
        let gone = ProctorError::SessionTerminated {
            session_id: "s1".to_string(),
            status: SessionStatus::Completed,
        };
        let missing = ProctorError::NotFound("session s1".to_string());
        assert_ne!(gone, missing);
        assert!(gone.to_string().contains("COMPLETED"));
    }
}
