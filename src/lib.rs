//! Proctor Core - Exam Integrity Monitoring
//!
//! In-memory proctoring engine: scores detector-reported violations against
//! a per-exam policy, tracks live session state, evaluates an advisory
//! decision ladder, fans updates out to supervisor dashboards and produces
//! an immutable integrity report when a session ends.
//!
//! Detection itself (webcam, browser events) and transport (sockets, HTTP)
//! live in external collaborators; this crate is the trust boundary where
//! their untrusted events become scored evidence.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ProctorError, ProctorResult};
pub use logic::decision::{Action, Verdict};
pub use logic::engine::{EngineAnalytics, ProctoringEngine, SessionStart};
pub use logic::ingest::{IngestOutcome, ViolationEvent};
pub use logic::monitor::{LiveAlert, LiveMessage, LiveUpdate, MonitoringFeed};
pub use logic::report::{FinalDecision, Report};
pub use logic::scoring::{ScoringPolicy, Severity, ViolationKind};
pub use logic::session::{ProctoringSession, SessionMetadata, SessionStatus, Violation};
