//! Report Module
//!
//! End-of-exam report generation: final decision, grouped violation
//! statistics and flag reasons, built exactly once per terminated session.
//!
//! ## Structure
//! - `types`: Report value object, FinalDecision, flag reason codes
//! - `generator`: Cached idempotent generation

pub mod generator;
pub mod types;

// Re-export main types for convenience
pub use generator::{build_report, ReportGenerator};
pub use types::{overall_severity, FinalDecision, Report};
