//! Decision Module
//!
//! Real-time advisory verdict after each ingested violation.
//! Pure logic over a session snapshot - enforcement belongs to the
//! exam-runner collaborator.
//!
//! ## Structure
//! - `types`: Core types (Action, Verdict)
//! - `engine`: Decision ladder and recommendation codes

pub mod engine;
pub mod types;

// Re-export main types for convenience
pub use engine::{decide, recommendations};
pub use types::{Action, Verdict};
