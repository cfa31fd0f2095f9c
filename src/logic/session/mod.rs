//! Session Module
//!
//! In-memory lifecycle of proctoring sessions: create, mutate under a
//! per-session lock, freeze into a terminal state, and sweep after the
//! retention window.
//!
//! ## Structure
//! - `types`: Core types (ProctoringSession, Violation, SessionStatus)
//! - `registry`: SessionRegistry (create/get/mutate/end/sweep)

pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use registry::SessionRegistry;
pub use types::{ProctoringSession, SessionMetadata, SessionStatus, Violation};
