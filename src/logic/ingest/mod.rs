//! Ingestion Module
//!
//! Scores validated detector events through the policy, appends them to
//! their session and returns the fresh advisory verdict. Payload
//! validation lives on `ViolationEvent` and runs once, at the facade.
//!
//! ## Structure
//! - `types`: Inbound ViolationEvent (with its payload validation) and IngestOutcome
//! - `engine`: The ingest flow and reviewer acknowledgment

pub mod engine;
pub mod types;

// Re-export main types for convenience
pub use engine::{acknowledge, ingest};
pub use types::{IngestOutcome, ViolationEvent};
