//! Scoring Module
//!
//! Resolves a detected violation into a point weight and severity.
//! This is the only place that knows how much a violation "costs".
//!
//! ## Structure
//! - `types`: Core types (ViolationKind, Severity)
//! - `rules`: Default weight table
//! - `policy`: Injectable ScoringPolicy (with per-exam overrides)
//!
//! ## Usage
//! ```ignore
//! use crate::logic::scoring::{ScoringPolicy, ViolationKind};
//!
//! let policy = ScoringPolicy::default();
//! let (points, severity) = policy.resolve(&ViolationKind::TabSwitch);
//! ```

pub mod policy;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use policy::ScoringPolicy;
pub use rules::DEFAULT_WEIGHTS;
pub use types::{Severity, ViolationKind};
