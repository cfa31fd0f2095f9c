//! Logic Module - Business Logic & Engines
//!
//! Everything that turns raw detector events into decisions and reports.
//!
//! ## Structure
//! - `scoring/` - Violation taxonomy, weight table, policy resolution
//! - `session/` - Session state + concurrent registry
//! - `ingest/` - Event validation, scoring and append
//! - `decision/` - Advisory decision ladder
//! - `report/` - Terminal report generation and cache
//! - `monitor/` - Real-time supervisor fan-out
//! - `engine` - Facade wiring the above together

pub mod decision;
pub mod engine;
pub mod ident;
pub mod ingest;
pub mod monitor;
pub mod report;
pub mod scoring;
pub mod session;
