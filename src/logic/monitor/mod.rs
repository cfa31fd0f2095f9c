//! Monitor Module
//!
//! Real-time fan-out of session activity to supervisor dashboards.
//! Message-passing only: the hot scoring path hands updates to a channel
//! and moves on. Transport (sockets, SSE) is an external collaborator.
//!
//! ## Structure
//! - `types`: LiveUpdate / LiveAlert / MonitoringAck wire shapes
//! - `notifier`: Per-supervisor + global fan-out hub
//! - `feed`: Subscriber view with bounded recent history

pub mod feed;
pub mod notifier;
pub mod types;

// Re-export main types for convenience
pub use feed::MonitoringFeed;
pub use notifier::{LiveNotifier, GLOBAL_CHANNEL};
pub use types::{LiveAlert, LiveMessage, LiveUpdate, MonitoringAck, UpdateKind};
