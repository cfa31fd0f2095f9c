//! Central Configuration Constants
//!
//! Single source of truth for scoring thresholds and engine tunables.
//! To change a decision threshold, only edit this file.

/// Score at or above which the running decision is HALT_SCORE
pub const SCORE_HALT: u32 = 80;

/// Score at or above which the running decision is PAUSE
pub const SCORE_PAUSE: u32 = 60;

/// Score at or above which the running decision is WARNING
pub const SCORE_WARNING: u32 = 30;

/// Number of CRITICAL violations that forces HALT_AUTO regardless of score
pub const CRITICAL_HALT_COUNT: u32 = 2;

/// Point weight at or above which a violation is CRITICAL
pub const POINTS_CRITICAL: u32 = 20;

/// Point weight at or above which a violation is HIGH
pub const POINTS_HIGH: u32 = 12;

/// Point weight at or above which a violation is MEDIUM
pub const POINTS_MEDIUM: u32 = 8;

/// Maximum recent live updates kept by a monitoring feed
pub const FEED_UPDATE_CAP: usize = 100;

/// Maximum recent live alerts kept by a monitoring feed
pub const FEED_ALERT_CAP: usize = 50;

/// Default retention window for terminal sessions (hours)
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Default interval between sweep passes (seconds)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "proctor-core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get retention window (hours) from environment or use default
pub fn get_retention_hours() -> i64 {
    std::env::var("PROCTOR_RETENTION_HOURS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_HOURS)
}

/// Get sweep interval (seconds) from environment or use default
pub fn get_sweep_interval_secs() -> u64 {
    std::env::var("PROCTOR_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS)
}
