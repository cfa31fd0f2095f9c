//! Scoring Policy
//!
//! Maps a violation kind to `(points, severity)` at ingestion time.
//! Pure and total: unknown kinds score zero and never raise.

use std::collections::HashMap;

use super::rules::DEFAULT_WEIGHTS;
use super::types::{Severity, ViolationKind};

// ============================================================================
// SCORING POLICY
// ============================================================================

/// Injected weight table; defaults may be overridden per exam.
///
/// Resolution happens once, at ingestion: a violation keeps the points it
/// was ingested with even if the policy changes later.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    weights: HashMap<ViolationKind, u32>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.clone(),
        }
    }
}

impl ScoringPolicy {
    /// Default table with test-specific overrides applied on top
    pub fn with_overrides(overrides: HashMap<ViolationKind, u32>) -> Self {
        let mut weights = DEFAULT_WEIGHTS.clone();
        weights.extend(overrides);
        Self { weights }
    }

    /// Resolve a kind to its point weight and derived severity.
    ///
    /// Fail-open: kinds without a weight (including `Unknown`) resolve to
    /// `(0, LOW)` with a warning, so a newer detector never breaks ingestion.
    pub fn resolve(&self, kind: &ViolationKind) -> (u32, Severity) {
        match self.weights.get(kind) {
            Some(&points) => (points, Severity::from_points(points)),
            None => {
                log::warn!("no weight for violation kind {}, scoring zero", kind);
                (0, Severity::Low)
            }
        }
    }

    pub fn weight(&self, kind: &ViolationKind) -> Option<u32> {
        self.weights.get(kind).copied()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let policy = ScoringPolicy::default();
        assert_eq!(
            policy.resolve(&ViolationKind::TabSwitch),
            (10, Severity::Medium)
        );
        assert_eq!(
            policy.resolve(&ViolationKind::MultipleFaces),
            (30, Severity::Critical)
        );
        assert_eq!(
            policy.resolve(&ViolationKind::ContextMenuAttempt),
            (5, Severity::Low)
        );
    }

    #[test]
    fn test_unknown_kind_fails_open() {
        let policy = ScoringPolicy::default();
        let kind = ViolationKind::parse("UNKNOWN_FUTURE_TYPE");
        assert_eq!(policy.resolve(&kind), (0, Severity::Low));
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let policy = ScoringPolicy::with_overrides(HashMap::from([
            (ViolationKind::TabSwitch, 25),
        ]));
        assert_eq!(
            policy.resolve(&ViolationKind::TabSwitch),
            (25, Severity::Critical)
        );
        // Untouched kinds keep the default weight
        assert_eq!(policy.weight(&ViolationKind::PhoneDetected), Some(20));
    }
}
