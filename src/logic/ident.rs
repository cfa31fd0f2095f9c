//! ID Generation
//!
//! Injectable identifier provider so tests can run deterministically
//! instead of scattering ad hoc UUID calls through the engine.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> String;
}

/// Production provider: random UUID v4
#[derive(Debug, Default)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic provider for tests: `prefix-1`, `prefix-2`, ...
#[derive(Debug)]
pub struct SequencedIdProvider {
    prefix: String,
    counter: AtomicU64,
}

impl SequencedIdProvider {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdProvider for SequencedIdProvider {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
