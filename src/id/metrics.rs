//! Counters for identifier derivation and cache lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hooks for counting identifier derivations and cache behaviour.
pub trait IdMetrics: Send + Sync {
    /// An identifier was computed by hashing.
    fn derived(&self);

    /// The factory's identifier cache was consulted.
    fn cache_lookup(&self, hit: bool);

    /// A per-value snapshot was consulted; a miss means it was recomputed.
    fn snapshot_lookup(&self, hit: bool);
}

/// Discards everything.
#[derive(Default)]
pub struct NoopMetrics;

impl IdMetrics for NoopMetrics {
    fn derived(&self) {}
    fn cache_lookup(&self, _hit: bool) {}
    fn snapshot_lookup(&self, _hit: bool) {}
}

/// Atomic counters, safe to read while other threads record.
#[derive(Default)]
pub struct CounterMetrics {
    /// Identifiers computed by hashing.
    pub derivations: AtomicU64,

    /// Identifier cache hits.
    pub cache_hits: AtomicU64,

    /// Identifier cache misses.
    pub cache_misses: AtomicU64,

    /// Per-value snapshots reused.
    pub snapshot_hits: AtomicU64,

    /// Per-value snapshots recomputed.
    pub snapshot_misses: AtomicU64,
}

impl IdMetrics for CounterMetrics {
    fn derived(&self) {
        self.derivations.fetch_add(1, Ordering::Relaxed);
    }

    fn cache_lookup(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot_lookup(&self, hit: bool) {
        if hit {
            self.snapshot_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.snapshot_misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Returns [`NoopMetrics`] behind an [`Arc`].
pub fn default_metrics() -> Arc<dyn IdMetrics> {
    Arc::new(NoopMetrics)
}
