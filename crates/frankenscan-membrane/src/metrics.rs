//! Atomic counters for scan observability.
//!
//! All counters use relaxed ordering. They are diagnostic, not
//! synchronization primitives.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global scan counters, updated by the ABI layer.
pub struct ScanMetrics {
    /// Total scans performed.
    pub scans: AtomicU64,
    /// Scans that returned the EOF sentinel.
    pub eof_results: AtomicU64,
    /// Scans halted early by a matching or conversion failure.
    pub partial_results: AtomicU64,
    /// Calls rejected for a null or malformed pointer argument.
    pub pointer_rejections: AtomicU64,
    /// Calls rejected for a slot that disagrees with its directive.
    pub contract_violations: AtomicU64,
}

impl ScanMetrics {
    /// Create a new zeroed metrics instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scans: AtomicU64::new(0),
            eof_results: AtomicU64::new(0),
            partial_results: AtomicU64::new(0),
            pointer_rejections: AtomicU64::new(0),
            contract_violations: AtomicU64::new(0),
        }
    }

    /// Increment a counter by 1.
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read a counter value.
    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans: Self::get(&self.scans),
            eof_results: Self::get(&self.eof_results),
            partial_results: Self::get(&self.partial_results),
            pointer_rejections: Self::get(&self.pointer_rejections),
            contract_violations: Self::get(&self.contract_violations),
        }
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of all scan counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub scans: u64,
    pub eof_results: u64,
    pub partial_results: u64,
    pub pointer_rejections: u64,
    pub contract_violations: u64,
}

/// Global metrics instance.
static GLOBAL_METRICS: ScanMetrics = ScanMetrics::new();

/// Access the global scan metrics.
#[must_use]
pub fn global_metrics() -> &'static ScanMetrics {
    &GLOBAL_METRICS
}
