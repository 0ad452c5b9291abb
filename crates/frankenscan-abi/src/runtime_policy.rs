//! Runtime policy bridge for ABI entrypoints.
//!
//! Centralizes how an extern "C" call resolves its [`ScanConfig`] and how
//! its outcome is published to the membrane counters, so the entry points
//! stay focused on pointer handling.

use frankenscan_core::stdio::scanf::{ScanError, ScanReport};
use frankenscan_membrane::config::{DecimalPoint, SafetyLevel, ScanConfig, safety_level};
use frankenscan_membrane::heal::{HealingAction, global_healing_policy};
use frankenscan_membrane::metrics::{ScanMetrics, global_metrics};

/// Config for a call. An explicit decimal point overrides the environment.
pub(crate) fn resolve_config(decimal_point: Option<DecimalPoint>) -> ScanConfig {
    let base = ScanConfig::from_env();
    match decimal_point {
        Some(dp) => base.with_decimal_point(dp),
        None => base,
    }
}

/// The active safety level.
pub(crate) fn mode() -> SafetyLevel {
    safety_level()
}

/// A call rejected before scanning because of a bad pointer or kind.
pub(crate) fn reject_pointer() {
    let m = global_metrics();
    ScanMetrics::inc(&m.scans);
    ScanMetrics::inc(&m.pointer_rejections);
}

/// A null destination replaced by scratch storage in hardened mode.
pub(crate) fn heal_null_destination() {
    global_healing_policy().record(&HealingAction::ReturnSafeDefault);
}

/// Publish the outcome of a completed scan.
pub(crate) fn observe(outcome: &Result<ScanReport, ScanError>) {
    let m = global_metrics();
    ScanMetrics::inc(&m.scans);
    match outcome {
        Ok(report) if report.halted.is_some_and(|e| e.is_halt()) => {
            ScanMetrics::inc(&m.partial_results);
        }
        Ok(_) => {}
        Err(ScanError::Eof) => ScanMetrics::inc(&m.eof_results),
        Err(err) => {
            debug_assert!(err.is_contract_violation());
            ScanMetrics::inc(&m.contract_violations);
        }
    }
}
