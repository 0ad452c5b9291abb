//! Safety membrane for FrankenScan.
//!
//! Sits between the C ABI entry points and the safe scanning engine in
//! `frankenscan-core`. It owns the pieces of state that are allowed to be
//! process-wide:
//!
//! - **Configuration** (`config`): safety level, decimal point, `ScanConfig`
//! - **Self-healing engine** (`heal`): deterministic repairs for hardened mode
//! - **Metrics** (`metrics`): atomic counters for observability
//! - **Evidence** (`evidence`): bounded ledger of applied heals
//!
//! The engine itself never reads any of this implicitly; callers resolve a
//! [`ScanConfig`] and pass it in.

#![deny(unsafe_code)]

pub mod config;
pub mod evidence;
pub mod heal;
pub mod metrics;

pub use config::{DecimalPoint, SafetyLevel, ScanConfig};
pub use evidence::{EvidenceLog, HealEvidence};
pub use heal::{HealingAction, HealingPolicy};
pub use metrics::ScanMetrics;
