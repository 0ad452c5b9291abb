//! Conformance testing harness for FrankenScan.
//!
//! This crate provides:
//! - Fixtures: JSON case sets pinning engine behavior per directive family
//! - Execution: slot specs backed by owned storage, stable output rendering
//! - Verification: run fixtures in strict and hardened mode, diff failures
//! - Reports: markdown + JSON, including membrane healing counters and evidence
//! - Structured logs: JSONL entries per case, validation, artifact index

#![forbid(unsafe_code)]

pub mod diff;
pub mod execute;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use execute::{HarnessError, ScanRequest, SlotBuffer};
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
