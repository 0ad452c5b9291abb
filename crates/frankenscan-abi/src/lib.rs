// All extern "C" ABI exports accept raw pointers from C callers; the checks
// live in each body, so per-function safety docs would be boilerplate.
#![allow(clippy::missing_safety_doc)]
//! # frankenscan-abi
//!
//! extern "C" boundary for FrankenScan.
//!
//! This crate produces a `cdylib` (`libfrankenscan.so`) exposing the scanning
//! engine to C callers. Each call resolves its configuration through the
//! membrane, translates the caller's slot descriptors into typed output slots
//! and delegates to the safe engine in `frankenscan-core`.
//!
//! # Architecture
//!
//! ```text
//! C caller -> ABI entry (this crate) -> slot translation -> Core engine -> return
//! ```
//!
//! In **strict** mode, null destinations and slot contract violations are
//! rejected with `FRANKENSCAN_EINVAL`.
//!
//! In **hardened** mode, null destinations are replaced by scratch storage,
//! overlong strings are truncated and out-of-range integers saturate.

mod macros;

mod runtime_policy;

pub mod scanf_abi;
pub mod util;
