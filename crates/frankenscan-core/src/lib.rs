//! # frankenscan-core
//!
//! Safe Rust implementation of the C library's formatted-input family
//! (`sscanf`/`vsscanf`) over in-memory buffers.
//!
//! The engine walks the format string and the source buffer in lockstep,
//! converting text into caller-supplied typed slots. No `unsafe` code is
//! permitted at the crate level. The engine itself never allocates; in
//! hardened mode the membrane's evidence ring is sized once, on the first
//! recorded heal.

#![deny(unsafe_code)]

pub mod ctype;
pub mod stdio;
