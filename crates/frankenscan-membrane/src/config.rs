//! Runtime configuration.
//!
//! The safety level is set via the `FRANKENSCAN_MODE` environment variable:
//! - `strict` (default): legacy-compatible behavior. Integer results are
//!   truncated to the slot width exactly like the C cast, and a destination
//!   buffer that is too small is reported as a contract violation.
//! - `hardened`: the membrane applies deterministic healing (saturate
//!   out-of-range integers, truncate-and-terminate overlong strings).
//!
//! Any other value resolves to `strict`.
//!
//! The decimal point used by float conversions is part of [`ScanConfig`] and
//! is always passed explicitly. `FRANKENSCAN_DECIMAL_POINT` is only consulted
//! by [`ScanConfig::from_env`], and never cached.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Runtime operating mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyLevel {
    /// Legacy-compatible behavior. Invalid operations produce the same
    /// results the C library would, or a contract-violation error where the
    /// C library would have undefined behavior.
    #[default]
    Strict,
    /// Hardened mode. Applies deterministic healing where the legacy
    /// contract would corrupt memory or silently wrap.
    Hardened,
}

impl SafetyLevel {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "default" | "abi" => Self::Strict,
            "hardened" | "repair" | "full" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    /// Returns true if the membrane should apply healing actions.
    #[must_use]
    pub const fn heals_enabled(self) -> bool {
        matches!(self, Self::Hardened)
    }

    /// Lowercase name, as used in logs and fixtures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Atomic cache: 0=unresolved, 1=Strict, 2=Hardened, 255=resolving.
// Non-blocking state machine instead of OnceLock so a reentrant call made
// while std::env::var() runs can never wait on itself.
static CACHED_LEVEL: AtomicU8 = AtomicU8::new(0);

const LEVEL_UNRESOLVED: u8 = 0;
const LEVEL_STRICT: u8 = 1;
const LEVEL_HARDENED: u8 = 2;
const LEVEL_RESOLVING: u8 = 255;

fn parse_runtime_mode_env(raw: &str) -> SafetyLevel {
    SafetyLevel::from_str_loose(raw.trim())
}

fn level_to_u8(level: SafetyLevel) -> u8 {
    match level {
        SafetyLevel::Strict => LEVEL_STRICT,
        SafetyLevel::Hardened => LEVEL_HARDENED,
    }
}

fn u8_to_level(v: u8) -> SafetyLevel {
    match v {
        LEVEL_HARDENED => SafetyLevel::Hardened,
        _ => SafetyLevel::Strict,
    }
}

/// Get the configured safety level (reads env var on first call, caches thereafter).
///
/// A call that arrives while another is resolving sees the RESOLVING state
/// and gets Strict.
#[must_use]
pub fn safety_level() -> SafetyLevel {
    let cached = CACHED_LEVEL.load(Ordering::Relaxed);

    if cached != LEVEL_UNRESOLVED && cached != LEVEL_RESOLVING {
        return u8_to_level(cached);
    }

    if cached == LEVEL_RESOLVING {
        return SafetyLevel::Strict;
    }

    if CACHED_LEVEL
        .compare_exchange(
            LEVEL_UNRESOLVED,
            LEVEL_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_LEVEL.load(Ordering::Relaxed);
        return if v != LEVEL_UNRESOLVED && v != LEVEL_RESOLVING {
            u8_to_level(v)
        } else {
            SafetyLevel::Strict
        };
    }

    let level = std::env::var("FRANKENSCAN_MODE")
        .map(|v| parse_runtime_mode_env(&v))
        .unwrap_or_default();
    CACHED_LEVEL.store(level_to_u8(level), Ordering::Release);
    level
}

// ---------------------------------------------------------------------------
// Decimal point
// ---------------------------------------------------------------------------

/// Maximum byte length of a decimal-point string.
pub const DECIMAL_POINT_MAX: usize = 4;

/// The decimal-point string recognized by float conversions.
///
/// Stored inline (no allocation). Must be 1..=4 bytes, contain no NUL, no
/// ASCII digit and no whitespace, so it can never be confused with the
/// digits around it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecimalPoint {
    bytes: [u8; DECIMAL_POINT_MAX],
    len: u8,
}

impl DecimalPoint {
    /// The C locale decimal point, `"."`.
    pub const DOT: Self = Self {
        bytes: [b'.', 0, 0, 0],
        len: 1,
    };

    /// Build from a byte string. Returns `None` if the bytes are not a usable
    /// decimal point.
    #[must_use]
    pub fn from_bytes(raw: &[u8]) -> Option<Self> {
        if raw.is_empty() || raw.len() > DECIMAL_POINT_MAX {
            return None;
        }
        if raw
            .iter()
            .any(|&b| b == 0 || b.is_ascii_digit() || b.is_ascii_whitespace())
        {
            return None;
        }
        let mut bytes = [0u8; DECIMAL_POINT_MAX];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    /// Build from a string slice.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        Self::from_bytes(s.as_bytes())
    }

    /// The decimal-point bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Byte length (1..=4).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; present for clippy's `len_without_is_empty`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for DecimalPoint {
    fn default() -> Self {
        Self::DOT
    }
}

impl fmt::Debug for DecimalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalPoint({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Scan configuration
// ---------------------------------------------------------------------------

/// Everything a scan needs besides its source, format and slots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub decimal_point: DecimalPoint,
    pub mode: SafetyLevel,
}

impl ScanConfig {
    /// Strict mode with the C locale decimal point.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decimal_point: DecimalPoint::DOT,
            mode: SafetyLevel::Strict,
        }
    }

    #[must_use]
    pub const fn with_decimal_point(mut self, decimal_point: DecimalPoint) -> Self {
        self.decimal_point = decimal_point;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SafetyLevel) -> Self {
        self.mode = mode;
        self
    }

    /// Resolve from the process environment.
    ///
    /// The mode comes from the cached [`safety_level`]; the decimal point is
    /// read from `FRANKENSCAN_DECIMAL_POINT` on every call and falls back to
    /// `"."` when unset or unusable.
    #[must_use]
    pub fn from_env() -> Self {
        let decimal_point = std::env::var("FRANKENSCAN_DECIMAL_POINT")
            .ok()
            .and_then(|raw| DecimalPoint::new(&raw))
            .unwrap_or_default();
        Self {
            decimal_point,
            mode: safety_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_safety_levels() {
        assert_eq!(SafetyLevel::from_str_loose("strict"), SafetyLevel::Strict);
        assert_eq!(SafetyLevel::from_str_loose("STRICT"), SafetyLevel::Strict);
        assert_eq!(SafetyLevel::from_str_loose("abi"), SafetyLevel::Strict);
        assert_eq!(
            SafetyLevel::from_str_loose("hardened"),
            SafetyLevel::Hardened
        );
        assert_eq!(SafetyLevel::from_str_loose("repair"), SafetyLevel::Hardened);
        assert_eq!(SafetyLevel::from_str_loose("off"), SafetyLevel::Strict);
        assert_eq!(SafetyLevel::from_str_loose("bogus"), SafetyLevel::Strict);
    }

    #[test]
    fn runtime_mode_parser_is_strict_or_hardened_only() {
        assert_eq!(parse_runtime_mode_env("hardened"), SafetyLevel::Hardened);
        assert_eq!(parse_runtime_mode_env(" hardened\n"), SafetyLevel::Hardened);
        assert_eq!(parse_runtime_mode_env("off"), SafetyLevel::Strict);
        assert_eq!(parse_runtime_mode_env("none"), SafetyLevel::Strict);
    }

    #[test]
    fn healing_only_in_hardened() {
        assert!(!SafetyLevel::Strict.heals_enabled());
        assert!(SafetyLevel::Hardened.heals_enabled());
    }

    #[test]
    fn cached_mode_is_process_sticky_until_cache_reset() {
        let previous = CACHED_LEVEL.swap(LEVEL_HARDENED, Ordering::SeqCst);
        assert_eq!(safety_level(), SafetyLevel::Hardened);
        CACHED_LEVEL.store(LEVEL_RESOLVING, Ordering::SeqCst);
        assert_eq!(safety_level(), SafetyLevel::Strict);
        CACHED_LEVEL.store(previous, Ordering::SeqCst);
    }

    #[test]
    fn decimal_point_validation() {
        assert_eq!(DecimalPoint::default().as_bytes(), b".");
        assert_eq!(DecimalPoint::new(",").unwrap().as_bytes(), b",");
        assert_eq!(DecimalPoint::new("\u{66b}").unwrap().len(), 2);
        assert!(DecimalPoint::new("").is_none());
        assert!(DecimalPoint::new("12345").is_none());
        assert!(DecimalPoint::new("1").is_none());
        assert!(DecimalPoint::new(" ").is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = ScanConfig::new()
            .with_mode(SafetyLevel::Hardened)
            .with_decimal_point(DecimalPoint::new(",").unwrap());
        assert_eq!(cfg.mode, SafetyLevel::Hardened);
        assert_eq!(cfg.decimal_point.as_bytes(), b",");
        assert_eq!(ScanConfig::default(), ScanConfig::new());
    }
}
