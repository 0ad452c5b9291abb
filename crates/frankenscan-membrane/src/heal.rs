//! Self-healing policy engine.
//!
//! When hardened mode meets a scan the legacy contract would botch (an
//! integer that does not fit its slot, a string longer than its buffer), it
//! applies a deterministic healing action instead. Strict mode never heals.

use std::sync::atomic::{AtomicU64, Ordering};

/// Actions the membrane can take to heal an unsafe scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealingAction {
    /// An integer was out of range for its slot and was clamped to the
    /// nearest representable bound.
    SaturateInteger { bits: u32 },
    /// A text conversion matched more bytes than the destination holds; the
    /// stored bytes were truncated and (for strings) NUL-terminated.
    TruncateWithNull { requested: usize, truncated: usize },
    /// A null destination was replaced by a discard sink.
    ReturnSafeDefault,
    /// No healing needed.
    None,
}

impl HealingAction {
    /// Returns true if this action represents an actual healing (not None).
    #[must_use]
    pub const fn is_heal(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SaturateInteger { .. } => "saturate_integer",
            Self::TruncateWithNull { .. } => "truncate_with_null",
            Self::ReturnSafeDefault => "return_safe_default",
            Self::None => "none",
        }
    }
}

/// Policy engine that decides and counts healing actions.
pub struct HealingPolicy {
    /// Total heals applied.
    pub total_heals: AtomicU64,
    /// Integer saturations applied.
    pub integer_saturations: AtomicU64,
    /// Null truncations applied.
    pub null_truncations: AtomicU64,
    /// Safe defaults returned.
    pub safe_defaults: AtomicU64,
}

impl HealingPolicy {
    /// Create a new policy with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_heals: AtomicU64::new(0),
            integer_saturations: AtomicU64::new(0),
            null_truncations: AtomicU64::new(0),
            safe_defaults: AtomicU64::new(0),
        }
    }

    /// Record a healing action.
    pub fn record(&self, action: &HealingAction) {
        if action.is_heal() {
            self.total_heals.fetch_add(1, Ordering::Relaxed);
        }

        match action {
            HealingAction::SaturateInteger { .. } => {
                self.integer_saturations.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::TruncateWithNull { .. } => {
                self.null_truncations.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::ReturnSafeDefault => {
                self.safe_defaults.fetch_add(1, Ordering::Relaxed);
            }
            HealingAction::None => {}
        }
    }

    /// Decide healing for a text conversion of `matched` bytes into a
    /// destination of `capacity` elements. `terminated` destinations need one
    /// element for the NUL.
    #[must_use]
    pub fn heal_text_bounds(
        &self,
        matched: usize,
        capacity: usize,
        terminated: bool,
    ) -> HealingAction {
        let needed = matched + usize::from(terminated);
        if needed > capacity {
            HealingAction::TruncateWithNull {
                requested: matched,
                truncated: capacity.saturating_sub(usize::from(terminated)),
            }
        } else {
            HealingAction::None
        }
    }

    /// Decide healing for an integer stored into a `bits`-wide slot.
    ///
    /// Signed slots accept `[-(2^(bits-1)), 2^(bits-1) - 1]`. Unsigned slots
    /// also accept negated values that still fit the signed width, since
    /// `%u` of `-1` legitimately stores the all-ones pattern.
    #[must_use]
    pub fn heal_integer_range(
        &self,
        value: i128,
        bits: u32,
        signed: bool,
    ) -> (i128, HealingAction) {
        let min = -(1i128 << (bits - 1));
        let max = if signed {
            (1i128 << (bits - 1)) - 1
        } else {
            (1i128 << bits) - 1
        };
        if value < min {
            (min, HealingAction::SaturateInteger { bits })
        } else if value > max {
            (max, HealingAction::SaturateInteger { bits })
        } else {
            (value, HealingAction::None)
        }
    }

    /// Snapshot of the counters as `(name, value)` pairs.
    #[must_use]
    pub fn counters(&self) -> [(&'static str, u64); 4] {
        [
            ("total_heals", self.total_heals.load(Ordering::Relaxed)),
            (
                "integer_saturations",
                self.integer_saturations.load(Ordering::Relaxed),
            ),
            (
                "null_truncations",
                self.null_truncations.load(Ordering::Relaxed),
            ),
            ("safe_defaults", self.safe_defaults.load(Ordering::Relaxed)),
        ]
    }
}

impl Default for HealingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Global healing policy instance.
static GLOBAL_POLICY: HealingPolicy = HealingPolicy::new();

/// Access the global healing policy.
#[must_use]
pub fn global_healing_policy() -> &'static HealingPolicy {
    &GLOBAL_POLICY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_when_exceeding_dst() {
        let policy = HealingPolicy::new();
        assert_eq!(
            policy.heal_text_bounds(10, 4, true),
            HealingAction::TruncateWithNull {
                requested: 10,
                truncated: 3
            }
        );
        assert_eq!(
            policy.heal_text_bounds(10, 4, false),
            HealingAction::TruncateWithNull {
                requested: 10,
                truncated: 4
            }
        );
    }

    #[test]
    fn no_heal_when_text_fits() {
        let policy = HealingPolicy::new();
        assert_eq!(policy.heal_text_bounds(3, 4, true), HealingAction::None);
        assert_eq!(policy.heal_text_bounds(4, 4, false), HealingAction::None);
    }

    #[test]
    fn unsigned_range_accepts_both_patterns() {
        let policy = HealingPolicy::new();
        assert_eq!(policy.heal_integer_range(-32768, 16, false).1, HealingAction::None);
        assert_eq!(policy.heal_integer_range(65535, 16, false).1, HealingAction::None);
        assert_eq!(
            policy.heal_integer_range(65536, 16, false),
            (65535, HealingAction::SaturateInteger { bits: 16 })
        );
        assert_eq!(
            policy.heal_integer_range(-40000, 16, false),
            (-32768, HealingAction::SaturateInteger { bits: 16 })
        );
    }

    #[test]
    fn signed_range_clamps_to_signed_bounds() {
        let policy = HealingPolicy::new();
        assert_eq!(policy.heal_integer_range(32767, 16, true).1, HealingAction::None);
        assert_eq!(
            policy.heal_integer_range(70000, 16, true),
            (32767, HealingAction::SaturateInteger { bits: 16 })
        );
        assert_eq!(
            policy.heal_integer_range(3_000_000_000, 32, true),
            (i128::from(i32::MAX), HealingAction::SaturateInteger { bits: 32 })
        );
        assert_eq!(
            policy.heal_integer_range(i128::MIN, 64, true),
            (i128::from(i64::MIN), HealingAction::SaturateInteger { bits: 64 })
        );
    }

    #[test]
    fn record_increments_counters() {
        let policy = HealingPolicy::new();
        policy.record(&HealingAction::SaturateInteger { bits: 32 });
        policy.record(&HealingAction::TruncateWithNull {
            requested: 9,
            truncated: 3,
        });
        policy.record(&HealingAction::None);

        assert_eq!(policy.total_heals.load(Ordering::Relaxed), 2);
        assert_eq!(policy.integer_saturations.load(Ordering::Relaxed), 1);
        assert_eq!(policy.null_truncations.load(Ordering::Relaxed), 1);
        assert_eq!(policy.counters()[0], ("total_heals", 2));
    }

    #[test]
    fn none_is_not_a_heal() {
        assert!(!HealingAction::None.is_heal());
        assert!(HealingAction::ReturnSafeDefault.is_heal());
        assert_eq!(HealingAction::None.name(), "none");
    }
}
