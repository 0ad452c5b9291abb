//! Heal evidence ledger.
//!
//! Every healing action applied in hardened mode is appended to a bounded
//! overwrite-on-full ring, tagged with a BLAKE3 fingerprint of the format
//! string that triggered it. The conformance harness reads the ring back to
//! attribute heals to fixture cases without the engine ever retaining the
//! caller's data.
//!
//! Thread-safe via `parking_lot::Mutex`; the sequence counter is atomic so
//! ordering across threads is total even when entries are overwritten.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::config::SafetyLevel;
use crate::heal::HealingAction;

/// Entries kept by the global ledger before the oldest is overwritten.
pub const EVIDENCE_CAPACITY: usize = 256;

/// BLAKE3 digest of a format string.
pub type FormatDigest = [u8; 32];

/// Fingerprint `format` for evidence records.
#[must_use]
pub fn fingerprint(format: &[u8]) -> FormatDigest {
    *blake3::hash(format).as_bytes()
}

/// One recorded heal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealEvidence {
    /// Global, monotonically increasing sequence number.
    pub seqno: u64,
    pub mode: SafetyLevel,
    pub action: HealingAction,
    /// Index of the slot the heal was applied to.
    pub slot_index: usize,
    pub format_digest: FormatDigest,
}

impl HealEvidence {
    /// Lowercase hex of the format digest.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for b in self.format_digest {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

/// Bounded ring of [`HealEvidence`].
pub struct EvidenceLog {
    ring: Mutex<VecDeque<HealEvidence>>,
    capacity: usize,
    next_seqno: AtomicU64,
    overwritten: AtomicU64,
}

impl EvidenceLog {
    /// Empty ledger holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: parking_lot::const_mutex(VecDeque::new()),
            capacity: if capacity == 0 { 1 } else { capacity },
            next_seqno: AtomicU64::new(0),
            overwritten: AtomicU64::new(0),
        }
    }

    /// Append a heal. Returns its sequence number. `HealingAction::None` is
    /// not recorded and returns `None`.
    pub fn record(
        &self,
        mode: SafetyLevel,
        action: HealingAction,
        slot_index: usize,
        format: &[u8],
    ) -> Option<u64> {
        if !action.is_heal() {
            return None;
        }
        let format_digest = fingerprint(format);
        let seqno = self.next_seqno.fetch_add(1, Ordering::Relaxed);
        let mut ring = self.ring.lock();
        // The first heal sizes the ring once; later records never allocate.
        if ring.capacity() < self.capacity {
            let len = ring.len();
            ring.reserve_exact(self.capacity - len);
        }
        if ring.len() == self.capacity {
            ring.pop_front();
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }
        ring.push_back(HealEvidence {
            seqno,
            mode,
            action,
            slot_index,
            format_digest,
        });
        Some(seqno)
    }

    /// Entries currently held, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<HealEvidence> {
        self.ring.lock().iter().copied().collect()
    }

    /// Entries with `seqno >= since`, oldest first.
    #[must_use]
    pub fn since(&self, since: u64) -> Vec<HealEvidence> {
        self.ring
            .lock()
            .iter()
            .filter(|e| e.seqno >= since)
            .copied()
            .collect()
    }

    /// The sequence number the next entry will receive.
    #[must_use]
    pub fn next_seqno(&self) -> u64 {
        self.next_seqno.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.lock().is_empty()
    }

    /// Entries dropped because the ring was full.
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.ring.lock().clear();
    }
}

impl Default for EvidenceLog {
    fn default() -> Self {
        Self::with_capacity(EVIDENCE_CAPACITY)
    }
}

static GLOBAL_EVIDENCE: EvidenceLog = EvidenceLog::with_capacity(EVIDENCE_CAPACITY);

/// Access the global heal evidence ledger.
#[must_use]
pub fn global_evidence() -> &'static EvidenceLog {
    &GLOBAL_EVIDENCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_sized_once() {
        let log = EvidenceLog::with_capacity(8);
        log.record(SafetyLevel::Hardened, HealingAction::ReturnSafeDefault, 0, b"%d");
        let reserved = log.ring.lock().capacity();
        assert!(reserved >= 8);
        for i in 0..20 {
            log.record(SafetyLevel::Hardened, HealingAction::ReturnSafeDefault, i, b"%d");
        }
        assert_eq!(log.ring.lock().capacity(), reserved);
        assert_eq!(log.len(), 8);
    }

    #[test]
    fn none_is_not_recorded() {
        let log = EvidenceLog::with_capacity(4);
        assert_eq!(
            log.record(SafetyLevel::Hardened, HealingAction::None, 0, b"%d"),
            None
        );
        assert!(log.is_empty());
    }

    #[test]
    fn records_in_order_with_fingerprint() {
        let log = EvidenceLog::with_capacity(4);
        let action = HealingAction::SaturateInteger { bits: 16 };
        assert_eq!(log.record(SafetyLevel::Hardened, action, 2, b"%hd"), Some(0));
        assert_eq!(log.record(SafetyLevel::Hardened, action, 0, b"%hd"), Some(1));

        let entries = log.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slot_index, 2);
        assert_eq!(entries[0].format_digest, fingerprint(b"%hd"));
        assert_eq!(entries[0].digest_hex().len(), 64);
        assert_ne!(fingerprint(b"%hd"), fingerprint(b"%d"));
    }

    #[test]
    fn ring_overwrites_oldest() {
        let log = EvidenceLog::with_capacity(2);
        let action = HealingAction::TruncateWithNull {
            requested: 8,
            truncated: 3,
        };
        for _ in 0..5 {
            log.record(SafetyLevel::Hardened, action, 0, b"%s");
        }
        let entries = log.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seqno, 3);
        assert_eq!(entries[1].seqno, 4);
        assert_eq!(log.overwritten(), 3);
        assert_eq!(log.since(4).len(), 1);
        assert_eq!(log.next_seqno(), 5);

        log.clear();
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let log = EvidenceLog::with_capacity(0);
        log.record(SafetyLevel::Hardened, HealingAction::ReturnSafeDefault, 0, b"");
        log.record(SafetyLevel::Hardened, HealingAction::ReturnSafeDefault, 1, b"");
        assert_eq!(log.len(), 1);
    }
}
