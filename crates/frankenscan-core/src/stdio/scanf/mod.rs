//! sscanf formatted-input engine.
//!
//! Walks the format string and a NUL-terminated source buffer in lockstep.
//! Literal bytes must match exactly, a run of format whitespace skips any
//! amount of input whitespace, and each `%` directive converts the next
//! field into the caller's next [`OutputSlot`].
//!
//! Reference: ISO C11 7.21.6.2 (fscanf), plus the legacy `I64`/`I32`/`w`
//! length modifiers.
//!
//! Design invariant: the engine never allocates and never writes outside a
//! slot. Scanset tables and float staging are fixed-size stack arrays, heal
//! evidence goes to the membrane's ring (sized once, on its first heal), and
//! every slot is checked against its directive before input is consumed.

mod cursor;
mod directive;
mod float;
mod integer;
mod scanset;
mod slot;
mod text;

pub use cursor::InputCursor;
pub use directive::{ConversionKind, Directive, LengthTag, Radix, parse_directive};
pub use float::FLOAT_STAGING_CAPACITY;
pub use frankenscan_membrane::{DecimalPoint, SafetyLevel, ScanConfig};
pub use scanset::ScansetTable;
pub use slot::{OutputSlot, SlotKind};

use frankenscan_membrane::evidence::global_evidence;
use frankenscan_membrane::heal::{HealingAction, global_healing_policy};

use crate::ctype;
use integer::ScannedInteger;
use text::TextClass;

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Why a scan stopped early, or why it was rejected.
///
/// `MalformedFormat`, `LiteralMismatch` and `ConversionFailed` halt the scan
/// but still yield the partial count (see [`ScanReport::halted`]). `Eof` is
/// the outcome of a scan that hit end of input before anything matched.
/// `TypeMismatch` and `SlotOverflow` are caller contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("malformed directive at format offset {offset}")]
    MalformedFormat { offset: usize },
    #[error("literal mismatch at input position {position}")]
    LiteralMismatch { position: usize },
    #[error("conversion failed at input position {position}")]
    ConversionFailed { position: usize },
    #[error("input exhausted before any match")]
    Eof,
    #[error("slot {index}: directive writes {expected}, found {}", slot_name(.found))]
    TypeMismatch {
        index: usize,
        expected: SlotKind,
        found: Option<SlotKind>,
    },
    #[error("slot {index}: converted text does not fit in {capacity} elements")]
    SlotOverflow { index: usize, capacity: usize },
}

fn slot_name(found: &Option<SlotKind>) -> &'static str {
    found.map_or("no slot", SlotKind::as_str)
}

impl ScanError {
    /// True for the recoverable halting reasons.
    #[must_use]
    pub const fn is_halt(&self) -> bool {
        matches!(
            self,
            Self::MalformedFormat { .. }
                | Self::LiteralMismatch { .. }
                | Self::ConversionFailed { .. }
        )
    }

    /// True for caller contract violations.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::SlotOverflow { .. })
    }

    /// Stable lowercase name for logs and fixtures.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MalformedFormat { .. } => "malformed_format",
            Self::LiteralMismatch { .. } => "literal_mismatch",
            Self::ConversionFailed { .. } => "conversion_failed",
            Self::Eof => "eof",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::SlotOverflow { .. } => "slot_overflow",
        }
    }

    /// Rebase a format offset produced on a sub-slice.
    pub(crate) fn shifted(self, by: usize) -> Self {
        match self {
            Self::MalformedFormat { offset } => Self::MalformedFormat {
                offset: offset + by,
            },
            other => other,
        }
    }
}

/// Terminal state of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Values stored into slots. `%n` and suppressed directives don't count.
    pub assignments: usize,
    /// Source bytes consumed.
    pub chars_consumed: usize,
    /// True once any literal byte or conversion succeeded.
    pub any_matched: bool,
    /// The halting reason when the scan stopped before the end of the format.
    pub halted: Option<ScanError>,
    /// Healing actions applied (hardened mode only).
    pub heals: u32,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionStatus {
    Ongoing,
    Failed { error: ScanError, at_eof: bool },
    Done,
}

/// Running state of a single scan call.
#[derive(Debug)]
struct ScanSession<'c> {
    config: &'c ScanConfig,
    format: &'c [u8],
    assignments: usize,
    any_matched: bool,
    next_slot: usize,
    heals: u32,
    status: SessionStatus,
}

impl<'c> ScanSession<'c> {
    fn new(config: &'c ScanConfig, format: &'c [u8]) -> Self {
        Self {
            config,
            format,
            assignments: 0,
            any_matched: false,
            next_slot: 0,
            heals: 0,
            status: SessionStatus::Ongoing,
        }
    }

    fn is_ongoing(&self) -> bool {
        self.status == SessionStatus::Ongoing
    }

    fn halt(&mut self, error: ScanError, at_eof: bool) {
        self.status = SessionStatus::Failed { error, at_eof };
    }

    fn succeeded(&mut self, assigned: bool) {
        self.any_matched = true;
        if assigned {
            self.assignments += 1;
        }
    }

    fn heal(&mut self, action: HealingAction, slot_index: usize) {
        if action.is_heal() {
            global_healing_policy().record(&action);
            global_evidence().record(self.config.mode, action, slot_index, self.format);
            self.heals += 1;
        }
    }

    /// Take the slot for `directive`, verifying its kind first.
    fn bind<'s, 'a>(
        &mut self,
        directive: &Directive,
        slots: &'s mut [OutputSlot<'a>],
    ) -> Result<Option<(usize, &'s mut OutputSlot<'a>)>, ScanError> {
        let Some(expected) = directive.expected_slot().filter(|_| directive.binds_slot()) else {
            return Ok(None);
        };
        let index = self.next_slot;
        self.next_slot += 1;
        match slots.get_mut(index) {
            Some(slot) if directive.accepts(slot.kind()) => Ok(Some((index, slot))),
            other => Err(ScanError::TypeMismatch {
                index,
                expected,
                found: other.map(|s| s.kind()),
            }),
        }
    }

    /// Match one byte of format literal.
    fn literal(&mut self, cursor: &mut InputCursor<'_>, byte: u8) {
        let ch = cursor.next_byte();
        if ch == Some(byte) {
            self.any_matched = true;
        } else {
            cursor.unget(ch);
            self.halt(
                ScanError::LiteralMismatch {
                    position: cursor.chars_consumed(),
                },
                ch.is_none(),
            );
        }
    }

    /// Run one directive. Only contract violations are returned as `Err`;
    /// conversion failures halt the session instead.
    fn directive(
        &mut self,
        directive: &Directive,
        cursor: &mut InputCursor<'_>,
        slots: &mut [OutputSlot<'_>],
    ) -> Result<(), ScanError> {
        let bound = self.bind(directive, slots)?;

        match directive.kind {
            ConversionKind::CharCount => {
                if let Some((_, slot)) = bound {
                    slot.store_integer(cursor.chars_consumed() as u64);
                }
                self.any_matched = true;
                return Ok(());
            }
            ConversionKind::Char | ConversionKind::Scanset(_) => {}
            _ => {
                cursor.skip_whitespace();
            }
        }

        match &directive.kind {
            ConversionKind::Percent => self.literal(cursor, b'%'),
            ConversionKind::Integer { radix, .. } => {
                match integer::convert_integer(cursor, *radix, directive.width) {
                    Ok(value) => {
                        if let Some((index, slot)) = bound {
                            self.store_integer(index, slot, &value, directive.integer_bits());
                        }
                        self.succeeded(!directive.suppress);
                    }
                    Err(error) => self.halt(error, cursor.at_eof()),
                }
            }
            ConversionKind::Float => {
                match float::convert_float(cursor, directive.width, &self.config.decimal_point) {
                    Ok(staged) => {
                        if let Some((_, slot)) = bound {
                            if slot.store_float(staged.as_str()).is_err() {
                                self.halt(
                                    ScanError::ConversionFailed {
                                        position: cursor.chars_consumed(),
                                    },
                                    false,
                                );
                                return Ok(());
                            }
                        }
                        self.succeeded(!directive.suppress);
                    }
                    Err(error) => self.halt(error, cursor.at_eof()),
                }
            }
            ConversionKind::Char | ConversionKind::String | ConversionKind::Scanset(_) => {
                let (class, width, terminate) = match &directive.kind {
                    ConversionKind::Char => {
                        (TextClass::Any, Some(directive.width.unwrap_or(1)), false)
                    }
                    ConversionKind::Scanset(table) => {
                        (TextClass::Set(table), directive.width, true)
                    }
                    _ => (TextClass::NonSpace, directive.width, true),
                };
                self.text(cursor, class, width, terminate, bound)?;
            }
            ConversionKind::CharCount => {}
        }
        Ok(())
    }

    fn text(
        &mut self,
        cursor: &mut InputCursor<'_>,
        class: TextClass<'_>,
        width: Option<u32>,
        terminate: bool,
        bound: Option<(usize, &mut OutputSlot<'_>)>,
    ) -> Result<(), ScanError> {
        let (index, mut sink) = match bound {
            Some((index, slot)) => (Some(index), slot.text_sink()),
            None => (None, slot::TextSink::Discard),
        };
        let capacity = sink.capacity();

        let matched = match text::convert_text(cursor, class, width, &mut sink, terminate) {
            Ok(matched) => matched,
            Err(error) => {
                self.halt(error, cursor.at_eof());
                return Ok(());
            }
        };

        if let Some(index) = index {
            let action = global_healing_policy().heal_text_bounds(matched, capacity, terminate);
            if action.is_heal() {
                if !self.config.mode.heals_enabled() {
                    return Err(ScanError::SlotOverflow { index, capacity });
                }
                self.heal(action, index);
            }
        }
        self.succeeded(index.is_some());
        Ok(())
    }

    fn store_integer(
        &mut self,
        index: usize,
        slot: &mut OutputSlot<'_>,
        value: &ScannedInteger,
        bits: u32,
    ) {
        let pattern = if self.config.mode.heals_enabled() {
            let (clamped, action) = global_healing_policy().heal_integer_range(
                value.saturated(),
                bits,
                slot.is_signed(),
            );
            self.heal(action, index);
            clamped as u64
        } else {
            value.wrapped
        };
        slot.store_integer(pattern);
    }

    fn finish(self, cursor: &InputCursor<'_>) -> Result<ScanReport, ScanError> {
        let halted = match self.status {
            SessionStatus::Failed { error, at_eof } => {
                if at_eof && self.assignments == 0 && !self.any_matched {
                    return Err(ScanError::Eof);
                }
                Some(error)
            }
            SessionStatus::Ongoing | SessionStatus::Done => None,
        };
        Ok(ScanReport {
            assignments: self.assignments,
            chars_consumed: cursor.chars_consumed(),
            any_matched: self.any_matched,
            halted,
            heals: self.heals,
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Scan `source` according to `format`, storing into `slots`.
///
/// Both `source` and `format` end at their first NUL byte, if any. Returns
/// the number of values assigned, which may be smaller than the number of
/// directives when a literal or conversion fails part way. Returns
/// [`ScanError::Eof`] when end of input was hit before anything matched, and
/// [`ScanError::TypeMismatch`]/[`ScanError::SlotOverflow`] when the slots do
/// not fit the format. Slots past the last directive are ignored.
pub fn scan(
    source: &[u8],
    format: &[u8],
    slots: &mut [OutputSlot<'_>],
    config: &ScanConfig,
) -> Result<usize, ScanError> {
    scan_detailed(source, format, slots, config).map(|report| report.assignments)
}

/// Like [`scan`], but returns the full [`ScanReport`].
pub fn scan_detailed(
    source: &[u8],
    format: &[u8],
    slots: &mut [OutputSlot<'_>],
    config: &ScanConfig,
) -> Result<ScanReport, ScanError> {
    let format = &format[..format.iter().position(|&b| b == 0).unwrap_or(format.len())];
    let mut cursor = InputCursor::new(source);
    let mut session = ScanSession::new(config, format);
    let mut pos = 0;

    while pos < format.len() && session.is_ongoing() {
        let byte = format[pos];

        if ctype::is_space(byte) {
            while pos < format.len() && ctype::is_space(format[pos]) {
                pos += 1;
            }
            cursor.skip_whitespace();
            continue;
        }

        if byte != b'%' {
            pos += 1;
            session.literal(&mut cursor, byte);
            continue;
        }

        match parse_directive(&format[pos + 1..]) {
            Ok((directive, used)) => {
                pos += 1 + used;
                session.directive(&directive, &mut cursor, slots)?;
            }
            Err(error) => session.halt(error.shifted(pos + 1), false),
        }
    }

    if session.is_ongoing() {
        session.status = SessionStatus::Done;
    }
    session.finish(&cursor)
}

/// [`scan`] with the default configuration: strict mode, `"."` decimal point.
pub fn sscanf(
    source: &[u8],
    format: &[u8],
    slots: &mut [OutputSlot<'_>],
) -> Result<usize, ScanError> {
    scan(source, format, slots, &ScanConfig::default())
}
