//! Integer conversions: `%d %u %i %o %x %X %p`.

use super::ScanError;
use super::cursor::{Budget, InputCursor};
use super::directive::Radix;
use crate::ctype;

/// Result of an integer conversion, before it is narrowed to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScannedInteger {
    /// Accumulated modulo 2^64, sign applied by two's-complement negation.
    pub wrapped: u64,
    /// Exact signed value, or `None` if the magnitude overflowed 64 bits.
    pub exact: Option<i128>,
    pub negative: bool,
}

impl ScannedInteger {
    /// Exact value, with 64-bit overflow pinned to the matching extreme.
    pub fn saturated(&self) -> i128 {
        self.exact.unwrap_or(if self.negative {
            i128::MIN
        } else {
            i128::MAX
        })
    }
}

/// Convert an optionally signed integer in `radix`.
///
/// The sign counts against the width. For [`Radix::Hex`] and
/// [`Radix::Detect`] a `0x`/`0X` prefix is consumed only when two width units
/// remain; for [`Radix::Detect`] a leading `0` without `x` switches to octal
/// and counts as a digit. Fails if no digit was consumed.
pub(crate) fn convert_integer(
    cursor: &mut InputCursor<'_>,
    radix: Radix,
    width: Option<u32>,
) -> Result<ScannedInteger, ScanError> {
    let mut budget = Budget::new(width);
    let mut base: u32 = match radix {
        Radix::Octal => 8,
        Radix::Hex => 16,
        Radix::Decimal | Radix::Detect => 10,
    };
    let mut negative = false;
    let mut started = false;
    let mut wrapped: u64 = 0;
    let mut exact: Option<u64> = Some(0);

    let mut ch = cursor.next_byte();
    if let Some(sign @ (b'-' | b'+')) = ch {
        negative = sign == b'-';
        budget.spend(1);
        if budget.exhausted() {
            return Err(failed(cursor));
        }
        ch = cursor.next_byte();
    }

    if matches!(radix, Radix::Hex | Radix::Detect) && ch == Some(b'0') {
        if budget.allows(2) && matches!(cursor.peek(), Some(b'x' | b'X')) {
            cursor.next_byte();
            budget.spend(2);
            base = 16;
            if budget.exhausted() {
                return Err(failed(cursor));
            }
            ch = cursor.next_byte();
        } else if radix == Radix::Detect {
            base = 8;
            started = true;
            budget.spend(1);
            if budget.exhausted() {
                return Ok(finish(0, Some(0), negative));
            }
            ch = cursor.next_byte();
        }
        // Plain %x: the '0' is an ordinary digit below.
    }

    loop {
        let Some(digit) = ch.and_then(|c| ctype::digit_value(c, base)) else {
            cursor.unget(ch);
            break;
        };
        started = true;
        wrapped = wrapped
            .wrapping_mul(u64::from(base))
            .wrapping_add(digit);
        exact = exact
            .and_then(|v| v.checked_mul(u64::from(base)))
            .and_then(|v| v.checked_add(digit));
        budget.spend(1);
        if budget.exhausted() {
            break;
        }
        ch = cursor.next_byte();
    }

    if !started {
        return Err(failed(cursor));
    }
    Ok(finish(wrapped, exact, negative))
}

fn failed(cursor: &InputCursor<'_>) -> ScanError {
    ScanError::ConversionFailed {
        position: cursor.chars_consumed(),
    }
}

fn finish(magnitude: u64, exact: Option<u64>, negative: bool) -> ScannedInteger {
    ScannedInteger {
        wrapped: if negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        },
        exact: exact.map(|m| {
            if negative {
                -i128::from(m)
            } else {
                i128::from(m)
            }
        }),
        negative,
    }
}
