//! Floating-point conversions: `%e %E %f %F %g %G`.
//!
//! Matching text is staged in a fixed buffer, normalized to the form Rust's
//! float parser understands (`.` as the decimal point, `e` as the exponent
//! marker), and parsed at the slot's precision by the caller.

use frankenscan_membrane::DecimalPoint;

use super::ScanError;
use super::cursor::{Budget, InputCursor};
use crate::ctype;

/// Capacity of the staging buffer. Widths above it are clamped to it.
pub const FLOAT_STAGING_CAPACITY: usize = 349;

/// Normalized float text accumulated by [`convert_float`].
#[derive(Clone)]
pub(crate) struct FloatStaging {
    buf: [u8; FLOAT_STAGING_CAPACITY],
    len: usize,
}

impl FloatStaging {
    fn new() -> Self {
        Self {
            buf: [0; FLOAT_STAGING_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        // Every staged byte costs at least one width unit, and the width is
        // clamped to the capacity.
        debug_assert!(self.len < FLOAT_STAGING_CAPACITY);
        if let Some(dst) = self.buf.get_mut(self.len) {
            *dst = byte;
            self.len += 1;
        }
    }

    fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// The staged text. Only ASCII is ever staged.
    pub(crate) fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl std::fmt::Debug for FloatStaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FloatStaging").field(&self.as_str()).finish()
    }
}

/// Convert `[sign] digits [decimal-point digits] [e [sign] digits]`.
///
/// At least one mantissa digit is required. An exponent marker is only
/// recognized after a mantissa digit; a marker (and sign) with no exponent
/// digits after it stays consumed but is dropped from the staged text.
pub(crate) fn convert_float(
    cursor: &mut InputCursor<'_>,
    width: Option<u32>,
    decimal_point: &DecimalPoint,
) -> Result<FloatStaging, ScanError> {
    let cap = FLOAT_STAGING_CAPACITY as u32;
    let mut budget = Budget::new(Some(width.map_or(cap, |w| w.min(cap))));
    let mut staging = FloatStaging::new();
    let mut started = false;

    let mut ch = cursor.next_byte();
    if let Some(sign @ (b'-' | b'+')) = ch {
        if sign == b'-' {
            staging.push(b'-');
        }
        budget.spend(1);
        ch = cursor.next_byte();
    }

    ch = stage_digits(cursor, &mut budget, &mut staging, ch, &mut started);

    let point = decimal_point.as_bytes();
    let tail_len = (point.len() - 1) as u32;
    if ch == Some(point[0])
        && budget.allows(point.len() as u32)
        && cursor.starts_with(&point[1..])
    {
        for _ in 0..tail_len {
            cursor.next_byte();
        }
        budget.spend(point.len() as u32);
        staging.push(b'.');
        ch = cursor.next_byte();
        ch = stage_digits(cursor, &mut budget, &mut staging, ch, &mut started);
    }

    if started && matches!(ch, Some(b'e' | b'E')) && !budget.exhausted() {
        let mark = staging.len;
        staging.push(b'e');
        budget.spend(1);
        ch = cursor.next_byte();
        if let Some(sign @ (b'-' | b'+')) = ch {
            if !budget.exhausted() {
                staging.push(sign);
                budget.spend(1);
                ch = cursor.next_byte();
            }
        }
        let mut exponent_digits = false;
        ch = stage_digits(cursor, &mut budget, &mut staging, ch, &mut exponent_digits);
        if !exponent_digits {
            staging.truncate(mark);
        }
    }

    cursor.unget(ch);
    if !started {
        return Err(ScanError::ConversionFailed {
            position: cursor.chars_consumed(),
        });
    }
    Ok(staging)
}

/// Stage a run of decimal digits starting at `ch`. Returns the first byte
/// that was read but not staged.
fn stage_digits(
    cursor: &mut InputCursor<'_>,
    budget: &mut Budget,
    staging: &mut FloatStaging,
    mut ch: Option<u8>,
    any: &mut bool,
) -> Option<u8> {
    while let Some(d) = ch {
        if !ctype::is_digit(d) || budget.exhausted() {
            break;
        }
        staging.push(d);
        *any = true;
        budget.spend(1);
        ch = cursor.next_byte();
    }
    ch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(src: &[u8], width: Option<u32>) -> (Result<String, ScanError>, usize) {
        stage_with(src, width, &DecimalPoint::DOT)
    }

    fn stage_with(
        src: &[u8],
        width: Option<u32>,
        point: &DecimalPoint,
    ) -> (Result<String, ScanError>, usize) {
        let mut cursor = InputCursor::new(src);
        let r = convert_float(&mut cursor, width, point).map(|s| s.as_str().to_owned());
        (r, cursor.chars_consumed())
    }

    #[test]
    fn plain_forms() {
        assert_eq!(stage(b"3.25 ", None), (Ok("3.25".into()), 4));
        assert_eq!(stage(b"-1.5e3x", None), (Ok("-1.5e3".into()), 6));
        assert_eq!(stage(b"+2E-2", None), (Ok("2e-2".into()), 5));
        assert_eq!(stage(b".5", None), (Ok(".5".into()), 2));
        assert_eq!(stage(b"7.", None), (Ok("7.".into()), 2));
    }

    #[test]
    fn needs_a_mantissa_digit() {
        let (r, used) = stage(b"abc", None);
        assert_eq!(r, Err(ScanError::ConversionFailed { position: 0 }));
        assert_eq!(used, 0);

        let (r, used) = stage(b"-.e5", None);
        assert!(r.is_err());
        assert_eq!(used, 2);
    }

    #[test]
    fn dangling_exponent_is_consumed_but_dropped() {
        assert_eq!(stage(b"1ex", None), (Ok("1".into()), 2));
        assert_eq!(stage(b"1e+", None), (Ok("1".into()), 3));
        assert_eq!(stage(b"2.5E-q", None), (Ok("2.5".into()), 5));
    }

    #[test]
    fn width_bounds_everything() {
        assert_eq!(stage(b"12345", Some(3)), (Ok("123".into()), 3));
        assert_eq!(stage(b"-1.25", Some(3)), (Ok("-1.".into()), 3));
        assert_eq!(stage(b"1e10", Some(2)), (Ok("1".into()), 2));
    }

    #[test]
    fn width_clamped_to_staging_capacity() {
        let src = vec![b'1'; 400];
        let (r, used) = stage(&src, None);
        assert_eq!(used, FLOAT_STAGING_CAPACITY);
        assert_eq!(r.unwrap().len(), FLOAT_STAGING_CAPACITY);

        let (_, used) = stage(&src, Some(1000));
        assert_eq!(used, FLOAT_STAGING_CAPACITY);
    }

    #[test]
    fn custom_decimal_point() {
        let comma = DecimalPoint::new(",").unwrap();
        assert_eq!(stage_with(b"3,75", None, &comma), (Ok("3.75".into()), 4));
        assert_eq!(stage_with(b"3.75", None, &comma), (Ok("3".into()), 1));

        let arabic = DecimalPoint::new("\u{66b}").unwrap();
        let src = "1\u{66b}5".as_bytes();
        assert_eq!(stage_with(src, None, &arabic), (Ok("1.5".into()), 4));
        // a partial multi-byte decimal point is not consumed
        assert_eq!(stage_with(&src[..2], None, &arabic), (Ok("1".into()), 1));
    }
}
