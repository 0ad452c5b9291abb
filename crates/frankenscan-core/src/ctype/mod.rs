//! Character classification used by the scanner.
//!
//! C locale only. Every predicate works on raw bytes so the scanner stays
//! byte-oriented regardless of the source encoding.

/// Returns `true` if `c` is a whitespace character.
///
/// Whitespace: space, tab, newline, vertical tab, form feed, carriage return.
#[inline]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Returns `true` if `c` is a decimal digit (`[0-9]`).
#[inline]
pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Value of `c` as a digit in `radix` (8, 10 or 16), or `None` if `c` is
/// not a digit of that radix.
#[inline]
pub fn digit_value(c: u8, radix: u32) -> Option<u64> {
    let value = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => return None,
    };
    ((value as u32) < radix).then_some(u64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_space() {
        for c in [b' ', b'\t', b'\n', 0x0B, 0x0C, b'\r'] {
            assert!(is_space(c), "{c:#x} should be space");
        }
        assert!(!is_space(b'a'));
        assert!(!is_space(0));
        assert!(!is_space(0xA0));
    }

    #[test]
    fn test_digit_classes() {
        assert!(is_digit(b'7'));
        assert!(!is_digit(b'a'));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'g', 16), None);
    }

    #[test]
    fn test_digit_value_respects_radix() {
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(digit_value(b'9', 10), Some(9));
        assert_eq!(digit_value(b'a', 10), None);
        assert_eq!(digit_value(b'a', 16), Some(10));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'x', 16), None);
    }
}
