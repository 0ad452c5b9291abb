//! Input cursor over the source buffer.
//!
//! The source ends at its first NUL byte or at the end of the slice,
//! whichever comes first. The cursor hands out one byte at a time and can
//! take back the byte it last produced, so every converter can stop on the
//! first byte it rejects without consuming it.

use crate::ctype;

/// Read position over a bounded source buffer with a one-byte push-back.
#[derive(Debug, Clone)]
pub struct InputCursor<'a> {
    buffer: &'a [u8],
    position: usize,
    pushback: Option<u8>,
    consumed: usize,
}

impl<'a> InputCursor<'a> {
    /// Cursor over `source`, truncated at its first NUL.
    #[must_use]
    pub fn new(source: &'a [u8]) -> Self {
        let end = source.iter().position(|&b| b == 0).unwrap_or(source.len());
        Self {
            buffer: &source[..end],
            position: 0,
            pushback: None,
            consumed: 0,
        }
    }

    /// Consume and return the next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = match self.pushback.take() {
            Some(b) => Some(b),
            None => {
                let b = self.buffer.get(self.position).copied();
                if b.is_some() {
                    self.position += 1;
                }
                b
            }
        };
        if byte.is_some() {
            self.consumed += 1;
        }
        byte
    }

    /// Return the byte produced by the last [`next_byte`](Self::next_byte)
    /// call. Ungetting end-of-input is a no-op.
    ///
    /// Only one byte may be pending at a time; converters never unget twice
    /// without reading in between.
    pub fn unget(&mut self, byte: Option<u8>) {
        if let Some(b) = byte {
            debug_assert!(self.pushback.is_none(), "push-back slot already occupied");
            self.pushback = Some(b);
            self.consumed -= 1;
        }
    }

    /// Next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.pushback.or_else(|| self.buffer.get(self.position).copied())
    }

    /// True if the unread input begins with `needle`.
    #[must_use]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        match (self.pushback, needle.split_first()) {
            (_, None) => true,
            (Some(b), Some((first, rest))) => {
                b == *first && self.buffer[self.position..].starts_with(rest)
            }
            (None, Some(_)) => self.buffer[self.position..].starts_with(needle),
        }
    }

    /// Consume a run of whitespace, returning how many bytes were skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let mut skipped = 0;
        while let Some(b) = self.peek() {
            if !ctype::is_space(b) {
                break;
            }
            self.next_byte();
            skipped += 1;
        }
        skipped
    }

    /// Bytes consumed so far. Pushed-back bytes do not count.
    #[must_use]
    pub fn chars_consumed(&self) -> usize {
        self.consumed
    }

    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.peek().is_none()
    }
}

/// Remaining field width of one conversion. Unbounded when no width was
/// given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Budget {
    remaining: Option<u32>,
}

impl Budget {
    pub(crate) fn new(width: Option<u32>) -> Self {
        Self { remaining: width }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// True if at least `units` more characters may be consumed.
    pub(crate) fn allows(&self, units: u32) -> bool {
        self.remaining.is_none_or(|r| r >= units)
    }

    pub(crate) fn spend(&mut self, units: u32) {
        if let Some(r) = &mut self.remaining {
            *r = r.saturating_sub(units);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_nul() {
        let mut c = InputCursor::new(b"ab\0cd");
        assert_eq!(c.next_byte(), Some(b'a'));
        assert_eq!(c.next_byte(), Some(b'b'));
        assert_eq!(c.next_byte(), None);
        assert_eq!(c.chars_consumed(), 2);
    }

    #[test]
    fn unget_restores_byte_and_count() {
        let mut c = InputCursor::new(b"xy");
        let b = c.next_byte();
        assert_eq!(c.chars_consumed(), 1);
        c.unget(b);
        assert_eq!(c.chars_consumed(), 0);
        assert_eq!(c.peek(), Some(b'x'));
        assert_eq!(c.next_byte(), Some(b'x'));
        assert_eq!(c.next_byte(), Some(b'y'));
    }

    #[test]
    fn unget_eof_is_noop() {
        let mut c = InputCursor::new(b"");
        let b = c.next_byte();
        assert_eq!(b, None);
        c.unget(b);
        assert!(c.at_eof());
        assert_eq!(c.chars_consumed(), 0);
    }

    #[test]
    fn starts_with_sees_pushback() {
        let mut c = InputCursor::new(b"1,5");
        c.next_byte();
        let comma = c.next_byte();
        c.unget(comma);
        assert!(c.starts_with(b",5"));
        assert!(!c.starts_with(b"5"));
        assert!(c.starts_with(b""));
    }

    #[test]
    fn skip_whitespace_counts() {
        let mut c = InputCursor::new(b" \t\n x");
        assert_eq!(c.skip_whitespace(), 4);
        assert_eq!(c.chars_consumed(), 4);
        assert_eq!(c.peek(), Some(b'x'));
        assert_eq!(c.skip_whitespace(), 0);
    }

    #[test]
    fn budget_tracks_width() {
        let mut b = Budget::new(Some(3));
        assert!(b.allows(3));
        b.spend(2);
        assert!(!b.allows(2));
        assert!(!b.exhausted());
        b.spend(1);
        assert!(b.exhausted());

        let mut unbounded = Budget::new(None);
        unbounded.spend(1_000);
        assert!(unbounded.allows(u32::MAX));
        assert!(!unbounded.exhausted());
    }
}
