//! Text conversions: `%c`, `%s`, `%[`.

use super::ScanError;
use super::cursor::{Budget, InputCursor};
use super::scanset::ScansetTable;
use super::slot::TextSink;
use crate::ctype;

/// Which bytes a text conversion accepts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TextClass<'t> {
    /// `%c`: any byte.
    Any,
    /// `%s`: any non-whitespace byte.
    NonSpace,
    /// `%[`: scanset members.
    Set(&'t ScansetTable),
}

impl TextClass<'_> {
    fn accepts(&self, byte: u8) -> bool {
        match self {
            Self::Any => true,
            Self::NonSpace => !ctype::is_space(byte),
            Self::Set(table) => table.contains(byte),
        }
    }
}

/// Copy the longest run of accepted bytes, up to `width`, into `sink`, and
/// return how many bytes were consumed.
///
/// Bytes past the sink's capacity are still consumed but not stored. With
/// `terminate`, one element is reserved for a trailing NUL, which is written
/// whenever the sink has room for it. Fails if nothing matched.
pub(crate) fn convert_text(
    cursor: &mut InputCursor<'_>,
    class: TextClass<'_>,
    width: Option<u32>,
    sink: &mut TextSink<'_>,
    terminate: bool,
) -> Result<usize, ScanError> {
    let mut budget = Budget::new(width);
    let room = sink.capacity().saturating_sub(usize::from(terminate));
    let mut matched = 0usize;

    while !budget.exhausted() {
        let ch = cursor.next_byte();
        match ch {
            Some(b) if class.accepts(b) => {
                if matched < room {
                    sink.put(matched, b);
                }
                matched += 1;
                budget.spend(1);
            }
            _ => {
                cursor.unget(ch);
                break;
            }
        }
    }

    if matched == 0 {
        return Err(ScanError::ConversionFailed {
            position: cursor.chars_consumed(),
        });
    }

    if terminate {
        sink.terminate(matched.min(room));
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_stops_at_whitespace_and_terminates() {
        let mut cursor = InputCursor::new(b"hello world");
        let mut buf = [0xAAu8; 8];
        let out = convert_text(
            &mut cursor,
            TextClass::NonSpace,
            None,
            &mut TextSink::Narrow(&mut buf),
            true,
        )
        .unwrap();
        assert_eq!(out, 5);
        assert_eq!(&buf[..6], b"hello\0");
        assert_eq!(cursor.peek(), Some(b' '));
    }

    #[test]
    fn chars_take_whitespace_and_do_not_terminate() {
        let mut cursor = InputCursor::new(b" ab");
        let mut buf = [0xAAu8; 3];
        let out = convert_text(
            &mut cursor,
            TextClass::Any,
            Some(2),
            &mut TextSink::Narrow(&mut buf),
            false,
        )
        .unwrap();
        assert_eq!(out, 2);
        assert_eq!(buf, [b' ', b'a', 0xAA]);
    }

    #[test]
    fn overlong_input_consumed_but_clipped() {
        let mut cursor = InputCursor::new(b"abcdef");
        let mut buf = [0xAAu8; 4];
        let out = convert_text(
            &mut cursor,
            TextClass::NonSpace,
            None,
            &mut TextSink::Narrow(&mut buf),
            true,
        )
        .unwrap();
        assert_eq!(out, 6);
        assert_eq!(&buf, b"abc\0");
        assert!(cursor.at_eof());
    }

    #[test]
    fn scanset_class() {
        let (table, _) = ScansetTable::parse(b"^,]").unwrap();
        let mut cursor = InputCursor::new(b"ab c,d");
        let out = convert_text(
            &mut cursor,
            TextClass::Set(&table),
            None,
            &mut TextSink::Discard,
            true,
        )
        .unwrap();
        assert_eq!(out, 4);
        assert_eq!(cursor.peek(), Some(b','));
    }

    #[test]
    fn empty_match_fails() {
        let mut cursor = InputCursor::new(b"  x");
        let r = convert_text(
            &mut cursor,
            TextClass::NonSpace,
            None,
            &mut TextSink::Discard,
            true,
        );
        assert_eq!(r, Err(ScanError::ConversionFailed { position: 0 }));

        let mut cursor = InputCursor::new(b"");
        let r = convert_text(
            &mut cursor,
            TextClass::Any,
            Some(1),
            &mut TextSink::Discard,
            false,
        );
        assert!(r.is_err());
    }
}
