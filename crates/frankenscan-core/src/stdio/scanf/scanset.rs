//! `%[...]` scanset tables.

use std::fmt;

use super::ScanError;

/// 256-entry membership table built from a `%[` directive.
///
/// With `reject` set, [`contains`](Self::contains) answers for the
/// complement: bytes NOT listed in the brackets.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ScansetTable {
    members: [bool; 256],
    reject: bool,
}

impl ScansetTable {
    /// Parse the body of a scanset. `fmt` starts just after the `[`.
    ///
    /// Returns the table and the number of bytes consumed, including the
    /// closing `]`. A `]` right after `[` or `[^` is a member. A `-` between
    /// two members denotes an inclusive range (either order); a `-` first,
    /// last, or right after a range is literal. A missing `]` is malformed;
    /// the error offset is relative to `fmt`.
    pub fn parse(fmt: &[u8]) -> Result<(Self, usize), ScanError> {
        let mut table = Self {
            members: [false; 256],
            reject: false,
        };
        let mut pos = 0;

        if fmt.first() == Some(&b'^') {
            table.reject = true;
            pos += 1;
        }

        let mut prev: Option<u8> = None;
        if fmt.get(pos) == Some(&b']') {
            table.members[usize::from(b']')] = true;
            prev = Some(b']');
            pos += 1;
        }

        loop {
            let Some(&c) = fmt.get(pos) else {
                return Err(ScanError::MalformedFormat { offset: pos });
            };
            pos += 1;
            if c == b']' {
                break;
            }
            match (c, prev, fmt.get(pos)) {
                (b'-', Some(lo), Some(&hi)) if hi != b']' => {
                    pos += 1;
                    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                    for b in lo..=hi {
                        table.members[usize::from(b)] = true;
                    }
                    prev = None;
                }
                _ => {
                    table.members[usize::from(c)] = true;
                    prev = Some(c);
                }
            }
        }

        Ok((table, pos))
    }

    /// True if `byte` is accepted by this scanset.
    #[inline]
    #[must_use]
    pub fn contains(&self, byte: u8) -> bool {
        self.members[usize::from(byte)] != self.reject
    }

    /// True for `%[^...]`.
    #[must_use]
    pub fn is_reject(&self) -> bool {
        self.reject
    }
}

impl fmt::Debug for ScansetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listed: Vec<u8> = (0..=255u8)
            .filter(|&b| self.members[usize::from(b)])
            .collect();
        f.debug_struct("ScansetTable")
            .field("reject", &self.reject)
            .field("members", &String::from_utf8_lossy(&listed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_set() {
        let (t, used) = ScansetTable::parse(b"abc]rest").unwrap();
        assert_eq!(used, 4);
        assert!(t.contains(b'a') && t.contains(b'c'));
        assert!(!t.contains(b'd'));
        assert!(!t.is_reject());
    }

    #[test]
    fn leading_bracket_is_member() {
        let (t, used) = ScansetTable::parse(b"]a]").unwrap();
        assert_eq!(used, 3);
        assert!(t.contains(b']'));
        assert!(t.contains(b'a'));

        let (t, used) = ScansetTable::parse(b"^]x]").unwrap();
        assert_eq!(used, 4);
        assert!(!t.contains(b']'));
        assert!(!t.contains(b'x'));
        assert!(t.contains(b'y'));
    }

    #[test]
    fn ranges_in_either_order() {
        let (t, _) = ScansetTable::parse(b"a-c]").unwrap();
        assert!(t.contains(b'b'));
        let (t, _) = ScansetTable::parse(b"z-x]").unwrap();
        assert!(t.contains(b'y'));
        assert!(!t.contains(b'w'));
    }

    #[test]
    fn dash_literal_positions() {
        let (t, _) = ScansetTable::parse(b"-a]").unwrap();
        assert!(t.contains(b'-') && t.contains(b'a'));
        assert!(!t.contains(b'b'));

        let (t, _) = ScansetTable::parse(b"a-]").unwrap();
        assert!(t.contains(b'-') && t.contains(b'a'));

        // dash right after a completed range is literal
        let (t, _) = ScansetTable::parse(b"a-c-e]").unwrap();
        assert!(t.contains(b'-') && t.contains(b'e'));
        assert!(!t.contains(b'd'));
    }

    #[test]
    fn reject_complements() {
        let (t, _) = ScansetTable::parse(b"^,]").unwrap();
        assert!(t.is_reject());
        assert!(!t.contains(b','));
        assert!(t.contains(b'a'));
        assert!(t.contains(0xFF));
    }

    #[test]
    fn unterminated_is_malformed() {
        assert_eq!(
            ScansetTable::parse(b"abc"),
            Err(ScanError::MalformedFormat { offset: 3 })
        );
        assert_eq!(
            ScansetTable::parse(b"^"),
            Err(ScanError::MalformedFormat { offset: 1 })
        );
        assert!(ScansetTable::parse(b"a-").is_err());
    }
}
