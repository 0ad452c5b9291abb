//! Conversion directive parser.
//!
//! Recognizes `%[*][width][length]conversion`. The prefix is read as a loop,
//! so `*`, width digits and length modifiers may come in any order. The last
//! length modifier wins.

use super::ScanError;
use super::scanset::ScansetTable;
use super::slot::SlotKind;

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// Length modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthTag {
    Short, // 'h'
    #[default]
    Default,
    Long,     // 'l', 'L'
    LongLong, // 'll', 'I64'
    WideChar, // 'w'
}

/// Digit set an integer conversion accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Octal,
    /// Hex digits, with an optional `0x`/`0X` prefix.
    Hex,
    /// `%i`: `0x` prefix selects hex, a lone leading `0` selects octal.
    Detect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Char,
    String,
    Scanset(ScansetTable),
    Integer { radix: Radix, pointer: bool },
    Float,
    CharCount,
    Percent,
}

/// A parsed conversion directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    /// Maximum characters to consume; `None` means unbounded.
    pub width: Option<u32>,
    pub length: LengthTag,
    /// `*`: convert but do not store.
    pub suppress: bool,
    pub kind: ConversionKind,
}

impl Directive {
    /// True if this directive consumes an output slot.
    #[must_use]
    pub fn binds_slot(&self) -> bool {
        !self.suppress && self.kind != ConversionKind::Percent
    }

    /// True for `%lc`, `%ls`, `%l[`, and their `w` forms.
    #[must_use]
    pub fn is_wide_text(&self) -> bool {
        matches!(self.length, LengthTag::Long | LengthTag::WideChar)
    }

    /// Storage width in bits for integer and `%n` conversions.
    #[must_use]
    pub fn integer_bits(&self) -> u32 {
        if let ConversionKind::Integer { pointer: true, .. } = self.kind {
            return usize::BITS;
        }
        match self.length {
            LengthTag::Short => 16,
            LengthTag::LongLong => 64,
            LengthTag::Default | LengthTag::Long | LengthTag::WideChar => 32,
        }
    }

    /// The slot kind this directive writes to. `None` for `%%`.
    #[must_use]
    pub fn expected_slot(&self) -> Option<SlotKind> {
        let kind = match self.kind {
            ConversionKind::Percent => return None,
            ConversionKind::Char if self.is_wide_text() => SlotKind::Wide,
            ConversionKind::Char => SlotKind::Char,
            ConversionKind::String | ConversionKind::Scanset(_) if self.is_wide_text() => {
                SlotKind::Wide
            }
            ConversionKind::String | ConversionKind::Scanset(_) => SlotKind::Str,
            ConversionKind::Float => match self.length {
                LengthTag::Long | LengthTag::LongLong => SlotKind::Double,
                _ => SlotKind::Float,
            },
            ConversionKind::Integer { .. } | ConversionKind::CharCount => {
                match self.integer_bits() {
                    16 => SlotKind::Short,
                    64 => SlotKind::Int64,
                    _ => SlotKind::Long,
                }
            }
        };
        Some(kind)
    }

    /// True if a slot of `kind` may receive this directive's result.
    /// `%n` additionally accepts a [`SlotKind::Count`].
    #[must_use]
    pub fn accepts(&self, kind: SlotKind) -> bool {
        if self.kind == ConversionKind::CharCount && kind == SlotKind::Count {
            return true;
        }
        self.expected_slot() == Some(kind)
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single directive starting after the `%` character.
///
/// `fmt` points to the first byte AFTER `%`. Returns `(directive,
/// bytes_consumed)` counted from `fmt[0]`. An unknown conversion letter, a
/// directive cut off by the end of the format, an unterminated scanset or an
/// explicit width of 0 is [`ScanError::MalformedFormat`] with an offset
/// relative to `fmt`.
pub fn parse_directive(fmt: &[u8]) -> Result<(Directive, usize), ScanError> {
    let mut pos = 0;
    let mut width: Option<u32> = None;
    let mut length = LengthTag::Default;
    let mut suppress = false;

    // --- prefix: '*', width digits, length modifiers ---
    let conversion = loop {
        let Some(&c) = fmt.get(pos) else {
            return Err(ScanError::MalformedFormat { offset: pos });
        };
        match c {
            b'0'..=b'9' => {
                let digit = u32::from(c - b'0');
                width = Some(width.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            }
            b'*' => suppress = true,
            b'h' => length = LengthTag::Short,
            b'l' => {
                if fmt.get(pos + 1) == Some(&b'l') {
                    pos += 1;
                    length = LengthTag::LongLong;
                } else {
                    length = LengthTag::Long;
                }
            }
            b'L' => length = LengthTag::Long,
            b'w' => length = LengthTag::WideChar,
            b'I' => {
                let rest = &fmt[pos + 1..];
                if rest.starts_with(b"64") {
                    length = LengthTag::LongLong;
                } else if rest.starts_with(b"32") {
                    length = LengthTag::Default;
                } else {
                    return Err(ScanError::MalformedFormat { offset: pos });
                }
                pos += 2;
            }
            _ => break c,
        }
        pos += 1;
    };

    let letter_at = pos;
    pos += 1;

    let kind = match conversion {
        b'd' | b'u' => ConversionKind::Integer {
            radix: Radix::Decimal,
            pointer: false,
        },
        b'i' => ConversionKind::Integer {
            radix: Radix::Detect,
            pointer: false,
        },
        b'o' => ConversionKind::Integer {
            radix: Radix::Octal,
            pointer: false,
        },
        b'x' | b'X' => ConversionKind::Integer {
            radix: Radix::Hex,
            pointer: false,
        },
        b'p' => ConversionKind::Integer {
            radix: Radix::Hex,
            pointer: true,
        },
        b'e' | b'E' | b'f' | b'F' | b'g' | b'G' => ConversionKind::Float,
        b'c' => ConversionKind::Char,
        b's' => ConversionKind::String,
        b'[' => {
            let (table, used) = ScansetTable::parse(&fmt[pos..]).map_err(|e| e.shifted(pos))?;
            pos += used;
            ConversionKind::Scanset(table)
        }
        b'n' => ConversionKind::CharCount,
        b'%' => ConversionKind::Percent,
        _ => return Err(ScanError::MalformedFormat { offset: letter_at }),
    };

    if width == Some(0) {
        return Err(ScanError::MalformedFormat { offset: letter_at });
    }

    Ok((
        Directive {
            width,
            length,
            suppress,
            kind,
        },
        pos,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fmt: &[u8]) -> Directive {
        parse_directive(fmt).unwrap().0
    }

    #[test]
    fn plain_conversions() {
        let (d, used) = parse_directive(b"d rest").unwrap();
        assert_eq!(used, 1);
        assert_eq!(d.width, None);
        assert_eq!(d.length, LengthTag::Default);
        assert!(!d.suppress);
        assert_eq!(
            d.kind,
            ConversionKind::Integer {
                radix: Radix::Decimal,
                pointer: false
            }
        );
        assert_eq!(parse(b"g").kind, ConversionKind::Float);
        assert_eq!(parse(b"c").kind, ConversionKind::Char);
        assert_eq!(parse(b"s").kind, ConversionKind::String);
        assert_eq!(parse(b"n").kind, ConversionKind::CharCount);
        assert_eq!(parse(b"%").kind, ConversionKind::Percent);
    }

    #[test]
    fn prefix_in_any_order() {
        let a = parse(b"*5ld");
        let b = parse(b"5*ld");
        let c = parse(b"l5*d");
        for d in [a, b, c] {
            assert_eq!(d.width, Some(5));
            assert!(d.suppress);
            assert_eq!(d.length, LengthTag::Long);
        }
    }

    #[test]
    fn length_modifiers() {
        assert_eq!(parse(b"hd").length, LengthTag::Short);
        assert_eq!(parse(b"lld").length, LengthTag::LongLong);
        assert_eq!(parse(b"I64d").length, LengthTag::LongLong);
        assert_eq!(parse(b"I32d").length, LengthTag::Default);
        assert_eq!(parse(b"Lf").length, LengthTag::Long);
        assert_eq!(parse(b"ws").length, LengthTag::WideChar);
        // last modifier wins
        assert_eq!(parse(b"hld").length, LengthTag::Long);
        assert_eq!(parse(b"llhd").length, LengthTag::Short);
    }

    #[test]
    fn multi_digit_width() {
        let (d, used) = parse_directive(b"12s").unwrap();
        assert_eq!(d.width, Some(12));
        assert_eq!(used, 3);
    }

    #[test]
    fn scanset_consumes_through_bracket() {
        let (d, used) = parse_directive(b"[a-z]x").unwrap();
        assert_eq!(used, 5);
        let ConversionKind::Scanset(table) = d.kind else {
            panic!("expected scanset, got {:?}", d.kind);
        };
        assert!(table.contains(b'q'));
        assert!(!table.contains(b'x'));
    }

    #[test]
    fn malformed_directives() {
        assert_eq!(
            parse_directive(b"q"),
            Err(ScanError::MalformedFormat { offset: 0 })
        );
        assert_eq!(
            parse_directive(b"5"),
            Err(ScanError::MalformedFormat { offset: 1 })
        );
        assert_eq!(
            parse_directive(b""),
            Err(ScanError::MalformedFormat { offset: 0 })
        );
        assert_eq!(
            parse_directive(b"0d"),
            Err(ScanError::MalformedFormat { offset: 1 })
        );
        assert_eq!(
            parse_directive(b"[abc"),
            Err(ScanError::MalformedFormat { offset: 4 })
        );
        assert!(parse_directive(b"I16d").is_err());
    }

    #[test]
    fn expected_slots() {
        assert_eq!(parse(b"d").expected_slot(), Some(SlotKind::Long));
        assert_eq!(parse(b"hu").expected_slot(), Some(SlotKind::Short));
        assert_eq!(parse(b"llx").expected_slot(), Some(SlotKind::Int64));
        assert_eq!(parse(b"f").expected_slot(), Some(SlotKind::Float));
        assert_eq!(parse(b"lf").expected_slot(), Some(SlotKind::Double));
        assert_eq!(parse(b"c").expected_slot(), Some(SlotKind::Char));
        assert_eq!(parse(b"lc").expected_slot(), Some(SlotKind::Wide));
        assert_eq!(parse(b"[a]").expected_slot(), Some(SlotKind::Str));
        assert_eq!(parse(b"%").expected_slot(), None);

        let ptr = parse(b"p");
        assert_eq!(ptr.integer_bits(), usize::BITS);

        let count = parse(b"n");
        assert!(count.accepts(SlotKind::Count));
        assert!(count.accepts(SlotKind::Long));
        assert!(!count.accepts(SlotKind::Str));
    }

    #[test]
    fn binds_slot() {
        assert!(parse(b"d").binds_slot());
        assert!(!parse(b"*d").binds_slot());
        assert!(!parse(b"%").binds_slot());
        assert!(parse(b"n").binds_slot());
    }
}
