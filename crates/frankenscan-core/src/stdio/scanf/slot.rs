//! Typed output slots.
//!
//! A scan writes each converted value into the next slot of a caller-owned
//! list. Slots replace the untyped pointer list of C `vsscanf`: each one
//! states what it holds and how large it is, and the engine verifies that
//! against the directive before writing anything.

use std::fmt;

/// A caller-owned destination for one converted value.
#[derive(Debug)]
pub enum OutputSlot<'a> {
    /// `%c`: raw bytes, never NUL-terminated.
    Char(&'a mut [u8]),
    /// `%s`, `%[`: bytes followed by a NUL.
    Str(&'a mut [u8]),
    /// `%lc`, `%ls`, `%l[`: each matched byte widened to a 16-bit unit.
    /// Strings are terminated with a zero unit; characters are not.
    Wide(&'a mut [u16]),
    Short(&'a mut i16),
    UShort(&'a mut u16),
    Long(&'a mut i32),
    ULong(&'a mut u32),
    Int64(&'a mut i64),
    UInt64(&'a mut u64),
    Float(&'a mut f32),
    Double(&'a mut f64),
    /// `%n` only.
    Count(&'a mut usize),
}

/// The shape of an [`OutputSlot`], independent of signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Char,
    Str,
    Wide,
    Short,
    Long,
    Int64,
    Float,
    Double,
    Count,
}

impl SlotKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Str => "str",
            Self::Wide => "wide",
            Self::Short => "short",
            Self::Long => "long",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutputSlot<'_> {
    #[must_use]
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Char(_) => SlotKind::Char,
            Self::Str(_) => SlotKind::Str,
            Self::Wide(_) => SlotKind::Wide,
            Self::Short(_) | Self::UShort(_) => SlotKind::Short,
            Self::Long(_) | Self::ULong(_) => SlotKind::Long,
            Self::Int64(_) | Self::UInt64(_) => SlotKind::Int64,
            Self::Float(_) => SlotKind::Float,
            Self::Double(_) => SlotKind::Double,
            Self::Count(_) => SlotKind::Count,
        }
    }

    /// True for the signed integer slots. Saturation bounds depend on it.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Short(_) | Self::Long(_) | Self::Int64(_))
    }

    /// Store the low bits of `bits`, exactly like a C integer cast.
    /// Non-integer slots are left untouched.
    pub(crate) fn store_integer(&mut self, bits: u64) {
        match self {
            Self::Short(dst) => **dst = bits as i16,
            Self::UShort(dst) => **dst = bits as u16,
            Self::Long(dst) => **dst = bits as i32,
            Self::ULong(dst) => **dst = bits as u32,
            Self::Int64(dst) => **dst = bits as i64,
            Self::UInt64(dst) => **dst = bits,
            Self::Count(dst) => **dst = bits as usize,
            _ => {}
        }
    }

    /// Parse `staged` at the slot's precision and store it.
    pub(crate) fn store_float(&mut self, staged: &str) -> Result<(), std::num::ParseFloatError> {
        match self {
            Self::Float(dst) => **dst = staged.parse::<f32>()?,
            Self::Double(dst) => **dst = staged.parse::<f64>()?,
            _ => {}
        }
        Ok(())
    }

    /// Destination for a text conversion. Non-text slots discard.
    pub(crate) fn text_sink(&mut self) -> TextSink<'_> {
        match self {
            Self::Char(buf) | Self::Str(buf) => TextSink::Narrow(&mut buf[..]),
            Self::Wide(buf) => TextSink::Wide(&mut buf[..]),
            _ => TextSink::Discard,
        }
    }
}

/// Where a text conversion writes its bytes.
#[derive(Debug)]
pub(crate) enum TextSink<'s> {
    Narrow(&'s mut [u8]),
    Wide(&'s mut [u16]),
    /// Suppressed conversions: accept everything, store nothing.
    Discard,
}

impl TextSink<'_> {
    /// Elements the sink can hold.
    pub(crate) fn capacity(&self) -> usize {
        match self {
            Self::Narrow(buf) => buf.len(),
            Self::Wide(buf) => buf.len(),
            Self::Discard => usize::MAX,
        }
    }

    /// Write `byte` at `index`. Out-of-bounds writes are dropped.
    pub(crate) fn put(&mut self, index: usize, byte: u8) {
        match self {
            Self::Narrow(buf) => {
                if let Some(dst) = buf.get_mut(index) {
                    *dst = byte;
                }
            }
            Self::Wide(buf) => {
                if let Some(dst) = buf.get_mut(index) {
                    *dst = u16::from(byte);
                }
            }
            Self::Discard => {}
        }
    }

    /// Write the terminator at `index`.
    pub(crate) fn terminate(&mut self, index: usize) {
        self.put(index, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_ignore_signedness() {
        let mut a = 0i16;
        let mut b = 0u16;
        assert_eq!(OutputSlot::Short(&mut a).kind(), SlotKind::Short);
        assert_eq!(OutputSlot::UShort(&mut b).kind(), SlotKind::Short);
        let mut c = 0u64;
        assert_eq!(OutputSlot::UInt64(&mut c).kind(), SlotKind::Int64);
        assert!(OutputSlot::Short(&mut a).is_signed());
        assert!(!OutputSlot::UShort(&mut b).is_signed());
        assert!(!OutputSlot::UInt64(&mut c).is_signed());
    }

    #[test]
    fn integer_store_truncates_like_cast() {
        let mut s = 0i16;
        OutputSlot::Short(&mut s).store_integer(0x1_8000);
        assert_eq!(s, i16::MIN);

        let mut u = 0u32;
        OutputSlot::ULong(&mut u).store_integer((-1i64) as u64);
        assert_eq!(u, u32::MAX);

        let mut l = 0i32;
        OutputSlot::Long(&mut l).store_integer((-42i64) as u64);
        assert_eq!(l, -42);
    }

    #[test]
    fn float_store_uses_slot_precision() {
        let mut f = 0f32;
        OutputSlot::Float(&mut f).store_float("0.1").unwrap();
        assert_eq!(f, 0.1f32);

        let mut d = 0f64;
        OutputSlot::Double(&mut d).store_float("-2.5e3").unwrap();
        assert_eq!(d, -2500.0);
    }

    #[test]
    fn wide_sink_widens() {
        let mut buf = [0xFFFFu16; 3];
        let mut slot = OutputSlot::Wide(&mut buf);
        let mut sink = slot.text_sink();
        assert_eq!(sink.capacity(), 3);
        sink.put(0, b'h');
        sink.put(1, 0xE9);
        sink.terminate(2);
        sink.put(9, b'x');
        assert_eq!(buf, [u16::from(b'h'), 0xE9, 0]);
    }
}
