//! `sscanf` over a typed slot array.
//!
//! C varargs carry no type information, so the exported entry points take an
//! array of [`FrankenscanSlot`] descriptors instead: each names the kind of
//! its destination, the pointer and (for buffers) the element capacity. The
//! engine checks every descriptor against its directive before writing.

use std::ffi::{c_char, c_int, c_void};

use frankenscan_core::stdio::scanf::{self, OutputSlot, ScanError};
use frankenscan_membrane::config::DecimalPoint;

use crate::macros::abi_fn;
use crate::runtime_policy;
use crate::util::c_str_bytes;

// ---------------------------------------------------------------------------
// Slot descriptors
// ---------------------------------------------------------------------------

/// `%c` destination: `char[cap]`, not terminated.
pub const FRANKENSCAN_SLOT_CHAR: c_int = 1;
/// `%s` / `%[` destination: `char[cap]`, NUL-terminated.
pub const FRANKENSCAN_SLOT_STR: c_int = 2;
/// `%lc` / `%ls` / `%l[` destination: `uint16_t[cap]`.
pub const FRANKENSCAN_SLOT_WIDE: c_int = 3;
pub const FRANKENSCAN_SLOT_SHORT: c_int = 4;
pub const FRANKENSCAN_SLOT_USHORT: c_int = 5;
pub const FRANKENSCAN_SLOT_LONG: c_int = 6;
pub const FRANKENSCAN_SLOT_ULONG: c_int = 7;
pub const FRANKENSCAN_SLOT_INT64: c_int = 8;
pub const FRANKENSCAN_SLOT_UINT64: c_int = 9;
pub const FRANKENSCAN_SLOT_FLOAT: c_int = 10;
pub const FRANKENSCAN_SLOT_DOUBLE: c_int = 11;
/// `%n` destination: `size_t`.
pub const FRANKENSCAN_SLOT_COUNT: c_int = 12;

/// Returned when input ended before anything matched.
pub const FRANKENSCAN_EOF: c_int = -1;
/// Returned for null pointers, unknown slot kinds and slot contract violations.
pub const FRANKENSCAN_EINVAL: c_int = -2;

/// One destination for a converted value.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FrankenscanSlot {
    pub kind: c_int,
    pub ptr: *mut c_void,
    /// Element capacity for buffer kinds; ignored otherwise.
    pub cap: libc::size_t,
}

/// Storage for destinations that were null in hardened mode.
#[derive(Debug, Default, Clone, Copy)]
struct Scratch {
    short: i16,
    long: i32,
    int64: i64,
    float: f32,
    double: f64,
    count: usize,
}

/// Translate one descriptor. `None` means the descriptor is unusable.
///
/// # Safety
///
/// A non-null `slot.ptr` must be valid for writes of the kind's type, and for
/// buffer kinds of `slot.cap` elements, for the lifetime `'a`.
unsafe fn output_slot<'a>(
    slot: &FrankenscanSlot,
    scratch: &'a mut Scratch,
    heal_nulls: bool,
) -> Option<OutputSlot<'a>> {
    if slot.ptr.is_null() {
        if !heal_nulls {
            return None;
        }
        runtime_policy::heal_null_destination();
        return match slot.kind {
            FRANKENSCAN_SLOT_CHAR => Some(OutputSlot::Char(&mut [])),
            FRANKENSCAN_SLOT_STR => Some(OutputSlot::Str(&mut [])),
            FRANKENSCAN_SLOT_WIDE => Some(OutputSlot::Wide(&mut [])),
            FRANKENSCAN_SLOT_SHORT | FRANKENSCAN_SLOT_USHORT => {
                Some(OutputSlot::Short(&mut scratch.short))
            }
            FRANKENSCAN_SLOT_LONG | FRANKENSCAN_SLOT_ULONG => {
                Some(OutputSlot::Long(&mut scratch.long))
            }
            FRANKENSCAN_SLOT_INT64 | FRANKENSCAN_SLOT_UINT64 => {
                Some(OutputSlot::Int64(&mut scratch.int64))
            }
            FRANKENSCAN_SLOT_FLOAT => Some(OutputSlot::Float(&mut scratch.float)),
            FRANKENSCAN_SLOT_DOUBLE => Some(OutputSlot::Double(&mut scratch.double)),
            FRANKENSCAN_SLOT_COUNT => Some(OutputSlot::Count(&mut scratch.count)),
            _ => None,
        };
    }

    if slot.cap > isize::MAX as usize {
        return None;
    }
    let ptr = slot.ptr;
    // SAFETY: caller contract above.
    let out = unsafe {
        match slot.kind {
            FRANKENSCAN_SLOT_CHAR => {
                OutputSlot::Char(std::slice::from_raw_parts_mut(ptr.cast::<u8>(), slot.cap))
            }
            FRANKENSCAN_SLOT_STR => {
                OutputSlot::Str(std::slice::from_raw_parts_mut(ptr.cast::<u8>(), slot.cap))
            }
            FRANKENSCAN_SLOT_WIDE => {
                OutputSlot::Wide(std::slice::from_raw_parts_mut(ptr.cast::<u16>(), slot.cap))
            }
            FRANKENSCAN_SLOT_SHORT => OutputSlot::Short(&mut *ptr.cast::<i16>()),
            FRANKENSCAN_SLOT_USHORT => OutputSlot::UShort(&mut *ptr.cast::<u16>()),
            FRANKENSCAN_SLOT_LONG => OutputSlot::Long(&mut *ptr.cast::<i32>()),
            FRANKENSCAN_SLOT_ULONG => OutputSlot::ULong(&mut *ptr.cast::<u32>()),
            FRANKENSCAN_SLOT_INT64 => OutputSlot::Int64(&mut *ptr.cast::<i64>()),
            FRANKENSCAN_SLOT_UINT64 => OutputSlot::UInt64(&mut *ptr.cast::<u64>()),
            FRANKENSCAN_SLOT_FLOAT => OutputSlot::Float(&mut *ptr.cast::<f32>()),
            FRANKENSCAN_SLOT_DOUBLE => OutputSlot::Double(&mut *ptr.cast::<f64>()),
            FRANKENSCAN_SLOT_COUNT => OutputSlot::Count(&mut *ptr.cast::<usize>()),
            _ => return None,
        }
    };
    Some(out)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

unsafe fn sscanf_impl(
    src: *const c_char,
    fmt: *const c_char,
    slots: *const FrankenscanSlot,
    nslots: libc::size_t,
    decimal_point: Option<DecimalPoint>,
) -> c_int {
    if src.is_null() || fmt.is_null() || (slots.is_null() && nslots > 0) {
        runtime_policy::reject_pointer();
        return FRANKENSCAN_EINVAL;
    }

    let config = runtime_policy::resolve_config(decimal_point);
    let heal_nulls = runtime_policy::mode().heals_enabled();

    // SAFETY: non-null, NUL-terminated per the C contract.
    let source = unsafe { c_str_bytes(src) };
    let format = unsafe { c_str_bytes(fmt) };
    let descriptors: &[FrankenscanSlot] = if nslots == 0 {
        &[]
    } else {
        // SAFETY: non-null and `nslots` long per the C contract.
        unsafe { std::slice::from_raw_parts(slots, nslots) }
    };

    let mut scratch = vec![Scratch::default(); descriptors.len()];
    let mut outputs = Vec::with_capacity(descriptors.len());
    for (desc, scratch) in descriptors.iter().zip(scratch.iter_mut()) {
        // SAFETY: descriptor pointers are valid per the C contract.
        match unsafe { output_slot(desc, scratch, heal_nulls) } {
            Some(out) => outputs.push(out),
            None => {
                runtime_policy::reject_pointer();
                return FRANKENSCAN_EINVAL;
            }
        }
    }

    let outcome = scanf::scan_detailed(source, format, &mut outputs, &config);
    runtime_policy::observe(&outcome);
    match outcome {
        Ok(report) => c_int::try_from(report.assignments).unwrap_or(c_int::MAX),
        Err(ScanError::Eof) => FRANKENSCAN_EOF,
        Err(_) => FRANKENSCAN_EINVAL,
    }
}

abi_fn! {
    /// Scan the NUL-terminated `src` according to `fmt`, storing into
    /// `slots[0..nslots]`. The decimal point comes from
    /// `FRANKENSCAN_DECIMAL_POINT` (default `"."`).
    ///
    /// Returns the number of assignments, `FRANKENSCAN_EOF`, or
    /// `FRANKENSCAN_EINVAL`.
    fn frankenscan_sscanf(
        src: *const c_char,
        fmt: *const c_char,
        slots: *const FrankenscanSlot,
        nslots: libc::size_t,
    ) -> c_int {
        sscanf_impl(src, fmt, slots, nslots, None)
    }
}

abi_fn! {
    /// Like `frankenscan_sscanf`, with an explicit decimal-point string.
    /// A null `decimal_point` means `"."`; an unusable one is
    /// `FRANKENSCAN_EINVAL`.
    fn frankenscan_sscanf_l(
        src: *const c_char,
        fmt: *const c_char,
        slots: *const FrankenscanSlot,
        nslots: libc::size_t,
        decimal_point: *const c_char,
    ) -> c_int {
        let dp = if decimal_point.is_null() {
            DecimalPoint::DOT
        } else {
            match DecimalPoint::from_bytes(c_str_bytes(decimal_point)) {
                Some(dp) => dp,
                None => {
                    runtime_policy::reject_pointer();
                    return FRANKENSCAN_EINVAL;
                }
            }
        };
        sscanf_impl(src, fmt, slots, nslots, Some(dp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_is_rejected() {
        let mut scratch = Scratch::default();
        let mut x = 0i32;
        let slot = FrankenscanSlot {
            kind: 99,
            ptr: (&mut x as *mut i32).cast(),
            cap: 0,
        };
        assert!(unsafe { output_slot(&slot, &mut scratch, false) }.is_none());
    }

    #[test]
    fn null_destination_only_heals_when_enabled() {
        let mut scratch = Scratch::default();
        let slot = FrankenscanSlot {
            kind: FRANKENSCAN_SLOT_LONG,
            ptr: std::ptr::null_mut(),
            cap: 0,
        };
        assert!(unsafe { output_slot(&slot, &mut scratch, false) }.is_none());
        let healed = unsafe { output_slot(&slot, &mut scratch, true) };
        assert!(matches!(healed, Some(OutputSlot::Long(_))));
    }
}
