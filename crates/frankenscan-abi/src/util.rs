//! Shared internal utilities for ABI adapters.

use std::ffi::c_char;

/// Scan a C string with an optional hard bound.
///
/// Returns `(len, terminated)` where:
/// - `len` is the byte length before the first NUL or before the bound.
/// - `terminated` indicates whether a NUL byte was observed.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length (and bound when given).
pub unsafe fn scan_c_string(ptr: *const c_char, bound: Option<usize>) -> (usize, bool) {
    match bound {
        Some(limit) => {
            for i in 0..limit {
                if unsafe { *ptr.add(i) } == 0 {
                    return (i, true);
                }
            }
            (limit, false)
        }
        None => {
            let mut i = 0usize;
            while unsafe { *ptr.add(i) } != 0 {
                i += 1;
            }
            (i, true)
        }
    }
}

/// Borrow a NUL-terminated C string as bytes, without the terminator.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated string that outlives
/// the returned slice.
pub unsafe fn c_str_bytes<'a>(ptr: *const c_char) -> &'a [u8] {
    let (len, _) = unsafe { scan_c_string(ptr, None) };
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_scan_stops_at_limit() {
        let s = b"abcdef\0";
        let p = s.as_ptr().cast::<c_char>();
        assert_eq!(unsafe { scan_c_string(p, Some(3)) }, (3, false));
        assert_eq!(unsafe { scan_c_string(p, Some(16)) }, (6, true));
        assert_eq!(unsafe { scan_c_string(p, None) }, (6, true));
    }

    #[test]
    fn c_str_bytes_excludes_nul() {
        let s = b"%d %s\0";
        assert_eq!(unsafe { c_str_bytes(s.as_ptr().cast()) }, b"%d %s");
    }
}
