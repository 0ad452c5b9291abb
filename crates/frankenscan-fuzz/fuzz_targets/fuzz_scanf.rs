#![no_main]
use libfuzzer_sys::fuzz_target;

use frankenscan_core::stdio::scanf::{OutputSlot, ScanError, scan_detailed};
use frankenscan_membrane::config::{SafetyLevel, ScanConfig};

// Input layout: [mode] [8 slot kinds] format NUL source.
fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }
    let mode = if data[0] & 1 == 0 {
        SafetyLevel::Strict
    } else {
        SafetyLevel::Hardened
    };
    let kinds = &data[1..9];
    let rest = &data[9..];
    let (format, source) = match rest.iter().position(|&b| b == 0) {
        Some(i) => (&rest[..i], &rest[i + 1..]),
        None => (rest, &[][..]),
    };

    let mut chars = [[0u8; 8]; 8];
    let mut wides = [[0u16; 8]; 8];
    let mut longs = [0i32; 8];
    let mut shorts = [0i16; 8];
    let mut int64s = [0i64; 8];
    let mut floats = [0f32; 8];
    let mut doubles = [0f64; 8];
    let mut counts = [0usize; 8];

    let mut chars = chars.iter_mut();
    let mut wides = wides.iter_mut();
    let mut longs = longs.iter_mut();
    let mut shorts = shorts.iter_mut();
    let mut int64s = int64s.iter_mut();
    let mut floats = floats.iter_mut();
    let mut doubles = doubles.iter_mut();
    let mut counts = counts.iter_mut();

    let mut slots: Vec<OutputSlot<'_>> = Vec::with_capacity(kinds.len());
    for &k in kinds {
        let slot = match k % 9 {
            0 => chars.next().map(|c| OutputSlot::Char(c)),
            1 => chars.next().map(|c| OutputSlot::Str(c)),
            2 => wides.next().map(|w| OutputSlot::Wide(w)),
            3 => shorts.next().map(OutputSlot::Short),
            4 => longs.next().map(OutputSlot::Long),
            5 => int64s.next().map(OutputSlot::Int64),
            6 => floats.next().map(OutputSlot::Float),
            7 => doubles.next().map(OutputSlot::Double),
            _ => counts.next().map(OutputSlot::Count),
        };
        slots.extend(slot);
    }

    let config = ScanConfig::new().with_mode(mode);
    let source_len = source.iter().position(|&b| b == 0).unwrap_or(source.len());
    match scan_detailed(source, format, &mut slots, &config) {
        Ok(report) => {
            assert!(report.chars_consumed <= source_len);
            assert!(report.assignments <= slots.len());
            if mode == SafetyLevel::Strict {
                assert_eq!(report.heals, 0);
            }
        }
        Err(ScanError::SlotOverflow { .. }) => assert_eq!(mode, SafetyLevel::Strict),
        Err(_) => {}
    }
});
