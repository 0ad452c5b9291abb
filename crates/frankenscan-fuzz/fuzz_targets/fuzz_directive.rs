#![no_main]
use libfuzzer_sys::fuzz_target;

use frankenscan_core::stdio::scanf::{ScanError, ScansetTable, parse_directive};

fuzz_target!(|data: &[u8]| {
    match parse_directive(data) {
        Ok((directive, used)) => {
            assert!(used >= 1 && used <= data.len());
            assert_ne!(directive.width, Some(0));
        }
        Err(ScanError::MalformedFormat { offset }) => assert!(offset <= data.len()),
        Err(other) => panic!("parse_directive returned {other:?}"),
    }

    if let Ok((table, used)) = ScansetTable::parse(data) {
        assert!(used <= data.len());
        assert_eq!(data[used - 1], b']');
        if table.is_reject() {
            assert!(table.contains(0) || data[1..used - 1].contains(&0));
        }
    }
});
