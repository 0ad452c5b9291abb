//! `<stdio.h>` formatted input.

pub mod scanf;

pub use scanf::{
    OutputSlot, ScanError, ScanReport, SlotKind, scan, scan_detailed, sscanf,
};
