//! Shared inputs for the FrankenScan benchmarks.

/// A named `(source, format)` workload.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub name: &'static str,
    pub source: &'static [u8],
    pub format: &'static [u8],
}

/// Workloads exercising each converter family once.
pub const WORKLOADS: &[Workload] = &[
    Workload {
        name: "decimal",
        source: b"  -123456789",
        format: b"%d",
    },
    Workload {
        name: "hex_detect",
        source: b"0x7fffffff",
        format: b"%i",
    },
    Workload {
        name: "double",
        source: b"-12345.6789e-3",
        format: b"%lf",
    },
    Workload {
        name: "string",
        source: b"frankenscan rest",
        format: b"%s",
    },
    Workload {
        name: "scanset",
        source: b"alpha-beta_gamma;tail",
        format: b"%[a-z_-]",
    },
    Workload {
        name: "literal_heavy",
        source: b"key=value;key=value;key=value",
        format: b"key=value;key=value;key=value",
    },
];

/// A log-line style source of `fields` integers separated by spaces, and a
/// matching `%d %d ...` format.
#[must_use]
pub fn integer_line(fields: usize) -> (Vec<u8>, Vec<u8>) {
    let source = (0..fields)
        .map(|i| (i * 7919).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let format = vec!["%d"; fields].join(" ");
    (source.into_bytes(), format.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_line_shapes() {
        let (source, format) = integer_line(3);
        assert_eq!(source, b"0 7919 15838");
        assert_eq!(format, b"%d %d %d");
    }
}
