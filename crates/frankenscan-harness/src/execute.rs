//! Executes fixture inputs against the scanning engine.
//!
//! Slots are described by short specs (`long`, `str:16`, `wide:8`, ...),
//! backed by owned storage for the duration of one scan, and rendered to a
//! stable string that fixtures compare against.

use frankenscan_core::stdio::scanf::{
    OutputSlot, ScanError, ScanReport, ScansetTable, scan_detailed,
};
use frankenscan_membrane::config::{DecimalPoint, SafetyLevel, ScanConfig};

/// Capacity used for buffer slots written without `:N`.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Errors raised while interpreting fixture inputs.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("missing input field '{0}'")]
    MissingInput(&'static str),
    #[error("bad slot spec '{0}'")]
    BadSlotSpec(String),
    #[error("bad decimal point {0:?}")]
    BadDecimalPoint(String),
    #[error("unsupported mode '{0}', expected strict|hardened")]
    UnsupportedMode(String),
}

/// Parse a runner mode name.
pub fn parse_mode(mode: &str) -> Result<SafetyLevel, HarnessError> {
    match mode.to_ascii_lowercase().as_str() {
        "strict" => Ok(SafetyLevel::Strict),
        "hardened" => Ok(SafetyLevel::Hardened),
        _ => Err(HarnessError::UnsupportedMode(mode.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Owned slot storage
// ---------------------------------------------------------------------------

/// Owned backing storage for one [`OutputSlot`].
#[derive(Debug, Clone, PartialEq)]
pub enum SlotBuffer {
    Char(Vec<u8>),
    Str(Vec<u8>),
    Wide(Vec<u16>),
    Short(i16),
    UShort(u16),
    Long(i32),
    ULong(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Count(usize),
}

impl SlotBuffer {
    /// Parse one slot spec such as `long` or `str:16`.
    pub fn parse(spec: &str) -> Result<Self, HarnessError> {
        let spec = spec.trim();
        let (name, cap) = match spec.split_once(':') {
            Some((name, cap)) => {
                let cap = cap
                    .parse::<usize>()
                    .map_err(|_| HarnessError::BadSlotSpec(spec.to_string()))?;
                (name, Some(cap))
            }
            None => (spec, None),
        };
        let buffer_cap = cap.unwrap_or(DEFAULT_BUFFER_CAPACITY);
        let slot = match name {
            "char" => Self::Char(vec![0; buffer_cap]),
            "str" => Self::Str(vec![0; buffer_cap]),
            "wide" => Self::Wide(vec![0; buffer_cap]),
            _ if cap.is_some() => return Err(HarnessError::BadSlotSpec(spec.to_string())),
            "short" => Self::Short(0),
            "ushort" => Self::UShort(0),
            "long" => Self::Long(0),
            "ulong" => Self::ULong(0),
            "int64" => Self::Int64(0),
            "uint64" => Self::UInt64(0),
            "float" => Self::Float(0.0),
            "double" => Self::Double(0.0),
            "count" => Self::Count(0),
            _ => return Err(HarnessError::BadSlotSpec(spec.to_string())),
        };
        Ok(slot)
    }

    /// Parse a comma-separated list of specs. Empty input means no slots.
    pub fn parse_list(specs: &str) -> Result<Vec<Self>, HarnessError> {
        specs
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Borrow as an engine slot.
    pub fn as_output(&mut self) -> OutputSlot<'_> {
        match self {
            Self::Char(buf) => OutputSlot::Char(buf),
            Self::Str(buf) => OutputSlot::Str(buf),
            Self::Wide(buf) => OutputSlot::Wide(buf),
            Self::Short(v) => OutputSlot::Short(v),
            Self::UShort(v) => OutputSlot::UShort(v),
            Self::Long(v) => OutputSlot::Long(v),
            Self::ULong(v) => OutputSlot::ULong(v),
            Self::Int64(v) => OutputSlot::Int64(v),
            Self::UInt64(v) => OutputSlot::UInt64(v),
            Self::Float(v) => OutputSlot::Float(v),
            Self::Double(v) => OutputSlot::Double(v),
            Self::Count(v) => OutputSlot::Count(v),
        }
    }

    /// Stable rendering of the current contents.
    ///
    /// `str` and `wide` stop at the first NUL; `char` shows every element.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Char(buf) => format!("{:?}", String::from_utf8_lossy(buf)),
            Self::Str(buf) => {
                let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                format!("{:?}", String::from_utf8_lossy(&buf[..end]))
            }
            Self::Wide(buf) => {
                let end = buf.iter().position(|&u| u == 0).unwrap_or(buf.len());
                format!("L{:?}", String::from_utf16_lossy(&buf[..end]))
            }
            Self::Short(v) => v.to_string(),
            Self::UShort(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::ULong(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::UInt64(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Count(v) => v.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scan execution
// ---------------------------------------------------------------------------

/// A scan request decoded from fixture inputs or the CLI.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub source: Vec<u8>,
    pub format: Vec<u8>,
    pub slots: Vec<SlotBuffer>,
    pub decimal_point: DecimalPoint,
}

impl ScanRequest {
    /// Decode `{"source", "format", "slots": [..], "decimal_point"?}`.
    pub fn from_inputs(inputs: &serde_json::Value) -> Result<Self, HarnessError> {
        let source = inputs["source"]
            .as_str()
            .ok_or(HarnessError::MissingInput("source"))?;
        let format = inputs["format"]
            .as_str()
            .ok_or(HarnessError::MissingInput("format"))?;
        let slots = match &inputs["slots"] {
            serde_json::Value::Null => Vec::new(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| HarnessError::BadSlotSpec(item.to_string()))
                        .and_then(SlotBuffer::parse)
                })
                .collect::<Result<_, _>>()?,
            serde_json::Value::String(list) => SlotBuffer::parse_list(list)?,
            other => return Err(HarnessError::BadSlotSpec(other.to_string())),
        };
        let decimal_point = match inputs["decimal_point"].as_str() {
            Some(dp) => {
                DecimalPoint::new(dp).ok_or_else(|| HarnessError::BadDecimalPoint(dp.to_string()))?
            }
            None => DecimalPoint::DOT,
        };
        Ok(Self {
            source: source.as_bytes().to_vec(),
            format: format.as_bytes().to_vec(),
            slots,
            decimal_point,
        })
    }

    /// Run the scan in `mode`, leaving results in `self.slots`.
    pub fn run(&mut self, mode: SafetyLevel) -> Result<ScanReport, ScanError> {
        let config = ScanConfig::new()
            .with_decimal_point(self.decimal_point)
            .with_mode(mode);
        let mut outputs: Vec<OutputSlot<'_>> =
            self.slots.iter_mut().map(SlotBuffer::as_output).collect();
        scan_detailed(&self.source, &self.format, &mut outputs, &config)
    }

    /// Render an outcome together with the slot contents.
    #[must_use]
    pub fn render(&self, outcome: &Result<ScanReport, ScanError>) -> String {
        match outcome {
            Ok(report) => {
                let values: Vec<String> = self.slots.iter().map(SlotBuffer::render).collect();
                format!(
                    "count={} consumed={} heals={} values=[{}]",
                    report.assignments,
                    report.chars_consumed,
                    report.heals,
                    values.join(", ")
                )
            }
            Err(ScanError::Eof) => String::from("EOF"),
            Err(err) => format!("error:{}", err.name()),
        }
    }
}

/// Render scanset membership of every input byte as `0`/`1`.
fn render_scanset(inputs: &serde_json::Value) -> Result<String, HarnessError> {
    let set = inputs["set"]
        .as_str()
        .ok_or(HarnessError::MissingInput("set"))?;
    let bytes = inputs["bytes"]
        .as_str()
        .ok_or(HarnessError::MissingInput("bytes"))?;
    Ok(match ScansetTable::parse(set.as_bytes()) {
        Ok((table, used)) => {
            let members: String = bytes
                .bytes()
                .map(|b| if table.contains(b) { '1' } else { '0' })
                .collect();
            format!("members={members} used={used} reject={}", table.is_reject())
        }
        Err(ScanError::MalformedFormat { offset }) => format!("error:malformed_format@{offset}"),
        Err(err) => format!("error:{}", err.name()),
    })
}

/// Execute one fixture case and render its output.
pub fn execute_fixture_case(
    function: &str,
    inputs: &serde_json::Value,
    mode: SafetyLevel,
) -> Result<String, HarnessError> {
    match function {
        "sscanf" => {
            let mut request = ScanRequest::from_inputs(inputs)?;
            let outcome = request.run(mode);
            Ok(request.render(&outcome))
        }
        "scanset" => render_scanset(inputs),
        other => Err(HarnessError::UnknownFunction(other.to_string())),
    }
}
