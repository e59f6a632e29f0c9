//! Hex dump formatter for raw byte payloads.

use std::borrow::Cow;
use std::fmt::Write as _;

use eme_logger_core::Value;

use crate::error::{FormatError, FormatResult};
use crate::formatter::{Formatter, FormatterId, standard_ids};

const BYTES_PER_LINE: usize = 16;

/// Renders byte payloads (license messages, init data, responses) as a hex
/// dump. Works for every key system.
///
/// # Example
///
/// ```
/// use eme_logger_core::Value;
/// use eme_logger_format::{Formatter, builtin::HexDumpFormatter};
///
/// let formatter = HexDumpFormatter::new();
/// let text = formatter
///     .format("generateRequest", &Value::array_buffer(vec![0xde_u8, 0xad]))
///     .unwrap();
/// assert_eq!(text, "0000: de ad");
/// ```
#[derive(Debug, Clone)]
pub struct HexDumpFormatter {
    names: Vec<Cow<'static, str>>,
    max_bytes: usize,
}

impl Default for HexDumpFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HexDumpFormatter {
    /// Create a formatter for `message`, `generateRequest` and `update`.
    pub fn new() -> Self {
        Self {
            names: vec![
                Cow::Borrowed("message"),
                Cow::Borrowed("generateRequest"),
                Cow::Borrowed("update"),
            ],
            max_bytes: 4096,
        }
    }

    /// Create a formatter for a custom set of names.
    pub fn for_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Set the maximum number of bytes dumped.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Get the maximum number of bytes dumped.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn dump(&self, bytes: &[u8]) -> String {
        let shown = &bytes[..bytes.len().min(self.max_bytes)];
        let mut output = String::new();

        for (line, chunk) in shown.chunks(BYTES_PER_LINE).enumerate() {
            if line > 0 {
                output.push('\n');
            }
            let _ = write!(output, "{:04x}:", line * BYTES_PER_LINE);
            for byte in chunk {
                let _ = write!(output, " {:02x}", byte);
            }
        }

        if bytes.len() > shown.len() {
            if !shown.is_empty() {
                output.push('\n');
            }
            let _ = write!(output, "... ({} more bytes)", bytes.len() - shown.len());
        }

        output
    }
}

impl Formatter for HexDumpFormatter {
    fn id(&self) -> FormatterId {
        standard_ids::HEXDUMP.clone()
    }

    fn name(&self) -> &str {
        "Hex Dump"
    }

    fn handled_names(&self) -> Vec<Cow<'static, str>> {
        self.names.clone()
    }

    fn is_key_system_supported(&self, _key_system: &str) -> bool {
        true
    }

    fn format(&self, _name: &str, data: &Value) -> FormatResult<String> {
        match data.as_bytes() {
            Some(bytes) => Ok(self.dump(bytes)),
            None => Err(FormatError::UnsupportedData {
                expected: "byte buffer",
                actual: data.type_name().into_owned(),
            }),
        }
    }
}
