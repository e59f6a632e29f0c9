//! Clear Key formatter.
//!
//! Clear Key exchanges JSON over the EME byte channels: the `message` event
//! carries a license request (`{"kids": [...], "type": "temporary"}`) and
//! `update` is called with a JSON Web Key set license.

use std::borrow::Cow;

use serde::Deserialize;

use eme_logger_core::Value;

use crate::error::{FormatError, FormatResult};
use crate::formatter::{Formatter, FormatterId, key_systems, standard_ids};

#[derive(Debug, Deserialize)]
struct LicenseRequest {
    #[serde(default)]
    kids: Vec<String>,
    #[serde(rename = "type")]
    session_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct License {
    #[serde(default)]
    keys: Vec<JsonWebKey>,
    #[serde(rename = "type")]
    session_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonWebKey {
    kid: Option<String>,
    kty: Option<String>,
}

/// Formatter for Clear Key license traffic.
///
/// # Example
///
/// ```
/// use eme_logger_core::Value;
/// use eme_logger_format::{Formatter, builtin::ClearKeyFormatter};
///
/// let formatter = ClearKeyFormatter::new();
/// let request = Value::array_buffer(br#"{"kids":["abc"],"type":"temporary"}"#.to_vec());
///
/// let text = formatter.format("message", &request).unwrap();
/// assert!(text.contains("kid: abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClearKeyFormatter;

impl ClearKeyFormatter {
    /// Create a new Clear Key formatter.
    pub fn new() -> Self {
        Self
    }

    fn json_text(data: &Value) -> FormatResult<Cow<'_, str>> {
        match data {
            Value::String(s) => Ok(Cow::Borrowed(s)),
            other => match other.as_bytes() {
                Some(bytes) => Ok(Cow::Borrowed(std::str::from_utf8(bytes)?)),
                None => Err(FormatError::UnsupportedData {
                    expected: "JSON bytes",
                    actual: other.type_name().into_owned(),
                }),
            },
        }
    }

    fn format_request(text: &str) -> FormatResult<String> {
        let request: LicenseRequest = serde_json::from_str(text)?;
        let mut lines = vec![format!(
            "Clear Key license request ({})",
            request.session_type.as_deref().unwrap_or("unknown")
        )];
        lines.extend(request.kids.iter().map(|kid| format!("  kid: {}", kid)));
        Ok(lines.join("\n"))
    }

    fn format_license(text: &str) -> FormatResult<String> {
        let license: License = serde_json::from_str(text)?;
        let mut lines = vec![format!(
            "Clear Key license ({})",
            license.session_type.as_deref().unwrap_or("unknown")
        )];
        // Key material itself is never printed.
        lines.extend(license.keys.iter().map(|key| {
            format!(
                "  key: kid={} kty={}",
                key.kid.as_deref().unwrap_or("?"),
                key.kty.as_deref().unwrap_or("?")
            )
        }));
        Ok(lines.join("\n"))
    }
}

impl Formatter for ClearKeyFormatter {
    fn id(&self) -> FormatterId {
        standard_ids::CLEARKEY.clone()
    }

    fn name(&self) -> &str {
        "Clear Key"
    }

    fn handled_names(&self) -> Vec<Cow<'static, str>> {
        vec![Cow::Borrowed("message"), Cow::Borrowed("update")]
    }

    fn is_key_system_supported(&self, key_system: &str) -> bool {
        key_system == key_systems::CLEARKEY
    }

    fn format(&self, name: &str, data: &Value) -> FormatResult<String> {
        let text = Self::json_text(data)?;
        match name {
            "message" => Self::format_request(&text),
            "update" => Self::format_license(&text),
            other => Err(FormatError::NotHandled(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_license_request() {
        let data = Value::array_buffer(
            br#"{"kids":["LwVHf8JLtPrv2GUXFW2v_A","0DdtU9od-Bh5L3xbv0Xf_A"],"type":"temporary"}"#
                .to_vec(),
        );
        let text = ClearKeyFormatter::new().format("message", &data).unwrap();

        assert_eq!(
            text,
            "Clear Key license request (temporary)\n  kid: LwVHf8JLtPrv2GUXFW2v_A\n  kid: 0DdtU9od-Bh5L3xbv0Xf_A"
        );
    }

    #[test]
    fn test_format_license_hides_key() {
        let data = Value::uint8_array(
            br#"{"keys":[{"kty":"oct","k":"secret","kid":"LwVHf8JLtPrv2GUXFW2v_A"}],"type":"persistent-license"}"#
                .to_vec(),
        );
        let text = ClearKeyFormatter::new().format("update", &data).unwrap();

        assert!(text.starts_with("Clear Key license (persistent-license)"));
        assert!(text.contains("kid=LwVHf8JLtPrv2GUXFW2v_A kty=oct"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_format_string_data() {
        let data = Value::from(r#"{"kids":[]}"#);
        let text = ClearKeyFormatter::new().format("message", &data).unwrap();
        assert_eq!(text, "Clear Key license request (unknown)");
    }

    #[test]
    fn test_rejects_non_json() {
        let data = Value::array_buffer(vec![0x08, 0x01, 0x12]);
        let err = ClearKeyFormatter::new().format("message", &data).unwrap_err();
        assert!(matches!(err, FormatError::Malformed(_)));
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let data = Value::array_buffer(vec![0xff, 0xfe]);
        let err = ClearKeyFormatter::new().format("message", &data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidEncoding(_)));
    }

    #[test]
    fn test_rejects_non_bytes() {
        let err = ClearKeyFormatter::new()
            .format("message", &Value::Number(1.0))
            .unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedData { .. }));
    }

    #[test]
    fn test_key_system_support() {
        let formatter = ClearKeyFormatter::new();
        assert!(formatter.is_key_system_supported("org.w3.clearkey"));
        assert!(!formatter.is_key_system_supported("com.widevine.alpha"));
    }
}
