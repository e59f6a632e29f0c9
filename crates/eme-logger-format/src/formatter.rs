//! Core formatter trait and types.
//!
//! A formatter turns the raw data of an EME call or event (a license
//! request, a license, init data) into human-readable text. Formatters are
//! registered per event/call name and can restrict themselves to particular
//! key systems.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use eme_logger_core::Value;

use crate::error::{FormatResult, RegistryError, RegistryResult};

/// Unique identifier for a formatter.
///
/// # Example
///
/// ```
/// use eme_logger_format::FormatterId;
///
/// let clearkey = FormatterId::new("clearkey");
/// let hexdump = FormatterId::new("hexdump");
///
/// assert_ne!(clearkey, hexdump);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatterId(Cow<'static, str>);

impl FormatterId {
    /// Create a new formatter ID.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormatterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for FormatterId {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FormatterId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Core trait for formatter plugins.
///
/// # Implementing a Formatter
///
/// ```
/// use std::borrow::Cow;
///
/// use eme_logger_core::Value;
/// use eme_logger_format::{FormatResult, Formatter, FormatterId};
///
/// #[derive(Debug)]
/// struct SessionTypeFormatter;
///
/// impl Formatter for SessionTypeFormatter {
///     fn id(&self) -> FormatterId {
///         FormatterId::new("session_type")
///     }
///
///     fn name(&self) -> &str {
///         "Session Type"
///     }
///
///     fn handled_names(&self) -> Vec<Cow<'static, str>> {
///         vec![Cow::Borrowed("createSession")]
///     }
///
///     fn is_key_system_supported(&self, _key_system: &str) -> bool {
///         true
///     }
///
///     fn format(&self, _name: &str, data: &Value) -> FormatResult<String> {
///         Ok(format!("session type: {}", data.to_display_string()))
///     }
/// }
/// ```
pub trait Formatter: Send + Sync + fmt::Debug {
    /// Get the unique identifier for this formatter.
    fn id(&self) -> FormatterId;

    /// Get the human-readable name of this formatter.
    fn name(&self) -> &str;

    /// Event and call names this formatter produces text for
    /// (e.g. `message`, `generateRequest`).
    fn handled_names(&self) -> Vec<Cow<'static, str>>;

    /// Whether this formatter applies to the given key system.
    fn is_key_system_supported(&self, key_system: &str) -> bool;

    /// Produce text for the named event or call.
    fn format(&self, name: &str, data: &Value) -> FormatResult<String>;

    /// Validate that this formatter's configuration is usable.
    fn validate(&self) -> RegistryResult<()> {
        if self.handled_names().is_empty() {
            return Err(RegistryError::InvalidFormatter {
                id: self.id(),
                reason: "formatter handles no names".to_string(),
            });
        }
        Ok(())
    }
}

/// A boxed formatter trait object.
pub type BoxedFormatter = Box<dyn Formatter>;

/// A shared formatter reference.
pub type SharedFormatter = Arc<dyn Formatter>;

/// Formatter IDs for the built-in formatters.
pub mod standard_ids {
    use super::FormatterId;

    /// ClearKey license request/license formatter.
    pub const CLEARKEY: FormatterId = FormatterId(std::borrow::Cow::Borrowed("clearkey"));

    /// Hex dump formatter for raw byte payloads.
    pub const HEXDUMP: FormatterId = FormatterId(std::borrow::Cow::Borrowed("hexdump"));
}

/// Well-known key system identifiers.
pub mod key_systems {
    /// W3C Clear Key.
    pub const CLEARKEY: &str = "org.w3.clearkey";

    /// Google Widevine.
    pub const WIDEVINE: &str = "com.widevine.alpha";

    /// Microsoft PlayReady.
    pub const PLAYREADY: &str = "com.microsoft.playready";
}
