//! Error types for formatters and the formatter registry.

use thiserror::Error;

use crate::formatter::FormatterId;

/// Errors raised by a formatter while producing text.
///
/// These never escape the resolver: a failing formatter is logged and its
/// contribution is dropped.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The data was not of a kind this formatter understands.
    #[error("Unsupported data: expected {expected}, got {actual}")]
    UnsupportedData {
        /// What the formatter expected.
        expected: &'static str,
        /// The type name of what it got.
        actual: String,
    },

    /// Byte data was not valid text.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// The data decoded but its structure was wrong.
    #[error("Malformed data: {0}")]
    Malformed(String),

    /// The formatter was asked for a name it does not handle.
    #[error("Name not handled: {0}")]
    NotHandled(String),
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::Malformed(err.to_string())
    }
}

/// Errors related to formatter registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A formatter with this ID is already registered.
    #[error("Formatter already registered: {0}")]
    AlreadyExists(FormatterId),

    /// The formatter failed validation.
    #[error("Invalid formatter {id}: {reason}")]
    InvalidFormatter {
        /// The formatter ID.
        id: FormatterId,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for formatter output.
pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
