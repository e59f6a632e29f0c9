//! The record abstraction shared by calls, events and promise results.

use eme_logger_core::{FlattenConfig, FlattenResult, LogItem, Value, flatten_with};

/// Class name of method call records.
pub const METHOD_CALL_CLASS: &str = "EmeMethodCall";

/// Class name of event records.
pub const EVENT_CLASS: &str = "EmeEvent";

/// Class name of promise result records.
pub const PROMISE_RESULT_CLASS: &str = "PromiseResult";

/// Field holding the human-readable formatter output.
pub const FORMATTED_MESSAGE: &str = "formattedMessage";

/// A loggable record.
///
/// Records are immutable once built. They become log output by converting
/// into a host object whose own fields are exactly the record's fields, in
/// declaration order, and flattening that object.
pub trait Record {
    /// Display title of the record.
    fn title(&self) -> &str;

    /// Convert the record into a host object.
    fn to_value(&self) -> Value;

    /// Flatten the record with the default configuration.
    fn flatten(&self) -> FlattenResult<LogItem> {
        self.flatten_with(&FlattenConfig::default())
    }

    /// Flatten the record with an explicit configuration.
    fn flatten_with(&self, config: &FlattenConfig) -> FlattenResult<LogItem> {
        flatten_with(&self.to_value(), config)
    }
}
