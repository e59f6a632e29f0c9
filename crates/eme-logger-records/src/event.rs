//! Event records.

use tracing::debug;

use eme_logger_core::{Object, ObjectRef, Value};
use eme_logger_format::{FormatterRegistry, ResolverConfig, resolve_formatted_message_with};

use crate::record::{EVENT_CLASS, FORMATTED_MESSAGE, Record};
use crate::target::TargetInfo;
use crate::timestamp::render_timestamp;

/// Record of a dispatched EME event.
///
/// All attributes (`type`, `timeStamp`, `target`, `message`, `keySystem`)
/// are read through the event's prototype chain, so inherited attributes
/// are seen even though the flattened `event` field only shows the event's
/// own fields.
#[derive(Debug, Clone)]
pub struct EventRecord {
    title: String,
    event: ObjectRef,
    time_stamp: String,
    target: TargetInfo,
    formatted_message: Option<String>,
}

impl EventRecord {
    /// Build a record with the default resolver configuration.
    pub fn new(event: &ObjectRef, formatters: Option<&FormatterRegistry>) -> Self {
        Self::new_with(event, formatters, &ResolverConfig::default())
    }

    /// Build a record.
    pub fn new_with(
        event: &ObjectRef,
        formatters: Option<&FormatterRegistry>,
        config: &ResolverConfig,
    ) -> Self {
        let attr = |key: &str| event.get(key).unwrap_or_default();

        let event_type = attr("type").to_display_string();
        let key_system = attr("keySystem");

        debug!(event_type = %event_type, "Building event record");

        let formatted_message = resolve_formatted_message_with(
            formatters,
            &event_type,
            &attr("message"),
            key_system.as_str(),
            config,
        );

        Self {
            title: format!("{}Event", event_type),
            event: ObjectRef::clone(event),
            time_stamp: render_timestamp(&attr("timeStamp")),
            target: TargetInfo::from_target(&attr("target")),
            formatted_message,
        }
    }

    /// The original event.
    pub fn event(&self) -> &ObjectRef {
        &self.event
    }

    /// Rendered timestamp.
    pub fn time_stamp(&self) -> &str {
        &self.time_stamp
    }

    /// Extracted target.
    pub fn target(&self) -> &TargetInfo {
        &self.target
    }

    /// Formatter output, if any.
    pub fn formatted_message(&self) -> Option<&str> {
        self.formatted_message.as_deref()
    }
}

impl Record for EventRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_value(&self) -> Value {
        Object::new(EVENT_CLASS)
            .with("title", self.title.as_str())
            .with("event", ObjectRef::clone(&self.event))
            .with("timeStamp", self.time_stamp.as_str())
            .with("target", self.target.to_value())
            .with(FORMATTED_MESSAGE, self.formatted_message.clone())
            .into()
    }
}
