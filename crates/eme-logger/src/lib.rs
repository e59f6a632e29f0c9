//! # EME Logger
//!
//! EME Logger turns Encrypted Media Extensions activity (method calls,
//! dispatched events and promise settlements) into flat, transport-safe
//! `{title, names, values}` trees, optionally annotated with human-readable
//! text from formatter plugins.
//!
//! ## Quick Start
//!
//! ```
//! use eme_logger::prelude::*;
//!
//! let logger = EmeLogger::builder()
//!     .with_builtin_formatters()
//!     .build()?;
//!
//! let call = MethodCall::new("createSession")
//!     .arg("sessionType", "temporary")
//!     .with_key_system("org.w3.clearkey");
//!
//! let item = logger.log_method_call(&call)?;
//! assert_eq!(item.title, "createSession");
//! assert_eq!(
//!     item.names,
//!     vec!["sessionType", "returned", "target", "formattedMessage"]
//! );
//! # Ok::<(), eme_logger::LoggerError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Your Application                     │
//! ├─────────────────────────────────────────────────────────┤
//! │                   eme-logger (facade)                   │
//! │                  ┌──────────────────┐                   │
//! │                  │ EmeLogger Builder │                  │
//! │                  └────────┬─────────┘                   │
//! │                           │                             │
//! │  ┌────────────────────┬───┴──────────────┐              │
//! │  │ eme-logger-records │ eme-logger-format│              │
//! │  │ (records,          │ (formatters,     │              │
//! │  │  dispatch)         │  resolver)       │              │
//! │  └────────────────────┴──────────────────┘              │
//! ├─────────────────────────────────────────────────────────┤
//! │          eme-logger-core (values, flattening)           │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use eme_logger_core::{FlattenConfig, FlattenError, LogItem, ObjectRef, Value};
use eme_logger_format::{
    BoxedFormatter, ClearKeyFormatter, Formatter, FormatterRegistry, HexDumpFormatter,
    RegistryError, ResolverConfig, SharedFormatter,
};
use eme_logger_records::{
    EventRecord, LogDispatcher, LogSubscriber, MethodCall, MethodCallRecord, PromiseResultRecord,
    PromiseStatus, Record,
};

// Re-export from sub-crates
pub use eme_logger_core;
pub use eme_logger_format;
pub use eme_logger_records;

/// Where a logger gets its formatters from.
#[derive(Debug, Clone)]
enum FormatterSource {
    /// No formatting; every `formattedMessage` is undefined.
    Disabled,
    /// A registry owned by (or shared with) this logger.
    Registry(Arc<FormatterRegistry>),
    /// The process-wide registry.
    Global,
}

/// Main entry point for the EME logger.
pub struct EmeLogger {
    flatten_config: FlattenConfig,
    resolver_config: ResolverConfig,
    formatters: FormatterSource,
    dispatcher: Arc<LogDispatcher>,
}

impl EmeLogger {
    /// Create a new logger builder.
    pub fn builder() -> EmeLoggerBuilder {
        EmeLoggerBuilder::new()
    }

    /// Create a logger with default configuration and no formatters.
    pub fn with_defaults() -> Result<EmeLogger, LoggerError> {
        EmeLoggerBuilder::new().build()
    }

    /// Formatter registry in use, if formatting is enabled.
    pub fn registry(&self) -> Option<&FormatterRegistry> {
        match &self.formatters {
            FormatterSource::Disabled => None,
            FormatterSource::Registry(registry) => Some(registry.as_ref()),
            FormatterSource::Global => Some(FormatterRegistry::global()),
        }
    }

    /// Flattening configuration.
    pub fn flatten_config(&self) -> &FlattenConfig {
        &self.flatten_config
    }

    /// Resolver configuration.
    pub fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver_config
    }

    /// Dispatcher delivering items to subscribers.
    pub fn dispatcher(&self) -> &Arc<LogDispatcher> {
        &self.dispatcher
    }

    /// Log a method call.
    pub fn log_method_call(&self, call: &MethodCall) -> Result<LogItem, LoggerError> {
        let record = MethodCallRecord::new_with(call, self.registry(), &self.resolver_config);
        self.log_record(&record)
    }

    /// Log a dispatched event.
    pub fn log_event(&self, event: &ObjectRef) -> Result<LogItem, LoggerError> {
        let record = EventRecord::new_with(event, self.registry(), &self.resolver_config);
        self.log_record(&record)
    }

    /// Log a settled promise.
    pub fn log_promise_result(
        &self,
        title: impl Into<String>,
        status: impl Into<PromiseStatus>,
        result: impl Into<Value>,
    ) -> Result<LogItem, LoggerError> {
        self.log_record(&PromiseResultRecord::new(title, status, result))
    }

    /// Flatten any record and deliver it to subscribers.
    pub fn log_record(&self, record: &dyn Record) -> Result<LogItem, LoggerError> {
        let item = match record.flatten_with(&self.flatten_config) {
            Ok(item) => item,
            Err(e) => {
                warn!(title = %record.title(), error = %e, "Failed to flatten record");
                return Err(e.into());
            }
        };

        debug!(title = %item.title, fields = item.len(), "Logged record");
        self.dispatcher.emit(&item);
        Ok(item)
    }
}

impl std::fmt::Debug for EmeLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmeLogger")
            .field("flatten_config", &self.flatten_config)
            .field("resolver_config", &self.resolver_config)
            .field("formatters", &self.formatters)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Builder for configuring an [`EmeLogger`].
pub struct EmeLoggerBuilder {
    flatten_config: FlattenConfig,
    resolver_config: ResolverConfig,
    registry: Option<Arc<FormatterRegistry>>,
    use_global: bool,
    disabled: bool,
    formatters: Vec<BoxedFormatter>,
    subscribers: Vec<Arc<dyn LogSubscriber>>,
}

impl EmeLoggerBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            flatten_config: FlattenConfig::default(),
            resolver_config: ResolverConfig::default(),
            registry: None,
            use_global: false,
            disabled: false,
            formatters: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    // Flattening

    /// Set the flattening configuration.
    pub fn with_flatten_config(mut self, config: FlattenConfig) -> Self {
        self.flatten_config = config;
        self
    }

    /// Limit the nesting depth of flattened items.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.flatten_config.max_depth = Some(depth);
        self
    }

    // Formatting

    /// Set the resolver configuration.
    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    /// Add a formatter.
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatters.push(Box::new(formatter));
        self
    }

    /// Add the Clear Key and hex dump formatters, in that order.
    pub fn with_builtin_formatters(self) -> Self {
        self.with_formatter(ClearKeyFormatter::new())
            .with_formatter(HexDumpFormatter::new())
    }

    /// Use an existing registry. Formatters added with
    /// [`with_formatter`](Self::with_formatter) are registered into it when
    /// the logger is built, all or none: an ID that is already taken fails
    /// the build and leaves the registry untouched.
    pub fn with_registry(mut self, registry: Arc<FormatterRegistry>) -> Self {
        self.registry = Some(registry);
        self.use_global = false;
        self
    }

    /// Use the process-wide registry.
    ///
    /// Formatters whose IDs are already registered there are skipped, so
    /// any number of loggers can be built against it with the same setup.
    pub fn with_global_registry(mut self) -> Self {
        self.use_global = true;
        self.registry = None;
        self
    }

    /// Disable formatting entirely.
    pub fn without_formatters(mut self) -> Self {
        self.disabled = true;
        self
    }

    // Observability

    /// Add a subscriber for logged items.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn LogSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Build the logger.
    pub fn build(self) -> Result<EmeLogger, LoggerError> {
        let formatters = if self.disabled {
            FormatterSource::Disabled
        } else if self.use_global {
            let pending = self.formatters.into_iter().map(SharedFormatter::from).collect();
            FormatterRegistry::global().register_missing(pending)?;
            FormatterSource::Global
        } else {
            let registry = self.registry.unwrap_or_default();
            let pending = self.formatters.into_iter().map(SharedFormatter::from).collect();
            registry.register_all(pending)?;
            FormatterSource::Registry(registry)
        };

        let dispatcher = LogDispatcher::new();
        for subscriber in self.subscribers {
            dispatcher.subscribe(subscriber);
        }

        Ok(EmeLogger {
            flatten_config: self.flatten_config,
            resolver_config: self.resolver_config,
            formatters,
            dispatcher: Arc::new(dispatcher),
        })
    }
}

impl Default for EmeLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from the EME logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A record could not be flattened.
    #[error("Flatten error: {0}")]
    Flatten(#[from] FlattenError),

    /// A formatter could not be registered.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Main types
    pub use crate::{EmeLogger, EmeLoggerBuilder, LoggerError};

    // Core types
    pub use eme_logger_core::{
        Array, FlattenConfig, FlattenError, LogItem, LogValue, Object, ObjectRef, Value, flatten,
        flatten_with,
    };

    // Formatter types
    pub use eme_logger_format::{
        ClearKeyFormatter, FormatError, FormatResult, Formatter, FormatterId, FormatterRegistry,
        HexDumpFormatter, ResolverConfig, SeparatorPolicy,
    };

    // Record types
    pub use eme_logger_records::{
        CollectingSubscriber, EventRecord, LogDispatcher, LogSubscriber, MethodCall,
        MethodCallRecord, PromiseResultRecord, PromiseStatus, Record, TargetInfo,
        TracingSubscriber,
    };

    // Common std types
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use eme_logger_core::Object;
    use eme_logger_format::FormatterId;
    use eme_logger_records::CollectingSubscriber;

    #[test]
    fn test_builder_defaults() {
        let logger = EmeLogger::with_defaults().unwrap();

        assert!(logger.flatten_config().detect_cycles);
        assert!(logger.registry().unwrap().is_empty());
        assert_eq!(logger.dispatcher().subscriber_count(), 0);
    }

    #[test]
    fn test_builtin_formatters_registered() {
        let logger = EmeLogger::builder().with_builtin_formatters().build().unwrap();
        let registry = logger.registry().unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.formatters_for("message").len(), 2);
    }

    #[test]
    fn test_duplicate_formatter_fails() {
        let result = EmeLogger::builder()
            .with_formatter(HexDumpFormatter::new())
            .with_formatter(HexDumpFormatter::new())
            .build();

        assert!(matches!(
            result,
            Err(LoggerError::Registry(RegistryError::AlreadyExists(_)))
        ));
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(FormatterRegistry::new());
        let logger = EmeLogger::builder()
            .with_registry(Arc::clone(&registry))
            .with_formatter(HexDumpFormatter::new())
            .build()
            .unwrap();

        assert!(registry.handles("update"));
        assert!(logger.registry().unwrap().handles("update"));
    }

    #[test]
    fn test_failed_build_leaves_shared_registry_untouched() {
        let registry = Arc::new(FormatterRegistry::new());
        registry.register(HexDumpFormatter::new()).unwrap();

        let result = EmeLogger::builder()
            .with_registry(Arc::clone(&registry))
            .with_builtin_formatters()
            .build();

        assert!(matches!(
            result,
            Err(LoggerError::Registry(RegistryError::AlreadyExists(_)))
        ));
        assert_eq!(registry.ids(), vec![FormatterId::new("hexdump")]);
        assert!(!registry.handles("message"));
    }

    #[test]
    fn test_global_registry_loggers_share_setup() {
        let first = EmeLogger::builder()
            .with_global_registry()
            .with_builtin_formatters()
            .build()
            .unwrap();
        let second = EmeLogger::builder()
            .with_global_registry()
            .with_builtin_formatters()
            .build()
            .unwrap();

        let global = FormatterRegistry::global();
        assert!(std::ptr::eq(first.registry().unwrap(), global));
        assert!(std::ptr::eq(second.registry().unwrap(), global));
        assert_eq!(global.formatters_for("update").len(), 2);
    }

    #[test]
    fn test_without_formatters() {
        let logger = EmeLogger::builder()
            .with_builtin_formatters()
            .without_formatters()
            .build()
            .unwrap();
        assert!(logger.registry().is_none());

        let call = MethodCall::new("update")
            .with_data(Value::array_buffer(vec![1u8]))
            .with_key_system("org.w3.clearkey");
        let item = logger.log_method_call(&call).unwrap();
        assert!(item.get("formattedMessage").unwrap().is_undefined());
    }

    #[test]
    fn test_items_reach_subscribers() {
        let collector = Arc::new(CollectingSubscriber::new(10));
        let logger = EmeLogger::builder()
            .with_subscriber(Arc::clone(&collector) as Arc<dyn LogSubscriber>)
            .build()
            .unwrap();

        logger
            .log_promise_result("close", PromiseStatus::Resolved, Value::Undefined)
            .unwrap();
        logger.log_event(&Object::new("Event").into_ref()).unwrap();

        let titles: Vec<String> = collector.items().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["close", "undefinedEvent"]);
    }

    #[test]
    fn test_flatten_failure_is_not_emitted() {
        let collector = Arc::new(CollectingSubscriber::new(10));
        let logger = EmeLogger::builder()
            .with_max_depth(1)
            .with_subscriber(Arc::clone(&collector) as Arc<dyn LogSubscriber>)
            .build()
            .unwrap();

        let nested = Object::plain().with("inner", Object::plain().with("leaf", 1));
        let err = logger
            .log_promise_result("load", "resolved", nested)
            .unwrap_err();

        assert!(matches!(
            err,
            LoggerError::Flatten(FlattenError::DepthExceeded { .. })
        ));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _logger = EmeLogger::builder().build().unwrap();
        let _ = TargetInfo::default();
    }
}
