//! Method call records.

use tracing::debug;

use eme_logger_core::{Object, Value};
use eme_logger_format::{FormatterRegistry, ResolverConfig, resolve_formatted_message_with};

use crate::record::{FORMATTED_MESSAGE, METHOD_CALL_CLASS, Record};
use crate::target::TargetInfo;

/// An observed call to an EME method.
///
/// # Example
///
/// ```
/// use eme_logger_core::Value;
/// use eme_logger_records::{MethodCall, MethodCallRecord, Record};
///
/// let call = MethodCall::new("generateRequest")
///     .arg("initDataType", "cenc")
///     .arg("initData", Value::array_buffer(vec![0u8, 1]))
///     .with_key_system("org.w3.clearkey");
///
/// let item = MethodCallRecord::new(&call, None).flatten().unwrap();
/// assert_eq!(item.title, "generateRequest");
/// assert_eq!(item.names[0], "initDataType");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodCall {
    /// Method name.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Labels for the arguments, by position.
    pub labels: Vec<String>,
    /// Return value.
    pub result: Value,
    /// Object the method was called on.
    pub target: Value,
    /// Payload handed to formatters.
    pub data: Value,
    /// Key system in effect, if known.
    pub key_system: Option<String>,
}

impl MethodCall {
    /// Create a call with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a labeled argument.
    pub fn arg(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.labels.push(label.into());
        self.args.push(value.into());
        self
    }

    /// Replace the positional arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Replace the argument labels.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the return value.
    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = result.into();
        self
    }

    /// Set the call target.
    pub fn with_target(mut self, target: impl Into<Value>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the formatter payload.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the key system.
    pub fn with_key_system(mut self, key_system: impl Into<String>) -> Self {
        self.key_system = Some(key_system.into());
        self
    }
}

/// Record of a method call: labeled arguments, return value, target and
/// formatted message.
#[derive(Debug, Clone)]
pub struct MethodCallRecord {
    title: String,
    arguments: Vec<(String, Value)>,
    returned: Value,
    target: TargetInfo,
    formatted_message: Option<String>,
}

impl MethodCallRecord {
    /// Build a record with the default resolver configuration.
    pub fn new(call: &MethodCall, formatters: Option<&FormatterRegistry>) -> Self {
        Self::new_with(call, formatters, &ResolverConfig::default())
    }

    /// Build a record.
    ///
    /// Arguments without a label and labels without an argument are
    /// dropped. The formatted message is looked up under the method name.
    pub fn new_with(
        call: &MethodCall,
        formatters: Option<&FormatterRegistry>,
        config: &ResolverConfig,
    ) -> Self {
        if call.args.len() != call.labels.len() {
            debug!(
                method = %call.name,
                args = call.args.len(),
                labels = call.labels.len(),
                "Argument and label counts differ"
            );
        }

        let arguments = call
            .labels
            .iter()
            .zip(&call.args)
            .map(|(label, arg)| (label.clone(), arg.clone()))
            .collect();

        let formatted_message = resolve_formatted_message_with(
            formatters,
            &call.name,
            &call.data,
            call.key_system.as_deref(),
            config,
        );

        Self {
            title: call.name.clone(),
            arguments,
            returned: call.result.clone(),
            target: TargetInfo::from_target(&call.target),
            formatted_message,
        }
    }

    /// Labeled arguments.
    pub fn arguments(&self) -> &[(String, Value)] {
        &self.arguments
    }

    /// Return value.
    pub fn returned(&self) -> &Value {
        &self.returned
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

impl Record for MethodCallRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn to_value(&self) -> Value {
        let obj = Object::new(METHOD_CALL_CLASS);
        obj.set("title", self.title.as_str());
        for (label, arg) in &self.arguments {
            obj.set(label.as_str(), arg.clone());
        }
        obj.set("returned", self.returned.clone());
        obj.set("target", self.target.to_value());
        obj.set(FORMATTED_MESSAGE, self.formatted_message.clone());
        obj.into()
    }
}
