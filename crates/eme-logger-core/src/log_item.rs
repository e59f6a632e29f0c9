//! Flattened, transport-safe log items.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::value::{Array, Object, Value, number_to_string};

/// A flattened record: a title plus parallel `names` / `values` lists.
///
/// `names[i]` labels `values[i]`; both lists always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogItem {
    /// Display title.
    pub title: String,
    /// Field names, in declaration order.
    pub names: Vec<String>,
    /// Field values, aligned with `names`.
    pub values: Vec<LogValue>,
}

/// A single value inside a [`LogItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    /// Nested item.
    Item(LogItem),
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    String(String),
    /// Null.
    Null,
    /// Undefined. Serialized as `null`.
    Undefined,
}

impl LogItem {
    /// Create an item with no fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            names: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a named value.
    pub fn push(&mut self, name: impl Into<String>, value: LogValue) {
        self.names.push(name.into());
        self.values.push(value);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the item has no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&LogValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    /// Iterate over `(name, value)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Whether `names` and `values` line up, recursively.
    pub fn is_well_formed(&self) -> bool {
        self.names.len() == self.values.len()
            && self.values.iter().all(|v| match v {
                LogValue::Item(item) => item.is_well_formed(),
                _ => true,
            })
    }

    /// Format as an indented, human-readable tree.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.title);
        output.push('\n');
        self.write_fields(&mut output, 1);
        output
    }

    fn write_fields(&self, output: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        for (name, value) in self.fields() {
            match value {
                LogValue::Item(item) => {
                    let _ = writeln!(output, "{}{}: {}", indent, name, item.title);
                    item.write_fields(output, depth + 1);
                }
                other => {
                    let _ = writeln!(output, "{}{}: {}", indent, name, other);
                }
            }
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Format as pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl LogValue {
    /// Convert a primitive host value. Structured values are not primitives
    /// and map to `Undefined`; the flattener never passes them here.
    pub fn from_primitive(value: &Value) -> Self {
        match value {
            Value::Null => LogValue::Null,
            Value::Bool(b) => LogValue::Bool(*b),
            Value::Number(n) => LogValue::Number(*n),
            Value::String(s) => LogValue::String(s.clone()),
            _ => LogValue::Undefined,
        }
    }

    /// Whether this is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, LogValue::Undefined)
    }

    /// Borrow as a nested item.
    pub fn as_item(&self) -> Option<&LogItem> {
        match self {
            LogValue::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LogValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogValue::Item(item) => write!(f, "{}", item.title),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            LogValue::String(s) => write!(f, "{:?}", s),
            LogValue::Null => write!(f, "null"),
            LogValue::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<LogItem> for LogValue {
    fn from(item: LogItem) -> Self {
        LogValue::Item(item)
    }
}

/// A log item viewed as a plain host object with `title`, `names` and
/// `values` fields, so it can be passed back through the flattener.
impl From<&LogItem> for Value {
    fn from(item: &LogItem) -> Self {
        let names: Array = item.names.iter().map(|n| Value::from(n.as_str())).collect();
        let values: Array = item.values.iter().map(Value::from).collect();
        Object::plain()
            .with("title", item.title.as_str())
            .with("names", names.into_ref())
            .with("values", values.into_ref())
            .into()
    }
}

impl From<&LogValue> for Value {
    fn from(value: &LogValue) -> Self {
        match value {
            LogValue::Item(item) => Value::from(item),
            LogValue::Bool(b) => Value::Bool(*b),
            LogValue::Number(n) => Value::Number(*n),
            LogValue::String(s) => Value::String(s.clone()),
            LogValue::Null => Value::Null,
            LogValue::Undefined => Value::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogItem {
        let mut inner = LogItem::new("Array");
        inner.push("0", "arg 2 array".into());

        let mut item = LogItem::new("TestMethodCall");
        item.push("Argument 1", "arg1".into());
        item.push("Argument 2", inner.into());
        item.push("formattedMessage", LogValue::Undefined);
        item
    }

    #[test]
    fn test_get_and_len() {
        let item = sample();
        assert_eq!(item.len(), 3);
        assert_eq!(item.get("Argument 1").and_then(LogValue::as_str), Some("arg1"));
        assert!(item.get("formattedMessage").unwrap().is_undefined());
        assert!(item.get("missing").is_none());
        assert!(item.is_well_formed());
    }

    #[test]
    fn test_to_text() {
        let text = sample().to_text();
        assert!(text.starts_with("TestMethodCall\n"));
        assert!(text.contains("  Argument 2: Array\n"));
        assert!(text.contains("    0: \"arg 2 array\"\n"));
        assert!(text.contains("  formattedMessage: undefined\n"));
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json();
        assert_eq!(json["title"], "TestMethodCall");
        assert_eq!(json["names"][1], "Argument 2");
        assert_eq!(json["values"][1]["title"], "Array");
        assert!(json["values"][2].is_null());
    }

    #[test]
    fn test_json_deserialize() {
        let item: LogItem = serde_json::from_str(
            r#"{"title":"PromiseResult","names":["status","ok"],"values":["resolved",true]}"#,
        )
        .unwrap();
        assert_eq!(item.values[0], LogValue::String("resolved".to_string()));
        assert_eq!(item.values[1], LogValue::Bool(true));
    }

    #[test]
    fn test_into_value() {
        let value = Value::from(&sample());
        let obj = value.as_object().unwrap();
        assert_eq!(obj.own_keys(), vec!["title", "names", "values"]);
        assert_eq!(value.get("title").as_str(), Some("TestMethodCall"));
    }
}
