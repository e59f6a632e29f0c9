//! Recursive value-to-message flattening.
//!
//! [`flatten`] turns any host [`Value`] into a [`LogItem`] tree that can be
//! serialized and sent across a context boundary. Only a value's own fields
//! are walked; anything reachable solely through a prototype is ignored.
//!
//! For each own field:
//!
//! - the `title` key is skipped (it becomes the item title instead)
//! - callables are skipped
//! - structured values recurse; a raw `ArrayBuffer` is first wrapped in a
//!   `Uint8Array` view so its bytes show up
//! - primitives are copied as-is
//!
//! # Example
//!
//! ```
//! use eme_logger_core::{Object, Value, flatten};
//!
//! let value = Value::from(Object::plain().with("result", "Result Object"));
//! let item = flatten(&value).unwrap();
//!
//! assert_eq!(item.title, "Object");
//! assert_eq!(item.names, vec!["result"]);
//! ```

use tracing::trace;

use crate::config::FlattenConfig;
use crate::error::{FlattenError, FlattenResult};
use crate::log_item::{LogItem, LogValue};
use crate::value::Value;

/// Flatten a value with the default configuration.
pub fn flatten(value: &Value) -> FlattenResult<LogItem> {
    flatten_with(value, &FlattenConfig::default())
}

/// Flatten a value with an explicit configuration.
pub fn flatten_with(value: &Value, config: &FlattenConfig) -> FlattenResult<LogItem> {
    let item = Flattener::new(config).flatten_value(value, 0)?;
    trace!(title = %item.title, fields = item.len(), "Flattened value");
    Ok(item)
}

/// Walk state for a single flatten call.
struct Flattener<'a> {
    config: &'a FlattenConfig,
    /// Identities of the structured values currently being flattened.
    active: Vec<usize>,
    /// Field keys from the root to the current value.
    path: Vec<String>,
}

impl<'a> Flattener<'a> {
    fn new(config: &'a FlattenConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
            path: Vec::new(),
        }
    }

    fn path_string(&self) -> String {
        let mut path = String::from("$");
        for key in &self.path {
            path.push('.');
            path.push_str(key);
        }
        path
    }

    fn flatten_value(&mut self, value: &Value, depth: usize) -> FlattenResult<LogItem> {
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(FlattenError::DepthExceeded {
                    limit,
                    path: self.path_string(),
                });
            }
        }

        let identity = value.identity();
        if self.config.detect_cycles {
            if let Some(id) = identity {
                if self.active.contains(&id) {
                    return Err(FlattenError::CycleDetected {
                        path: self.path_string(),
                    });
                }
            }
        }
        if let Some(id) = identity {
            self.active.push(id);
        }

        let mut item = LogItem::new(title_of(value));
        for (key, field) in own_fields(value) {
            if key == "title" || field.is_callable() {
                continue;
            }

            if field.is_structured() {
                let view = match field {
                    Value::ArrayBuffer(bytes) => Value::Uint8Array(bytes),
                    other => other,
                };
                self.path.push(key.clone());
                let child = self.flatten_value(&view, depth + 1)?;
                self.path.pop();
                item.push(key, LogValue::Item(child));
            } else {
                item.push(key, LogValue::from_primitive(&field));
            }
        }

        if identity.is_some() {
            self.active.pop();
        }

        Ok(item)
    }
}

/// Own enumerable fields of a value, in order.
fn own_fields(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(obj) => obj.own_fields(),
        Value::Array(arr) => arr
            .items()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Uint8Array(bytes) => bytes
            .iter()
            .enumerate()
            .map(|(i, b)| (i.to_string(), Value::Number(f64::from(*b))))
            .collect(),
        // A bare buffer exposes no indexed fields until it gets a view.
        _ => Vec::new(),
    }
}

/// The value's `title` field when truthy, otherwise its type name.
fn title_of(value: &Value) -> String {
    let title = value.get("title");
    if title.is_truthy() {
        title.to_display_string()
    } else {
        value.type_name().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::value::{Array, Object};

    #[test]
    fn test_flatten_plain_object() {
        let value = Value::from(
            Object::plain()
                .with("resultName", "Name")
                .with("resultValue", "Result Value"),
        );
        let item = flatten(&value).unwrap();

        assert_eq!(item.title, "Object");
        assert_eq!(item.names, vec!["resultName", "resultValue"]);
        assert_eq!(
            item.values,
            vec![LogValue::from("Name"), LogValue::from("Result Value")]
        );
    }

    #[test]
    fn test_flatten_uses_title_field() {
        let value = Value::from(
            Object::new("PromiseResult")
                .with("title", "Promise Result Description")
                .with("status", "resolved"),
        );
        let item = flatten(&value).unwrap();

        assert_eq!(item.title, "Promise Result Description");
        assert_eq!(item.names, vec!["status"]);
    }

    #[test]
    fn test_flatten_falsy_title_falls_back_to_class() {
        let value = Value::from(Object::new("MediaKeys").with("title", ""));
        let item = flatten(&value).unwrap();

        assert_eq!(item.title, "MediaKeys");
        assert!(item.is_empty());
    }

    #[test]
    fn test_flatten_numeric_title_is_stringified() {
        let value = Value::from(Object::plain().with("title", 42));
        assert_eq!(flatten(&value).unwrap().title, "42");
    }

    #[test]
    fn test_flatten_skips_functions() {
        let value = Value::from(
            Object::plain()
                .with("update", Value::function("update"))
                .with("sessionId", "abc"),
        );
        let item = flatten(&value).unwrap();

        assert_eq!(item.names, vec!["sessionId"]);
    }

    #[test]
    fn test_flatten_array_indices() {
        let value = Value::array(vec![Value::from("a"), Value::from("b")]);
        let item = flatten(&value).unwrap();

        assert_eq!(item.title, "Array");
        assert_eq!(item.names, vec!["0", "1"]);
    }

    #[test]
    fn test_flatten_array_buffer_gets_byte_view() {
        let value =
            Value::from(Object::plain().with("message", Value::array_buffer(vec![7u8, 255])));
        let item = flatten(&value).unwrap();

        let view = item.values[0].as_item().unwrap();
        assert_eq!(view.title, "Uint8Array");
        assert_eq!(view.names, vec!["0", "1"]);
        assert_eq!(view.values, vec![LogValue::Number(7.0), LogValue::Number(255.0)]);
    }

    #[test]
    fn test_flatten_bare_array_buffer() {
        let item = flatten(&Value::array_buffer(vec![1u8, 2, 3])).unwrap();
        assert_eq!(item.title, "ArrayBuffer");
        assert!(item.is_empty());
    }

    #[test]
    fn test_flatten_ignores_prototype_fields() {
        let proto = Object::new("Event").with("type", "Test").into_ref();
        let value = Value::from(
            Object::new("Event")
                .with("isTrusted", false)
                .with_prototype(proto),
        );
        let item = flatten(&value).unwrap();

        assert_eq!(item.names, vec!["isTrusted"]);
        assert_eq!(item.values, vec![LogValue::Bool(false)]);
    }

    #[test]
    fn test_flatten_empty_object() {
        let item = flatten(&Value::from(Object::new("TargetObject"))).unwrap();
        assert_eq!(item.title, "TargetObject");
        assert!(item.names.is_empty());
        assert!(item.values.is_empty());
    }

    #[test]
    fn test_flatten_primitive_root() {
        let item = flatten(&Value::from("text")).unwrap();
        assert_eq!(item.title, "String");
        assert!(item.is_empty());
    }

    #[test]
    fn test_flatten_null_and_undefined_fields() {
        let value = Value::from(
            Object::plain()
                .with("a", Value::Null)
                .with("b", Value::Undefined),
        );
        let item = flatten(&value).unwrap();
        assert_eq!(item.values, vec![LogValue::Null, LogValue::Undefined]);
    }

    #[test]
    fn test_flatten_detects_self_cycle() {
        let obj = Object::plain().into_ref();
        obj.set("self", Arc::clone(&obj));

        let err = flatten(&Value::Object(obj)).unwrap_err();
        assert_eq!(
            err,
            FlattenError::CycleDetected {
                path: "$.self".to_string()
            }
        );
    }

    #[test]
    fn test_flatten_detects_array_cycle() {
        let arr = Array::new().into_ref();
        let holder = Object::plain().with("items", Arc::clone(&arr)).into_ref();
        arr.push(Arc::clone(&holder));

        let err = flatten(&Value::Object(holder)).unwrap_err();
        assert!(matches!(err, FlattenError::CycleDetected { .. }));
    }

    #[test]
    fn test_flatten_shared_reference_is_not_cycle() {
        let shared = Object::plain().with("x", 1).into_ref();
        let value = Value::from(
            Object::plain()
                .with("left", Arc::clone(&shared))
                .with("right", shared),
        );
        let item = flatten(&value).unwrap();

        assert_eq!(item.names, vec!["left", "right"]);
        assert_eq!(item.values[0], item.values[1]);
    }

    #[test]
    fn test_flatten_depth_limit() {
        let value = Value::from(
            Object::plain().with("a", Object::plain().with("b", Object::plain().with("c", 1))),
        );
        let config = FlattenConfig::new().with_max_depth(1);

        let err = flatten_with(&value, &config).unwrap_err();
        assert_eq!(
            err,
            FlattenError::DepthExceeded {
                limit: 1,
                path: "$.a.b".to_string()
            }
        );
        assert!(flatten_with(&value, &FlattenConfig::new().with_max_depth(2)).is_ok());
    }

    #[test]
    fn test_flatten_log_item_keeps_title() {
        let mut original = LogItem::new("keystatuseschangeEvent");
        original.push("timeStamp", "now".into());

        let first = flatten(&Value::from(&original)).unwrap();
        let second = flatten(&Value::from(&original)).unwrap();

        assert_eq!(first.title, "keystatuseschangeEvent");
        assert_eq!(first.names, vec!["names", "values"]);
        assert_eq!(first, second);
    }
}
