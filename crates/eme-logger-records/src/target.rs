//! Target extraction.
//!
//! Reduces the object a call was made on, or an event was dispatched to,
//! to the few attributes worth logging.

use eme_logger_core::{Object, Value};

/// Class name of the extracted target object.
pub const TARGET_CLASS: &str = "TargetObject";

/// Identifying information about a call or event target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetInfo {
    /// Runtime type name of the target. `None` when there was no target.
    pub title: Option<String>,
    /// The target's `id` attribute (`Undefined` when it has none).
    pub id: Option<Value>,
    /// Space-joined `classList`, only when the target has one.
    pub classes: Option<String>,
}

impl TargetInfo {
    /// Extract target information. Falsy targets yield an empty shell.
    pub fn from_target(target: &Value) -> Self {
        if !target.is_truthy() {
            return Self::default();
        }

        let classes = target
            .as_object()
            .and_then(|obj| obj.get("classList"))
            .filter(Value::is_truthy)
            .map(|list| join_class_list(&list));

        Self {
            title: Some(target.type_name().into_owned()),
            id: Some(target.get("id")),
            classes,
        }
    }

    /// Whether no target was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
    }

    /// Convert to a host object with `title`, `id` and (if present)
    /// `classes` fields. An empty shell has no fields at all.
    pub fn to_value(&self) -> Value {
        let obj = Object::new(TARGET_CLASS);
        if let Some(title) = &self.title {
            obj.set("title", title.as_str());
        }
        if let Some(id) = &self.id {
            obj.set("id", id.clone());
        }
        if let Some(classes) = &self.classes {
            obj.set("classes", classes.as_str());
        }
        obj.into()
    }
}

fn join_class_list(list: &Value) -> String {
    let tokens: Vec<String> = match list {
        Value::Array(arr) => arr.items().iter().map(Value::to_display_string).collect(),
        Value::Object(obj) => obj
            .own_fields()
            .into_iter()
            .filter(|(_, v)| !v.is_callable())
            .map(|(_, v)| v.to_display_string())
            .collect(),
        other => return other.to_display_string(),
    };
    tokens.join(" ")
}
