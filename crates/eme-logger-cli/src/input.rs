//! JSON input conversion.
//!
//! JSON has no notion of class names, prototypes, byte buffers or
//! functions, so objects may carry `$`-prefixed directives:
//!
//! - `"$class": "HTMLVideoElement"` names the object's class
//! - `"$proto": {...}` supplies inherited fields
//! - `"$bytes": [1, 2, 3]` with `"$class": "ArrayBuffer"` or
//!   `"Uint8Array"` makes a byte buffer
//! - `"$function": "name"` makes a function
//! - `"$undefined": true` makes an undefined value

use std::io::Read;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value as Json};

use eme_logger::prelude::*;

/// Read an input path, with `-` meaning standard input.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(text);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
}

/// Convert a JSON document into a host value.
pub fn to_value(json: &Json) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(
            n.as_f64()
                .ok_or_else(|| anyhow!("Number {} is not representable", n))?,
        ),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => {
            let array: Array = items.iter().map(to_value).collect::<Result<_>>()?;
            Value::Array(array.into_ref())
        }
        Json::Object(map) => object_to_value(map)?,
    })
}

/// Convert a JSON document that must describe an object.
pub fn to_object(json: &Json) -> Result<ObjectRef> {
    match to_value(json)? {
        Value::Object(obj) => Ok(obj),
        other => bail!("Expected an object, found {}", other.type_name()),
    }
}

fn object_to_value(map: &Map<String, Json>) -> Result<Value> {
    if map.get("$undefined").and_then(Json::as_bool) == Some(true) {
        return Ok(Value::Undefined);
    }

    if let Some(name) = map.get("$function") {
        let name = name.as_str().context("$function must be a string")?;
        return Ok(Value::function(name));
    }

    let class = match map.get("$class") {
        Some(class) => Some(class.as_str().context("$class must be a string")?),
        None => None,
    };

    if let Some(bytes) = map.get("$bytes") {
        let bytes = parse_bytes(bytes)?;
        return match class {
            Some("Uint8Array") => Ok(Value::uint8_array(bytes)),
            Some("ArrayBuffer") | None => Ok(Value::array_buffer(bytes)),
            Some(other) => bail!("$bytes cannot be used with class {}", other),
        };
    }

    let mut obj = match class {
        Some(class) => Object::new(class.to_string()),
        None => Object::plain(),
    };

    if let Some(proto) = map.get("$proto") {
        let proto = to_object(proto).context("Invalid $proto")?;
        obj = obj.with_prototype(proto);
    }

    for (key, value) in map {
        if key.starts_with('$') {
            continue;
        }
        let value = to_value(value).with_context(|| format!("Invalid field {}", key))?;
        obj.set(key.as_str(), value);
    }

    Ok(obj.into())
}

fn parse_bytes(json: &Json) -> Result<Vec<u8>> {
    let items = json.as_array().context("$bytes must be an array")?;
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|b| u8::try_from(b).ok())
                .ok_or_else(|| anyhow!("Invalid byte {}", item))
        })
        .collect()
}
