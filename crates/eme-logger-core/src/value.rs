//! Host value model.
//!
//! Values observed on a page (call arguments, events, promise results) are
//! described with an explicit, tagged representation. Every object carries
//! its class name so that nothing downstream has to ask a value for its
//! runtime type.
//!
//! Objects and arrays are shared by reference. Two [`Value`]s that hold the
//! same [`ObjectRef`] refer to the same host object, which is what lets a
//! structure reference itself.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared reference to a host object.
pub type ObjectRef = Arc<Object>;

/// Shared reference to a host array.
pub type ArrayRef = Arc<Array>;

/// A value observed in the host environment.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Missing value.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (all host numbers are doubles).
    Number(f64),
    /// String.
    String(String),
    /// A callable; only its name is kept.
    Function(String),
    /// Structured object.
    Object(ObjectRef),
    /// Array.
    Array(ArrayRef),
    /// Raw fixed-size byte buffer with no view attached.
    ArrayBuffer(Arc<[u8]>),
    /// Unsigned byte view over a buffer.
    Uint8Array(Arc<[u8]>),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a byte buffer value.
    pub fn array_buffer(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::ArrayBuffer(bytes.into())
    }

    /// Create a byte view value.
    pub fn uint8_array(bytes: impl Into<Arc<[u8]>>) -> Self {
        Value::Uint8Array(bytes.into())
    }

    /// Create an array value from items.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Array::from_iter(items).into_ref())
    }

    /// Create a function value.
    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(name.into())
    }

    /// Runtime type name of this value.
    ///
    /// Objects report their declared class name; everything else reports the
    /// name its host constructor would have.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Value::Undefined => Cow::Borrowed("Undefined"),
            Value::Null => Cow::Borrowed("Null"),
            Value::Bool(_) => Cow::Borrowed("Boolean"),
            Value::Number(_) => Cow::Borrowed("Number"),
            Value::String(_) => Cow::Borrowed("String"),
            Value::Function(_) => Cow::Borrowed("Function"),
            Value::Object(obj) => Cow::Borrowed(obj.class_name()),
            Value::Array(_) => Cow::Borrowed("Array"),
            Value::ArrayBuffer(_) => Cow::Borrowed("ArrayBuffer"),
            Value::Uint8Array(_) => Cow::Borrowed("Uint8Array"),
        }
    }

    /// Host truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Whether this is `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Whether this value is callable.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Whether this value is a non-null structured value.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Value::Object(_) | Value::Array(_) | Value::ArrayBuffer(_) | Value::Uint8Array(_)
        )
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as an object.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Borrow as an array.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Borrow the bytes of a buffer or byte view.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ArrayBuffer(bytes) | Value::Uint8Array(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Property read. Returns `Undefined` for anything that is not an object
    /// or does not have the property, mirroring host property access.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(obj) => obj.get(key).unwrap_or_default(),
            _ => Value::Undefined,
        }
    }

    /// Whether the property is reachable on this value.
    pub fn has(&self, key: &str) -> bool {
        match self {
            Value::Object(obj) => obj.has(key),
            _ => false,
        }
    }

    /// Identity of a shared structured value, used for cycle detection.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(obj) => Some(Arc::as_ptr(obj) as *const () as usize),
            Value::Array(arr) => Some(Arc::as_ptr(arr) as *const () as usize),
            _ => None,
        }
    }

    /// Host string conversion for primitives. Structured values render as
    /// their type name.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Function(name) => format!("function {}", name),
            other => other.type_name().into_owned(),
        }
    }
}

/// Primitives compare by value, buffers by content, objects and arrays by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) | (Value::Function(a), Value::Function(b)) => {
                a == b
            }
            (Value::ArrayBuffer(a), Value::ArrayBuffer(b))
            | (Value::Uint8Array(a), Value::Uint8Array(b)) => a == b,
            _ => self.identity().is_some() && self.identity() == other.identity(),
        }
    }
}

/// Render a number the way the host does (`1` rather than `1.0`).
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj.into_ref())
    }
}

impl From<ArrayRef> for Value {
    fn from(arr: ArrayRef) -> Self {
        Value::Array(arr)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}

/// A host object: class name, own fields in insertion order and an optional
/// prototype holding inherited fields.
pub struct Object {
    class_name: Cow<'static, str>,
    fields: RwLock<Vec<(String, Value)>>,
    prototype: Option<ObjectRef>,
}

impl Object {
    /// Create an empty object of the given class.
    pub fn new(class_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: RwLock::new(Vec::new()),
            prototype: None,
        }
    }

    /// Create an empty plain `Object`.
    pub fn plain() -> Self {
        Self::new("Object")
    }

    /// Add an own field.
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Attach a prototype whose fields are inherited.
    pub fn with_prototype(mut self, prototype: ObjectRef) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Wrap in a shared reference.
    pub fn into_ref(self) -> ObjectRef {
        Arc::new(self)
    }

    /// The object's class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The object's prototype, if any.
    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.prototype.as_ref()
    }

    /// Set an own field. An existing key keeps its position.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut fields = self.fields.write();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => fields.push((key, value)),
        }
    }

    /// Read an own field.
    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.fields
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Read a field through the prototype chain.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.get_own(key) {
            return Some(value);
        }
        let mut current = self.prototype.clone();
        while let Some(proto) = current {
            if let Some(value) = proto.get_own(key) {
                return Some(value);
            }
            current = proto.prototype.clone();
        }
        None
    }

    /// Whether the field is reachable through the prototype chain.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether the field is an own field.
    pub fn has_own(&self, key: &str) -> bool {
        self.fields.read().iter().any(|(k, _)| k == key)
    }

    /// Snapshot of the own fields, in insertion order.
    pub fn own_fields(&self) -> Vec<(String, Value)> {
        self.fields.read().clone()
    }

    /// Own field keys, in insertion order.
    pub fn own_keys(&self) -> Vec<String> {
        self.fields.read().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Number of own fields.
    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    /// Whether there are no own fields.
    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }
}

// Field values are not printed: a self-referential object would never finish.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class_name", &self.class_name)
            .field("keys", &self.own_keys())
            .field("has_prototype", &self.prototype.is_some())
            .finish()
    }
}

/// A host array.
#[derive(Default)]
pub struct Array {
    items: RwLock<Vec<Value>>,
}

impl Array {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shared reference.
    pub fn into_ref(self) -> ArrayRef {
        Arc::new(self)
    }

    /// Append an item.
    pub fn push(&self, value: impl Into<Value>) {
        self.items.write().push(value.into());
    }

    /// Get an item by index.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    /// Snapshot of the items.
    pub fn items(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array").field("len", &self.len()).finish()
    }
}
