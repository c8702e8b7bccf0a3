//! Dynamic values carried by log events
//!
//! Messages, extras and context fields are all [`Value`]s. Most variants are
//! plain data; [`Object`] is a shared, mutable map so callers can build the
//! same kinds of graphs (including cycles) that the encoder has to survive.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Value type for messages, extras and context fields
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Wide integer, encoded with an `n` suffix
    BigInt(i128),
    String(String),
    DateTime(DateTime<Utc>),
    /// Binary blob, encoded as base64
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// Insertion-ordered collection of distinct members
    Set(Vec<Value>),
    Object(Object),
    /// Opaque handle identified by its description
    Symbol(String),
    /// Callable placeholder, `None` for anonymous callables
    Function(Option<String>),
}

impl Value {
    /// Build a set, keeping the first occurrence of each member
    pub fn set<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for member in members {
            let member = member.into();
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        Value::Set(unique)
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(description.into())
    }

    pub fn function(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Value::Function(None)
        } else {
            Value::Function(Some(name))
        }
    }

    pub fn anonymous_function() -> Self {
        Value::Function(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Renders through the encoder, so strings print bare
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::encode::encode(self))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Value::BigInt(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::BigInt(u as i128)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let object = Object::new();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }
        }
    }
}

/// Shared, insertion-ordered map value
///
/// Clones share the same storage, and equality is identity: two handles are
/// equal when they point at the same map. Inserting an object into itself (or
/// into one of its descendants) creates a cycle, which the encoder renders as
/// `"[Circular]"`.
///
/// Handles are strong references, so a cyclic object is never freed on its
/// own. Break the cycle with [`remove`](Object::remove) once it is no longer
/// needed.
#[derive(Clone, Default)]
pub struct Object {
    entries: Arc<RwLock<Vec<(String, Value)>>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, returning the handle for chaining
    pub fn with_field<K, V>(self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.write();
        let idx = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(idx).1)
    }

    /// Snapshot of the fields in insertion order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Address of the shared storage, stable for the object's lifetime
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.entries) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Derived Debug would recurse forever on cyclic graphs.
        write!(f, "Object({})", crate::encode::encode(&Value::Object(self.clone())))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}
