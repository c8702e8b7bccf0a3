//! Shared logger context
//!
//! A [`Context`] is built once, handed to the logger, and then passed by
//! reference to the filter, the formatter and every plugin hook. It is
//! read-only after construction; cloning only bumps a reference count.

use super::error::{LoggerError, Result};
use super::value::Value;
use std::fmt;
use std::sync::Arc;

/// Read-only, insertion-ordered key/value context
///
/// # Example
///
/// ```
/// use plugin_logger::Context;
///
/// let ctx = Context::new()
///     .with_field("service", "api-gateway")
///     .with_field("env", "test");
///
/// assert_eq!(ctx.len(), 2);
/// assert_eq!(ctx.format_fields(), "service=api-gateway env=test");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    fields: Arc<Vec<(String, Value)>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an existing value with the same key
    ///
    /// Only meant for building a context before it is shared; on an already
    /// shared context this copies the fields first.
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        let value = value.into();
        let fields = Arc::make_mut(&mut self.fields);
        if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            fields.push((key, value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether both handles share the same storage
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Context::new(), |ctx, (k, v)| ctx.with_field(k, v))
    }
}

impl TryFrom<serde_json::Value> for Context {
    type Error = LoggerError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            serde_json::Value::Null => Ok(Context::new()),
            other => Err(LoggerError::config(
                "Context",
                format!("expected a JSON object, got {}", other),
            )),
        }
    }
}
