//! Cycle-safe value encoder for text-oriented plugins
//!
//! Turns any [`Value`] into a deterministic JSON-ish string. Plain strings pass
//! through untouched; everything else is JSON-encoded with a few overrides for
//! values JSON has no representation for:
//!
//! | value            | rendering                          |
//! |------------------|------------------------------------|
//! | date/time        | `"2025-01-08T10:30:45.123Z"`       |
//! | bytes            | base64 text                        |
//! | set              | array in insertion order           |
//! | big integer      | `"123n"`                           |
//! | symbol           | `"[Symbol: Symbol(desc)]"`         |
//! | function         | `"[Function: name]"`               |
//! | revisited object | `"[Circular]"`                     |
//!
//! # Example
//!
//! ```
//! use plugin_logger::{encode, Object, Value};
//!
//! assert_eq!(encode(&Value::from("hello")), "hello");
//!
//! let node = Object::new().with_field("name", "root");
//! node.insert("self", node.clone());
//! assert_eq!(
//!     encode(&Value::Object(node)),
//!     r#"{"name":"root","self":"[Circular]"}"#
//! );
//! ```

use crate::core::timestamp::TimestampFormat;
use crate::core::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number, Value as Json};
use std::collections::HashSet;

/// Placeholder for an object reached a second time in one traversal
pub const CIRCULAR: &str = "[Circular]";

/// Placeholder for nesting deeper than [`MAX_DEPTH`]
pub const TRUNCATED: &str = "[Truncated]";

/// Maximum nesting depth rendered before truncating
pub const MAX_DEPTH: usize = 256;

// Largest integer a double represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encode a single value
///
/// Never panics; a visited-object set scoped to this call guarantees
/// termination on self-referential graphs.
pub fn encode(value: &Value) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }

    let mut encoder = Encoder::default();
    encoder.to_json(value, 0).to_string()
}

/// Encode a sequence of values as one JSON array
///
/// All values share a single traversal, so an object appearing in two extras
/// is rendered once and marked `"[Circular]"` afterwards.
pub fn encode_all(values: &[Value]) -> String {
    let mut encoder = Encoder::default();
    let items = values
        .iter()
        .map(|value| encoder.to_json(value, 1))
        .collect();
    Json::Array(items).to_string()
}

#[derive(Default)]
struct Encoder {
    seen: HashSet<usize>,
}

impl Encoder {
    fn to_json(&mut self, value: &Value, depth: usize) -> Json {
        if depth > MAX_DEPTH {
            return Json::String(TRUNCATED.to_string());
        }

        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::Float(f) => float_to_json(*f),
            Value::BigInt(i) => Json::String(format!("{}n", i)),
            Value::String(s) => Json::String(s.clone()),
            Value::DateTime(dt) => Json::String(TimestampFormat::Iso8601.format(dt)),
            Value::Bytes(bytes) => Json::String(STANDARD.encode(bytes)),
            Value::Array(items) | Value::Set(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.to_json(item, depth + 1))
                    .collect(),
            ),
            Value::Object(object) => {
                if !self.seen.insert(object.id()) {
                    return Json::String(CIRCULAR.to_string());
                }

                let mut map = Map::new();
                for (key, field) in object.entries() {
                    let encoded = self.to_json(&field, depth + 1);
                    map.insert(key, encoded);
                }
                Json::Object(map)
            }
            Value::Symbol(description) => {
                Json::String(format!("[Symbol: Symbol({})]", description))
            }
            Value::Function(name) => Json::String(format!(
                "[Function: {}]",
                name.as_deref().unwrap_or("anonymous")
            )),
        }
    }
}

/// Integral doubles print without a fraction; non-finite ones become `null`
fn float_to_json(f: f64) -> Json {
    if !f.is_finite() {
        return Json::Null;
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Json::Number((f as i64).into());
    }
    Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Object;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_plain_string_unchanged() {
        assert_eq!(encode(&Value::from("hello")), "hello");
        assert_eq!(encode(&Value::from("")), "");
        assert_eq!(encode(&Value::from("with \"quotes\"")), "with \"quotes\"");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::Null), "null");
        assert_eq!(encode(&Value::from(true)), "true");
        assert_eq!(encode(&Value::from(123)), "123");
        assert_eq!(encode(&Value::from(1.5)), "1.5");
        assert_eq!(encode(&Value::from(2.0)), "2");
        assert_eq!(encode(&Value::Float(f64::NAN)), "null");
        assert_eq!(encode(&Value::Float(f64::INFINITY)), "null");
    }

    #[test]
    fn test_datetime_iso8601() {
        let dt = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123);
        assert_eq!(encode(&Value::from(dt)), "\"2025-01-08T10:30:45.123Z\"");

        let object = Object::new().with_field("at", dt);
        assert_eq!(
            encode(&Value::Object(object)),
            r#"{"at":"2025-01-08T10:30:45.123Z"}"#
        );
    }

    #[test]
    fn test_bytes_base64() {
        assert_eq!(encode(&Value::bytes(b"hello".to_vec())), "\"aGVsbG8=\"");
    }

    #[test]
    fn test_set_as_array() {
        let set = Value::set([3, 1, 3, 2]);
        assert_eq!(encode(&set), "[3,1,2]");
    }

    #[test]
    fn test_bigint_suffix() {
        assert_eq!(encode(&Value::BigInt(12345678901234567890)), "\"12345678901234567890n\"");
        let arr = Value::Array(vec![Value::BigInt(-5)]);
        assert_eq!(encode(&arr), r#"["-5n"]"#);
    }

    #[test]
    fn test_symbol_and_function_placeholders() {
        assert_eq!(encode(&Value::symbol("token")), "\"[Symbol: Symbol(token)]\"");
        assert_eq!(encode(&Value::symbol("")), "\"[Symbol: Symbol()]\"");
        assert_eq!(encode(&Value::function("onClick")), "\"[Function: onClick]\"");
        assert_eq!(encode(&Value::anonymous_function()), "\"[Function: anonymous]\"");
    }

    #[test]
    fn test_object_key_order_preserved() {
        let object = Object::new()
            .with_field("zeta", 1)
            .with_field("alpha", "a")
            .with_field("mid", Value::Null);
        assert_eq!(
            encode(&Value::Object(object)),
            r#"{"zeta":1,"alpha":"a","mid":null}"#
        );
    }

    #[test]
    fn test_nested_string_is_quoted() {
        let value = Value::from(json!({"user": "X", "note": "line\nbreak"}));
        assert_eq!(encode(&value), r#"{"user":"X","note":"line\nbreak"}"#);
    }

    #[test]
    fn test_self_reference() {
        let node = Object::new().with_field("id", 1);
        node.insert("me", node.clone());
        assert_eq!(encode(&Value::Object(node)), r#"{"id":1,"me":"[Circular]"}"#);
    }

    #[test]
    fn test_indirect_cycle_through_array() {
        let parent = Object::new().with_field("name", "parent");
        let child = Object::new().with_field("name", "child");
        child.insert("parent", parent.clone());
        parent.insert("children", Value::Array(vec![Value::Object(child)]));

        assert_eq!(
            encode(&Value::Object(parent)),
            r#"{"name":"parent","children":[{"name":"child","parent":"[Circular]"}]}"#
        );
    }

    #[test]
    fn test_seen_set_scoped_per_call() {
        let node = Object::new().with_field("k", "v");
        let value = Value::Object(node);
        let first = encode(&value);
        let second = encode(&value);
        assert_eq!(first, r#"{"k":"v"}"#);
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_all() {
        let extras = vec![Value::from(json!({"user": "X"})), Value::from(123)];
        assert_eq!(encode_all(&extras), r#"[{"user":"X"},123]"#);
        assert_eq!(encode_all(&[]), "[]");
        // strings inside the sequence are quoted like any nested string
        assert_eq!(encode_all(&[Value::from("a")]), r#"["a"]"#);
    }

    #[test]
    fn test_depth_limit_truncates() {
        let mut value = Value::from(0);
        for _ in 0..(MAX_DEPTH + 10) {
            value = Value::Array(vec![value]);
        }
        let encoded = encode(&value);
        assert!(encoded.contains(TRUNCATED));
    }
}
