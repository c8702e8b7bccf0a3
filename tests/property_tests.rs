//! Property-based tests for plugin_logger using proptest

use parking_lot::Mutex;
use plugin_logger::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Encoder Tests
// ============================================================================

/// Leaf values the encoder must always render
fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        any::<i128>().prop_map(Value::from),
        ".{0,16}".prop_map(Value::from),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(Value::bytes),
        "[a-z]{0,8}".prop_map(Value::symbol),
    ]
}

/// Nested arrays and objects built from leaves
fn nested() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|fields| Value::from(fields.into_iter().collect::<Object>())),
        ]
    })
}

proptest! {
    /// Top-level strings are returned unchanged
    #[test]
    fn test_encode_string_identity(s in ".*") {
        prop_assert_eq!(encode(&Value::from(s.as_str())), s);
    }

    /// Any non-string value encodes to valid JSON
    #[test]
    fn test_encode_produces_json(value in nested()) {
        prop_assume!(value.as_str().is_none());
        let encoded = encode(&value);
        prop_assert!(serde_json::from_str::<serde_json::Value>(&encoded).is_ok(), "not JSON: {}", encoded);
    }

    /// Encoding terminates on self-referential objects, whatever they contain
    #[test]
    fn test_encode_terminates_on_cycles(
        fields in proptest::collection::vec(("[a-z]{1,6}", leaf()), 0..6),
        self_key in "[A-Z]{1,4}",
    ) {
        let object: Object = fields.into_iter().collect();
        object.insert(self_key.clone(), object.clone());

        let encoded = encode(&Value::from(object));
        let parsed: serde_json::Value = serde_json::from_str(&encoded).expect("valid JSON");
        prop_assert_eq!(parsed[self_key.as_str()].as_str(), Some("[Circular]"));
    }

    /// `encode_all` renders a JSON array with one element per extra
    #[test]
    fn test_encode_all_length(values in proptest::collection::vec(nested(), 0..6)) {
        let encoded = encode_all(&values);
        let parsed: serde_json::Value = serde_json::from_str(&encoded).expect("valid JSON");
        prop_assert_eq!(parsed.as_array().map(Vec::len), Some(values.len()));
    }
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level tags are normalized to trimmed lowercase
    #[test]
    fn test_log_level_normalization(tag in "[a-zA-Z]{1,10}", pad in " {0,3}") {
        let level = LogLevel::new(format!("{pad}{tag}{pad}"));
        prop_assert_eq!(level.as_str(), tag.to_lowercase());
    }

    /// LevelSet keeps first-seen order and drops duplicates
    #[test]
    fn test_level_set_dedup(tags in proptest::collection::vec("[a-d]{1,2}", 1..12)) {
        let set = LevelSet::new(tags.iter().map(String::as_str)).expect("non-empty");

        let mut expected: Vec<String> = Vec::new();
        for tag in &tags {
            if !expected.contains(tag) {
                expected.push(tag.clone());
            }
        }
        let actual: Vec<String> = set.iter().map(|l| l.to_string()).collect();
        prop_assert_eq!(actual, expected);
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Only configured levels reach the plugin, and extras arrive in order
    #[test]
    fn test_dispatch_respects_level_set(
        configured in proptest::collection::vec(prop_oneof![Just("info"), Just("warn"), Just("error"), Just("debug")], 1..4),
        emitted in prop_oneof![Just("info"), Just("warn"), Just("error"), Just("debug")],
        extras in proptest::collection::vec(any::<i64>(), 0..5),
    ) {
        let extras: Vec<Value> = extras.into_iter().map(Value::from).collect();
        let levels = configured.clone();
        let sent = extras.clone();

        let (outcome, seen) = tokio_test::block_on(async move {
            let seen: Arc<Mutex<Vec<Vec<Value>>>> = Arc::new(Mutex::new(Vec::new()));
            let sink = seen.clone();
            let logger = Logger::builder()
                .levels(levels)
                .plugin(HookPlugin::builder("recorder").handle(move |event| {
                    sink.lock().push(event.extras.clone());
                    Ok(())
                }).build())
                .build()
                .expect("logger");

            let outcome = logger.log(emitted, "msg", sent).await.expect("dispatch");
            let seen = seen.lock().clone();
            (outcome, seen)
        });

        if configured.contains(&emitted) {
            prop_assert!(outcome.is_dispatched());
            prop_assert_eq!(seen.len(), 1);
            prop_assert_eq!(&seen[0], &extras);
        } else {
            prop_assert_eq!(outcome.suppression(), Some(Suppression::Level));
            prop_assert!(seen.is_empty());
        }
    }
}
