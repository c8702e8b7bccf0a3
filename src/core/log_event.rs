//! Log event passed through the dispatch pipeline

use super::context::Context;
use super::log_level::LogLevel;
use super::value::Value;
use chrono::{DateTime, Utc};

/// One log call, as seen by the filter, the formatter and every plugin hook
///
/// Events are created per call and dropped once dispatch completes; the
/// logger never keeps them.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    /// Shared logger context, the same handle for every observer of the call
    pub context: Context,
    /// Caller message, or the formatter's output once formatting ran
    pub message: Value,
    /// Additional caller values, forwarded unchanged and in order
    pub extras: Vec<Value>,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(level: LogLevel, context: Context, message: Value, extras: Vec<Value>) -> Self {
        Self {
            level,
            context,
            message,
            extras,
            timestamp: Utc::now(),
        }
    }

    /// Replace the message, keeping everything else
    pub fn with_message(mut self, message: Value) -> Self {
        self.message = message;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let ctx = Context::new().with_field("env", "test");
        let event = LogEvent::new(
            LogLevel::INFO,
            ctx.clone(),
            Value::from("hello"),
            vec![Value::from(1)],
        );

        assert_eq!(event.level, LogLevel::INFO);
        assert!(event.context.ptr_eq(&ctx));
        assert_eq!(event.message, Value::from("hello"));
        assert!(event.has_extras());
    }

    #[test]
    fn test_with_message_keeps_extras() {
        let event = LogEvent::new(LogLevel::WARN, Context::new(), Value::from("raw"), vec![Value::from(true)])
            .with_message(Value::from("[WARN] raw"));

        assert_eq!(event.message, Value::from("[WARN] raw"));
        assert_eq!(event.extras, vec![Value::from(true)]);
    }
}
