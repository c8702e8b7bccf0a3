//! Console sink

use crate::core::{LogEvent, Plugin, Result};
use crate::encode::encode_all;
use async_trait::async_trait;
use colored::Colorize;

/// Prints `<level>: <message> <extras>` with the level colored
///
/// Error events go to stderr, everything else to stdout.
pub struct ConsoleSink {
    use_colors: bool,
    show_context: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            show_context: false,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Append the logger context as `key=value` pairs
    #[must_use]
    pub fn with_context(mut self, show_context: bool) -> Self {
        self.show_context = show_context;
        self
    }

    fn format_line(&self, event: &LogEvent) -> String {
        let level = if self.use_colors {
            event.level.as_str().color(event.level.color_code()).to_string()
        } else {
            event.level.as_str().to_string()
        };

        let mut line = format!("{}: {}", level, event.message);
        if event.has_extras() {
            line.push(' ');
            line.push_str(&encode_all(&event.extras));
        }
        if self.show_context && !event.context.is_empty() {
            line.push(' ');
            line.push_str(&event.context.format_fields());
        }
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn handle(&self, event: &LogEvent) -> Result<()> {
        let line = self.format_line(event);
        if event.level == "error" {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        use std::io::Write;
        // Both streams are written to
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, LogLevel, Object, Value};

    #[test]
    fn test_plain_line() {
        let sink = ConsoleSink::with_colors(false);
        let event = LogEvent::new(
            LogLevel::INFO,
            Context::new(),
            Value::from("user created"),
            vec![Value::from(Object::new().with_field("id", 7))],
        );
        assert_eq!(sink.format_line(&event), r#"info: user created [{"id":7}]"#);
    }

    #[test]
    fn test_context_suffix() {
        let sink = ConsoleSink::with_colors(false).with_context(true);
        let event = LogEvent::new(
            LogLevel::DEBUG,
            Context::new().with_field("env", "test"),
            Value::from("tick"),
            vec![],
        );
        assert_eq!(sink.format_line(&event), "debug: tick env=test");
    }

    #[tokio::test]
    async fn test_handle_succeeds() {
        let sink = ConsoleSink::with_colors(false);
        let event = LogEvent::new(LogLevel::ERROR, Context::new(), Value::from("to stderr"), vec![]);
        assert!(sink.handle(&event).await.is_ok());
    }
}
