//! Error types for the log dispatcher

use super::failure::HookStage;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Logger constructed outside of a Tokio runtime
    #[error("No Tokio runtime available to initialize plugins")]
    MissingRuntime,

    /// The caller-supplied filter or format callback failed
    #[error("Pipeline {stage} failed: {source}")]
    Pipeline {
        stage: &'static str,
        #[source]
        source: Box<LoggerError>,
    },

    /// A plugin hook returned an error or panicked
    #[error("Plugin '{plugin}' failed in {stage}: {source}")]
    Plugin {
        plugin: String,
        stage: HookStage,
        #[source]
        source: Arc<LoggerError>,
    },

    /// A hook panicked; the payload message is preserved
    #[error("Hook panicked: {0}")]
    Panicked(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Wrap an error raised by the filter callback
    pub fn filter(source: LoggerError) -> Self {
        LoggerError::Pipeline {
            stage: "filter",
            source: Box::new(source),
        }
    }

    /// Wrap an error raised by the format callback
    pub fn format(source: LoggerError) -> Self {
        LoggerError::Pipeline {
            stage: "format",
            source: Box::new(source),
        }
    }

    /// Create a plugin hook error
    pub fn plugin(plugin: impl Into<String>, stage: HookStage, source: Arc<LoggerError>) -> Self {
        LoggerError::Plugin {
            plugin: plugin.into(),
            stage,
            source,
        }
    }

    /// Build a panic error from a `catch_unwind` payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        LoggerError::Panicked(message)
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error came from a panicking hook
    pub fn is_panic(&self) -> bool {
        matches!(self, LoggerError::Panicked(_))
    }
}
