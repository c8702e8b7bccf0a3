//! File sink implementation
//!
//! Appends one line per event:
//! `<timestamp> [<LEVEL>] <message> <extras>` where message and extras go
//! through the value encoder. Uses tokio::fs so writes never block the
//! runtime.

use crate::core::{LogEvent, LoggerError, Plugin, PluginConfig, Result, TimestampFormat};
use crate::encode::{encode, encode_all};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

/// Options for [`FileSink`], loadable from JSON
///
/// # Example
///
/// ```
/// use plugin_logger::plugins::FileSinkOptions;
///
/// let options: FileSinkOptions =
///     serde_json::from_str(r#"{ "path": "logs/app.log", "disabled": true }"#).unwrap();
/// assert!(options.disabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSinkOptions {
    pub path: PathBuf,
    /// A disabled sink never touches the filesystem
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub timestamp_format: TimestampFormat,
}

/// Appends encoded events to a file
///
/// The parent directory is created on `init`. Events dispatched before
/// `init` finished open the file on first write. Output is buffered and
/// flushed after every event.
///
/// # Example
///
/// ```no_run
/// use plugin_logger::plugins::FileSink;
/// use plugin_logger::TimestampFormat;
///
/// let sink = FileSink::new("/var/log/app/events.log")
///     .with_timestamp_format(TimestampFormat::Rfc3339);
/// ```
pub struct FileSink {
    path: PathBuf,
    disabled: bool,
    timestamp_format: TimestampFormat,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            disabled: false,
            timestamp_format: TimestampFormat::default(),
            writer: Mutex::new(None),
        }
    }

    /// Build a sink from loaded options
    ///
    /// # Errors
    ///
    /// Returns an invalid-configuration error when `timestamp_format` is a
    /// custom strftime string chrono cannot render.
    pub fn from_options(options: FileSinkOptions) -> Result<Self> {
        options.timestamp_format.validate()?;
        Ok(Self::new(options.path)
            .disabled(options.disabled)
            .with_timestamp_format(options.timestamp_format))
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the timestamp format for this sink
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    ///
    /// # Errors
    ///
    /// Returns an invalid-configuration error for specifiers chrono does not
    /// know.
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Result<Self> {
        self.timestamp_format = TimestampFormat::custom(format_str)?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Render the line written for an event, including the trailing newline
    pub fn format_line(&self, event: &LogEvent) -> String {
        let extras = if event.has_extras() {
            encode_all(&event.extras)
        } else {
            String::new()
        };

        let line = format!(
            "{} [{}] {} {}",
            self.timestamp_format.format(&event.timestamp),
            event.level.to_uppercase(),
            encode(&event.message),
            extras
        );

        let mut line = sanitize_line(&line);
        line.push('\n');
        line
    }

    async fn open(&self) -> Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
            })?;

        Ok(BufWriter::new(file))
    }

    async fn flush_writer(&self) -> Result<()> {
        let mut guard = self.writer.lock().await;
        if let Some(writer) = guard.as_mut() {
            writer.flush().await?;
        }
        Ok(())
    }
}

/// Escape line breaks and tabs so one event stays on one line
fn sanitize_line(line: &str) -> String {
    line.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[async_trait]
impl Plugin for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn init(&self, _config: &PluginConfig) -> Result<()> {
        if self.disabled {
            return Ok(());
        }

        let mut guard = self.writer.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        Ok(())
    }

    async fn handle(&self, event: &LogEvent) -> Result<()> {
        if self.disabled {
            return Ok(());
        }

        let line = self.format_line(event);

        let mut guard = self.writer.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        let writer = guard
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn after(&self, _event: &LogEvent) -> Result<()> {
        self.flush_writer().await
    }

    async fn flush(&self) -> Result<()> {
        self.flush_writer().await
    }
}
