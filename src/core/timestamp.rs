//! Timestamp formatting for text plugins and the value encoder

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options for text output
///
/// # Examples
///
/// ```
/// use plugin_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let stamp = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(stamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    ///
    /// Also the rendering the encoder uses for date/time values.
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Build a custom format, rejecting strftime strings chrono cannot render
    ///
    /// # Errors
    ///
    /// Returns an invalid-configuration error for unknown or malformed
    /// specifiers such as `%Q`.
    pub fn custom(format_str: impl Into<String>) -> Result<Self> {
        let format = TimestampFormat::Custom(format_str.into());
        format.validate()?;
        Ok(format)
    }

    /// Check that a custom strftime string only holds valid specifiers
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(format_str) => {
                if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                    return Err(LoggerError::config(
                        "TimestampFormat",
                        format!("invalid strftime format '{}'", format_str),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Render a timestamp
    ///
    /// A custom format chrono fails to render falls back to ISO 8601.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => TimestampFormat::Iso8601.format(datetime),
                }
            }
        }
    }
}
