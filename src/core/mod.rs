//! Core dispatcher types and traits

pub mod context;
pub mod error;
pub mod failure;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod plugin;
pub mod report;
pub mod timestamp;
pub mod value;

pub use context::Context;
pub use error::{LoggerError, Result};
pub use failure::{FailureCallback, FailurePolicy, HookStage, PluginFailure};
pub use log_event::LogEvent;
pub use log_level::{LevelSet, LogLevel, DEFAULT_LEVELS};
pub use logger::{Logger, LoggerBuilder, LoggerConfig};
pub use metrics::DispatchMetrics;
pub use pipeline::{Filter, Formatter};
pub use plugin::{Plugin, PluginConfig};
pub use report::{Dispatch, DispatchReport, InitReport, Suppression};
pub use timestamp::TimestampFormat;
pub use value::{Object, Value};
