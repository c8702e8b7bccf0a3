//! # Plugin Logger
//!
//! A structured log dispatcher that fans every event out to pluggable sinks,
//! plus a cycle-safe value encoder sinks use to persist arbitrary values.
//!
//! ## Features
//!
//! - **Level gating**: any set of string level tags, `info`/`warn`/`error`/`debug` by default
//! - **Async pipeline**: optional filter and formatter, both allowed to suspend or fail
//! - **Failure isolation**: a failing or panicking plugin never stops its siblings
//! - **Safe encoding**: shared objects, cycles and non-JSON values always encode
//!
//! ## Example
//!
//! ```
//! use plugin_logger::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> plugin_logger::Result<()> {
//! let logger = Logger::builder()
//!     .context_field("env", "test")
//!     .format(|event: &LogEvent| {
//!         Value::from(format!("{}{}", event.message, encode_all(&event.extras)))
//!     })
//!     .plugin(HookPlugin::builder("collector").handle(|event| {
//!         assert_eq!(event.message.to_string(), r#"Hello[{"user":"X"}]"#);
//!         Ok(())
//!     }).build())
//!     .build()?;
//!
//! let user = Object::new().with_field("user", "X");
//! logger.info("Hello", vec![Value::from(user)]).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod encode;
pub mod macros;
pub mod plugins;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::plugins::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::plugins::FileSink;
    pub use crate::plugins::HookPlugin;
    pub use crate::core::{
        Context, Dispatch, DispatchMetrics, DispatchReport, FailurePolicy, Filter, Formatter,
        HookStage, InitReport, LevelSet, LogEvent, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, Object, Plugin, PluginConfig, PluginFailure, Result, Suppression,
        TimestampFormat, Value, DEFAULT_LEVELS,
    };
    pub use crate::encode::{encode, encode_all};
}

#[cfg(feature = "console")]
pub use plugins::ConsoleSink;
#[cfg(feature = "file")]
pub use plugins::FileSink;
pub use plugins::HookPlugin;
pub use core::{
    Context, Dispatch, DispatchMetrics, DispatchReport, FailureCallback, FailurePolicy, Filter,
    Formatter, HookStage, InitReport, LevelSet, LogEvent, LogLevel, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, Object, Plugin, PluginConfig, PluginFailure, Result, Suppression,
    TimestampFormat, Value, DEFAULT_LEVELS,
};
pub use encode::{encode, encode_all};
