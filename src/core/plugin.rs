//! Plugin trait for log sinks

use super::context::Context;
use super::error::Result;
use super::failure::FailurePolicy;
use super::log_event::LogEvent;
use super::log_level::LevelSet;
use async_trait::async_trait;

/// Logger settings handed to every plugin's `init` hook
#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub levels: LevelSet,
    pub context: Context,
    pub failure_policy: FailurePolicy,
    /// Number of plugins taking part in dispatch
    pub plugin_count: usize,
}

/// A log sink driven by the logger's lifecycle hooks
///
/// Only [`handle`](Plugin::handle) is required. For every event that passes
/// the logger's pipeline, a plugin sees `before`, `handle` and `after` in that
/// order; other plugins run concurrently and in no particular order relative
/// to this one. Hooks take `&self` because one plugin instance serves
/// concurrent log calls; plugins that need ordering or mutable state keep
/// their own locks.
///
/// # Example
///
/// ```no_run
/// use plugin_logger::core::{LogEvent, Plugin, Result};
/// use async_trait::async_trait;
///
/// struct StdoutPlugin;
///
/// #[async_trait]
/// impl Plugin for StdoutPlugin {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     async fn handle(&self, event: &LogEvent) -> Result<()> {
///         println!("{}: {}", event.level, event.message);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Get the plugin name, used in failure reports
    fn name(&self) -> &str;

    /// Whether the plugin can handle events at all
    ///
    /// Plugins reporting `false` are left out of initialization and dispatch.
    fn has_handler(&self) -> bool {
        true
    }

    /// Runs once per logger, concurrently with other plugins' `init`
    async fn init(&self, _config: &PluginConfig) -> Result<()> {
        Ok(())
    }

    /// Runs right before `handle` for this plugin only
    async fn before(&self, _event: &LogEvent) -> Result<()> {
        Ok(())
    }

    /// Deliver or store the event
    async fn handle(&self, event: &LogEvent) -> Result<()>;

    /// Runs right after `handle` for this plugin only
    async fn after(&self, _event: &LogEvent) -> Result<()> {
        Ok(())
    }

    /// Flush buffered output
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
