//! Failure policies for plugin fan-out
//!
//! A plugin hook that fails (returns an error or panics) never takes sibling
//! plugins down with it unless the logger is explicitly configured to fail fast.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Policy for handling plugin hook failures during fan-out
///
/// # Example
///
/// ```
/// use plugin_logger::FailurePolicy;
///
/// // Default behavior: isolate failures per plugin
/// let policy = FailurePolicy::default();
/// assert_eq!(policy, FailurePolicy::Isolate);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Keep delivering to every other plugin and report failures afterwards
    ///
    /// The `log` call resolves successfully; failures show up in the
    /// dispatch report, the metrics and the failure callback.
    #[default]
    Isolate,

    /// Abort the fan-out on the first failure
    ///
    /// Hook chains still in flight are dropped and the `log` call returns
    /// the failing plugin's error.
    FailFast,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Isolate => write!(f, "Isolate"),
            FailurePolicy::FailFast => write!(f, "FailFast"),
        }
    }
}

/// Lifecycle hook a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookStage {
    Init,
    Before,
    Handle,
    After,
    Flush,
}

impl HookStage {
    pub fn to_str(&self) -> &'static str {
        match self {
            HookStage::Init => "init",
            HookStage::Before => "before",
            HookStage::Handle => "handle",
            HookStage::After => "after",
            HookStage::Flush => "flush",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A single plugin hook failure
#[derive(Debug, Clone)]
pub struct PluginFailure {
    /// Name reported by the plugin
    pub plugin: String,
    /// Position of the plugin in the configured list
    pub index: usize,
    pub stage: HookStage,
    pub error: Arc<LoggerError>,
}

impl PluginFailure {
    pub fn new(plugin: impl Into<String>, index: usize, stage: HookStage, error: LoggerError) -> Self {
        Self {
            plugin: plugin.into(),
            index,
            stage,
            error: Arc::new(error),
        }
    }

    /// Whether the hook panicked rather than returning an error
    pub fn is_panic(&self) -> bool {
        self.error.is_panic()
    }

    /// Convert into a caller-facing error
    pub fn into_error(self) -> LoggerError {
        LoggerError::plugin(self.plugin, self.stage, self.error)
    }
}

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plugin #{} '{}' failed in {}: {}",
            self.index, self.plugin, self.stage, self.error
        )
    }
}

/// Callback invoked for every plugin failure
///
/// When configured it replaces the default stderr diagnostic.
pub type FailureCallback = Arc<dyn Fn(&PluginFailure) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Isolate);
    }

    #[test]
    fn test_policy_display() {
        assert_eq!(FailurePolicy::Isolate.to_string(), "Isolate");
        assert_eq!(FailurePolicy::FailFast.to_string(), "FailFast");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(HookStage::Init.to_string(), "init");
        assert_eq!(HookStage::After.to_string(), "after");
    }

    #[test]
    fn test_failure_display_and_conversion() {
        let failure = PluginFailure::new("file", 2, HookStage::Handle, LoggerError::other("disk full"));
        assert_eq!(failure.to_string(), "plugin #2 'file' failed in handle: disk full");
        assert!(!failure.is_panic());

        match failure.into_error() {
            LoggerError::Plugin { plugin, stage, .. } => {
                assert_eq!(plugin, "file");
                assert_eq!(stage, HookStage::Handle);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&FailurePolicy::FailFast).expect("serialize");
        assert_eq!(json, "\"FailFast\"");
        let policy: FailurePolicy = serde_json::from_str("\"Isolate\"").expect("deserialize");
        assert_eq!(policy, FailurePolicy::Isolate);
    }
}
