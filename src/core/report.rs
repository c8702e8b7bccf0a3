//! Outcomes of dispatch, flush and plugin initialization

use super::failure::PluginFailure;

/// Why an event was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// The level is not in the configured set
    Level,
    /// The filter returned `false`
    Filter,
}

/// Result of a fan-out that reached the plugins
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Number of plugins the event was handed to
    pub plugins: usize,
    /// Failed hook chains, in plugin order
    pub failures: Vec<PluginFailure>,
}

impl DispatchReport {
    /// Whether every plugin completed its hook chain
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of plugins whose hook chain completed
    pub fn delivered(&self) -> usize {
        self.plugins.saturating_sub(self.failures.len())
    }
}

/// Outcome of a successful `log` call
///
/// A suppressed event is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Suppressed(Suppression),
    Dispatched(DispatchReport),
}

impl Dispatch {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Dispatch::Dispatched(_))
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Dispatch::Suppressed(_))
    }

    pub fn suppression(&self) -> Option<Suppression> {
        match self {
            Dispatch::Suppressed(reason) => Some(*reason),
            Dispatch::Dispatched(_) => None,
        }
    }

    /// Plugin failures collected during fan-out (empty when suppressed)
    pub fn failures(&self) -> &[PluginFailure] {
        match self {
            Dispatch::Dispatched(report) => &report.failures,
            Dispatch::Suppressed(_) => &[],
        }
    }
}

/// Outcome of the background plugin initialization
#[derive(Debug, Clone, Default)]
pub struct InitReport {
    /// `false` when initialization was cancelled before finishing,
    /// e.g. because the runtime shut down
    pub completed: bool,
    pub failures: Vec<PluginFailure>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.completed && self.failures.is_empty()
    }
}
