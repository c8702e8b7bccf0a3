//! Dispatch metrics for observability
//!
//! Counters for monitoring the dispatcher: how many events were delivered,
//! suppressed by level or filter, and how many plugin hooks failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use plugin_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_suppressed_by_level();
///
/// assert_eq!(metrics.events_dispatched(), 1);
/// assert_eq!(metrics.suppressed_by_level(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Events that reached the plugin fan-out
    events_dispatched: AtomicU64,

    /// Events dropped because their level is not configured
    suppressed_by_level: AtomicU64,

    /// Events rejected by the filter
    suppressed_by_filter: AtomicU64,

    /// Log calls that failed in the filter or formatter
    pipeline_errors: AtomicU64,

    /// Individual plugin hook failures during dispatch or flush
    plugin_failures: AtomicU64,

    /// Dispatched events with at least one plugin failure
    failed_events: AtomicU64,

    /// Plugin `init` failures
    init_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            events_dispatched: AtomicU64::new(0),
            suppressed_by_level: AtomicU64::new(0),
            suppressed_by_filter: AtomicU64::new(0),
            pipeline_errors: AtomicU64::new(0),
            plugin_failures: AtomicU64::new(0),
            failed_events: AtomicU64::new(0),
            init_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_by_level(&self) -> u64 {
        self.suppressed_by_level.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_by_filter(&self) -> u64 {
        self.suppressed_by_filter.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pipeline_errors(&self) -> u64 {
        self.pipeline_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn plugin_failures(&self) -> u64 {
        self.plugin_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_events(&self) -> u64 {
        self.failed_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn init_failures(&self) -> u64 {
        self.init_failures.load(Ordering::Relaxed)
    }

    /// Record an event that reached the fan-out
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed_by_level(&self) -> u64 {
        self.suppressed_by_level.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed_by_filter(&self) -> u64 {
        self.suppressed_by_filter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_pipeline_error(&self) -> u64 {
        self.pipeline_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Record `count` plugin failures
    #[inline]
    pub fn record_plugin_failures(&self, count: u64) -> u64 {
        self.plugin_failures.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed_event(&self) -> u64 {
        self.failed_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_init_failures(&self, count: u64) -> u64 {
        self.init_failures.fetch_add(count, Ordering::Relaxed)
    }

    /// Share of dispatched events with at least one failed plugin (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.events_dispatched() as f64;
        if dispatched == 0.0 {
            0.0
        } else {
            (self.failed_events() as f64 / dispatched) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
        self.suppressed_by_level.store(0, Ordering::Relaxed);
        self.suppressed_by_filter.store(0, Ordering::Relaxed);
        self.pipeline_errors.store(0, Ordering::Relaxed);
        self.plugin_failures.store(0, Ordering::Relaxed);
        self.failed_events.store(0, Ordering::Relaxed);
        self.init_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            events_dispatched: AtomicU64::new(self.events_dispatched()),
            suppressed_by_level: AtomicU64::new(self.suppressed_by_level()),
            suppressed_by_filter: AtomicU64::new(self.suppressed_by_filter()),
            pipeline_errors: AtomicU64::new(self.pipeline_errors()),
            plugin_failures: AtomicU64::new(self.plugin_failures()),
            failed_events: AtomicU64::new(self.failed_events()),
            init_failures: AtomicU64::new(self.init_failures()),
        }
    }
}
