//! Main dispatcher implementation

use super::context::Context;
use super::error::{LoggerError, Result};
use super::failure::{FailureCallback, FailurePolicy, HookStage, PluginFailure};
use super::log_event::LogEvent;
use super::log_level::{LevelSet, LogLevel};
use super::metrics::DispatchMetrics;
use super::pipeline::{Filter, Formatter};
use super::plugin::{Plugin, PluginConfig};
use super::report::{Dispatch, DispatchReport, InitReport, Suppression};
use super::value::Value;
use futures::future::{join_all, try_join_all, FutureExt};
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;

/// Settings a [`Logger`] is built from
///
/// Usually filled by [`LoggerBuilder`]. Nothing in here can change once the
/// logger exists.
#[derive(Clone, Default)]
pub struct LoggerConfig {
    pub levels: LevelSet,
    pub plugins: Vec<Arc<dyn Plugin>>,
    pub context: Context,
    pub filter: Option<Filter>,
    pub format: Option<Formatter>,
    pub failure_policy: FailurePolicy,
    pub on_failure: Option<FailureCallback>,
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("levels", &self.levels)
            .field("plugins", &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("context", &self.context)
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("failure_policy", &self.failure_policy)
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Dispatchable plugins paired with their position in the configured list
type Slots = Arc<[(usize, Arc<dyn Plugin>)]>;

/// Structured log dispatcher
///
/// Every call is gated by level, optionally filtered and formatted, then
/// fanned out to all plugins concurrently. One plugin failing never stops
/// the others unless [`FailurePolicy::FailFast`] is configured.
///
/// # Example
///
/// ```
/// use plugin_logger::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> plugin_logger::Result<()> {
/// let logger = Logger::builder()
///     .levels(["info", "error"])
///     .context_field("service", "billing")
///     .plugin(HookPlugin::builder("stdout").handle(|event| {
///         println!("{} {}", event.level, event.message);
///         Ok(())
///     }).build())
///     .build()?;
///
/// logger.info("started", vec![]).await?;
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    levels: LevelSet,
    plugins: Slots,
    context: Context,
    filter: Option<Filter>,
    format: Option<Formatter>,
    failure_policy: FailurePolicy,
    on_failure: Option<FailureCallback>,
    metrics: Arc<DispatchMetrics>,
    ready: watch::Receiver<Option<InitReport>>,
}

impl Logger {
    /// Create a logger and start initializing its plugins
    ///
    /// Plugin `init` hooks run concurrently on a spawned task; the logger is
    /// usable right away. Await [`ready`](Logger::ready) to observe the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::MissingRuntime`] when called outside of a
    /// Tokio runtime.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| LoggerError::MissingRuntime)?;

        let LoggerConfig {
            levels,
            plugins,
            context,
            filter,
            format,
            failure_policy,
            on_failure,
        } = config;

        let mut dispatchable = Vec::with_capacity(plugins.len());
        for (idx, plugin) in plugins.into_iter().enumerate() {
            if plugin.has_handler() {
                dispatchable.push((idx, plugin));
            } else {
                eprintln!(
                    "[LOGGER WARNING] Plugin #{} '{}' has no handle hook and will not receive events",
                    idx,
                    plugin.name()
                );
            }
        }
        let plugins: Slots = dispatchable.into();

        let plugin_config = PluginConfig {
            levels: levels.clone(),
            context: context.clone(),
            failure_policy,
            plugin_count: plugins.len(),
        };

        let metrics = Arc::new(DispatchMetrics::new());
        let (ready_tx, ready) = watch::channel(None);

        runtime.spawn(initialize_plugins(
            Arc::clone(&plugins),
            plugin_config,
            ready_tx,
            Arc::clone(&metrics),
            on_failure.clone(),
        ));

        Ok(Self {
            levels,
            plugins,
            context,
            filter,
            format,
            failure_policy,
            on_failure,
            metrics,
            ready,
        })
    }

    /// Dispatch one event
    ///
    /// Resolves once every plugin's `before` → `handle` → `after` chain has
    /// finished.
    ///
    /// # Errors
    ///
    /// Filter and format failures are returned as [`LoggerError::Pipeline`].
    /// Plugin failures are only returned under [`FailurePolicy::FailFast`];
    /// otherwise they are part of the [`DispatchReport`].
    pub async fn log(
        &self,
        level: impl Into<LogLevel>,
        message: impl Into<Value>,
        extras: Vec<Value>,
    ) -> Result<Dispatch> {
        let level = level.into();
        if !self.levels.contains(&level) {
            self.metrics.record_suppressed_by_level();
            return Ok(Dispatch::Suppressed(Suppression::Level));
        }

        let mut event = LogEvent::new(level, self.context.clone(), message.into(), extras);

        if let Some(filter) = &self.filter {
            let keep = filter.evaluate(&event).await.map_err(|e| {
                self.metrics.record_pipeline_error();
                LoggerError::filter(e)
            })?;
            if !keep {
                self.metrics.record_suppressed_by_filter();
                return Ok(Dispatch::Suppressed(Suppression::Filter));
            }
        }

        if let Some(format) = &self.format {
            event.message = format.apply(&event).await.map_err(|e| {
                self.metrics.record_pipeline_error();
                LoggerError::format(e)
            })?;
        }

        self.metrics.record_dispatched();
        let failures = self.fan_out(&event).await?;

        Ok(Dispatch::Dispatched(DispatchReport {
            plugins: self.plugins.len(),
            failures,
        }))
    }

    pub async fn info(&self, message: impl Into<Value>, extras: Vec<Value>) -> Result<Dispatch> {
        self.log(LogLevel::INFO, message, extras).await
    }

    pub async fn warn(&self, message: impl Into<Value>, extras: Vec<Value>) -> Result<Dispatch> {
        self.log(LogLevel::WARN, message, extras).await
    }

    pub async fn error(&self, message: impl Into<Value>, extras: Vec<Value>) -> Result<Dispatch> {
        self.log(LogLevel::ERROR, message, extras).await
    }

    pub async fn debug(&self, message: impl Into<Value>, extras: Vec<Value>) -> Result<Dispatch> {
        self.log(LogLevel::DEBUG, message, extras).await
    }

    async fn fan_out(&self, event: &LogEvent) -> Result<Vec<PluginFailure>> {
        let chains = self
            .plugins
            .iter()
            .map(|(idx, plugin)| run_chain(*idx, plugin.as_ref(), event));

        match self.failure_policy {
            FailurePolicy::Isolate => {
                let failures: Vec<PluginFailure> = join_all(chains)
                    .await
                    .into_iter()
                    .filter_map(|outcome| outcome.err())
                    .collect();
                self.report_failures(&failures);
                Ok(failures)
            }
            FailurePolicy::FailFast => match try_join_all(chains).await {
                Ok(_) => Ok(Vec::new()),
                Err(failure) => {
                    self.report_failures(std::slice::from_ref(&failure));
                    Err(failure.into_error())
                }
            },
        }
    }

    fn report_failures(&self, failures: &[PluginFailure]) {
        if failures.is_empty() {
            return;
        }
        self.metrics.record_plugin_failures(failures.len() as u64);
        self.metrics.record_failed_event();
        for failure in failures {
            report_failure(self.on_failure.as_ref(), failure);
        }
    }

    /// Flush every plugin concurrently
    ///
    /// Under [`FailurePolicy::Isolate`] all failures are returned in plugin
    /// order; under [`FailurePolicy::FailFast`] the first one is the error.
    pub async fn flush(&self) -> Result<Vec<PluginFailure>> {
        let flushes = self.plugins.iter().map(|(idx, plugin)| async move {
            guarded(plugin.flush())
                .await
                .map_err(|e| PluginFailure::new(plugin.name(), *idx, HookStage::Flush, e))
        });

        let mut failures: Vec<PluginFailure> = join_all(flushes)
            .await
            .into_iter()
            .filter_map(|outcome| outcome.err())
            .collect();

        if !failures.is_empty() {
            self.metrics.record_plugin_failures(failures.len() as u64);
            for failure in &failures {
                report_failure(self.on_failure.as_ref(), failure);
            }
        }

        match self.failure_policy {
            FailurePolicy::FailFast if !failures.is_empty() => Err(failures.remove(0).into_error()),
            _ => Ok(failures),
        }
    }

    /// Wait until every plugin's `init` hook has finished
    ///
    /// Returns immediately once initialization is done. Logging does not
    /// need to wait for this.
    pub async fn ready(&self) -> InitReport {
        let mut ready = self.ready.clone();
        let report = match ready.wait_for(Option::is_some).await {
            Ok(state) => (*state).clone().unwrap_or_default(),
            // Init task was dropped before reporting, e.g. runtime shutdown
            Err(_) => InitReport::default(),
        };
        report
    }

    /// Whether plugin initialization has finished
    pub fn is_ready(&self) -> bool {
        self.ready.borrow().is_some()
    }

    /// Get dispatch metrics
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Number of plugins taking part in dispatch
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|(_, p)| p.name()).collect()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("levels", &self.levels)
            .field("plugins", &self.plugin_names())
            .field("context", &self.context)
            .field("failure_policy", &self.failure_policy)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

/// Await a hook, turning a panic into an error
async fn guarded<F>(hook: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(hook).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(LoggerError::from_panic(panic)),
    }
}

/// Run one plugin's hooks for an event; a failing hook ends the chain
async fn run_chain(
    idx: usize,
    plugin: &dyn Plugin,
    event: &LogEvent,
) -> std::result::Result<(), PluginFailure> {
    let failure =
        |stage: HookStage, error: LoggerError| PluginFailure::new(plugin.name(), idx, stage, error);

    guarded(plugin.before(event))
        .await
        .map_err(|e| failure(HookStage::Before, e))?;
    guarded(plugin.handle(event))
        .await
        .map_err(|e| failure(HookStage::Handle, e))?;
    guarded(plugin.after(event))
        .await
        .map_err(|e| failure(HookStage::After, e))?;
    Ok(())
}

async fn initialize_plugins(
    plugins: Slots,
    config: PluginConfig,
    ready: watch::Sender<Option<InitReport>>,
    metrics: Arc<DispatchMetrics>,
    on_failure: Option<FailureCallback>,
) {
    let config = &config;
    let inits = plugins.iter().map(|(idx, plugin)| async move {
        guarded(plugin.init(config))
            .await
            .map_err(|e| PluginFailure::new(plugin.name(), *idx, HookStage::Init, e))
    });

    let failures: Vec<PluginFailure> = join_all(inits)
        .await
        .into_iter()
        .filter_map(|outcome| outcome.err())
        .collect();

    if !failures.is_empty() {
        metrics.record_init_failures(failures.len() as u64);
        for failure in &failures {
            report_failure(on_failure.as_ref(), failure);
        }
    }

    ready.send_replace(Some(InitReport {
        completed: true,
        failures,
    }));
}

fn report_failure(on_failure: Option<&FailureCallback>, failure: &PluginFailure) {
    match on_failure {
        Some(callback) => {
            if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(|| callback(failure))) {
                eprintln!(
                    "[LOGGER CRITICAL] Failure callback panicked: {}",
                    LoggerError::from_panic(panic)
                );
            }
        }
        None if failure.is_panic() => eprintln!(
            "[LOGGER CRITICAL] Plugin #{} '{}' panicked in {}: {}. \
             Other plugins continue to function.",
            failure.index, failure.plugin, failure.stage, failure.error
        ),
        None => eprintln!(
            "[LOGGER ERROR] Plugin #{} '{}' failed in {}: {}",
            failure.index, failure.plugin, failure.stage, failure.error
        ),
    }
}

/// Builder for creating a Logger
///
/// # Example
/// ```
/// use plugin_logger::prelude::*;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> plugin_logger::Result<()> {
/// let logger = Logger::builder()
///     .levels(["info", "warn", "error", "audit"])
///     .filter(|event: &LogEvent| event.message != Value::from("noise"))
///     .failure_policy(FailurePolicy::Isolate)
///     .on_failure(Arc::new(|failure: &PluginFailure| {
///         eprintln!("ALERT: {}", failure);
///     }))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    levels: Option<Vec<LogLevel>>,
    config: LoggerConfig,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted level tags
    ///
    /// Validated in [`build`](LoggerBuilder::build). Defaults to
    /// [`DEFAULT_LEVELS`](crate::core::DEFAULT_LEVELS).
    #[must_use = "builder methods return a new value"]
    pub fn levels<I, L>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LogLevel>,
    {
        self.levels = Some(levels.into_iter().map(Into::into).collect());
        self
    }

    /// Use an already validated level set
    #[must_use = "builder methods return a new value"]
    pub fn level_set(mut self, levels: LevelSet) -> Self {
        self.levels = None;
        self.config.levels = levels;
        self
    }

    /// Add a plugin
    #[must_use = "builder methods return a new value"]
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.config.plugins.push(Arc::new(plugin));
        self
    }

    /// Add a plugin that is shared with other owners
    #[must_use = "builder methods return a new value"]
    pub fn shared_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.config.plugins.push(plugin);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn plugins<I>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Plugin>>,
    {
        self.config.plugins.extend(plugins);
        self
    }

    /// Replace the shared context
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: Context) -> Self {
        self.config.context = context;
        self
    }

    /// Add one context field
    #[must_use = "builder methods return a new value"]
    pub fn context_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.context = self.config.context.with_field(key, value);
        self
    }

    /// Set a synchronous filter predicate
    #[must_use = "builder methods return a new value"]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        self.with_filter(Filter::new(predicate))
    }

    /// Set a filter stage built any other way
    #[must_use = "builder methods return a new value"]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.config.filter = Some(filter);
        self
    }

    /// Set a synchronous message transform
    #[must_use = "builder methods return a new value"]
    pub fn format<F>(self, transform: F) -> Self
    where
        F: Fn(&LogEvent) -> Value + Send + Sync + 'static,
    {
        self.with_format(Formatter::new(transform))
    }

    /// Set a format stage built any other way
    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: Formatter) -> Self {
        self.config.format = Some(format);
        self
    }

    /// Set the failure policy
    ///
    /// Default is `Isolate`.
    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Set a callback for plugin failures
    ///
    /// Replaces the default stderr diagnostic.
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.config.on_failure = Some(callback);
        self
    }

    /// Validate the settings without starting a logger
    pub fn into_config(self) -> Result<LoggerConfig> {
        let mut config = self.config;
        if let Some(levels) = self.levels {
            config.levels = LevelSet::new(levels)?;
        }
        Ok(config)
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Fails on an empty level list, an empty level tag, or when no Tokio
    /// runtime is running.
    pub fn build(self) -> Result<Logger> {
        Logger::new(self.into_config()?)
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
