//! Closure-backed plugin
//!
//! Every hook is optional, including `handle`. A `HookPlugin` built without
//! one reports `has_handler() == false` and the logger leaves it out.

use crate::core::{LogEvent, Plugin, PluginConfig, Result};
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type EventHook = Arc<dyn Fn(&LogEvent) -> BoxFuture<'static, Result<()>> + Send + Sync>;
type InitHook = Arc<dyn Fn(&PluginConfig) -> BoxFuture<'static, Result<()>> + Send + Sync>;

fn sync_hook<F>(hook: F) -> EventHook
where
    F: Fn(&LogEvent) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(move |event: &LogEvent| future::ready(hook(event)).boxed())
}

fn async_hook<F, Fut>(hook: F) -> EventHook
where
    F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |event: &LogEvent| hook(event).boxed())
}

/// Plugin assembled from closures
///
/// # Example
///
/// ```
/// use plugin_logger::plugins::HookPlugin;
/// use plugin_logger::Plugin;
///
/// let audit = HookPlugin::builder("audit")
///     .handle(|event| {
///         println!("audit: {}", event.message);
///         Ok(())
///     })
///     .build();
///
/// assert!(audit.has_handler());
/// ```
#[derive(Clone)]
pub struct HookPlugin {
    name: String,
    init: Option<InitHook>,
    before: Option<EventHook>,
    handle: Option<EventHook>,
    after: Option<EventHook>,
}

impl HookPlugin {
    pub fn builder(name: impl Into<String>) -> HookPluginBuilder {
        HookPluginBuilder {
            plugin: HookPlugin {
                name: name.into(),
                init: None,
                before: None,
                handle: None,
                after: None,
            },
        }
    }
}

impl fmt::Debug for HookPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookPlugin")
            .field("name", &self.name)
            .field("init", &self.init.is_some())
            .field("before", &self.before.is_some())
            .field("handle", &self.handle.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

#[async_trait]
impl Plugin for HookPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_handler(&self) -> bool {
        self.handle.is_some()
    }

    async fn init(&self, config: &PluginConfig) -> Result<()> {
        match &self.init {
            Some(hook) => hook(config).await,
            None => Ok(()),
        }
    }

    async fn before(&self, event: &LogEvent) -> Result<()> {
        match &self.before {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }

    async fn handle(&self, event: &LogEvent) -> Result<()> {
        match &self.handle {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }

    async fn after(&self, event: &LogEvent) -> Result<()> {
        match &self.after {
            Some(hook) => hook(event).await,
            None => Ok(()),
        }
    }
}

/// Builder for [`HookPlugin`]
///
/// Plain methods take synchronous closures; the `_async` variants take
/// closures returning a future that owns whatever it needs from the event.
#[must_use = "builder methods return a new value"]
pub struct HookPluginBuilder {
    plugin: HookPlugin,
}

impl HookPluginBuilder {
    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PluginConfig) -> Result<()> + Send + Sync + 'static,
    {
        self.plugin.init = Some(Arc::new(move |config: &PluginConfig| {
            future::ready(hook(config)).boxed()
        }));
        self
    }

    pub fn init_async<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&PluginConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.plugin.init = Some(Arc::new(move |config: &PluginConfig| hook(config).boxed()));
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.plugin.before = Some(sync_hook(hook));
        self
    }

    pub fn before_async<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.plugin.before = Some(async_hook(hook));
        self
    }

    pub fn handle<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.plugin.handle = Some(sync_hook(hook));
        self
    }

    pub fn handle_async<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.plugin.handle = Some(async_hook(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.plugin.after = Some(sync_hook(hook));
        self
    }

    pub fn after_async<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.plugin.after = Some(async_hook(hook));
        self
    }

    pub fn build(self) -> HookPlugin {
        self.plugin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, LogLevel, Value};
    use parking_lot::Mutex;

    fn event() -> LogEvent {
        LogEvent::new(LogLevel::WARN, Context::new(), Value::from("disk low"), vec![])
    }

    #[test]
    fn test_without_handle_has_no_handler() {
        let plugin = HookPlugin::builder("bare").before(|_| Ok(())).build();
        assert!(!plugin.has_handler());
        assert_eq!(plugin.name(), "bare");
    }

    #[tokio::test]
    async fn test_hooks_are_invoked() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let before = seen.clone();
        let handle = seen.clone();

        let plugin = HookPlugin::builder("recorder")
            .before(move |event| {
                before.lock().push(format!("before {}", event.level));
                Ok(())
            })
            .handle_async(move |event| {
                let handle = handle.clone();
                let message = event.message.to_string();
                async move {
                    tokio::task::yield_now().await;
                    handle.lock().push(format!("handle {}", message));
                    Ok(())
                }
            })
            .build();

        let event = event();
        plugin.before(&event).await.expect("before");
        plugin.handle(&event).await.expect("handle");
        plugin.after(&event).await.expect("after is a no-op");

        assert_eq!(*seen.lock(), vec!["before warn", "handle disk low"]);
    }
}
