//! Caller-supplied pipeline stages: filter and formatter
//!
//! Both stages may suspend and may fail. A failure is returned from the
//! triggering `log` call, unlike plugin failures which are isolated.

use super::error::Result;
use super::log_event::LogEvent;
use super::value::Value;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type FilterFn = dyn Fn(&LogEvent) -> BoxFuture<'static, Result<bool>> + Send + Sync;
type FormatFn = dyn Fn(&LogEvent) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// Predicate deciding whether an event is dispatched
///
/// Sees the event with its original, unformatted message.
///
/// # Example
///
/// ```
/// use plugin_logger::{Filter, LogEvent};
///
/// let only_with_extras = Filter::new(|event: &LogEvent| !event.extras.is_empty());
/// ```
#[derive(Clone)]
pub struct Filter(Arc<FilterFn>);

impl Filter {
    /// Infallible synchronous predicate
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&LogEvent) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| {
            future::ready(Ok(predicate(event))).boxed()
        }))
    }

    /// Synchronous predicate that may fail
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<bool> + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| {
            future::ready(predicate(event)).boxed()
        }))
    }

    /// Asynchronous predicate; the returned future must own what it needs
    pub fn from_async<F, Fut>(predicate: F) -> Self
    where
        F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| predicate(event).boxed()))
    }

    pub async fn evaluate(&self, event: &LogEvent) -> Result<bool> {
        (self.0)(event).await
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Transform producing the message every plugin sees
///
/// Runs at most once per log call, after the filter.
///
/// # Example
///
/// ```
/// use plugin_logger::{Formatter, LogEvent, Value};
///
/// let tagged = Formatter::new(|event: &LogEvent| {
///     Value::from(format!("[{}] {}", event.level.to_uppercase(), event.message))
/// });
/// ```
#[derive(Clone)]
pub struct Formatter(Arc<FormatFn>);

impl Formatter {
    /// Infallible synchronous transform
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&LogEvent) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| {
            future::ready(Ok(transform(event))).boxed()
        }))
    }

    /// Synchronous transform that may fail
    pub fn fallible<F>(transform: F) -> Self
    where
        F: Fn(&LogEvent) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| {
            future::ready(transform(event)).boxed()
        }))
    }

    /// Asynchronous transform; the returned future must own what it needs
    pub fn from_async<F, Fut>(transform: F) -> Self
    where
        F: Fn(&LogEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self(Arc::new(move |event: &LogEvent| transform(event).boxed()))
    }

    pub async fn apply(&self, event: &LogEvent) -> Result<Value> {
        (self.0)(event).await
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}
