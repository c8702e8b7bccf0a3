//! Logging macros for passing extras without building the vector by hand.
//!
//! Every argument after the message is converted with `Value::from`. The
//! macros expand to the dispatch future, so they are awaited like the
//! methods they wrap.
//!
//! # Examples
//!
//! ```
//! use plugin_logger::prelude::*;
//! use plugin_logger::info;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> plugin_logger::Result<()> {
//! let logger = Logger::builder().build()?;
//!
//! // Message only
//! info!(logger, "Server started").await?;
//!
//! // With extras
//! let port = 8080;
//! info!(logger, "Server listening", port, "tcp").await?;
//! # Ok(())
//! # }
//! ```

/// Log a message at any level, converting extras with `Value::from`.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> plugin_logger::Result<()> {
/// # let logger = Logger::builder().levels(["audit"]).build()?;
/// use plugin_logger::log;
/// log!(logger, "audit", "record removed", 42).await?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr $(, $extra:expr)* $(,)?) => {
        $logger.log($level, $message, vec![$($crate::Value::from($extra)),*])
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $message:expr $(, $extra:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG, $message $(, $extra)*)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use plugin_logger::prelude::*;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> plugin_logger::Result<()> {
/// # let logger = Logger::builder().build()?;
/// use plugin_logger::info;
/// let user = Object::new().with_field("user", "X");
/// info!(logger, "Hello", user).await?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $message:expr $(, $extra:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::INFO, $message $(, $extra)*)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $message:expr $(, $extra:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::WARN, $message $(, $extra)*)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $message:expr $(, $extra:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::ERROR, $message $(, $extra)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Logger, LogEvent, Value};
    use crate::plugins::HookPlugin;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_macros_forward_extras_in_order() {
        let seen: Arc<Mutex<Vec<(String, Vec<Value>)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let logger = Logger::builder()
            .plugin(
                HookPlugin::builder("recorder")
                    .handle(move |event: &LogEvent| {
                        sink.lock()
                            .push((event.level.to_string(), event.extras.clone()));
                        Ok(())
                    })
                    .build(),
            )
            .build()
            .expect("logger");

        info!(logger, "a").await.expect("info");
        warn!(logger, "b", 1, "two").await.expect("warn");
        error!(logger, "c", true,).await.expect("error");
        debug!(logger, "d", 2.5).await.expect("debug");

        let seen = seen.lock();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], ("info".to_string(), vec![]));
        assert_eq!(
            seen[1],
            ("warn".to_string(), vec![Value::from(1), Value::from("two")])
        );
        assert_eq!(seen[2].1, vec![Value::from(true)]);
        assert_eq!(seen[3].0, "debug");
    }
}
