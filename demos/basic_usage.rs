//! Basic logger usage example
//!
//! Demonstrates console output, level gating, context, filtering and
//! formatting.
//!
//! Run with: cargo run --example basic_usage

use plugin_logger::prelude::*;
use plugin_logger::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Plugin Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .context_field("service", "checkout")
        .plugin(ConsoleSink::new().with_context(true))
        .build()?;

    println!("1. Logging at the default levels:");
    logger.debug("This is a debug message", vec![]).await?;
    logger.info("This is an info message", vec![]).await?;
    logger.warn("This is a warning message", vec![]).await?;
    logger.error("This is an error message", vec![]).await?;

    println!("\n2. Logging with extras:");
    let order = Object::new()
        .with_field("id", 1042)
        .with_field("total", 99.5)
        .with_field("items", vec![Value::from("book"), Value::from("pen")]);
    info!(logger, "Order placed", order, true).await?;

    println!("\n3. Restricting levels:");
    let strict = Logger::builder()
        .levels(["warn", "error"])
        .plugin(ConsoleSink::new())
        .build()?;
    let hidden = strict.info("Info message (hidden)", vec![]).await?;
    println!("   info suppressed: {}", hidden.is_suppressed());
    warn!(strict, "Warning message (visible)").await?;

    println!("\n4. Filter and format:");
    let tagged = Logger::builder()
        .filter(|event: &LogEvent| !event.message.to_string().starts_with("health"))
        .format(|event: &LogEvent| {
            Value::from(format!("[{}] {}", event.level.to_uppercase(), event.message))
        })
        .plugin(ConsoleSink::with_colors(false))
        .build()?;
    tagged.info("healthcheck ok", vec![]).await?;
    tagged.info("user signed in", vec![]).await?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
