//! File logging example
//!
//! Demonstrates logging to console and file sinks simultaneously, a custom
//! closure plugin, failure reporting and cyclic values.
//!
//! Run with: cargo run --example file_logging

use plugin_logger::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Plugin Logger - File Logging Example ===\n");

    let flaky = HookPlugin::builder("flaky-api")
        .handle(|event| {
            if event.level == "error" {
                return Err(LoggerError::writer("remote endpoint unavailable"));
            }
            Ok(())
        })
        .build();

    let logger = Logger::builder()
        .plugin(ConsoleSink::new())
        .plugin(FileSink::new("logs/application.log"))
        .plugin(flaky)
        .on_failure(Arc::new(|failure: &PluginFailure| {
            eprintln!("   plugin failure reported: {}", failure);
        }))
        .build()?;

    let init = logger.ready().await;
    println!("Plugins initialized (failures: {})\n", init.failures.len());

    println!("1. Logging to both console and file:");
    logger.info("Application started", vec![]).await?;
    logger.debug("Loading configuration...", vec![]).await?;
    logger.warn("Using default settings for some options", vec![]).await?;
    logger.error("Failed to load optional plugin", vec![]).await?;

    println!("\n2. Logging a self-referencing value:");
    let session = Object::new().with_field("id", "s-1");
    session.insert("owner", Object::new().with_field("session", session.clone()));
    logger.info("Session restored", vec![Value::from(session)]).await?;

    for failure in logger.flush().await? {
        eprintln!("   flush failed: {}", failure);
    }

    let metrics = logger.metrics();
    println!("\n=== Example completed successfully! ===");
    println!(
        "Dispatched {} events, {} plugin failures",
        metrics.events_dispatched(),
        metrics.plugin_failures()
    );
    println!("Check 'logs/application.log' for the full log output");

    Ok(())
}
