//! Plugin implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod hook;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::{FileSink, FileSinkOptions};
pub use hook::{HookPlugin, HookPluginBuilder};

// Re-export the trait so plugin authors need one import
pub use crate::core::Plugin;
