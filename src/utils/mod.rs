//! Utility modules for configuration, error handling, and formatting.

pub mod config;
pub mod duration;
pub mod error;

// Re-export commonly used error types for convenience
pub use duration::format_duration;
pub use error::{ConfigError, OutputError, TraceError};
