//! Configuration and constants for the CLI.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Folder (relative to the project root) the instrumented program logs into
pub const DEFAULT_INSIGHTS_DIR: &str = ".v8-insights";

/// File name of the V8 event log inside the insights folder
pub const EVENT_LOG_NAME: &str = "log";

/// File name of the optimized code dump inside the insights folder
pub const OPT_CODE_LOG_NAME: &str = "opt-code";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "v8-insights.toml";

/// Bytes requested from the log stream per read
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Column after which the instruction text of a disassembly line starts
pub const INSTRUCTION_SEARCH_OFFSET: usize = 30;

/// Runtime configuration
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```toml
/// insights_dir = "traces"
/// chunk_size = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding both trace logs
    pub insights_dir: PathBuf,

    /// Event log file name
    pub event_log: String,

    /// Optimized code log file name
    pub opt_code_log: String,

    /// Read size for the line reader
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            insights_dir: PathBuf::from(DEFAULT_INSIGHTS_DIR),
            event_log: EVENT_LOG_NAME.to_string(),
            opt_code_log: OPT_CODE_LOG_NAME.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// * `ConfigError::Io` - If file cannot be read
    /// * `ConfigError::Toml` - If TOML is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Use a different insights folder
    pub fn with_insights_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.insights_dir = dir.into();
        self
    }

    /// Full path of the event log
    pub fn event_log_path(&self) -> PathBuf {
        self.insights_dir.join(&self.event_log)
    }

    /// Full path of the optimized code log
    pub fn opt_code_log_path(&self) -> PathBuf {
        self.insights_dir.join(&self.opt_code_log)
    }
}
