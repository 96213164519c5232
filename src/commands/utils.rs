//! Shared helpers for the CLI commands.
//!
//! Also holds the clap value parsers used by `main.rs`.

use crate::output::read_report;
use crate::utils::config::{Config, DEFAULT_CONFIG_FILE, SCHEMA_VERSION};
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Resolve configuration from an explicit file, the default file, or defaults
///
/// `insights_dir` overrides whatever the file says.
pub fn resolve_config(config_path: Option<&Path>, insights_dir: Option<PathBuf>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            debug!("Using config file {}", DEFAULT_CONFIG_FILE);
            Config::load(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load config {}", DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };

    Ok(match insights_dir {
        Some(dir) => config.with_insights_dir(dir),
        None => config,
    })
}

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Event log: {}", report.event_log);
    println!("  Files: {}", report.files.len());
    println!("  Functions: {}", report.function_count);
    println!("  Deoptimized: {}", report.deoptimized_count);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("V8 Insights v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Compilation and deoptimization insights from V8 trace logs.");
}

/// Parse a `LINE=NAME` label rename
///
/// `LINE` is the one-based line number printed next to the decompiled code.
/// Used as a clap value parser, hence the `String` error.
pub fn parse_rename(value: &str) -> Result<(usize, String), String> {
    let (line, name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LINE=NAME, got '{}'", value))?;

    let line = line
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid line '{}': {}", line, e))?;
    if line == 0 {
        return Err("line numbers start at 1".to_string());
    }

    let name = name.trim();
    if name.is_empty() {
        return Err("label name cannot be empty".to_string());
    }

    Ok((line, name.to_string()))
}
