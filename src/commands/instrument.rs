//! Instrument and clean commands.
//!
//! V8 writes both logs only when node runs with the right flags. These
//! commands build that command line and remove old logs; running the
//! program is left to the user.

use crate::utils::config::Config;
use anyhow::{Context, Result};
use log::{debug, info};

/// Build the V8 flags that produce the event log and the optimized code dump
pub fn instrumentation_args(config: &Config) -> Vec<String> {
    let opt_code = config.opt_code_log_path();
    let event_log = config.event_log_path();

    vec![
        "--no-logfile-per-isolate".to_string(),
        // optional, but usually useful when inspecting V8
        "--allow-natives-syntax".to_string(),
        "--trace-ic".to_string(),
        "--print-opt-code".to_string(),
        "--redirect-code-traces".to_string(),
        format!("--redirect-code-traces-to={}", opt_code.display()),
        format!("--logfile={}", event_log.display()),
    ]
}

/// Add instrumentation flags to a `node [args...] <script>` command
///
/// Flags go after the existing node arguments and before the script.
pub fn instrument_command(command: &str, config: &Config) -> Result<String> {
    let mut words: Vec<&str> = command.split_whitespace().collect();

    match words.first() {
        Some(program) if program.ends_with("node") => {}
        Some(program) => anyhow::bail!("Expected a node command, found '{}'", program),
        None => anyhow::bail!("Command cannot be empty"),
    }
    if words.len() < 2 {
        anyhow::bail!("Command must name a script to run");
    }

    let script = words.pop().unwrap_or_default();
    let program = words.remove(0);

    let mut parts: Vec<String> = vec![program.to_string()];
    parts.extend(words.iter().map(|w| w.to_string()));
    parts.extend(instrumentation_args(config));
    parts.push(script.to_string());

    let enriched = parts.join(" ");
    debug!("Command '{}' enriched as '{}'", command, enriched);
    Ok(enriched)
}

/// Print the instrumented command and prepare the insights folder
pub fn execute_instrument(command: &str, config: &Config) -> Result<()> {
    let enriched = instrument_command(command, config)?;

    std::fs::create_dir_all(&config.insights_dir).with_context(|| {
        format!(
            "Failed to create insights folder {}",
            config.insights_dir.display()
        )
    })?;
    info!("Prepared insights folder at '{}'", config.insights_dir.display());

    println!("{}", enriched);
    Ok(())
}

/// Remove the insights folder and everything in it
pub fn execute_clean(config: &Config) -> Result<()> {
    let dir = &config.insights_dir;
    if !dir.exists() {
        info!("Nothing to clean at {}", dir.display());
        return Ok(());
    }

    std::fs::remove_dir_all(dir)
        .with_context(|| format!("Failed to remove {}", dir.display()))?;
    info!("Successfully cleaned up the V8 insight traces in {}", dir.display());
    Ok(())
}
