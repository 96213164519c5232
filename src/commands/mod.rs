//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod code;
pub mod history;
pub mod instrument;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::execute_analyze;
pub use code::execute_code;
pub use history::execute_history;
pub use instrument::{execute_clean, execute_instrument, instrument_command};
pub use models::{AnalyzeArgs, CodeArgs, FunctionSelector, HistoryArgs};
pub use utils::{display_version, parse_rename, resolve_config, validate_report_file};

use crate::insights::{FunctionInsight, InsightStore};
use anyhow::Result;

/// Find the function declared on a one-based line of a file
pub fn select_function<'a>(
    store: &'a InsightStore,
    selector: &FunctionSelector,
) -> Result<&'a FunctionInsight> {
    let Some(insights) = store.get_insights(&selector.file) else {
        anyhow::bail!("Unknown file {}", selector.file);
    };

    insights
        .function_at_line(selector.line.saturating_sub(1))
        .ok_or_else(|| anyhow::anyhow!("Unknown function at {}:{}", selector.file, selector.line))
}

/// Validate a function selector before touching any log
pub fn validate_selector(selector: &FunctionSelector) -> Result<()> {
    if selector.file.is_empty() {
        anyhow::bail!("File cannot be empty");
    }

    if selector.line == 0 {
        anyhow::bail!("Line numbers start at 1");
    }

    Ok(())
}
