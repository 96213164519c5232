use crate::utils::config::Config;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Resolved configuration
    pub config: Config,

    /// Only summarize this source file (path without `file://`)
    pub file: Option<String>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print per-function summaries to stdout
    pub print_summary: bool,
}

/// A function picked by its declaration line
#[derive(Debug, Clone, Default)]
pub struct FunctionSelector {
    /// Source file path (without `file://`)
    pub file: String,

    /// One-based declaration line, as shown by editors
    pub line: u32,
}

/// Arguments for the history command
#[derive(Debug, Clone, Default)]
pub struct HistoryArgs {
    pub config: Config,
    pub function: FunctionSelector,

    /// Print raw JSON instead of a table
    pub json: bool,
}

/// Arguments for the code command
#[derive(Debug, Clone, Default)]
pub struct CodeArgs {
    pub config: Config,
    pub function: FunctionSelector,

    /// Print the instruction block without decompiling
    pub raw: bool,

    /// Label renames as (one-based output line, new name), applied before printing
    pub renames: Vec<(usize, String)>,
}
