//! V8 Insights CLI
//!
//! Shows which functions V8 optimized, how long that took, which ones were
//! deoptimized and what their optimized code looks like.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use v8_insights::commands::{
    display_version, execute_analyze, execute_clean, execute_code, execute_history,
    execute_instrument, parse_rename, resolve_config, validate_report_file, validate_selector,
    AnalyzeArgs, CodeArgs, FunctionSelector, HistoryArgs,
};

/// V8 Insights - compilation and deoptimization insights from V8 logs
#[derive(Parser, Debug)]
#[command(name = "v8-insights")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Folder holding the V8 logs (defaults to .v8-insights)
    #[arg(short, long, global = true, env = "V8_INSIGHTS_DIR")]
    dir: Option<PathBuf>,

    /// Config file (defaults to ./v8-insights.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a node command with the V8 logging flags added
    Instrument {
        /// Command to instrument, e.g. "node --stack-size=2000 app.js"
        command: String,
    },

    /// Analyze the event log and summarize every function
    Analyze {
        /// Only summarize this source file
        #[arg(short, long)]
        file: Option<String>,

        /// Output path for a JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the per-function summary
        #[arg(long)]
        quiet: bool,
    },

    /// Show the compilation history of a function
    History {
        /// Source file the function is declared in
        #[arg(short, long)]
        file: String,

        /// One-based line of the declaration
        #[arg(short, long)]
        line: u32,

        /// Print the raw event JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the latest optimized code of a function
    Code {
        /// Source file the function is declared in
        #[arg(short, long)]
        file: String,

        /// One-based line of the declaration
        #[arg(short, long)]
        line: u32,

        /// Print instructions without labels
        #[arg(long)]
        raw: bool,

        /// Rename the label on a numbered output line (one-based, as printed), e.g. --rename 3=retry
        #[arg(long, value_parser = parse_rename)]
        rename: Vec<(usize, String)>,
    },

    /// Validate a JSON report file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Remove the logs folder
    Clean,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = resolve_config(cli.config.as_deref(), cli.dir)?;

    // Execute command
    match cli.command {
        Commands::Instrument { command } => {
            execute_instrument(&command, &config)?;
        }

        Commands::Analyze {
            file,
            output,
            quiet,
        } => {
            execute_analyze(AnalyzeArgs {
                config,
                file,
                output_json: output,
                print_summary: !quiet,
            })?;
        }

        Commands::History { file, line, json } => {
            let function = FunctionSelector { file, line };
            validate_selector(&function)?;
            execute_history(HistoryArgs {
                config,
                function,
                json,
            })?;
        }

        Commands::Code {
            file,
            line,
            raw,
            rename,
        } => {
            let function = FunctionSelector { file, line };
            validate_selector(&function)?;
            execute_code(CodeArgs {
                config,
                function,
                raw,
                renames: rename,
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Clean => {
            execute_clean(&config)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
