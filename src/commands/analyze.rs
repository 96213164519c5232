//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the V8 event log
//! 2. Builds per-function insights
//! 3. Prints summaries
//! 4. Optionally writes a JSON report

use crate::commands::models::AnalyzeArgs;
use crate::insights::to_report;
use crate::output::{render_file_insights, write_report};
use crate::session::InsightSession;
use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or unreadable event log
/// * Report write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    let mut session = InsightSession::new(args.config.clone());
    let stats = session.analyze().context("Failed to analyze event log")?;

    if stats.unresolved_deopts > 0 {
        info!(
            "{} deopts referenced code not seen compiling",
            stats.unresolved_deopts
        );
    }

    if args.print_summary {
        match &args.file {
            Some(file) => match session.get_insights(file) {
                Some(insights) => println!("{}", render_file_insights(insights)),
                None => warn!("No insights for file '{}'", file),
            },
            None => {
                for insights in session.store().files() {
                    println!("{}", render_file_insights(insights));
                }
            }
        }
    }

    if let Some(path) = &args.output_json {
        let event_log = args.config.event_log_path().display().to_string();
        let report = to_report(session.store(), &event_log);
        write_report(&report, path).context("Failed to write insight report")?;
        info!("✓ Report written to: {}", path.display());
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
