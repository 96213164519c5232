//! History command implementation.

use crate::commands::models::HistoryArgs;
use crate::commands::select_function;
use crate::insights::history_json;
use crate::output::render_history;
use crate::session::InsightSession;
use anyhow::{Context, Result};

/// Print the event history of one function
pub fn execute_history(args: HistoryArgs) -> Result<()> {
    let mut session = InsightSession::new(args.config.clone());
    session.analyze().context("Failed to analyze event log")?;

    let function = select_function(session.store(), &args.function)?;

    if args.json {
        println!("{}", history_json(function)?);
    } else {
        print!("{}", render_history(function));
    }

    Ok(())
}
