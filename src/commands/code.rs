//! Code command implementation.
//!
//! Shows the most recent optimized code of a function, decompiled with
//! labels or as the raw instruction block.

use crate::commands::models::CodeArgs;
use crate::commands::select_function;
use crate::insights::{has_compiled_code, last_compiled_code};
use crate::output::render_code;
use crate::session::{code_context, InsightSession};
use anyhow::{Context, Result};
use log::{info, warn};

/// Execute the code command
///
/// # Errors
/// * Missing logs
/// * Unknown function, or a function that was never optimized
pub fn execute_code(args: CodeArgs) -> Result<()> {
    let mut session = InsightSession::new(args.config.clone());
    session.analyze().context("Failed to analyze event log")?;

    let function = select_function(session.store(), &args.function)?;
    let Some(memory) = last_compiled_code(function) else {
        anyhow::bail!(
            "Failed to find compiled code for function {}",
            function.name
        );
    };
    let address = memory.start.clone();
    if !has_compiled_code(function) {
        warn!("{} was deoptimized, showing its last optimized code", function.name);
    }
    info!("Showing code of {} at {}", function.name, address);

    let lines = session
        .get_optimized_code(&address)
        .context("Failed to read optimized code")?;
    if lines.is_empty() {
        anyhow::bail!("No optimized code logged at {}", address);
    }

    if args.raw {
        println!("{}", lines.join("\n"));
        return Ok(());
    }

    let context = code_context(&address);
    let mut code = session.decompile(&lines, &context);

    if !args.renames.is_empty() {
        for (line, name) in &args.renames {
            // Printed numbers are one-based, label positions are not
            let output_line = line.saturating_sub(1);
            match session.labels_mut().rename_label(&context, output_line, name) {
                Some(previous) => info!("Renamed {} to {}", previous, name),
                None => warn!("No label on output line {}", line),
            }
        }
        // Re-render so definitions and references pick up the new names
        session.labels_mut().reset_statistics(&context);
        code = session.decompile(&lines, &context);
    }

    println!("{}", render_code(&code));
    Ok(())
}
