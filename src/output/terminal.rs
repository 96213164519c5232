//! Terminal rendering of insights and decompiled code.

use crate::insights::{lens_summary, FileInsight, FunctionInsight};
use crate::parser::schema::EventKind;
use colored::*;

/// Summary of every function in a file, one line each
pub fn render_file_insights(file: &FileInsight) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", file.filename.bold()));

    for function in &file.functions {
        let summary = lens_summary(function);
        let summary = if function.was_deoptimized {
            summary.yellow()
        } else if function.is_compiled {
            summary.green()
        } else {
            summary.normal()
        };

        out.push_str(&format!(
            "  {:>5}:{:<4} {:<24} {}\n",
            function.declaration.line + 1,
            function.declaration.column,
            function.name,
            summary
        ));
    }

    out
}

/// Chronological event list of one function
pub fn render_history(function: &FunctionInsight) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", function.name.bold(), lens_summary(function)));

    for event in &function.events {
        let detail = match &event.kind {
            EventKind::Parse { memory } | EventKind::CompileEnd { memory } => {
                format!("{} ({} bytes)", memory.start, memory.size)
            }
            EventKind::CompileStart => String::new(),
            EventKind::Deoptimize { reason, from } => {
                format!("{} at {}", reason.red(), from)
            }
        };
        out.push_str(&format!("  {:>10}  {:<14} {}\n", event.at, event.label(), detail));
    }

    out
}

/// Highlight returns, jumps, nops and label definitions
///
/// Each line gets a one-based number, the one `code --rename` refers to.
pub fn render_code(code: &str) -> String {
    code.lines()
        .enumerate()
        .map(|(index, line)| {
            let number = format!("{:>4}", index + 1);
            format!("{} {}", number.dimmed(), highlight_code_line(line))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn highlight_code_line(line: &str) -> String {
    if !line.starts_with(' ') && line.ends_with(':') {
        return line.bold().to_string();
    }

    let instruction = line.trim_start();
    if instruction.starts_with("ret") {
        line.white().on_red().to_string()
    } else if instruction.starts_with('j') {
        line.yellow().bold().to_string()
    } else if instruction.starts_with("nop") {
        line.dimmed().to_string()
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_code_numbers_lines() {
        colored::control::set_override(false);
        let code = "loop0:\n  nop\n  jnz loop0\n  ret";
        assert_eq!(
            render_code(code),
            "   1 loop0:\n   2   nop\n   3   jnz loop0\n   4   ret"
        );
    }
}
