//! Per-function summaries for collaborators (terminal, editors).

use super::store::FunctionInsight;
use crate::parser::schema::MemoryArea;
use crate::utils::format_duration;

/// One-line status of a function
///
/// `"compiled in 1ms 500μs"` or `"interpreted"`, with `" - was deoptimized"`
/// appended once the function lost optimized code.
pub fn lens_summary(function: &FunctionInsight) -> String {
    let mut summary = if function.is_compiled {
        format!("compiled in {}", format_duration(function.compile_time))
    } else {
        "interpreted".to_string()
    };

    if function.was_deoptimized {
        summary.push_str(" - was deoptimized");
    }

    summary
}

/// Whether the function has optimized code worth showing
pub fn has_compiled_code(function: &FunctionInsight) -> bool {
    function.is_compiled && last_compiled_code(function).is_some()
}

/// Code object of the most recent compilation
pub fn last_compiled_code(function: &FunctionInsight) -> Option<&MemoryArea> {
    function
        .events
        .iter()
        .rev()
        .find_map(|event| event.compiled_memory())
}

/// Pretty-printed JSON of a function's history
pub fn history_json(function: &FunctionInsight) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&function.events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::store::DeclarationLocation;
    use crate::parser::schema::{EventKind, FunctionEvent};

    fn function(events: Vec<FunctionEvent>) -> FunctionInsight {
        FunctionInsight {
            name: "f".to_string(),
            declaration: DeclarationLocation {
                line: 0,
                column: 0,
                length: 1,
            },
            events,
            is_compiled: false,
            was_deoptimized: false,
            compile_time: None,
        }
    }

    #[test]
    fn test_lens_summary_variants() {
        let mut f = function(Vec::new());
        assert_eq!(lens_summary(&f), "interpreted");

        f.is_compiled = true;
        assert_eq!(lens_summary(&f), "compiled in ?s");

        f.compile_time = Some(1500);
        assert_eq!(lens_summary(&f), "compiled in 1ms 500μs");

        f.is_compiled = false;
        f.was_deoptimized = true;
        assert_eq!(lens_summary(&f), "interpreted - was deoptimized");
    }

    #[test]
    fn test_last_compiled_code_picks_latest() {
        let f = function(vec![
            FunctionEvent::new(1, EventKind::CompileEnd { memory: MemoryArea::new("0x1", 10) }),
            FunctionEvent::new(2, EventKind::CompileStart),
            FunctionEvent::new(3, EventKind::CompileEnd { memory: MemoryArea::new("0x2", 20) }),
            FunctionEvent::new(
                4,
                EventKind::Deoptimize {
                    reason: "wrong map".to_string(),
                    from: "file:///a.js:1:1".to_string(),
                },
            ),
        ]);

        assert_eq!(last_compiled_code(&f).unwrap().start, "0x2");
        assert!(last_compiled_code(&function(Vec::new())).is_none());
        assert!(!has_compiled_code(&f));
    }

    #[test]
    fn test_history_json_lists_events() {
        let f = function(vec![FunctionEvent::new(7, EventKind::CompileStart)]);
        let json = history_json(&f).unwrap();
        assert!(json.contains("\"compile-start\""));
        assert!(json.contains("\"at\": 7"));
    }
}
