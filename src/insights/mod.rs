//! Function insights built from the V8 event log.
//!
//! This module turns trace records into:
//! - Per-file, per-function compilation histories
//! - Lookups by declaration site and by optimized code address
//! - Human-readable summaries and JSON reports

pub mod report;
pub mod store;
pub mod summary;

// Re-export main types and functions
pub use report::{to_report, InsightReport};
pub use store::{ApplyOutcome, DeclarationLocation, FileInsight, FunctionInsight, InsightStore};
pub use summary::{has_compiled_code, history_json, last_compiled_code, lens_summary};
