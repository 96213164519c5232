//! Serializable snapshot of an analysis run.

use super::store::{FileInsight, InsightStore};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Event log the report was built from
    pub event_log: String,

    /// Number of distinct functions
    pub function_count: usize,

    /// Functions that lost optimized code at least once
    pub deoptimized_count: usize,

    /// Per-file insights in first-seen order
    pub files: Vec<FileInsight>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Snapshot the store into a report
pub fn to_report(store: &InsightStore, event_log: &str) -> InsightReport {
    use chrono::Utc;

    let deoptimized_count = store
        .files()
        .iter()
        .flat_map(|file| &file.functions)
        .filter(|function| function.was_deoptimized)
        .count();

    InsightReport {
        version: SCHEMA_VERSION.to_string(),
        event_log: event_log.to_string(),
        function_count: store.function_count(),
        deoptimized_count,
        files: store.files().to_vec(),
        generated_at: Utc::now().to_rfc3339(),
    }
}
