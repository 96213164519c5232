//! Output writers for insight data.
//!
//! This module handles:
//! - JSON insight reports
//! - Colored terminal summaries

pub mod json;
pub mod terminal;

// Re-export main functions
pub use json::{read_report, write_report};
pub use terminal::{render_code, render_file_insights, render_history};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
