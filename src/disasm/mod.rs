//! Optimized code extraction and decompilation.
//!
//! This module handles:
//! - Finding a code object's instructions in the `--print-opt-code` dump
//! - Inferring labels for jump targets
//! - Rendering readable control flow

pub mod decompiler;
pub mod extractor;
pub mod labels;

// Re-export main types and functions
pub use decompiler::{decompile, split_line, InstructionLine};
pub use extractor::extract_optimized_code;
pub use labels::{Label, LabelCache};
