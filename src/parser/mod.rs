//! V8 log parsing.
//!
//! This module handles:
//! - Splitting chunked log streams into lines
//! - Classifying event log lines into typed records
//! - Parsing V8 source locations
//! - Defining the event schema

pub mod lines;
pub mod location;
pub mod schema;
pub mod v8_log;

// Re-export main types
pub use lines::{lines, Lines};
pub use location::{parse_named_location, parse_unnamed_location, SourceLocation};
pub use schema::{normalize_address, EventKind, FunctionEvent, MemoryArea, TraceRecord};
pub use v8_log::{ingest_event_log, parse_record, IngestStats};
