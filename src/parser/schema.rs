//! Event types extracted from the V8 log.
//!
//! `FunctionEvent` is what a function's history stores; `TraceRecord` is one
//! classified log line before it is attached to a function.

use serde::{Deserialize, Serialize};

/// A region of generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryArea {
    /// Start address as logged (`0x...`)
    pub start: String,

    /// Size in bytes
    pub size: u64,
}

impl MemoryArea {
    pub fn new(start: impl Into<String>, size: u64) -> Self {
        Self {
            start: start.into(),
            size,
        }
    }

    /// Lookup key for the start address (hex digits are case-insensitive)
    pub fn address_key(&self) -> String {
        normalize_address(&self.start)
    }
}

/// Normalize a hex address for use as a map key
pub fn normalize_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

/// One entry in a function's history
///
/// Serializes flat, e.g. `{"at": 131818, "name": "compile-end", "memory": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEvent {
    /// Log timestamp (microseconds since isolate start)
    pub at: u64,

    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened to the function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum EventKind {
    /// Unoptimized code object created
    Parse { memory: MemoryArea },

    /// Optimizing compilation began
    CompileStart,

    /// Optimizing compilation finished with a new code object
    CompileEnd { memory: MemoryArea },

    /// Optimized code was thrown away
    Deoptimize { reason: String, from: String },
}

impl FunctionEvent {
    pub fn new(at: u64, kind: EventKind) -> Self {
        Self { at, kind }
    }

    pub fn is_compile_start(&self) -> bool {
        matches!(self.kind, EventKind::CompileStart)
    }

    /// Code object produced by this event, if any
    pub fn compiled_memory(&self) -> Option<&MemoryArea> {
        match &self.kind {
            EventKind::CompileEnd { memory } => Some(memory),
            _ => None,
        }
    }

    /// Short label for terminal output
    pub fn label(&self) -> &'static str {
        match self.kind {
            EventKind::Parse { .. } => "parse",
            EventKind::CompileStart => "compile-start",
            EventKind::CompileEnd { .. } => "compile-end",
            EventKind::Deoptimize { .. } => "deoptimize",
        }
    }
}

/// A recognized line of the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// `code-creation,Script,11,...`
    Parse {
        at: u64,
        memory: MemoryArea,
        source: String,
    },

    /// `code-creation,LazyCompile,11,...`
    CompileStart {
        at: u64,
        memory: MemoryArea,
        source: String,
    },

    /// `code-creation,LazyCompile,0,...`
    CompileEnd {
        at: u64,
        memory: MemoryArea,
        source: String,
    },

    /// `code-deopt,...`
    Deoptimize {
        at: u64,
        code_address: String,
        from: String,
        reason: String,
    },
}
