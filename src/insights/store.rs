//! Index of function insights built from trace records.
//!
//! Every function is owned by exactly one `FileInsight`; the lookup maps hold
//! handles into that storage, so a function reached by declaration site or by
//! code address is the same record that appears in its file's list.

use crate::parser::location::{
    parse_named_location, parse_unnamed_location, SourceLocation, UNKNOWN_NAME,
};
use crate::parser::schema::{normalize_address, EventKind, FunctionEvent, TraceRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a function's name appears in its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationLocation {
    /// Zero-based line
    pub line: u32,

    /// Zero-based column
    pub column: u32,

    /// Length of the function name
    pub length: u32,
}

impl DeclarationLocation {
    /// Column range `[start, end)` to highlight on `line`
    ///
    /// The end saturates at `u32::MAX` for columns near the limit.
    pub fn highlight(&self) -> (u32, u32) {
        (self.column, self.column.saturating_add(self.length))
    }
}

/// Everything the log says about one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInsight {
    pub name: String,
    pub declaration: DeclarationLocation,

    /// History in log order
    pub events: Vec<FunctionEvent>,

    /// Optimized code is currently live
    pub is_compiled: bool,

    /// Optimized code was thrown away at least once
    pub was_deoptimized: bool,

    /// Microseconds between the last compile start and compile end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_time: Option<u64>,
}

impl FunctionInsight {
    fn new(location: &SourceLocation) -> Self {
        Self {
            name: location.name.clone(),
            declaration: DeclarationLocation {
                line: location.line,
                column: location.column,
                length: location.name.chars().count() as u32,
            },
            events: Vec::new(),
            is_compiled: false,
            was_deoptimized: false,
            compile_time: None,
        }
    }

    /// V8 logged a real name for this function at some point
    pub fn name_is_known(&self) -> bool {
        self.name != UNKNOWN_NAME
    }
}

/// Functions declared in one source file, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInsight {
    pub filename: String,
    pub functions: Vec<FunctionInsight>,
}

impl FileInsight {
    /// Function whose declaration starts on `line` (zero-based)
    pub fn function_at_line(&self, line: u32) -> Option<&FunctionInsight> {
        self.functions.iter().find(|f| f.declaration.line == line)
    }
}

/// What `InsightStore::apply` did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// An event was appended to a function
    Recorded,

    /// The record's location could not be parsed
    Ignored,

    /// A deopt referenced code that was never seen compiling
    UnresolvedDeopt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FunctionHandle {
    file: usize,
    function: usize,
}

/// Insights for every file seen in one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsightStore {
    files: Vec<FileInsight>,
    by_filename: HashMap<String, usize>,
    by_declaration_site: HashMap<String, FunctionHandle>,
    by_code_address: HashMap<String, FunctionHandle>,
}

impl InsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous run
    pub fn clear(&mut self) {
        self.files.clear();
        self.by_filename.clear();
        self.by_declaration_site.clear();
        self.by_code_address.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insights for a file path (without `file://`)
    pub fn get_insights(&self, filename: &str) -> Option<&FileInsight> {
        self.by_filename
            .get(filename)
            .map(|&index| &self.files[index])
    }

    /// All files in first-seen order
    pub fn files(&self) -> &[FileInsight] {
        &self.files
    }

    pub fn function_count(&self) -> usize {
        self.by_declaration_site.len()
    }

    /// Function by raw declaration site, e.g. `file:///a.js:10:11`
    pub fn function_at_site(&self, site: &str) -> Option<&FunctionInsight> {
        self.by_declaration_site
            .get(site)
            .map(|handle| self.function(*handle))
    }

    /// Function whose optimized code starts at `address`
    pub fn function_at_address(&self, address: &str) -> Option<&FunctionInsight> {
        self.by_code_address
            .get(&normalize_address(address))
            .map(|handle| self.function(*handle))
    }

    /// Attach one record to its function
    pub fn apply(&mut self, record: TraceRecord) -> ApplyOutcome {
        match record {
            TraceRecord::Parse { at, memory, source } => {
                let Some(handle) = self.locate(&source, false) else {
                    return ApplyOutcome::Ignored;
                };
                self.function_mut(handle)
                    .events
                    .push(FunctionEvent::new(at, EventKind::Parse { memory }));
            }

            TraceRecord::CompileStart { at, source, .. } => {
                let Some(handle) = self.locate(&source, true) else {
                    return ApplyOutcome::Ignored;
                };
                self.function_mut(handle)
                    .events
                    .push(FunctionEvent::new(at, EventKind::CompileStart));
            }

            TraceRecord::CompileEnd { at, memory, source } => {
                let Some(handle) = self.locate(&source, true) else {
                    return ApplyOutcome::Ignored;
                };
                let address = memory.address_key();
                let function = self.function_mut(handle);

                if let Some(start) = function.events.iter().rev().find(|e| e.is_compile_start()) {
                    function.compile_time = Some(at.saturating_sub(start.at));
                }
                function.is_compiled = true;
                function
                    .events
                    .push(FunctionEvent::new(at, EventKind::CompileEnd { memory }));

                self.by_code_address.insert(address, handle);
            }

            TraceRecord::Deoptimize {
                at,
                code_address,
                from,
                reason,
            } => {
                let Some(&handle) = self.by_code_address.get(&normalize_address(&code_address))
                else {
                    debug!("Skipping deopt of unknown code at {}", code_address);
                    return ApplyOutcome::UnresolvedDeopt;
                };
                let function = self.function_mut(handle);
                function.is_compiled = false;
                function.was_deoptimized = true;
                function
                    .events
                    .push(FunctionEvent::new(at, EventKind::Deoptimize { reason, from }));
            }
        }

        ApplyOutcome::Recorded
    }

    /// Parse a record's source and find or register its function
    ///
    /// **Private** - creates the file entry and appends the function before
    /// any event is recorded
    fn locate(&mut self, source: &str, named: bool) -> Option<FunctionHandle> {
        let location = if named {
            parse_named_location(source)
        } else {
            parse_unnamed_location(source)
        };

        let Some(location) = location else {
            debug!("Ignoring record with unparsable location '{}'", source);
            return None;
        };

        if let Some(&handle) = self.by_declaration_site.get(&location.key) {
            let function = self.function_mut(handle);
            if !function.name_is_known() && location.is_named() {
                function.name = location.name.clone();
                function.declaration.length = location.name.chars().count() as u32;
            }
            return Some(handle);
        }

        let file = match self.by_filename.get(&location.filename) {
            Some(&index) => index,
            None => {
                self.files.push(FileInsight {
                    filename: location.filename.clone(),
                    functions: Vec::new(),
                });
                let index = self.files.len() - 1;
                self.by_filename.insert(location.filename.clone(), index);
                debug!("Registered insights for file '{}'", location.filename);
                index
            }
        };

        let functions = &mut self.files[file].functions;
        functions.push(FunctionInsight::new(&location));
        let handle = FunctionHandle {
            file,
            function: functions.len() - 1,
        };
        self.by_declaration_site.insert(location.key.clone(), handle);
        debug!(
            "Registered insights for function '{}' -> '{}'",
            location.filename, location.name
        );

        Some(handle)
    }

    fn function(&self, handle: FunctionHandle) -> &FunctionInsight {
        &self.files[handle.file].functions[handle.function]
    }

    fn function_mut(&mut self, handle: FunctionHandle) -> &mut FunctionInsight {
        &mut self.files[handle.file].functions[handle.function]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_record;

    fn store_from(lines: &[&str]) -> InsightStore {
        let mut store = InsightStore::new();
        for line in lines {
            if let Some(record) = parse_record(line) {
                store.apply(record);
            }
        }
        store
    }

    #[test]
    fn test_handles_stay_consistent_with_file_lists() {
        let store = store_from(&[
            "code-creation,LazyCompile,11,1,0x1,5,f file:///a.js:1:1,0x0,~",
            "code-creation,LazyCompile,11,2,0x2,5,g file:///b.js:3:1,0x0,~",
            "code-creation,LazyCompile,11,3,0x3,5,h file:///a.js:7:1,0x0,~",
        ]);

        assert_eq!(store.files().len(), 2);
        assert_eq!(store.function_count(), 3);
        for (site, name) in [
            ("file:///a.js:1:1", "f"),
            ("file:///b.js:3:1", "g"),
            ("file:///a.js:7:1", "h"),
        ] {
            assert_eq!(store.function_at_site(site).unwrap().name, name);
        }

        let a = store.get_insights("/a.js").unwrap();
        let names: Vec<_> = a.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f", "h"]);
    }

    #[test]
    fn test_highlight_span() {
        let store = store_from(&[
            "code-creation,LazyCompile,11,1,0x1,5,change_o file:///a.js:3:9,0x0,~",
        ]);
        let function = store.function_at_site("file:///a.js:3:9").unwrap();
        assert_eq!(function.declaration.line, 2);
        assert_eq!(function.declaration.highlight(), (9, 17));
    }

    #[test]
    fn test_highlight_at_largest_column() {
        let store = store_from(&[
            "code-creation,LazyCompile,11,1,0x1,5,f file:///a.js:1:4294967295,0x0,~",
        ]);
        let function = store.function_at_site("file:///a.js:1:4294967295").unwrap();
        assert_eq!(function.declaration.highlight(), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_unparsable_location_is_ignored() {
        let mut store = InsightStore::new();
        let outcome = store.apply(TraceRecord::CompileStart {
            at: 1,
            memory: crate::parser::MemoryArea::new("0x1", 1),
            source: "<native>".to_string(),
        });
        assert_eq!(outcome, ApplyOutcome::Ignored);
        assert!(store.is_empty());
    }
}
