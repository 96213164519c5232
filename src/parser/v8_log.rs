//! Classifier for V8 `--logfile` event lines.
//!
//! Only four record kinds matter for insights; everything else V8 logs
//! (ticks, IC events, shared-library lines, ...) is skipped. Examples:
//!
//! ```text
//! code-creation,Script,11,129974,0x250f4074d83e,81, file:///app/deoptimize.js:1:1,0x250f4074d5f0,~
//! code-creation,LazyCompile,11,130193,0x250f4074dcb6,16,f file:///app/deoptimize.js:10:11,0x250f4074d740,~
//! code-creation,LazyCompile,0,131818,0xadc3bf43380,161,f file:///app/deoptimize.js:10:11,0x250f4074d740,*
//! code-deopt,131848,288,0xadc3bf43380,-1,165,soft,<file:///app/deoptimize.js:11:3>,Insufficient type feedback for call
//! ```

use super::lines::lines;
use super::location::strip_brackets;
use super::schema::{MemoryArea, TraceRecord};
use crate::insights::{ApplyOutcome, InsightStore};
use crate::utils::error::TraceError;
use log::debug;
use std::io::Read;

const SCRIPT_PARSE_PREFIX: &str = "code-creation,Script,11";
const COMPILE_START_PREFIX: &str = "code-creation,LazyCompile,11";
const COMPILE_END_PREFIX: &str = "code-creation,LazyCompile,0";
const DEOPT_PREFIX: &str = "code-deopt";

/// Counters for one pass over the event log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines read from the stream
    pub lines: usize,

    /// Records attached to a function
    pub records: usize,

    /// Deopt records whose code address was never compiled
    pub unresolved_deopts: usize,
}

/// Classify one log line
///
/// Returns `None` for lines of any other kind and for recognized lines whose
/// fields don't parse.
pub fn parse_record(line: &str) -> Option<TraceRecord> {
    if line.starts_with(SCRIPT_PARSE_PREFIX) {
        let (at, memory, source) = parse_code_creation(line)?;
        Some(TraceRecord::Parse { at, memory, source })
    } else if line.starts_with(COMPILE_START_PREFIX) {
        let (at, memory, source) = parse_code_creation(line)?;
        Some(TraceRecord::CompileStart { at, memory, source })
    } else if line.starts_with(COMPILE_END_PREFIX) {
        let (at, memory, source) = parse_code_creation(line)?;
        Some(TraceRecord::CompileEnd { at, memory, source })
    } else if line.starts_with(DEOPT_PREFIX) {
        parse_deopt(line)
    } else {
        None
    }
}

/// Fields shared by all `code-creation` records
///
/// **Private** - [3]=timestamp, [4]=start, [5]=size, [6]=source
fn parse_code_creation(line: &str) -> Option<(u64, MemoryArea, String)> {
    let fields: Vec<&str> = line.split(',').collect();
    let at = fields.get(3)?.trim().parse::<u64>().ok()?;
    let start = fields.get(4)?;
    let size = fields.get(5)?.trim().parse::<u64>().ok()?;
    let source = fields.get(6)?;

    Some((at, MemoryArea::new(*start, size), source.to_string()))
}

/// `code-deopt` record
///
/// **Private** - [1]=timestamp, [3]=code address, [7]=bracketed source,
/// [8..]=reason (which may itself contain commas)
fn parse_deopt(line: &str) -> Option<TraceRecord> {
    let fields: Vec<&str> = line.splitn(9, ',').collect();
    let at = fields.get(1)?.trim().parse::<u64>().ok()?;
    let code_address = fields.get(3)?;
    let from = strip_brackets(fields.get(7)?);
    let reason = fields.get(8)?;

    Some(TraceRecord::Deoptimize {
        at,
        code_address: code_address.to_string(),
        from: from.to_string(),
        reason: reason.to_string(),
    })
}

/// Read the whole event log into `store`
///
/// The store is not cleared here; callers that want a fresh analysis reset it
/// first.
///
/// # Errors
/// * `TraceError::Io` - the stream failed or contained invalid UTF-8
pub fn ingest_event_log<R: Read>(
    reader: R,
    chunk_size: usize,
    store: &mut InsightStore,
) -> Result<IngestStats, TraceError> {
    let mut stats = IngestStats::default();

    for line in lines(reader, chunk_size) {
        let line = line?;
        stats.lines += 1;

        let Some(record) = parse_record(&line) else {
            continue;
        };

        match store.apply(record) {
            ApplyOutcome::Recorded => stats.records += 1,
            ApplyOutcome::UnresolvedDeopt => stats.unresolved_deopts += 1,
            ApplyOutcome::Ignored => {}
        }
    }

    debug!(
        "Ingested {} lines: {} records, {} unresolved deopts",
        stats.lines, stats.records, stats.unresolved_deopts
    );

    Ok(stats)
}
