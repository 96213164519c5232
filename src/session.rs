//! Analysis session: configuration plus all state built from the logs.
//!
//! A session replaces the insight index wholesale on every analysis and keeps
//! decompiler labels until told otherwise. Mutating operations take
//! `&mut self`, so runs and decompiles on one session never interleave.

use crate::disasm::{decompile, extract_optimized_code, LabelCache};
use crate::insights::{FileInsight, InsightStore};
use crate::parser::{ingest_event_log, IngestStats};
use crate::utils::config::Config;
use crate::utils::error::TraceError;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

type AnalysisListener = Box<dyn FnMut(&InsightStore)>;

/// Owner of the insight index and the label cache
pub struct InsightSession {
    config: Config,
    store: InsightStore,
    labels: LabelCache,
    listeners: Vec<AnalysisListener>,
}

impl InsightSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: InsightStore::new(),
            labels: LabelCache::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &InsightStore {
        &self.store
    }

    pub fn labels(&self) -> &LabelCache {
        &self.labels
    }

    pub fn labels_mut(&mut self) -> &mut LabelCache {
        &mut self.labels
    }

    /// Call `listener` after every completed analysis
    pub fn on_analysis_done(&mut self, listener: impl FnMut(&InsightStore) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Analyze the configured event log
    ///
    /// # Errors
    /// * `TraceError::MissingLog` - the log does not exist
    /// * `TraceError::Io` - reading the log failed
    pub fn analyze(&mut self) -> Result<IngestStats, TraceError> {
        let path = self.config.event_log_path();
        info!("Analyzing event log: {}", path.display());
        let file = open_log(&path)?;
        self.analyze_reader(file)
    }

    /// Analyze an event log stream
    ///
    /// The previous insights are replaced only when the whole stream was read;
    /// on error they are left untouched.
    pub fn analyze_reader<R: Read>(&mut self, reader: R) -> Result<IngestStats, TraceError> {
        let mut store = InsightStore::new();
        let stats = ingest_event_log(reader, self.config.chunk_size, &mut store)?;

        info!(
            "Indexed {} functions in {} files",
            store.function_count(),
            store.files().len()
        );
        self.store = store;

        for listener in &mut self.listeners {
            listener(&self.store);
        }

        Ok(stats)
    }

    /// Insights for a source file path
    pub fn get_insights(&self, filename: &str) -> Option<&FileInsight> {
        debug!("Getting insights for file '{}'", filename);
        self.store.get_insights(filename)
    }

    /// Raw instruction block of the code object at `address`
    ///
    /// # Errors
    /// * `TraceError::MissingLog` - the optimized code log does not exist
    /// * `TraceError::Io` - reading the log failed
    pub fn get_optimized_code(&self, address: &str) -> Result<Vec<String>, TraceError> {
        let path = self.config.opt_code_log_path();
        debug!("Reading optimized code at {} from {}", address, path.display());
        let file = open_log(&path)?;
        self.optimized_code_from(file, address)
    }

    /// Raw instruction block of the code object at `address`, from a stream
    pub fn optimized_code_from<R: Read>(
        &self,
        reader: R,
        address: &str,
    ) -> Result<Vec<String>, TraceError> {
        Ok(extract_optimized_code(
            reader,
            self.config.chunk_size,
            address,
        )?)
    }

    /// Render an instruction block with labels
    pub fn decompile<S: AsRef<str>>(&mut self, lines: &[S], context: &str) -> String {
        decompile(lines, context, &mut self.labels)
    }

    /// Extract and render the code object at `address`
    ///
    /// The rendered document's context key is `<address>.asm`.
    pub fn decompile_address(&mut self, address: &str) -> Result<String, TraceError> {
        let lines = self.get_optimized_code(address)?;
        let context = code_context(address);
        Ok(self.decompile(&lines, &context))
    }
}

/// Context key of the rendered document for a code address
pub fn code_context(address: &str) -> String {
    format!("{}.asm", address)
}

fn open_log(path: &Path) -> Result<File, TraceError> {
    if !path.exists() {
        return Err(TraceError::MissingLog(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{self, Cursor};
    use std::rc::Rc;

    #[test]
    fn test_listener_runs_once_per_analysis() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);

        let mut session = InsightSession::new(Config::default());
        session.on_analysis_done(move |_| seen.set(seen.get() + 1));

        session.analyze_reader(Cursor::new("")).unwrap();
        session.analyze_reader(Cursor::new("")).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_run_keeps_previous_insights() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "stream closed"))
            }
        }

        let mut session = InsightSession::new(Config::default());
        session
            .analyze_reader(Cursor::new(
                "code-creation,LazyCompile,11,1,0x1,5,f file:///a.js:1:1,0x0,~\n",
            ))
            .unwrap();

        assert!(session.analyze_reader(Failing).is_err());
        assert!(session.get_insights("/a.js").is_some());
    }

    #[test]
    fn test_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = InsightSession::new(Config::default().with_insights_dir(dir.path()));

        assert!(matches!(session.analyze(), Err(TraceError::MissingLog(_))));
        assert!(matches!(
            session.get_optimized_code("0x1"),
            Err(TraceError::MissingLog(_))
        ));
    }
}
