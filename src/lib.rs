//! V8 Insights
//!
//! Compilation and deoptimization insights for Node.js programs, built from
//! the logs V8 writes with `--logfile` and `--print-opt-code`.
//!
//! ## Getting Started
//!
//! ```bash
//! v8-insights instrument "node app.js"   # prints the command to run
//! v8-insights analyze
//! v8-insights code --file /path/to/app.js --line 10
//! ```
//!
//! From Rust, an [`InsightSession`] owns everything built from the logs:
//!
//! ```ignore
//! let mut session = InsightSession::new(Config::default());
//! session.analyze()?;
//! if let Some(file) = session.get_insights("/path/to/app.js") {
//!     for function in &file.functions {
//!         println!("{}: {}", function.name, lens_summary(function));
//!     }
//! }
//! ```

pub mod commands;
pub mod disasm;
pub mod insights;
pub mod output;
pub mod parser;
pub mod session;
pub mod utils;

pub use session::InsightSession;
