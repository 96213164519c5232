//! Source locations as printed by V8.
//!
//! Named locations look like `f file:///app/main.js:10:11`, unnamed ones like
//! `<file:///app/main.js:11:3>` or ` file:///app/main.js:1:1`.

use serde::{Deserialize, Serialize};

/// Name given to functions V8 logs without one
pub const UNKNOWN_NAME: &str = "unknown";

const FILE_SCHEME: &str = "file://";
const OPENING_BRACKETS: &[char] = &['<', '(', '['];
const CLOSING_BRACKETS: &[char] = &['>', ')', ']'];

/// A parsed declaration site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Function name, or `"unknown"`
    pub name: String,

    /// Path with the `file://` scheme removed
    pub filename: String,

    /// Zero-based line
    pub line: u32,

    /// Column exactly as logged
    pub column: u32,

    /// Raw location text, used as the de-duplication key
    pub key: String,
}

impl SourceLocation {
    /// Whether V8 logged a real name for this function
    pub fn is_named(&self) -> bool {
        self.name != UNKNOWN_NAME
    }
}

/// Parse `<name> <file>:<line>:<column>`, splitting on the first space
pub fn parse_named_location(source: &str) -> Option<SourceLocation> {
    let (name, full_location) = source.split_once(' ')?;
    let name = if name.is_empty() { UNKNOWN_NAME } else { name };
    parse_location(name, full_location)
}

/// Parse a location without a name, trimming one bracket at each end
pub fn parse_unnamed_location(source: &str) -> Option<SourceLocation> {
    let trimmed = strip_brackets(source.trim());
    parse_location(UNKNOWN_NAME, trimmed)
}

/// Remove one surrounding bracket character from each end, if present
pub fn strip_brackets(text: &str) -> &str {
    let text = text.strip_prefix(OPENING_BRACKETS).unwrap_or(text);
    text.strip_suffix(CLOSING_BRACKETS).unwrap_or(text)
}

/// Split `file://<path>:<line>:<column>` into its parts
///
/// Splits from the right so paths containing `:` survive.
fn parse_location(name: &str, full_location: &str) -> Option<SourceLocation> {
    let path = full_location
        .strip_prefix(FILE_SCHEME)
        .unwrap_or(full_location);

    let mut parts = path.rsplitn(3, ':');
    let column = parts.next()?.parse::<u32>().ok()?;
    let line = parts.next()?.parse::<u32>().ok()?;
    let filename = parts.next()?;

    Some(SourceLocation {
        name: name.to_string(),
        filename: filename.to_string(),
        line: line.saturating_sub(1),
        column,
        key: full_location.to_string(),
    })
}
