//! CSV loading for raw Office of Research exports.

use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::MungeError;

/// One data row from a raw export, header discarded. `line` is the 1-based
/// line number in the source file, kept for error reporting.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Trim whitespace and strip one layer of stray outer quotes. The reader
/// handles proper CSV quoting; some exports double-quote by hand.
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Reads a raw export at `path`, discarding the header row.
///
/// The reader is strict: a row whose field count differs from the header is
/// a `Parse` error carrying the offending line, per the no-silent-reshaping
/// rule for these files.
pub fn load_csv(path: &Path) -> Result<Vec<RawRow>, MungeError> {
    let file_label = file_label(path);
    let file = File::open(path).map_err(|e| MungeError::io(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| MungeError::Parse {
            file: file_label.clone(),
            source: e,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(RawRow {
            line,
            fields: record.iter().map(clean_field).collect(),
        });
    }

    debug!(file = %file_label, rows = rows.len(), "loaded raw csv");
    Ok(rows)
}

/// Filename portion of `path`, used in every error and log line.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
