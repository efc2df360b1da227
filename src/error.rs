//! Typed errors for the conversion pipeline.
//!
//! Each variant carries the input filename (and row number where one makes
//! sense) so the operator can fix the offending export and rerun. Nothing is
//! retried; a failed file is reported and the rest of the batch continues.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MungeError {
    /// The input CSV itself is malformed, e.g. ragged rows or bad quoting.
    #[error("malformed CSV in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A row parsed fine but carries a missing or illegal value.
    #[error("invalid data in {file} (row {row}): {message}")]
    Validation {
        file: String,
        row: u64,
        message: String,
    },

    /// The input's declared statistic type or market matches no known
    /// combination. A configuration or naming problem, not a data defect.
    #[error("unrecognized input {file}: {message}")]
    Configuration { file: String, message: String },

    #[error("I/O failure on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MungeError {
    pub fn validation(file: &str, row: u64, message: impl Into<String>) -> Self {
        MungeError::Validation {
            file: file.to_string(),
            row,
            message: message.into(),
        }
    }

    pub fn configuration(file: &str, message: impl Into<String>) -> Self {
        MungeError::Configuration {
            file: file.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MungeError::Io {
            path: path.into(),
            source,
        }
    }
}
