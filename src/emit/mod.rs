//! Artifact emission.
//!
//! Output files are written to a temp file in the destination directory and
//! persisted with an atomic rename, so a mid-write failure never leaves a
//! truncated CSV or JSON behind.

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::MungeError;

fn ensure_parent(path: &Path) -> Result<&Path, MungeError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| MungeError::io(parent, e))?;
        info!(dir = %parent.display(), "created output directory");
    }
    Ok(parent)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<(), MungeError> {
    tmp.persist(path)
        .map_err(|e| MungeError::io(path, e.error))?;
    debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Writes `rows` (header first) as CSV to `path`.
pub fn save_csv(path: &Path, rows: &[Vec<String>]) -> Result<(), MungeError> {
    let parent = ensure_parent(path)?;
    let tmp = NamedTempFile::new_in(parent).map_err(|e| MungeError::io(parent, e))?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| match e.into_kind() {
                    csv::ErrorKind::Io(io) => MungeError::io(path, io),
                    other => MungeError::io(
                        path,
                        std::io::Error::other(format!("csv write failed: {other:?}")),
                    ),
                })?;
        }
        writer
            .flush()
            .map_err(|e| MungeError::io(path, e))?;
    }

    persist(tmp, path)
}

/// Writes `value` as pretty-printed JSON to `path`. Keys serialize sorted.
pub fn save_json(path: &Path, value: &serde_json::Value) -> Result<(), MungeError> {
    let parent = ensure_parent(path)?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| MungeError::io(parent, e))?;

    serde_json::to_writer_pretty(tmp.as_file(), value)
        .map_err(|e| MungeError::io(path, e.into()))?;
    tmp.write_all(b"\n").map_err(|e| MungeError::io(path, e))?;

    persist(tmp, path)
}
