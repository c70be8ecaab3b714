//! Atomic file replacement.
//!
//! Every file this tool produces is written through [`write_atomic`]:
//! contents go to a temporary file in the destination directory, which is
//! flushed, synced and then renamed over the destination. A failure at any
//! step leaves the previous file (or no file) in place, never a truncated one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Destination could not be written.
#[derive(Debug, Error)]
#[error("failed to write `{}`", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl WriteError {
    pub(crate) fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Replace `path` with `contents`, creating parent directories if absent.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| WriteError::new(path, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| WriteError::new(path, e))?;
    tmp.write_all(contents)
        .map_err(|e| WriteError::new(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| WriteError::new(path, e))?;

    // Temp file is removed on drop if persist fails.
    tmp.persist(path)
        .map_err(|e| WriteError::new(path, e.error))?;
    Ok(())
}
