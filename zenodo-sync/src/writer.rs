//! Change-gated atomic writer.
//!
//! 1. Compare the rendered bytes with the file currently on disk → skip if identical.
//! 2. Write `<path>.tmp` next to the real file, then rename onto it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use zenodo_core::write_atomic;

use crate::error::{io_err, SyncError};

/// Outcome of writing the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — its bytes already match the rendered document.
    Unchanged { path: PathBuf },
    /// Saving failed. The error has been logged; the run still completes.
    Failed { path: PathBuf, message: String },
}

/// Write `content` to `path` unless the file already holds exactly those bytes.
pub fn write_document(path: &Path, content: &str) -> Result<WriteResult, SyncError> {
    if read_existing(path)?.as_deref() == Some(content.as_bytes()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    write_atomic(path, content)?;

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    match std::fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(path, err)),
    }
}
