//! Error types for zenodo-sync.

use std::path::PathBuf;

use thiserror::Error;

use zenodo_core::MetadataError;

/// All errors that can arise from an update run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from loading, rendering or saving the metadata document.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
