//! Error types for zenodo-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from metadata document operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The document (or a person list) did not exist at the expected path.
    #[error("metadata file not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure other than a missing file, with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load — includes file path and line/column from serde_json.
    #[error("failed to parse metadata at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed, but its top level is not a JSON object.
    #[error("metadata at {path} is not a JSON object")]
    NotAnObject { path: PathBuf },

    /// A person list key exists but holds something other than an array.
    #[error("field '{field}' is not an array")]
    FieldNotArray { field: String },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`MetadataError::Io`], mapping `NotFound`
/// onto [`MetadataError::NotFound`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MetadataError {
    let path = path.into();
    if source.kind() == std::io::ErrorKind::NotFound {
        return MetadataError::NotFound { path };
    }
    MetadataError::Io { path, source }
}
