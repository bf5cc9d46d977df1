//! Error types for the descreve library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for descreve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for descreve library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input directory or file does not exist.
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The raw document is empty or could not be decoded.
    #[error("Malformed document '{source_name}': {reason}")]
    MalformedDocument { source_name: String, reason: String },

    /// An output file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A collector record could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Builds a [`Error::MalformedDocument`] for the given source.
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDocument {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`Error::WriteFailure`] for the given path.
    pub fn write_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::WriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error only affects a single document.
    ///
    /// Batch drivers skip such documents and keep going.
    pub fn is_document_scoped(&self) -> bool {
        matches!(
            self,
            Error::MalformedDocument { .. } | Error::WriteFailure { .. } | Error::Json(_)
        )
    }
}
