//! Error types shared by the annotation store and its persistence layer.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by store, composer-facing, and workbook operations.
///
/// Every variant is local to the operation that raised it: the store is left
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("an annotation named '{0}' already exists")]
    DuplicateName(String),

    #[error("no annotation named '{0}'")]
    NotFound(String),

    #[error("{}: {reason}", .path.display())]
    MalformedSource { path: PathBuf, reason: String },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
