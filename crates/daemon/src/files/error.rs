//! Error taxonomy shared by the file components.

use std::io;

use protocol::ErrorCode;
use thiserror::Error;

/// Errors that can occur while browsing, searching or previewing assets.
///
/// Paths carried by these variants are always relative to the asset root so
/// that messages can be shown to clients without exposing the host layout.
#[derive(Debug, Error)]
pub enum FileError {
    /// The requested path escapes the asset root.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The requested path does not exist.
    #[error("path not found: {0}")]
    NotFound(String),

    /// The requested path is not a directory.
    #[error("path is not a directory: {0}")]
    NotADirectory(String),

    /// The requested path is a directory, not a file.
    #[error("path is a directory, not a file: {0}")]
    IsADirectory(String),

    /// The file extension is not in the preview allow-list.
    #[error("file type not supported for content preview: {0}")]
    UnsupportedType(String),

    /// The file exceeds the preview size limit.
    #[error("file too large for preview: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The search query is too short.
    #[error("search query must be at least {min} characters")]
    InvalidQuery { min: usize },

    /// Underlying filesystem failure.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Classify an I/O error raised while inspecting `path`.
    ///
    /// A missing path maps to `NotFound`; everything else is a `ReadError`.
    pub fn from_io(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(path.to_string())
        } else {
            FileError::ReadError {
                path: path.to_string(),
                source,
            }
        }
    }

    /// Stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FileError::AccessDenied(_) => ErrorCode::AccessDenied,
            FileError::NotFound(_) => ErrorCode::NotFound,
            FileError::NotADirectory(_) => ErrorCode::NotADirectory,
            FileError::IsADirectory(_) => ErrorCode::IsADirectory,
            FileError::UnsupportedType(_) => ErrorCode::UnsupportedType,
            FileError::TooLarge { .. } => ErrorCode::TooLarge,
            FileError::InvalidQuery { .. } => ErrorCode::InvalidQuery,
            FileError::ReadError { .. } => ErrorCode::ReadError,
        }
    }
}
