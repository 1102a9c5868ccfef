// src/error.rs
//! Error types for the storage/Markdown converter.
//!
//! Decoding never surfaces these to callers: failures inside the decode
//! pipeline are caught and degraded to a plain-text fallback. Errors that do
//! reach callers are precondition violations of the file-facing entry points
//! (relative paths, traversal attempts, missing files) and I/O failures.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Absolute file path required: {}", .0.display())]
    RelativePath(PathBuf),

    #[error("Directory traversal not allowed: {}", .0.display())]
    DirectoryTraversal(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed storage markup: {0}")]
    MalformedStorage(String),

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::MalformedStorage(err.to_string())
    }
}

impl ConvertError {
    /// Whether this error is a caller precondition violation rather than
    /// an I/O or content failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::RelativePath(_) | Self::DirectoryTraversal(_) | Self::FileNotFound(_)
        )
    }
}

/// Result type alias for convenience
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_errors_are_classified() {
        assert!(ConvertError::RelativePath(PathBuf::from("a.md")).is_precondition());
        assert!(ConvertError::DirectoryTraversal(PathBuf::from("/a/../b")).is_precondition());
        assert!(ConvertError::FileNotFound(PathBuf::from("/missing.md")).is_precondition());
        assert!(!ConvertError::MalformedStorage("bad".to_string()).is_precondition());
    }

    #[test]
    fn messages_name_the_offending_path() {
        let err = ConvertError::DirectoryTraversal(PathBuf::from("/docs/../etc/passwd"));
        assert_eq!(
            err.to_string(),
            "Directory traversal not allowed: /docs/../etc/passwd"
        );
    }
}
