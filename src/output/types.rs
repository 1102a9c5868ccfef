// src/output/types.rs
//! Type definitions for page export.

use crate::types::PageMetadata;
use std::path::PathBuf;

/// Per-call export options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Explicit target file. `.md` is appended when missing.
    pub file_path: Option<PathBuf>,
}

impl SaveOptions {
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
        }
    }
}

/// A fully decided export: where to write and what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub path: PathBuf,
    pub markdown: String,
    /// Present when front matter was included.
    pub metadata: Option<PageMetadata>,
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPage {
    pub markdown: String,
    pub file_path: PathBuf,
    pub metadata: Option<PageMetadata>,
    pub bytes_written: usize,
}
