//! Loading Markdown documents for upload.

use crate::config::ConverterConfig;
use crate::encode::encode_body;
use crate::error::{ConvertError, Result};
use crate::frontmatter;
use crate::types::FrontMatter;
use std::path::{Component, Path};

/// A Markdown file converted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Resolved page title.
    pub title: String,
    /// Storage markup of the body.
    pub content: String,
    /// Front-matter block, when the file had one.
    pub metadata: Option<FrontMatter>,
}

/// Reads a Markdown file and encodes its body to storage markup.
///
/// The path must be absolute and free of `..` segments; both are checked
/// before the filesystem is touched.
pub fn load_markdown_for_storage(path: &Path, config: &ConverterConfig) -> Result<LoadedDocument> {
    validate_path(path)?;
    if !path.is_file() {
        return Err(ConvertError::FileNotFound(path.to_path_buf()));
    }

    let markdown = std::fs::read_to_string(path)?;
    log::info!("Loaded {} bytes from {}", markdown.len(), path.display());

    let (metadata, body) = frontmatter::extract(&markdown);
    let title = frontmatter::resolve_title(metadata.as_ref(), body, path);
    let content = encode_body(body, config);

    Ok(LoadedDocument {
        title,
        content,
        metadata,
    })
}

/// Path preconditions for loading. Performs no I/O.
pub fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || !path.is_absolute() {
        return Err(ConvertError::RelativePath(path.to_path_buf()));
    }
    if path
        .components()
        .any(|component| component == Component::ParentDir)
    {
        return Err(ConvertError::DirectoryTraversal(path.to_path_buf()));
    }
    Ok(())
}
