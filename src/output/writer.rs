// src/output/writer.rs
//! Executes export plans by performing the actual I/O.
//!
//! This module is the only place where files are written.

use super::plan::plan_export;
use super::types::{ExportPlan, SaveOptions, SavedPage};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::types::PageMetadata;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Decodes a page and writes it as a Markdown file.
pub fn save_page_as_markdown(
    storage: &str,
    metadata: &PageMetadata,
    options: &SaveOptions,
    config: &ConverterConfig,
) -> Result<SavedPage> {
    deliver(plan_export(storage, metadata, options, config))
}

/// Saves a page record as returned by the REST collaborator. The storage
/// body is read from `body.storage.value`.
pub fn save_page_record(
    page: &Value,
    options: &SaveOptions,
    config: &ConverterConfig,
) -> Result<SavedPage> {
    let storage = page
        .pointer("/body/storage/value")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let metadata = PageMetadata::from_page_json(page);
    save_page_as_markdown(storage, &metadata, options, config)
}

/// Writes a planned export.
pub fn deliver(plan: ExportPlan) -> Result<SavedPage> {
    let bytes_written = write_file(&plan.path, &plan.markdown)?;
    Ok(SavedPage {
        markdown: plan.markdown,
        file_path: plan.path,
        metadata: plan.metadata,
        bytes_written,
    })
}

fn write_file(path: &Path, content: &str) -> Result<usize> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    log::info!("Saved page: {}", path.display());
    Ok(content.len())
}
