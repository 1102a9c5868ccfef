//! Conversion capability traits and the converter that implements them.
//!
//! Each trait describes one direction, so callers that only decode (or only
//! encode) can depend on just that capability and swap in a stub in tests.

use crate::config::ConverterConfig;
use crate::decode::decode_storage;
use crate::document::{load_markdown_for_storage, LoadedDocument};
use crate::encode::encode_markdown;
use crate::error::Result;
use crate::output::{save_page_as_markdown, SaveOptions, SavedPage};
use crate::types::PageMetadata;
use std::path::Path;

/// Storage markup to Markdown.
pub trait StorageDecoder {
    /// Never fails; unparseable input degrades to plain text.
    fn decode(&self, storage: &str, metadata: Option<&PageMetadata>) -> String;
}

/// Markdown to storage markup.
pub trait StorageEncoder {
    fn encode(&self, markdown: &str) -> String;

    /// Reads and encodes a Markdown file. Fails only on path
    /// preconditions or I/O.
    fn load(&self, path: &Path) -> Result<LoadedDocument>;
}

/// Bidirectional converter bound to one configuration.
///
/// Holds no mutable state; every call builds its own encoder and renderer,
/// so a shared instance is safe to use from several threads.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    config: ConverterConfig,
}

impl MarkdownConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Decodes a page and writes it to disk.
    pub fn save_page(
        &self,
        storage: &str,
        metadata: &PageMetadata,
        options: &SaveOptions,
    ) -> Result<SavedPage> {
        save_page_as_markdown(storage, metadata, options, &self.config)
    }
}

impl StorageDecoder for MarkdownConverter {
    fn decode(&self, storage: &str, metadata: Option<&PageMetadata>) -> String {
        decode_storage(storage, metadata, &self.config)
    }
}

impl StorageEncoder for MarkdownConverter {
    fn encode(&self, markdown: &str) -> String {
        encode_markdown(markdown, &self.config)
    }

    fn load(&self, path: &Path) -> Result<LoadedDocument> {
        load_markdown_for_storage(path, &self.config)
    }
}
