//! storage2md library: converts Confluence storage format to Markdown and back.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `ConvertError`, `ValidationError`
//! - **Configuration**: `ConverterConfig`
//! - **Domain types**: `PageMetadata`, `FrontMatter`, `PageId`, `MacroId`, `TaskId`
//! - **Storage model**: `StorageNode`, `Element`, `StructuredMacro`, `parse_storage`
//! - **Decode**: `decode_storage`, `TreeRenderer`, `cleanup_markdown`
//! - **Encode**: `encode_markdown`, `LineEncoder`, `adapt_storage`
//! - **Documents and export**: `load_markdown_for_storage`, `save_page_as_markdown`
//! - **Pipeline traits**: `StorageDecoder`, `StorageEncoder`, `MarkdownConverter`

mod config;
mod constants;
mod error;
mod types;

pub mod decode;
pub mod document;
pub mod encode;
pub mod frontmatter;
pub mod inline;
pub mod model;
pub mod output;
mod pipeline;

// --- Error Handling ---
pub use crate::error::{ConvertError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::ConverterConfig;

// --- Domain Types ---
pub use crate::types::{FrontMatter, MacroId, PageId, PageMetadata, TaskId};

// --- Storage Model ---
pub use crate::model::{parse_storage, Element, MacroBody, PanelKind, StorageNode, StructuredMacro};

// --- Decode / Encode ---
pub use crate::decode::{cleanup_markdown, decode_storage, strip_tags, TreeRenderer};
pub use crate::encode::{adapt_storage, encode_markdown, expand_link_references, LineEncoder};

// --- Documents and Export ---
pub use crate::document::{load_markdown_for_storage, LoadedDocument};
pub use crate::output::{save_page_as_markdown, save_page_record, SaveOptions, SavedPage};

// --- Pipeline Traits ---
pub use crate::pipeline::{MarkdownConverter, StorageDecoder, StorageEncoder};
