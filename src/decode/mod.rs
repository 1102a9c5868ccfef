//! Decode path: storage markup to Markdown.
//!
//! Parse, normalise macros, walk the tree, prepend front matter, clean up.
//! Any failure along the way degrades to stripping every tag from the raw
//! input, so decoding never fails.

mod cleanup;
mod preprocess;
mod renderer;
mod state;
mod table;

pub use cleanup::{cleanup_markdown, rewrite_segments};
pub use preprocess::{classify_markdown_body, is_diagram, preprocess};
pub use renderer::{join_fragments, TreeRenderer};
pub use state::RenderContext;

use crate::config::ConverterConfig;
use crate::error::Result;
use crate::frontmatter;
use crate::model::parse_storage;
use crate::types::PageMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));

/// Converts storage markup to Markdown, prefixed with front matter when
/// metadata is supplied. Never fails; see [`strip_tags`] for the fallback.
pub fn decode_storage(
    storage: &str,
    metadata: Option<&PageMetadata>,
    config: &ConverterConfig,
) -> String {
    if storage.is_empty() {
        return String::new();
    }
    match try_decode(storage, metadata, config) {
        Ok(markdown) => markdown,
        Err(err) => {
            log::warn!("Storage decode failed, falling back to tag stripping: {}", err);
            strip_tags(storage)
        }
    }
}

fn try_decode(
    storage: &str,
    metadata: Option<&PageMetadata>,
    config: &ConverterConfig,
) -> Result<String> {
    let nodes = parse_storage(storage, config.max_nesting_depth)?;
    log::debug!("Parsed {} top-level storage nodes", nodes.len());

    let nodes = preprocess(nodes);
    let body = TreeRenderer::new(config).render_document(&nodes);

    let markdown = match metadata {
        Some(metadata) => format!("{}\n\n{}", frontmatter::inject(metadata), body),
        None => body,
    };
    Ok(cleanup_markdown(&markdown))
}

/// Best-effort plain text: every tag removed, surrounding whitespace trimmed.
pub fn strip_tags(storage: &str) -> String {
    ANY_TAG.replace_all(storage, "").trim().to_string()
}
