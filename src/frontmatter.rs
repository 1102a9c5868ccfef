//! Front-matter codec.
//!
//! The header is a fixed six-key block delimited by `---` lines. Values are
//! written quoted (except the numeric id) and unquoted when read back.

use crate::types::{FrontMatter, PageMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static FRONT_MATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^---\r?\n([\s\S]*?)\r?\n---(?:\r?\n|$)").expect("front matter regex is valid")
});

/// Splits a leading front-matter block from the body.
///
/// Without a block the whole text is returned as the body. Leading blank
/// lines of the body are dropped.
pub fn extract(markdown: &str) -> (Option<FrontMatter>, &str) {
    let Some(caps) = FRONT_MATTER.captures(markdown) else {
        return (None, markdown);
    };
    let block = caps.get(1).map_or("", |m| m.as_str());
    let body_start = caps.get(0).map_or(0, |m| m.end());

    let mut front_matter = FrontMatter::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        front_matter.insert(key.to_string(), unquote(value.trim()));
    }
    log::debug!("Extracted front matter with {} keys", front_matter.len());

    let body = markdown[body_start..].trim_start_matches(['\r', '\n']);
    (Some(front_matter), body)
}

/// Renders the fixed metadata header, without a trailing newline.
pub fn inject(metadata: &PageMetadata) -> String {
    let text = |value: &Option<String>| quote(value.as_deref().unwrap_or_default());
    let id = metadata.id.map(|id| id.to_string()).unwrap_or_default();
    [
        "---".to_string(),
        format!("title: {}", quote(&metadata.title)),
        format!("id: {id}"),
        format!("spaceKey: {}", text(&metadata.space_key)),
        format!("createdAt: {}", text(&metadata.created_at)),
        format!("updatedAt: {}", text(&metadata.updated_at)),
        format!("author: {}", text(&metadata.author)),
        "---".to_string(),
    ]
    .join("\n")
}

/// Title for a document loaded for upload: front-matter `title`, then the
/// first level-1 heading, then the file stem.
pub fn resolve_title(front_matter: Option<&FrontMatter>, body: &str, path: &Path) -> String {
    front_matter
        .and_then(|fm| fm.get("title"))
        .map(|title| title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
}

/// First `# ` heading outside fenced code.
pub fn first_heading(body: &str) -> Option<String> {
    let mut in_fence = false;
    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(title) = line.strip_prefix('#') {
            if title.starts_with([' ', '\t']) && !title.trim().is_empty() {
                return Some(title.trim().to_string());
            }
        }
    }
    None
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_string(),
    }
}
