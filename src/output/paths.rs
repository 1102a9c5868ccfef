// src/output/paths.rs
//! Pure functions for export path calculation.
//!
//! Nothing here touches the filesystem.

use crate::constants::{MAX_FILENAME_LENGTH, UNTITLED_FILENAME};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("hyphen regex is valid"));

/// Turns a page title into a filename stem.
///
/// Reserved characters become `-`, whitespace runs become `_`, hyphen runs
/// collapse to one and the result is cut to [`MAX_FILENAME_LENGTH`]
/// characters. An empty result falls back to `untitled`.
pub fn sanitize_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '-',
            c => c,
        })
        .collect();
    let replaced = WHITESPACE_RUN.replace_all(&replaced, "_");
    let collapsed = HYPHEN_RUN.replace_all(&replaced, "-");
    let stem: String = collapsed.chars().take(MAX_FILENAME_LENGTH).collect();

    if stem.is_empty() {
        UNTITLED_FILENAME.to_string()
    } else {
        stem
    }
}

/// Appends `.md` unless the path already ends with it.
pub fn ensure_md_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".md") {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".md");
        PathBuf::from(raw)
    }
}

/// Target path of an exported page: the explicit path when given, else
/// `output_dir/<sanitised title>.md`.
pub fn export_path(explicit: Option<&Path>, output_dir: &Path, title: &str) -> PathBuf {
    match explicit {
        Some(path) => ensure_md_extension(path),
        None => {
            let title = if title.trim().is_empty() {
                UNTITLED_FILENAME
            } else {
                title
            };
            output_dir.join(format!("{}.md", sanitize_filename(title)))
        }
    }
}
