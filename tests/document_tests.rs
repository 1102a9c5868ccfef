// tests/document_tests.rs
//! File-facing entry points: loading Markdown for upload and exporting pages.

mod common;

use common::config;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use storage2md::{
    load_markdown_for_storage, save_page_as_markdown, save_page_record, ConvertError,
    ConverterConfig, PageId, PageMetadata, SaveOptions,
};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_front_matter_title_and_body() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "guide.md",
        "---\ntitle: \"Setup Guide\"\nspaceKey: \"ENG\"\n---\n\n# Ignored Heading\n\nRun **it**.\n",
    );

    let document = load_markdown_for_storage(&path, &config()).unwrap();
    assert_eq!(document.title, "Setup Guide");
    assert_eq!(
        document.content,
        "<h1>Ignored Heading</h1><p>Run <strong>it</strong>.</p>"
    );

    let metadata = document.metadata.unwrap();
    assert_eq!(metadata.get("spaceKey").map(String::as_str), Some("ENG"));
    assert!(!document.content.contains("---"));
}

#[test]
fn title_falls_back_to_heading_then_file_stem() {
    let dir = TempDir::new().unwrap();

    let with_heading = write(&dir, "a.md", "Intro\n\n# Real Title\n\ntext");
    let document = load_markdown_for_storage(&with_heading, &config()).unwrap();
    assert_eq!(document.title, "Real Title");
    assert!(document.metadata.is_none());

    let plain = write(&dir, "release-notes.md", "just text");
    let document = load_markdown_for_storage(&plain, &config()).unwrap();
    assert_eq!(document.title, "release-notes");
}

#[test]
fn relative_paths_are_preconditions() {
    let err = load_markdown_for_storage("../../etc/passwd".as_ref(), &config()).unwrap_err();
    assert!(matches!(err, ConvertError::RelativePath(_)));
    assert!(err.is_precondition());
}

#[test]
fn traversal_is_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let sneaky = dir.path().join("sub").join("..").join("x.md");
    let err = load_markdown_for_storage(&sneaky, &config()).unwrap_err();
    assert!(matches!(err, ConvertError::DirectoryTraversal(_)));
}

#[test]
fn missing_files_are_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_markdown_for_storage(&dir.path().join("nope.md"), &config()).unwrap_err();
    assert!(matches!(err, ConvertError::FileNotFound(_)));
    assert!(err.is_precondition());
}

#[test]
fn export_names_file_after_title() {
    let dir = TempDir::new().unwrap();
    let config = config().with_output_dir(dir.path());
    let metadata = PageMetadata::new("Title With: Spaces").with_space_key("ENG");

    let saved = save_page_as_markdown(
        "<p>Hello</p>",
        &metadata,
        &SaveOptions::default(),
        &config,
    )
    .unwrap();

    assert_eq!(saved.file_path, dir.path().join("Title_With-_Spaces.md"));
    let written = fs::read_to_string(&saved.file_path).unwrap();
    assert_eq!(written, saved.markdown);
    assert_eq!(saved.bytes_written, written.len());
    assert!(written.starts_with("---\ntitle: \"Title With: Spaces\"\n"));
    assert!(written.ends_with("---\n\nHello"));
    assert_eq!(saved.metadata, Some(metadata));
}

#[test]
fn explicit_path_gains_extension_and_parent_directories() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("deeper").join("page");

    let saved = save_page_as_markdown(
        "<p>Body</p>",
        &PageMetadata::new("Ignored"),
        &SaveOptions::to_file(&target),
        &config().with_metadata(false),
    )
    .unwrap();

    assert_eq!(saved.file_path, dir.path().join("nested/deeper/page.md"));
    assert_eq!(fs::read_to_string(&saved.file_path).unwrap(), "Body");
    assert!(saved.metadata.is_none());
}

#[test]
fn page_records_supply_body_and_metadata() {
    let dir = TempDir::new().unwrap();
    let record = json!({
        "id": "98765",
        "title": "Runbook",
        "spaceId": "OPS",
        "createdAt": "2024-03-01T10:00:00Z",
        "version": {
            "createdAt": "2024-03-02T10:00:00Z",
            "createdBy": { "displayName": "Grace" }
        },
        "body": { "storage": { "value": "<h2>Steps</h2><ol><li>Restart</li></ol>" } }
    });

    let saved = save_page_record(
        &record,
        &SaveOptions::default(),
        &config().with_output_dir(dir.path()),
    )
    .unwrap();

    assert_eq!(saved.file_path, dir.path().join("Runbook.md"));
    let metadata = saved.metadata.unwrap();
    assert_eq!(metadata.id, Some(PageId::new(98765)));
    assert_eq!(metadata.space_key.as_deref(), Some("OPS"));
    assert_eq!(metadata.author.as_deref(), Some("Grace"));
    assert!(saved.markdown.ends_with("---\n\n## Steps\n\n1. Restart"));
}

#[test]
fn config_is_read_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "config.json",
        r#"{"includeMetadata": false, "pageLinkScheme": "wiki", "defaultExpandTitle": "More"}"#,
    );

    let loaded = ConverterConfig::from_json_file(&path).unwrap();
    assert!(!loaded.include_metadata);
    assert_eq!(loaded.page_link_scheme, "wiki");
    assert_eq!(loaded.default_expand_title, "More");
    assert_eq!(loaded.max_nesting_depth, ConverterConfig::default().max_nesting_depth);
}

#[test]
fn invalid_config_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{ not json");
    let err = ConverterConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConvertError::Config { .. }));
    assert!(err.to_string().contains("broken.json"));
}
