// src/output/plan.rs
//! Export planning: decode and pick the target path, without any I/O.

use super::paths::export_path;
use super::types::{ExportPlan, SaveOptions};
use crate::config::ConverterConfig;
use crate::decode::decode_storage;
use crate::types::PageMetadata;

/// Decodes a page and decides where it goes.
///
/// Front matter is written only when `include_metadata` is set; the title
/// still names the file either way.
pub fn plan_export(
    storage: &str,
    metadata: &PageMetadata,
    options: &SaveOptions,
    config: &ConverterConfig,
) -> ExportPlan {
    let included = config.include_metadata.then(|| metadata.clone());
    let markdown = decode_storage(storage, included.as_ref(), config);
    let path = export_path(
        options.file_path.as_deref(),
        &config.output_dir,
        &metadata.title,
    );

    ExportPlan {
        path,
        markdown,
        metadata: included,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn plan_includes_front_matter_when_configured() {
        let metadata = PageMetadata::new("Team Notes");
        let plan = plan_export(
            "<p>Hi</p>",
            &metadata,
            &SaveOptions::default(),
            &ConverterConfig::default(),
        );
        assert_eq!(plan.path, Path::new("./exports/Team_Notes.md"));
        assert!(plan.markdown.starts_with("---\ntitle: \"Team Notes\""));
        assert!(plan.markdown.ends_with("Hi"));
        assert_eq!(plan.metadata, Some(metadata));
    }

    #[test]
    fn plan_without_metadata_is_body_only() {
        let config = ConverterConfig::default().with_metadata(false);
        let plan = plan_export(
            "<p>Hi</p>",
            &PageMetadata::new("T"),
            &SaveOptions::to_file("/out/page"),
            &config,
        );
        assert_eq!(plan.markdown, "Hi");
        assert_eq!(plan.path, Path::new("/out/page.md"));
        assert_eq!(plan.metadata, None);
    }
}
