// src/config.rs
use crate::constants::{
    DEFAULT_EXPAND_TITLE, DEFAULT_EXPORT_DIR, DEFAULT_PAGE_LINK_SCHEME, STORAGE_MAX_TREE_DEPTH,
};
use crate::error::ConvertError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Converter configuration. Every field has a default, so a partial JSON
/// document is enough to override a single knob.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterConfig {
    /// Prepend a front-matter header when exporting pages.
    pub include_metadata: bool,
    /// Export directory used when no explicit file path is given.
    pub output_dir: PathBuf,
    /// Scheme of page-reference links (`scheme://SPACE/Title`).
    pub page_link_scheme: String,
    /// Element depth kept by the storage parser.
    pub max_nesting_depth: usize,
    /// Summary text for collapsible sections without a title.
    pub default_expand_title: String,
}

impl ConverterConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConvertError> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw).map_err(|source| ConvertError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded converter config from {}", path.display());
        Ok(config)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Returns a copy with a different page link scheme.
    pub fn with_page_link_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.page_link_scheme = scheme.into();
        self
    }

    /// Returns a copy with a different export directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Returns a copy with metadata export switched on or off.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            include_metadata: true,
            output_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            page_link_scheme: DEFAULT_PAGE_LINK_SCHEME.to_string(),
            max_nesting_depth: STORAGE_MAX_TREE_DEPTH,
            default_expand_title: DEFAULT_EXPAND_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ConverterConfig::from_json_str(r#"{"pageLinkScheme": "wiki"}"#).unwrap();
        assert_eq!(config.page_link_scheme, "wiki");
        assert!(config.include_metadata);
        assert_eq!(config.output_dir, PathBuf::from("./exports"));
        assert_eq!(config.max_nesting_depth, STORAGE_MAX_TREE_DEPTH);
    }

    #[test]
    fn invalid_json_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = ConverterConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn builders_override_fields() {
        let config = ConverterConfig::default()
            .with_metadata(false)
            .with_output_dir("/tmp/out")
            .with_page_link_scheme("kb");
        assert!(!config.include_metadata);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.page_link_scheme, "kb");
    }
}
