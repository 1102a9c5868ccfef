// src/output/mod.rs
//! Page export with planning kept apart from execution.
//!
//! Planning (decode, path choice) is pure; only the writer touches the
//! filesystem.

mod paths;
mod plan;
mod types;
mod writer;

pub use paths::{ensure_md_extension, export_path, sanitize_filename};
pub use plan::plan_export;
pub use types::{ExportPlan, SaveOptions, SavedPage};
pub use writer::{deliver, save_page_as_markdown, save_page_record};
