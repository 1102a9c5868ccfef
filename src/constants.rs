// src/constants.rs
//! Domain constants that define the operational boundaries of the converter.
//!
//! Each constant is named for the document concept it constrains. Reading
//! them tells you how deep the converter is willing to nest, how it indents,
//! and which defaults it falls back to.

// ---------------------------------------------------------------------------
// Nesting boundaries
// ---------------------------------------------------------------------------

/// Maximum element nesting depth kept when parsing storage markup.
///
/// Elements nested deeper than this are flattened into their nearest kept
/// ancestor. Bounds the recursion of the tag-tree walker on adversarial input.
pub const STORAGE_MAX_TREE_DEPTH: usize = 100;

/// Maximum nesting depth for bulleted/numbered lists on the encode path.
pub const LIST_MAX_NESTING: usize = 10;

/// Maximum nesting depth for `>` blockquotes on the encode path.
pub const BLOCKQUOTE_MAX_NESTING: usize = 10;

// ---------------------------------------------------------------------------
// Markdown layout
// ---------------------------------------------------------------------------

/// Leading spaces that make up one list nesting level in Markdown input.
pub const INDENT_SPACES: usize = 2;

/// Indentation of plain bullet notes attached to a task list.
pub const TASK_NOTE_INDENT: usize = 4;

/// Marker written in front of every unknown macro on decode.
pub const UNKNOWN_MACRO_MARKER: &str = "Confluence Macro";

/// Scheme used for page-reference links in decoded Markdown.
pub const DEFAULT_PAGE_LINK_SCHEME: &str = "confluence";

/// Title used for collapsible sections that carry none.
pub const DEFAULT_EXPAND_TITLE: &str = "Details";

/// Title used for page references whose target title is missing.
pub const DEFAULT_PAGE_TITLE: &str = "Page";

// ---------------------------------------------------------------------------
// Storage identifiers
// ---------------------------------------------------------------------------

/// Exclusive upper bound for generated task ids.
pub const TASK_ID_UPPER_BOUND: u32 = 1_000_000;

/// Schema version written on every generated structured macro.
pub const MACRO_SCHEMA_VERSION: &str = "1";

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Directory used for exported pages when no explicit path is given.
pub const DEFAULT_EXPORT_DIR: &str = "./exports";

/// Filename stem used when a page has no title.
pub const UNTITLED_FILENAME: &str = "untitled";

/// Maximum length of a sanitised export filename stem, in characters.
pub const MAX_FILENAME_LENGTH: usize = 200;
