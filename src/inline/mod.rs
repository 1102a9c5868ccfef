//! Inline formatter, in both directions.
//!
//! Storage to Markdown works on parsed elements and only needs delimiter
//! helpers; Markdown to storage works line by line with ordered regular
//! substitutions.

mod emoji;
mod to_markdown;
mod to_storage;

pub use emoji::encode_emoji;
pub use to_markdown::{collapse_whitespace, InlineStyle, MarkdownStyleRenderer};
pub use to_storage::render_inline;
