//! Encode path: Markdown to storage markup.
//!
//! Front matter is split off first, reference links are expanded, the body
//! goes through the line encoder and the result is normalised by the
//! storage adapter. Encoding text never fails.

mod adapter;
mod encoder;
mod markup;
mod references;
mod state;

pub use adapter::adapt_storage;
pub use encoder::{split_cells, LineEncoder};
pub use markup::cdata;
pub(crate) use markup::image;
pub use references::expand_link_references;
pub use state::{BlockState, FenceContext, FenceKind, ListContext, ListKind, TableContext};

use crate::config::ConverterConfig;
use crate::frontmatter;

/// Converts a Markdown document to storage markup. A leading front-matter
/// block is not part of the output.
pub fn encode_markdown(markdown: &str, config: &ConverterConfig) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }
    let (_, body) = frontmatter::extract(markdown);
    encode_body(body, config)
}

/// Encodes a Markdown body that carries no front matter.
pub fn encode_body(body: &str, config: &ConverterConfig) -> String {
    let body = expand_link_references(body);
    let storage = LineEncoder::new(config).encode(&body);
    adapt_storage(&storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(markdown: &str) -> String {
        encode_markdown(markdown, &ConverterConfig::default())
    }

    #[test]
    fn blank_input_encodes_to_nothing() {
        assert_eq!(encode(""), "");
        assert_eq!(encode("\n  \n"), "");
    }

    #[test]
    fn front_matter_is_not_encoded() {
        assert_eq!(
            encode("---\ntitle: \"T\"\n---\n\nHello"),
            "<p>Hello</p>"
        );
    }

    #[test]
    fn task_list_scenario() {
        let storage = encode("# T\n\n- [ ] a\n- [x] b\n");
        assert_eq!(storage.matches("<ac:task-list>").count(), 1);
        assert_eq!(storage.matches("<ac:task>").count(), 2);
        let incomplete = storage.find("<ac:task-status>incomplete</ac:task-status>");
        let complete = storage.find("<ac:task-status>complete</ac:task-status>");
        assert!(incomplete.unwrap() < complete.unwrap());
    }

    #[test]
    fn list_markup_is_joined_without_line_breaks() {
        assert_eq!(
            encode("- a\n  - b"),
            "<ul><li>a<ul><li>b</li></ul></li></ul>"
        );
    }

    #[test]
    fn reference_links_are_expanded() {
        assert_eq!(
            encode("See [docs].\n\n[docs]: https://d.io"),
            r#"<p>See <a href="https://d.io">docs</a>.</p>"#
        );
    }

    #[test]
    fn page_links_become_page_references() {
        assert_eq!(
            encode("[Intro](confluence://ENG/Getting%20Started)"),
            r#"<p><ac:link><ri:page ri:space-key="ENG" ri:content-title="Getting Started" /><ac:link-body>Intro</ac:link-body></ac:link></p>"#
        );
    }
}
