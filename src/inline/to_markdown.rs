//! Inline spans, storage to Markdown.
//!
//! The tag-tree renderer resolves an inline element to one of these styles
//! and hands over the already-rendered content of its children.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\r\n]+").expect("whitespace regex is valid"));

/// Inline styles with a Markdown delimiter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    Bold,
    Italic,
    Code,
    Strikethrough,
}

impl InlineStyle {
    /// Maps an inline element name to its style.
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "strong" | "b" => Some(InlineStyle::Bold),
            "em" | "i" => Some(InlineStyle::Italic),
            "code" | "tt" | "kbd" | "samp" => Some(InlineStyle::Code),
            "del" | "s" | "strike" => Some(InlineStyle::Strikethrough),
            _ => None,
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            InlineStyle::Bold => "**",
            InlineStyle::Italic => "*",
            InlineStyle::Code => "`",
            InlineStyle::Strikethrough => "~~",
        }
    }
}

/// Renderer for inline styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Wraps content in the style's delimiters.
    ///
    /// Leading and trailing whitespace is moved outside the delimiters, and
    /// whitespace-only content is returned unwrapped, since `** x**` is not
    /// emphasis in Markdown.
    pub fn apply_style(content: &str, style: InlineStyle) -> String {
        let core = content.trim_matches(is_ascii_space);
        if core.is_empty() {
            return content.to_string();
        }
        let start = content.len() - content.trim_start_matches(is_ascii_space).len();
        let leading = &content[..start];
        let trailing = &content[start + core.len()..];

        let wrapped = if style == InlineStyle::Code {
            code_span(core)
        } else {
            let delimiter = style.delimiter();
            format!("{delimiter}{core}{delimiter}")
        };
        format!("{leading}{wrapped}{trailing}")
    }

    /// Renders `[text](href)`, degrading to the bare text or URL when one is missing.
    pub fn link(text: &str, href: &str) -> String {
        let text = text.trim();
        match (text.is_empty(), href.is_empty()) {
            (_, true) => text.to_string(),
            (true, false) => format!("[{href}]({href})"),
            (false, false) => format!("[{text}]({href})"),
        }
    }

    pub fn image(alt: &str, src: &str) -> String {
        format!("![{}]({})", alt.trim(), src)
    }
}

/// Backtick fence long enough for the content.
fn code_span(content: &str) -> String {
    if !content.contains('`') {
        return format!("`{content}`");
    }
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest + 1);
    format!("{fence} {content} {fence}")
}

fn is_ascii_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Collapses runs of ASCII whitespace to one space; non-breaking spaces survive.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    WHITESPACE_RUN.replace_all(text, " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_bold_and_italic() {
        assert_eq!(
            MarkdownStyleRenderer::apply_style("bold", InlineStyle::Bold),
            "**bold**"
        );
        assert_eq!(
            MarkdownStyleRenderer::apply_style("it", InlineStyle::Italic),
            "*it*"
        );
    }

    #[test]
    fn nested_bold_italic_composes() {
        let inner = MarkdownStyleRenderer::apply_style("x", InlineStyle::Italic);
        assert_eq!(
            MarkdownStyleRenderer::apply_style(&inner, InlineStyle::Bold),
            "***x***"
        );
    }

    #[test]
    fn moves_edge_whitespace_outside_delimiters() {
        assert_eq!(
            MarkdownStyleRenderer::apply_style(" word ", InlineStyle::Bold),
            " **word** "
        );
        assert_eq!(
            MarkdownStyleRenderer::apply_style("  ", InlineStyle::Bold),
            "  "
        );
    }

    #[test]
    fn code_spans_grow_fence_around_backticks() {
        assert_eq!(
            MarkdownStyleRenderer::apply_style("a`b", InlineStyle::Code),
            "`` a`b ``"
        );
        assert_eq!(
            MarkdownStyleRenderer::apply_style("ls -la", InlineStyle::Code),
            "`ls -la`"
        );
    }

    #[test]
    fn strikethrough_uses_double_tilde() {
        assert_eq!(
            MarkdownStyleRenderer::apply_style("old", InlineStyle::Strikethrough),
            "~~old~~"
        );
    }

    #[test]
    fn links_degrade_gracefully() {
        assert_eq!(MarkdownStyleRenderer::link("Docs", "https://x.io"), "[Docs](https://x.io)");
        assert_eq!(MarkdownStyleRenderer::link("", "https://x.io"), "[https://x.io](https://x.io)");
        assert_eq!(MarkdownStyleRenderer::link("Docs", ""), "Docs");
    }

    #[test]
    fn collapses_ascii_whitespace_only() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }
}
