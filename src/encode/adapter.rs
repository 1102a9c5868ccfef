//! Final normalisation of encoded storage markup.

use once_cell::sync::Lazy;
use regex::Regex;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

static EMPTY_PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<p>\s*</p>").expect("paragraph regex is valid"));
static EMPTY_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(td|th)>\s*</(td|th)>").expect("cell regex is valid"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\n\s*").expect("line break regex is valid"));

/// Drops empty paragraphs, fills empty cells with a non-breaking space and
/// removes line breaks with their surrounding indentation. CDATA sections
/// pass through intact.
pub fn adapt_storage(storage: &str) -> String {
    let mut output = String::with_capacity(storage.len());
    let mut rest = storage;
    while let Some(start) = rest.find(CDATA_OPEN) {
        let (markup, tail) = rest.split_at(start);
        output.push_str(&adapt_markup(markup));
        let end = tail
            .find(CDATA_CLOSE)
            .map_or(tail.len(), |index| index + CDATA_CLOSE.len());
        output.push_str(&tail[..end]);
        rest = &tail[end..];
    }
    output.push_str(&adapt_markup(rest));
    output.trim().to_string()
}

fn adapt_markup(markup: &str) -> String {
    let markup = markup.replace('\r', "");
    let markup = EMPTY_PARAGRAPH.replace_all(&markup, "");
    let markup = EMPTY_CELL.replace_all(&markup, "<$1>&#160;</$2>");
    LINE_BREAK.replace_all(&markup, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_empty_paragraphs_and_fills_cells() {
        assert_eq!(
            adapt_storage("<p></p>\n<table><tr><th> </th><td></td><td>x</td></tr></table>"),
            "<table><tr><th>&#160;</th><td>&#160;</td><td>x</td></tr></table>"
        );
    }

    #[test]
    fn joins_tags_across_line_breaks() {
        assert_eq!(adapt_storage("<ul>\n  <li>a</li>\r\n</ul>\n"), "<ul><li>a</li></ul>");
    }

    #[test]
    fn leaves_cdata_untouched() {
        let storage = "<ac:plain-text-body><![CDATA[<p></p>\n\n  <td></td>]]></ac:plain-text-body>\n<p>x</p>";
        assert_eq!(
            adapt_storage(storage),
            "<ac:plain-text-body><![CDATA[<p></p>\n\n  <td></td>]]></ac:plain-text-body><p>x</p>"
        );
    }

    #[test]
    fn keeps_spaces_inside_text() {
        assert_eq!(adapt_storage("<p>a  b</p> <p>c</p>"), "<p>a  b</p> <p>c</p>");
    }
}
