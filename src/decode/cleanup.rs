//! Post-processing of rendered Markdown.
//!
//! Prose rules never touch fenced code; mermaid fences get their own reflow.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("cleanup regex is valid"));
    };
}

pattern!(ESCAPED_HEADING_NUMBER, r"(?m)^(#+[ \t]+\d+)\\\.");
pattern!(ESCAPED_LIST_NUMBER, r"(?m)^(\d+)\\\.[ \t]+");
pattern!(BLANKS_BEFORE_RULE, r"\n{3,}---");
pattern!(BLANKS_AFTER_RULE, r"---\n{3,}");
pattern!(WIDE_BULLET, r"(?m)^-[ \t]{2,}");
pattern!(DOUBLE_BULLET, r"(?m)^-[ \t]+-[ \t]+");
pattern!(LOOSE_CHILD_BULLET, r"(?m)(^-[ \t]+.*)\n\n([ \t]{4}-[ \t]+)");
pattern!(STRAY_ESCAPE, r"\\(`{1,3}|-|#|\[|\])");
pattern!(BLANK_LINE_WHITESPACE, r"(?m)^[ \t]+$");
pattern!(EXCESS_BLANK_LINES, r"\n{3,}");

pattern!(MERMAID_OPENER, r"^```mermaid\s+");
pattern!(FLOWCHART_DECLARATION, r"(?i)\s*flowchart\s+([A-Z]{2})\s*");
pattern!(
    DIAGRAM_EDGE,
    r"\s+([A-Za-z0-9_\[\]{}:.]+\s*--?>\|?[^\n]*?\|?\s*[A-Za-z0-9_\[\]{}:.]+)"
);
pattern!(STYLE_DIRECTIVE, r"\s+style\s+");
pattern!(TRAILING_WHITESPACE, r"\s+$");

/// Applies every cleanup rule and trims the result.
pub fn cleanup_markdown(markdown: &str) -> String {
    let cleaned = rewrite_segments(markdown, clean_prose, reflow_fence);
    cleaned.trim().to_string()
}

fn clean_prose(text: &str) -> String {
    let text = ESCAPED_HEADING_NUMBER.replace_all(text, "$1.");
    let text = ESCAPED_LIST_NUMBER.replace_all(&text, "$1. ");
    let text = BLANKS_BEFORE_RULE.replace_all(&text, "\n\n---");
    let text = BLANKS_AFTER_RULE.replace_all(&text, "---\n\n");
    let text = WIDE_BULLET.replace_all(&text, "- ");
    let text = DOUBLE_BULLET.replace_all(&text, "    - ");
    let text = LOOSE_CHILD_BULLET.replace_all(&text, "$1\n$2");
    let text = STRAY_ESCAPE.replace_all(&text, "$1");
    let text = BLANK_LINE_WHITESPACE.replace_all(&text, "");
    EXCESS_BLANK_LINES.replace_all(&text, "\n\n").into_owned()
}

/// Puts a mermaid diagram's declaration, edges and style directives on
/// their own lines. Other fences are returned unchanged.
fn reflow_fence(fence: &str) -> String {
    let Some(opener) = MERMAID_OPENER.find(fence) else {
        return fence.to_string();
    };
    let body = &fence[opener.end()..];
    let Some(inner) = body.strip_suffix("```") else {
        return fence.to_string();
    };

    let inner = FLOWCHART_DECLARATION.replacen(inner, 1, |caps: &Captures| {
        format!("flowchart {}\n", &caps[1])
    });
    let inner = DIAGRAM_EDGE.replace_all(&inner, "\n$1");
    let inner = STYLE_DIRECTIVE.replace_all(&inner, "\nstyle ");
    let inner = TRAILING_WHITESPACE.replace(&inner, "\n");
    let inner = inner.trim_start_matches('\n');
    format!("```mermaid\n{inner}```")
}

/// Splits text into prose and fenced-code segments, rewriting each with
/// its own function. An unterminated fence runs to the end of the text.
pub fn rewrite_segments<P, F>(text: &str, mut prose: P, mut fence: F) -> String
where
    P: FnMut(&str) -> String,
    F: FnMut(&str) -> String,
{
    let mut output: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence_marker: Option<&str> = None;

    for line in text.split('\n') {
        let stripped = line.trim_start();
        match fence_marker {
            None if stripped.starts_with("```") => {
                if !current.is_empty() {
                    output.push(prose(&current.join("\n")));
                    current.clear();
                }
                let run = stripped.len() - stripped.trim_start_matches('`').len();
                fence_marker = Some(&stripped[..run]);
                current.push(line);
            }
            Some(marker) if is_closing(stripped, marker) => {
                current.push(line);
                output.push(fence(&current.join("\n")));
                current.clear();
                fence_marker = None;
            }
            _ => current.push(line),
        }
    }
    if !current.is_empty() {
        let rest = current.join("\n");
        output.push(match fence_marker {
            Some(_) => fence(&rest),
            None => prose(&rest),
        });
    }
    output.join("\n")
}

fn is_closing(line: &str, marker: &str) -> bool {
    let line = line.trim_end();
    line.len() >= marker.len() && line.chars().all(|c| c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unescapes_numbered_markers() {
        assert_eq!(cleanup_markdown("1\\. First"), "1. First");
        assert_eq!(cleanup_markdown("## 2\\. Setup"), "## 2. Setup");
    }

    #[test]
    fn collapses_blank_lines_around_rules() {
        assert_eq!(cleanup_markdown("a\n\n\n\n---\n\n\n\nb"), "a\n\n---\n\nb");
    }

    #[test]
    fn repairs_bullet_artifacts() {
        assert_eq!(cleanup_markdown("-   item"), "- item");
        assert_eq!(cleanup_markdown("- parent\n\n- - child"), "- parent\n    - child");
    }

    #[test]
    fn removes_stray_escapes_outside_code() {
        assert_eq!(
            cleanup_markdown("\\# not a heading \\[x\\] \\- \\`\n\n```\n\\# kept\n```"),
            "# not a heading [x] - `\n\n```\n\\# kept\n```"
        );
    }

    #[test]
    fn keeps_blank_lines_inside_fences() {
        let text = "```\na\n\n\n\nb\n```";
        assert_eq!(cleanup_markdown(text), text);
    }

    #[test]
    fn reflows_inline_mermaid() {
        assert_eq!(
            cleanup_markdown("```mermaid\nflowchart TD A-->B B-->C style A fill:#f9f\n```"),
            "```mermaid\nflowchart TD\nA-->B\nB-->C\nstyle A fill:#f9f\n```"
        );
    }

    #[test]
    fn well_formed_mermaid_is_stable() {
        let text = "```mermaid\nflowchart TD\nA-->B\n```";
        assert_eq!(cleanup_markdown(text), text);
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        assert_eq!(cleanup_markdown("```\n\\# x"), "```\n\\# x");
    }
}
