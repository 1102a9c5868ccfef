//! Macro normalisation ahead of the tree walk.
//!
//! Code macros become plain code blocks and markdown macros are classified as
//! either diagrams (fenced as `mermaid`) or verbatim Markdown. Every other
//! macro is left for the renderer's macro rules.

use crate::model::{MacroBody, StorageNode, StructuredMacro};
use once_cell::sync::Lazy;
use regex::Regex;

static DIAGRAM_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(flowchart|graph|sequence(diagram)?|class(diagram)?|state\s?(diagram)?|er(diagram)?|gantt|journey|pie|timeline)\b",
    )
    .expect("diagram keyword regex is valid")
});

static MERMAID_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```\s*mermaid").expect("mermaid fence regex is valid"));

/// Normalises every macro in the forest.
pub fn preprocess(nodes: Vec<StorageNode>) -> Vec<StorageNode> {
    nodes.into_iter().map(normalize).collect()
}

fn normalize(node: StorageNode) -> StorageNode {
    match node {
        StorageNode::Macro(StructuredMacro::Code { language, body }) => StorageNode::CodeBlock {
            language,
            code: body,
        },
        StorageNode::Macro(StructuredMacro::Markdown { body }) => classify_markdown_body(&body),
        StorageNode::Macro(StructuredMacro::Expand { title, body }) => {
            StorageNode::Macro(StructuredMacro::Expand {
                title,
                body: preprocess(body),
            })
        }
        StorageNode::Macro(StructuredMacro::Panel { kind, body }) => {
            StorageNode::Macro(StructuredMacro::Panel {
                kind,
                body: preprocess(body),
            })
        }
        StorageNode::Macro(StructuredMacro::Unknown {
            name,
            parameters,
            body: MacroBody::Rich(nodes),
        }) => StorageNode::Macro(StructuredMacro::Unknown {
            name,
            parameters,
            body: MacroBody::Rich(preprocess(nodes)),
        }),
        StorageNode::Element(mut element) => {
            element.children = preprocess(element.children);
            StorageNode::Element(element)
        }
        other => other,
    }
}

/// Whether a markdown macro body describes a diagram.
pub fn is_diagram(body: &str) -> bool {
    let body = body.trim();
    MERMAID_FENCE.is_match(body) || DIAGRAM_KEYWORD.is_match(body)
}

/// Turns a markdown macro body into a mermaid code block or verbatim Markdown.
pub fn classify_markdown_body(body: &str) -> StorageNode {
    let inner = body.trim();
    if is_diagram(inner) && !MERMAID_FENCE.is_match(inner) {
        StorageNode::CodeBlock {
            language: Some("mermaid".to_string()),
            code: inner.to_string(),
        }
    } else {
        StorageNode::Markdown(inner.to_string())
    }
}
