//! Storage-format document tree.
//!
//! A storage document is a forest of [`StorageNode`]s. Generic HTML-like
//! elements stay untyped; structured macros are lifted into the closed
//! [`StructuredMacro`] variant set as soon as they are parsed, so later stages
//! read macro parameters as fields instead of searching the tree for them.

mod entities;
mod macros;
mod parser;

pub use entities::{decode_entities, escape_xml};
pub use macros::{MacroBody, PanelKind, StructuredMacro};
pub use parser::parse_storage;

/// A node of the storage tree.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageNode {
    /// A generic element (`p`, `ul`, `ac:image`, `ri:page`, ...).
    Element(Element),
    /// A recognised or unknown `ac:structured-macro`.
    Macro(StructuredMacro),
    /// Character data with entities already resolved.
    Text(String),
    /// Normalised code block produced by macro preprocessing.
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// Markdown carried verbatim by a markdown macro.
    Markdown(String),
}

/// A generic element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<StorageNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: StorageNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(StorageNode::Text(text.into()))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }

    /// Looks up an attribute value by its full (prefixed) name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.is_named(name))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(StorageNode::as_element)
    }

    /// First descendant element with the given name, in document order.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        let mut pending: Vec<&StorageNode> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            if let StorageNode::Element(el) = node {
                if el.is_named(name) {
                    return Some(el);
                }
                pending.extend(el.children.iter().rev());
            }
        }
        None
    }

    /// Concatenated character data of every descendant.
    pub fn text_content(&self) -> String {
        text_content_of(&self.children)
    }

    pub fn is_block(&self) -> bool {
        is_block_element(&self.name)
    }
}

impl StorageNode {
    pub fn element(name: impl Into<String>) -> Self {
        StorageNode::Element(Element::new(name))
    }

    pub fn text(text: impl Into<String>) -> Self {
        StorageNode::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            StorageNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, StorageNode::Text(t) if t.trim().is_empty())
    }

    /// Whether the node renders as a block of its own in Markdown.
    pub fn is_block(&self) -> bool {
        match self {
            StorageNode::Element(el) => el.is_block(),
            StorageNode::Macro(_) | StorageNode::CodeBlock { .. } | StorageNode::Markdown(_) => {
                true
            }
            StorageNode::Text(_) => false,
        }
    }

    pub fn text_content(&self) -> String {
        text_content_of(std::slice::from_ref(self))
    }
}

/// Collects character data without recursing, so arbitrarily deep trees are safe.
pub fn text_content_of(nodes: &[StorageNode]) -> String {
    let mut out = String::new();
    let mut pending: Vec<&StorageNode> = nodes.iter().rev().collect();
    while let Some(node) = pending.pop() {
        match node {
            StorageNode::Text(t) | StorageNode::Markdown(t) => out.push_str(t),
            StorageNode::CodeBlock { code, .. } => out.push_str(code),
            StorageNode::Element(el) => pending.extend(el.children.iter().rev()),
            StorageNode::Macro(m) => match m.plain_body() {
                Some(body) => out.push_str(body),
                None => pending.extend(m.content_nodes().iter().rev()),
            },
        }
    }
    out
}

const BLOCK_ELEMENTS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "thead",
    "tbody",
    "tfoot",
    "tr",
    "td",
    "th",
    "blockquote",
    "pre",
    "hr",
    "div",
    "section",
    "details",
    "ac:task-list",
    "ac:task",
    "ac:layout",
    "ac:layout-section",
    "ac:layout-cell",
    "ac:rich-text-body",
];

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}
