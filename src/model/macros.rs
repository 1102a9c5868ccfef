use super::{Element, StorageNode};
use indexmap::IndexMap;
use std::fmt;

/// Admonition flavour shared by panel macros and Markdown alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Info,
    Note,
    Warning,
    Tip,
    Caution,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Info,
        PanelKind::Note,
        PanelKind::Warning,
        PanelKind::Tip,
        PanelKind::Caution,
    ];

    /// Matches a macro name or alert label, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.macro_name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn macro_name(self) -> &'static str {
        match self {
            PanelKind::Info => "info",
            PanelKind::Note => "note",
            PanelKind::Warning => "warning",
            PanelKind::Tip => "tip",
            PanelKind::Caution => "caution",
        }
    }

    /// Upper-case label used in `> [!LABEL]` alerts.
    pub fn alert_label(self) -> &'static str {
        match self {
            PanelKind::Info => "INFO",
            PanelKind::Note => "NOTE",
            PanelKind::Warning => "WARNING",
            PanelKind::Tip => "TIP",
            PanelKind::Caution => "CAUTION",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.macro_name())
    }
}

/// Body of a macro that is not one of the recognised kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MacroBody {
    Rich(Vec<StorageNode>),
    Plain(String),
    #[default]
    Empty,
}

/// An `ac:structured-macro` lifted into a typed variant.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredMacro {
    Code {
        language: Option<String>,
        body: String,
    },
    Markdown {
        body: String,
    },
    Expand {
        title: Option<String>,
        body: Vec<StorageNode>,
    },
    Panel {
        kind: PanelKind,
        body: Vec<StorageNode>,
    },
    Unknown {
        name: String,
        parameters: IndexMap<String, String>,
        body: MacroBody,
    },
}

impl StructuredMacro {
    /// Builds the typed macro from a parsed `ac:structured-macro` element.
    ///
    /// Parameters and bodies are read from direct children only; nested
    /// macros keep their own parameters.
    pub fn from_element(element: Element) -> Self {
        let name = element.attr("ac:name").unwrap_or_default().trim().to_string();

        let mut parameters = IndexMap::new();
        let mut body = MacroBody::Empty;
        for child in element.children {
            let StorageNode::Element(child) = child else {
                continue;
            };
            match child.name.as_str() {
                "ac:parameter" => {
                    let key = child.attr("ac:name").unwrap_or_default().to_string();
                    parameters.insert(key, child.text_content());
                }
                "ac:rich-text-body" => body = MacroBody::Rich(child.children),
                "ac:plain-text-body" => body = MacroBody::Plain(child.text_content()),
                _ => {}
            }
        }

        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "code" => StructuredMacro::Code {
                language: non_empty(parameters.swap_remove("language")),
                body: body.into_plain(),
            },
            "markdown" => StructuredMacro::Markdown {
                body: body.into_plain(),
            },
            "expand" => StructuredMacro::Expand {
                title: non_empty(parameters.swap_remove("title")),
                body: body.into_nodes(),
            },
            _ => match PanelKind::from_name(&lowered) {
                Some(kind) => StructuredMacro::Panel {
                    kind,
                    body: body.into_nodes(),
                },
                None => StructuredMacro::Unknown {
                    name,
                    parameters,
                    body,
                },
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StructuredMacro::Code { .. } => "code",
            StructuredMacro::Markdown { .. } => "markdown",
            StructuredMacro::Expand { .. } => "expand",
            StructuredMacro::Panel { kind, .. } => kind.macro_name(),
            StructuredMacro::Unknown { name, .. } => name,
        }
    }

    /// Rich-text body nodes, empty for plain-text macros.
    pub fn content_nodes(&self) -> &[StorageNode] {
        match self {
            StructuredMacro::Expand { body, .. } | StructuredMacro::Panel { body, .. } => body,
            StructuredMacro::Unknown {
                body: MacroBody::Rich(nodes),
                ..
            } => nodes,
            _ => &[],
        }
    }

    pub fn plain_body(&self) -> Option<&str> {
        match self {
            StructuredMacro::Code { body, .. } | StructuredMacro::Markdown { body } => Some(body),
            StructuredMacro::Unknown {
                body: MacroBody::Plain(text),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

impl MacroBody {
    fn into_plain(self) -> String {
        match self {
            MacroBody::Plain(text) => text,
            MacroBody::Rich(nodes) => super::text_content_of(&nodes),
            MacroBody::Empty => String::new(),
        }
    }

    fn into_nodes(self) -> Vec<StorageNode> {
        match self {
            MacroBody::Rich(nodes) => nodes,
            MacroBody::Plain(text) if !text.is_empty() => vec![StorageNode::Text(text)],
            _ => Vec::new(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
