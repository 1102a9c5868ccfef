//! Tolerant storage-markup parser.
//!
//! Storage documents are XML fragments with undeclared `ac:`/`ri:` prefixes,
//! HTML void elements and the occasional stray closing tag. The parser accepts
//! all of these and only fails on input quick-xml cannot tokenize at all.

use super::{decode_entities, Element, StorageNode, StructuredMacro};
use crate::error::{ConvertError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "col", "meta", "input", "wbr", "source"];

/// Parses storage markup into a forest of nodes.
///
/// Elements opened deeper than `max_depth` are flattened: their tags are
/// dropped and their content lands in the deepest kept ancestor. Unclosed
/// elements are closed at end of input; closing tags with no open
/// counterpart are ignored.
pub fn parse_storage(input: &str, max_depth: usize) -> Result<Vec<StorageNode>> {
    let mut reader = Reader::from_str(input);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut tree = TreeBuilder::new(max_depth);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => tree.open(element_from_start(&start)),
            Ok(Event::Empty(start)) => tree.leaf(element_from_start(&start)),
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                tree.close(&name);
            }
            Ok(Event::Text(text)) => {
                let raw = String::from_utf8_lossy(&text);
                tree.text(&decode_entities(&raw));
            }
            Ok(Event::CData(data)) => tree.text(&String::from_utf8_lossy(&data)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ConvertError::MalformedStorage(format!(
                    "{err} at byte {}",
                    reader.error_position()
                )))
            }
        }
    }
    Ok(tree.finish())
}

fn element_from_start(start: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut element = Element::new(name);
    for attribute in start.html_attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = decode_entities(&raw).into_owned();
        element.attributes.push((key, value));
    }
    element
}

/// Stack machine turning the flat event stream into a tree.
struct TreeBuilder {
    roots: Vec<StorageNode>,
    open: Vec<Element>,
    /// Names of elements skipped for exceeding the depth limit.
    flattened: Vec<String>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            roots: Vec::new(),
            open: Vec::new(),
            flattened: Vec::new(),
            max_depth,
        }
    }

    fn open(&mut self, element: Element) {
        if VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.leaf(element);
        } else if self.open.len() >= self.max_depth {
            log::trace!("Flattening <{}> beyond depth {}", element.name, self.max_depth);
            self.flattened.push(element.name);
        } else {
            self.open.push(element);
        }
    }

    fn leaf(&mut self, element: Element) {
        self.append(finish(element));
    }

    fn close(&mut self, name: &str) {
        if self.flattened.last().is_some_and(|open| open == name) {
            self.flattened.pop();
            return;
        }
        let Some(position) = self.open.iter().rposition(|el| el.name == name) else {
            log::debug!("Ignoring unmatched closing tag </{}>", name);
            return;
        };
        while self.open.len() > position {
            if let Some(element) = self.open.pop() {
                self.append(finish(element));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        // Adjacent runs (split CDATA sections, entity boundaries) become one node.
        if let Some(StorageNode::Text(previous)) = siblings.last_mut() {
            previous.push_str(text);
        } else {
            siblings.push(StorageNode::Text(text.to_string()));
        }
    }

    fn append(&mut self, node: StorageNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> Vec<StorageNode> {
        while let Some(element) = self.open.pop() {
            self.append(finish(element));
        }
        self.roots
    }
}

fn finish(element: Element) -> StorageNode {
    if element.is_named("ac:structured-macro") {
        StorageNode::Macro(StructuredMacro::from_element(element))
    } else {
        StorageNode::Element(element)
    }
}
