//! Tag-tree transducer: storage nodes to Markdown.
//!
//! Every node renders to a fragment. Block fragments are wrapped in blank
//! lines and adjacent fragments are joined so that no more than one blank
//! line ever separates two blocks.

use super::state::RenderContext;
use super::table::{collect_rows, escape_cell, format_table, row_cells};
use crate::config::ConverterConfig;
use crate::constants::{DEFAULT_PAGE_TITLE, TASK_NOTE_INDENT, UNKNOWN_MACRO_MARKER};
use crate::inline::{collapse_whitespace, InlineStyle, MarkdownStyleRenderer};
use crate::model::{text_content_of, Element, MacroBody, PanelKind, StorageNode, StructuredMacro};
use once_cell::sync::Lazy;
use regex::Regex;

static HIDDEN_LIST_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)list-style-type:\s*none").expect("list style regex is valid")
});

/// Walks a normalised storage tree and emits Markdown.
pub struct TreeRenderer<'a> {
    config: &'a ConverterConfig,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self { config }
    }

    /// Renders a whole document body, trimmed of surrounding blank lines.
    pub fn render_document(&self, nodes: &[StorageNode]) -> String {
        let context = RenderContext::new(self.config.max_nesting_depth);
        let markdown = self.render_nodes(nodes, context);
        log::debug!(
            "Rendered {} top-level nodes into {} bytes of Markdown",
            nodes.len(),
            markdown.len()
        );
        markdown.trim_matches('\n').to_string()
    }

    fn render_nodes(&self, nodes: &[StorageNode], context: RenderContext) -> String {
        let mut fragments = Vec::with_capacity(nodes.len());
        let mut index = 0;
        while index < nodes.len() {
            let node = &nodes[index];
            index += 1;

            if node.is_whitespace_text() && !context.preserves_whitespace() {
                let previous_is_block = index >= 2 && nodes[index - 2].is_block();
                let next_is_block = nodes.get(index).is_some_and(StorageNode::is_block);
                if previous_is_block || next_is_block {
                    continue;
                }
            }

            if let StorageNode::Element(el) = node {
                if el.is_named("ac:task-list") {
                    let notes = Self::task_notes_after(nodes, index);
                    if let Some((notes_index, notes)) = notes {
                        index = notes_index + 1;
                        fragments.push(self.render_task_list(el, Some(notes), context));
                    } else {
                        fragments.push(self.render_task_list(el, None, context));
                    }
                    continue;
                }
            }

            fragments.push(self.render_node(node, context));
        }
        join_fragments(fragments)
    }

    /// Finds a hidden-bullet `ul` directly after a task list, skipping whitespace.
    fn task_notes_after(nodes: &[StorageNode], start: usize) -> Option<(usize, &Element)> {
        for (offset, node) in nodes[start..].iter().enumerate() {
            match node {
                StorageNode::Text(_) if node.is_whitespace_text() => continue,
                StorageNode::Element(el)
                    if el.is_named("ul")
                        && el.attr("style").is_some_and(|s| HIDDEN_LIST_STYLE.is_match(s)) =>
                {
                    return Some((start + offset, el));
                }
                _ => return None,
            }
        }
        None
    }

    fn render_node(&self, node: &StorageNode, context: RenderContext) -> String {
        match node {
            StorageNode::Text(text) => {
                if context.preserves_whitespace() {
                    text.clone()
                } else {
                    collapse_whitespace(text).into_owned()
                }
            }
            StorageNode::Element(el) => self.render_element(el, context),
            StorageNode::Macro(m) => self.render_macro(m, context),
            StorageNode::CodeBlock { language, code } => {
                block(&code_fence(language.as_deref(), code))
            }
            StorageNode::Markdown(markdown) => block(markdown.trim_matches('\n')),
        }
    }

    fn render_children(&self, el: &Element, context: RenderContext) -> String {
        if context.depth_limit_reached() {
            log::debug!("Depth limit reached at <{}>, rendering text only", el.name);
            return collapse_whitespace(&el.text_content()).into_owned();
        }
        self.render_nodes(&el.children, context.enter_block())
    }

    fn render_element(&self, el: &Element, context: RenderContext) -> String {
        let name = el.name.as_str();

        if let Some(level) = heading_level(name) {
            let title = self.render_children(el, context);
            let title = title.replace('\n', " ");
            let title = title.trim();
            if title.is_empty() {
                return String::new();
            }
            return block(&format!("{} {}", "#".repeat(level), title));
        }

        if let Some(style) = InlineStyle::from_tag(name) {
            let content = if style == InlineStyle::Code {
                collapse_whitespace(&el.text_content()).into_owned()
            } else {
                self.render_children(el, context)
            };
            return MarkdownStyleRenderer::apply_style(&content, style);
        }

        match name {
            "p" => block(self.render_children(el, context).trim()),
            "br" => {
                if context.in_table_cell() {
                    " ".to_string()
                } else {
                    "  \n".to_string()
                }
            }
            "hr" => block("---"),
            "ul" | "ol" => block(&self.render_list(el, context)),
            "li" => block(&self.render_list_item(el, "- ", context)),
            "table" => block(&self.render_table(el, context)),
            "blockquote" => {
                let inner = self.render_children(el, context);
                block(&quote_lines(inner.trim_matches('\n')))
            }
            "pre" => {
                let language = el
                    .find_descendant("code")
                    .and_then(|code| {
                        code.attr("data-language")
                            .or_else(|| code.attr("class").and_then(language_from_class))
                    })
                    .filter(|lang| !lang.is_empty());
                let code = el.text_content();
                block(&code_fence(language, strip_pre_padding(&code)))
            }
            "a" => {
                let text = self.render_children(el, context);
                MarkdownStyleRenderer::link(&text, el.attr("href").unwrap_or_default())
            }
            "img" => MarkdownStyleRenderer::image(
                el.attr("alt").unwrap_or_default(),
                el.attr("src").unwrap_or_default(),
            ),
            "ac:image" => render_image(el),
            "ac:link" => self.render_link(el),
            "ac:emoticon" => el
                .attr("ac:emoji-fallback")
                .map(str::to_string)
                .or_else(|| el.attr("ac:name").map(|name| format!(":{name}:")))
                .unwrap_or_default(),
            "time" => el
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| el.text_content()),
            "ac:parameter" | "ac:placeholder" | "ac:plain-text-body" => String::new(),
            _ if name.starts_with("ri:") => String::new(),
            _ => {
                let content = self.render_children(el, context);
                if el.is_block() {
                    block(&content)
                } else {
                    content
                }
            }
        }
    }

    fn render_list(&self, list: &Element, context: RenderContext) -> String {
        let ordered = list.is_named("ol");
        let mut number: usize = list
            .attr("start")
            .and_then(|start| start.trim().parse().ok())
            .unwrap_or(1);

        let mut items: Vec<String> = Vec::new();
        let mut last_marker_width = 2;
        for child in &list.children {
            match child {
                StorageNode::Element(item) if item.is_named("li") => {
                    let marker = if ordered {
                        format!("{number}. ")
                    } else {
                        "- ".to_string()
                    };
                    number += 1;
                    last_marker_width = marker.len();
                    items.push(self.render_list_item(item, &marker, context));
                }
                // A list directly inside a list belongs to the previous item.
                StorageNode::Element(nested) if nested.is_named("ul") || nested.is_named("ol") => {
                    let sublist = indent_lines(
                        &self.render_list(nested, context.enter_block()),
                        last_marker_width,
                    );
                    match items.last_mut() {
                        Some(previous) => {
                            previous.push('\n');
                            previous.push_str(&sublist);
                        }
                        None => items.push(sublist),
                    }
                }
                _ if child.is_whitespace_text() => {}
                other => {
                    let text = self.render_node(other, context.enter_block());
                    let text = text.trim();
                    if !text.is_empty() {
                        items.push(format!("- {text}"));
                    }
                }
            }
        }
        items.join("\n")
    }

    /// Renders one item: marker, first block inline, the rest indented.
    /// Nested lists attach with a single line break so the list stays tight.
    fn render_list_item(&self, item: &Element, marker: &str, context: RenderContext) -> String {
        let inner = context.enter_block();
        let mut body = String::new();
        let mut start = 0;
        for (index, child) in item.children.iter().enumerate() {
            let StorageNode::Element(nested) = child else {
                continue;
            };
            if !(nested.is_named("ul") || nested.is_named("ol")) {
                continue;
            }
            self.push_item_text(&mut body, &item.children[start..index], inner);
            let sublist = self.render_list(nested, inner.enter_block());
            if !sublist.is_empty() {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(&sublist);
            }
            start = index + 1;
        }
        self.push_item_text(&mut body, &item.children[start..], inner);

        format!("{marker}{}", indent_lines(&body, marker.len()).trim_start())
    }

    fn push_item_text(&self, body: &mut String, nodes: &[StorageNode], context: RenderContext) {
        if nodes.is_empty() {
            return;
        }
        let text = self.render_nodes(nodes, context);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !body.is_empty() {
            body.push_str("\n\n");
        }
        body.push_str(text);
    }

    fn render_task_list(
        &self,
        list: &Element,
        notes: Option<&Element>,
        context: RenderContext,
    ) -> String {
        let mut lines = Vec::new();
        for task in list.child_elements().filter(|el| el.is_named("ac:task")) {
            let complete = task
                .child("ac:task-status")
                .is_some_and(|status| status.text_content().trim() == "complete");
            let checkbox = if complete { "[x]" } else { "[ ]" };
            let body = task
                .child("ac:task-body")
                .map(|body| self.render_nodes(&body.children, context.enter_block()))
                .unwrap_or_default();
            let body = single_line(&body);
            if body.is_empty() {
                lines.push(format!("- {checkbox}"));
            } else {
                lines.push(format!("- {checkbox} {body}"));
            }
        }

        if let Some(notes) = notes {
            let indent = " ".repeat(TASK_NOTE_INDENT);
            for note in notes.child_elements().filter(|el| el.is_named("li")) {
                let text = collapse_whitespace(&note.text_content()).trim().to_string();
                if !text.is_empty() {
                    lines.push(format!("{indent}- {text}"));
                }
            }
        }

        block(&lines.join("\n"))
    }

    fn render_table(&self, table: &Element, context: RenderContext) -> String {
        let rows = collect_rows(table)
            .into_iter()
            .map(|row| {
                row_cells(row)
                    .into_iter()
                    .map(|cell| {
                        let text = self.render_children(cell, context.enter_table_cell());
                        escape_cell(&text)
                    })
                    .collect()
            })
            .collect();
        format_table(rows)
    }

    fn render_link(&self, link: &Element) -> String {
        if let Some(user) = link.find_descendant("ri:user") {
            let identifier = ["ri:username", "ri:userkey", "ri:account-id"]
                .iter()
                .filter_map(|key| user.attr(key))
                .find(|value| !value.trim().is_empty())
                .unwrap_or("unknown");
            return format!("@{identifier}");
        }

        if let Some(page) = link.find_descendant("ri:page") {
            let title = page
                .attr("ri:content-title")
                .filter(|title| !title.trim().is_empty())
                .unwrap_or(DEFAULT_PAGE_TITLE);
            return match page.attr("ri:space-key").filter(|key| !key.trim().is_empty()) {
                Some(space) => format!(
                    "[{title}]({}://{space}/{})",
                    self.config.page_link_scheme,
                    urlencoding::encode(title)
                ),
                None => format!("[{title}]"),
            };
        }

        let label = link_body_text(link);
        if let Some(attachment) = link.find_descendant("ri:attachment") {
            let filename = attachment.attr("ri:filename").unwrap_or_default();
            let label = if label.is_empty() { filename } else { &label };
            return MarkdownStyleRenderer::link(label, filename);
        }
        if let Some(url) = link.find_descendant("ri:url") {
            return MarkdownStyleRenderer::link(&label, url.attr("ri:value").unwrap_or_default());
        }
        label
    }

    fn render_macro(&self, m: &StructuredMacro, context: RenderContext) -> String {
        let inner = context.enter_block();
        match m {
            StructuredMacro::Code { language, body } => {
                block(&code_fence(language.as_deref(), body))
            }
            // Already expanded during preprocessing.
            StructuredMacro::Markdown { .. } => String::new(),
            StructuredMacro::Expand { title, body } => {
                let title = title
                    .as_deref()
                    .unwrap_or(self.config.default_expand_title.as_str());
                let body = self.render_nodes(body, inner);
                block(&format!(
                    "<details>\n<summary>{}</summary>\n\n{}\n</details>",
                    title,
                    body.trim_matches('\n')
                ))
            }
            StructuredMacro::Panel { kind, body } => {
                let body = self.render_nodes(body, inner);
                block(&alert(*kind, &body))
            }
            StructuredMacro::Unknown {
                name,
                parameters,
                body,
            } => {
                let content = match body {
                    MacroBody::Rich(nodes) => self.render_nodes(nodes, inner),
                    MacroBody::Plain(text) => text.clone(),
                    MacroBody::Empty => parameters
                        .values()
                        .map(|value| value.trim())
                        .filter(|value| !value.is_empty())
                        .collect::<Vec<_>>()
                        .join(" "),
                };
                let name = if name.is_empty() { "unknown" } else { name.as_str() };
                let marker = format!("<!-- {UNKNOWN_MACRO_MARKER}: {name} -->");
                let content = content.trim_matches('\n');
                if content.trim().is_empty() {
                    block(&marker)
                } else {
                    block(&format!("{marker}\n{content}"))
                }
            }
        }
    }
}

/// Joins fragments, letting the larger of the two facing newline runs
/// (capped at one blank line) separate them.
pub fn join_fragments<I>(fragments: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut output = String::new();
    for fragment in fragments {
        if fragment.is_empty() {
            continue;
        }
        let trailing = output.len() - output.trim_end_matches('\n').len();
        let body = fragment.trim_start_matches('\n');
        let leading = fragment.len() - body.len();
        let separator = trailing.max(leading).min(2);
        output.truncate(output.len() - trailing);
        output.push_str(&"\n".repeat(separator));
        output.push_str(body);
    }
    output
}

fn block(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    format!("\n\n{content}\n\n")
}

fn heading_level(name: &str) -> Option<usize> {
    match name.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => Some(usize::from(level - b'0')),
        _ => None,
    }
}

fn language_from_class(class: &str) -> Option<&str> {
    class
        .split_whitespace()
        .find_map(|token| token.strip_prefix("language-").or_else(|| token.strip_prefix("lang-")))
}

/// Fenced code block, with a fence longer than any backtick run in the code.
fn code_fence(language: Option<&str>, code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest.max(2) + 1);
    format!("{fence}{}\n{code}\n{fence}", language.unwrap_or_default())
}

/// Drops the single line break markup puts after `<pre>` and before `</pre>`.
fn strip_pre_padding(code: &str) -> &str {
    let code = code
        .strip_prefix("\r\n")
        .or_else(|| code.strip_prefix('\n'))
        .unwrap_or(code);
    code.strip_suffix("\r\n")
        .or_else(|| code.strip_suffix('\n'))
        .unwrap_or(code)
}

fn render_image(image: &Element) -> String {
    let alt = image
        .attr("ac:alt")
        .or_else(|| image.attr("ac:title"))
        .unwrap_or_default();
    if let Some(url) = image.find_descendant("ri:url") {
        return MarkdownStyleRenderer::image(alt, url.attr("ri:value").unwrap_or_default());
    }
    if let Some(attachment) = image.find_descendant("ri:attachment") {
        return MarkdownStyleRenderer::image(alt, attachment.attr("ri:filename").unwrap_or_default());
    }
    String::new()
}

fn link_body_text(link: &Element) -> String {
    let body = link
        .child("ac:plain-text-link-body")
        .or_else(|| link.child("ac:link-body"))
        .map(|body| text_content_of(&body.children))
        .unwrap_or_default();
    collapse_whitespace(&body).trim().to_string()
}

fn alert(kind: PanelKind, body: &str) -> String {
    let mut lines = vec![format!("> [!{}]", kind.alert_label())];
    lines.extend(
        body.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| format!("> {line}")),
    );
    lines.join("\n")
}

fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indents every line after the first, leaving blank lines empty.
fn indent_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn single_line(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
