//! Line-oriented Markdown to storage encoder.
//!
//! One forward pass over the lines. Each line is offered to the rules in a
//! fixed order and the first match wins. Lookahead rules (tables, alerts,
//! details blocks) consume the lines they claim and return the next cursor.

use super::markup;
use super::state::{BlockState, FenceContext, ListContext, ListKind, TableContext};
use crate::config::ConverterConfig;
use crate::constants::{BLOCKQUOTE_MAX_NESTING, INDENT_SPACES, LIST_MAX_NESTING};
use crate::inline::render_inline;
use crate::model::PanelKind;
use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("encoder regex is valid"));
    };
}

pattern!(HEADING, r"^(#{1,6})[ \t]+(.+)$");
pattern!(BULLET, r"^([ \t]*)[-*][ \t]+(.*)$");
pattern!(CHECKBOX, r"^\[([ xX])\][ \t]*(.*)$");
pattern!(NUMBERED, r"^([ \t]*)\d+[.)][ \t]+(.*)$");
pattern!(SUMMARY, r"<summary>(.*?)</summary>");
pattern!(IMAGE, r"^!\[([^\]]*)\]\(([^)]+)\)$");
pattern!(
    HORIZONTAL_RULE,
    r"^(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$"
);
pattern!(
    ALERT,
    r"(?i)^>[ \t]*\[!(NOTE|TIP|INFO|WARNING|CAUTION)\][ \t]*$"
);
pattern!(QUOTE, r"^((?:>[ \t]*)+)(.*)$");
pattern!(QUOTE_PREFIX, r"^>[ \t]?");
pattern!(
    TABLE_SEPARATOR,
    r"^[ \t]*\|?[ \t]*:?-{3,}:?[ \t]*(\|[ \t]*:?-{3,}:?[ \t]*)*\|?[ \t]*$"
);

/// Streams Markdown lines into storage markup.
///
/// A fresh encoder is built per document; it holds no state between calls.
pub struct LineEncoder<'a> {
    config: &'a ConverterConfig,
    state: BlockState,
    out: Vec<String>,
}

impl<'a> LineEncoder<'a> {
    pub fn new(config: &'a ConverterConfig) -> Self {
        Self {
            config,
            state: BlockState::Idle,
            out: Vec::new(),
        }
    }

    /// Encodes a whole Markdown body. End of input closes every open
    /// construct, including an unterminated fence.
    pub fn encode(mut self, markdown: &str) -> String {
        let normalized = markdown.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        self.out.reserve(lines.len());

        let mut cursor = 0;
        while cursor < lines.len() {
            cursor = self.encode_line(&lines, cursor);
        }
        self.close_state();

        log::debug!(
            "Encoded {} markdown lines into {} storage fragments",
            lines.len(),
            self.out.len()
        );
        self.out.join("\n")
    }

    fn encode_line(&mut self, lines: &[&str], index: usize) -> usize {
        let line = lines[index];
        let next = index + 1;

        if let BlockState::Fence(fence) = &mut self.state {
            if fence.closes(line) {
                self.close_state();
            } else {
                fence.lines.push(line.to_string());
            }
            return next;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.close_state();
            return next;
        }
        if trimmed.starts_with("```") {
            self.close_state();
            self.state = BlockState::Fence(FenceContext::open(trimmed));
            return next;
        }
        if let BlockState::Table(table) = self.state {
            if trimmed.contains('|') {
                let cells = self.cells(trimmed);
                self.out.push(markup::table_row("td", &cells, table.columns));
                return next;
            }
            self.close_state();
        }
        if let Some(caps) = HEADING.captures(trimmed) {
            let level = caps[1].len();
            let title = self.inline(caps[2].trim());
            self.close_state();
            self.out.push(format!("<h{level}>{title}</h{level}>"));
            return next;
        }
        // Spaced rules such as `- - -` would otherwise read as bullets.
        if HORIZONTAL_RULE.is_match(trimmed) {
            self.close_state();
            self.out.push("<hr />".to_string());
            return next;
        }
        if let Some(caps) = BULLET.captures(line) {
            let indent = indent_width(&caps[1]);
            match CHECKBOX.captures(&caps[2]) {
                Some(task) => {
                    let complete = task[1].eq_ignore_ascii_case("x");
                    let body = markup::task(complete, &self.inline(&task[2]));
                    self.list_item(ListKind::Task, 1, body);
                }
                None => {
                    let kind = if indent >= INDENT_SPACES && self.in_task_list() {
                        ListKind::TaskNotes
                    } else {
                        ListKind::Bulleted
                    };
                    let body = format!("<li>{}", self.inline(&caps[2]));
                    self.list_item(kind, list_level(indent), body);
                }
            }
            return next;
        }
        if let Some(caps) = NUMBERED.captures(line) {
            let indent = indent_width(&caps[1]);
            let body = format!("<li>{}", self.inline(&caps[2]));
            self.list_item(ListKind::Ordered, list_level(indent), body);
            return next;
        }
        if trimmed.starts_with("<details>") {
            return self.details(lines, index);
        }
        if let Some(caps) = IMAGE.captures(trimmed) {
            self.close_state();
            self.out.push(markup::image(&caps[1], &caps[2]));
            return next;
        }
        if trimmed.starts_with('>') {
            if let Some(kind) = ALERT
                .captures(trimmed)
                .and_then(|caps| PanelKind::from_name(&caps[1]))
            {
                return self.alert(kind, lines, next);
            }
            self.blockquote(trimmed);
            return next;
        }
        if trimmed.contains('|') {
            if let Some(separator) = lines.get(next) {
                if separator.contains('|') && TABLE_SEPARATOR.is_match(separator) {
                    self.table_header(trimmed);
                    return next + 1;
                }
            }
        }
        self.paragraph(trimmed);
        next
    }

    fn inline(&self, text: &str) -> String {
        render_inline(text, &self.config.page_link_scheme)
    }

    fn close_state(&mut self) {
        let markup = std::mem::take(&mut self.state).close();
        if !markup.is_empty() {
            self.out.push(markup);
        }
    }

    fn in_task_list(&self) -> bool {
        matches!(
            &self.state,
            BlockState::List(list)
                if matches!(list.current(), Some(ListKind::Task | ListKind::TaskNotes))
        )
    }

    /// Emits one list item, moving the open list to the item's level first.
    /// Levels only nest below bulleted and numbered items.
    fn list_item(&mut self, kind: ListKind, level: usize, item: String) {
        let moved = match &mut self.state {
            BlockState::List(list) => {
                let nests = kind.nests() && list.current().is_some_and(ListKind::nests);
                let target = if nests { level } else { 1 };
                Some(list.transition(kind, target))
            }
            _ => None,
        };
        let opening = match moved {
            Some(markup) => markup,
            None => {
                self.close_state();
                let (list, open) = ListContext::start(kind);
                self.state = BlockState::List(list);
                open.to_string()
            }
        };
        self.out.push(format!("{opening}{item}"));
    }

    /// Collects a `<details>` block up to its closing tag, or to the end of
    /// input when none follows.
    fn details(&mut self, lines: &[&str], index: usize) -> usize {
        self.close_state();
        let mut title = SUMMARY
            .captures(lines[index])
            .map(|caps| caps[1].trim().to_string());
        let mut content = Vec::new();
        let mut cursor = index + 1;

        while cursor < lines.len() {
            let trimmed = lines[cursor].trim();
            cursor += 1;
            if trimmed == "</details>" {
                break;
            }
            if trimmed.starts_with("<summary>") {
                if let Some(caps) = SUMMARY.captures(trimmed) {
                    title = Some(caps[1].trim().to_string());
                }
                continue;
            }
            if !trimmed.is_empty() {
                content.push(self.inline(trimmed));
            }
        }

        let title = title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.config.default_expand_title.clone());
        self.out.push(markup::expand_macro(&title, &content));
        cursor
    }

    /// Collects the `>`-prefixed lines after an alert header into a panel.
    fn alert(&mut self, kind: PanelKind, lines: &[&str], start: usize) -> usize {
        self.close_state();
        let mut content = Vec::new();
        let mut cursor = start;
        while let Some(line) = lines.get(cursor) {
            let trimmed = line.trim();
            if !trimmed.starts_with('>') {
                break;
            }
            let text = QUOTE_PREFIX.replace(trimmed, "");
            if !text.trim().is_empty() {
                content.push(self.inline(text.trim()));
            }
            cursor += 1;
        }
        self.out.push(markup::panel_macro(kind, &content));
        cursor
    }

    fn blockquote(&mut self, trimmed: &str) {
        let Some(caps) = QUOTE.captures(trimmed) else {
            return;
        };
        let depth = caps[1]
            .chars()
            .filter(|&c| c == '>')
            .count()
            .min(BLOCKQUOTE_MAX_NESTING);
        let current = match self.state {
            BlockState::Blockquote(current) => current,
            _ => {
                self.close_state();
                0
            }
        };

        let mut markup = String::new();
        if depth > current {
            markup.push_str(&"<blockquote>".repeat(depth - current));
        } else {
            markup.push_str(&"</blockquote>".repeat(current - depth));
        }
        markup.push_str(&format!("<p>{}</p>", self.inline(caps[2].trim())));
        self.state = BlockState::Blockquote(depth);
        self.out.push(markup);
    }

    fn table_header(&mut self, trimmed: &str) {
        self.close_state();
        let cells = self.cells(trimmed);
        let columns = cells.len();
        self.out.push(format!(
            "<table><thead>{}</thead><tbody>",
            markup::table_row("th", &cells, columns)
        ));
        self.state = BlockState::Table(TableContext { columns });
    }

    fn cells(&self, row: &str) -> Vec<String> {
        split_cells(row)
            .iter()
            .map(|cell| self.inline(cell))
            .collect()
    }

    /// Plain text: a lazy continuation of an open list item, otherwise a
    /// paragraph of its own.
    fn paragraph(&mut self, trimmed: &str) {
        let text = self.inline(trimmed);
        let continues_item = matches!(
            &self.state,
            BlockState::List(list) if list.current().is_some_and(ListKind::uses_list_items)
        );
        if continues_item {
            if let Some(last) = self.out.last_mut() {
                last.push(' ');
                last.push_str(&text);
                return;
            }
        }
        self.close_state();
        self.out.push(format!("<p>{text}</p>"));
    }
}

/// Leading whitespace width, a tab counting as four spaces.
fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn list_level(indent: usize) -> usize {
    (indent / INDENT_SPACES + 1).min(LIST_MAX_NESTING)
}

/// Splits a pipe-table row on unescaped pipes. One leading and one trailing
/// pipe are optional; empty cells are kept so columns stay aligned.
pub fn split_cells(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => row,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
