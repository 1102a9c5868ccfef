//! Block state of the line encoder.
//!
//! Exactly one outer construct is open at a time. Nesting inside a list or a
//! blockquote is a depth counter on that construct, never a second state.

use super::markup;

/// List flavours the encoder can have open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Ordered,
    Task,
    /// Plain notes attached to the preceding task list.
    TaskNotes,
}

impl ListKind {
    pub fn open_tag(self) -> &'static str {
        match self {
            ListKind::Bulleted => "<ul>",
            ListKind::Ordered => "<ol>",
            ListKind::Task => "<ac:task-list>",
            ListKind::TaskNotes => r#"<ul style="list-style-type: none;">"#,
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            ListKind::Bulleted | ListKind::TaskNotes => "</ul>",
            ListKind::Ordered => "</ol>",
            ListKind::Task => "</ac:task-list>",
        }
    }

    /// Whether items are `li` elements (tasks are self-contained `ac:task`s).
    pub fn uses_list_items(self) -> bool {
        !matches!(self, ListKind::Task)
    }

    /// Whether the kind supports indentation-driven nesting.
    pub fn nests(self) -> bool {
        matches!(self, ListKind::Bulleted | ListKind::Ordered)
    }
}

/// Open list levels, outermost first. Every `li`-based level has exactly
/// one open `li` once its first item is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListContext {
    levels: Vec<ListKind>,
}

impl ListContext {
    /// Opens a list at depth one, returning the opening markup.
    pub fn start(kind: ListKind) -> (Self, &'static str) {
        (Self { levels: vec![kind] }, kind.open_tag())
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn current(&self) -> Option<ListKind> {
        self.levels.last().copied()
    }

    /// Moves to `target` depth for a new item of `kind` and returns the
    /// markup that closes and opens levels on the way. The caller appends
    /// the new `<li>`. `target` must be at most one deeper than now.
    pub fn transition(&mut self, kind: ListKind, target: usize) -> String {
        let target = target.clamp(1, self.depth() + 1);
        let mut markup = String::new();
        while self.depth() > target {
            markup.push_str(&self.pop());
        }
        if self.depth() < target {
            markup.push_str(self.push(kind));
        } else if self.current() != Some(kind) {
            markup.push_str(&self.pop());
            markup.push_str(self.push(kind));
        } else if kind.uses_list_items() {
            markup.push_str("</li>");
        }
        markup
    }

    fn push(&mut self, kind: ListKind) -> &'static str {
        self.levels.push(kind);
        kind.open_tag()
    }

    fn pop(&mut self) -> String {
        match self.levels.pop() {
            Some(kind) if kind.uses_list_items() => format!("</li>{}", kind.close_tag()),
            Some(kind) => kind.close_tag().to_string(),
            None => String::new(),
        }
    }

    /// Closes every open level.
    pub fn close_all(&mut self) -> String {
        let mut markup = String::new();
        while !self.levels.is_empty() {
            markup.push_str(&self.pop());
        }
        markup
    }
}

/// A table's fixed column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableContext {
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceKind {
    Code { language: Option<String> },
    Mermaid,
}

/// An open code fence and the raw lines collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceContext {
    pub kind: FenceKind,
    pub lines: Vec<String>,
    marker: usize,
}

impl FenceContext {
    /// Opens a fence from a trimmed opener line such as "```rust".
    pub fn open(opener: &str) -> Self {
        let info = opener.trim_start_matches('`');
        let marker = opener.len() - info.len();
        let language = info.split_whitespace().next().unwrap_or_default();
        let kind = if language.eq_ignore_ascii_case("mermaid") {
            FenceKind::Mermaid
        } else {
            FenceKind::Code {
                language: (!language.is_empty()).then(|| language.to_string()),
            }
        };
        Self {
            kind,
            lines: Vec::new(),
            marker,
        }
    }

    /// A closing line is a backtick run at least as long as the opener.
    pub fn closes(&self, line: &str) -> bool {
        let line = line.trim();
        line.len() >= self.marker && line.chars().all(|c| c == '`')
    }

    /// Closing markup; the body is the collected lines verbatim.
    pub fn into_markup(self) -> String {
        let body = self.lines.join("\n");
        match self.kind {
            FenceKind::Code { language } => markup::code_macro(language.as_deref(), &body),
            FenceKind::Mermaid => markup::mermaid_macro(&body),
        }
    }
}

/// The single outer construct open at the current line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    Table(TableContext),
    List(ListContext),
    Blockquote(usize),
    Fence(FenceContext),
}

impl BlockState {
    /// Markup closing whatever is open.
    pub fn close(self) -> String {
        match self {
            BlockState::Idle => String::new(),
            BlockState::Table(_) => "</tbody></table>".to_string(),
            BlockState::List(mut list) => list.close_all(),
            BlockState::Blockquote(depth) => "</blockquote>".repeat(depth),
            BlockState::Fence(fence) => fence.into_markup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_transitions_keep_items_open() {
        let (mut list, open) = ListContext::start(ListKind::Bulleted);
        let mut markup = format!("{open}<li>a");
        markup.push_str(&list.transition(ListKind::Bulleted, 2));
        markup.push_str("<li>b");
        markup.push_str(&list.transition(ListKind::Bulleted, 1));
        markup.push_str("<li>c");
        markup.push_str(&list.close_all());
        assert_eq!(markup, "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
    }

    #[test]
    fn depth_grows_by_at_most_one_level() {
        let (mut list, _) = ListContext::start(ListKind::Bulleted);
        list.transition(ListKind::Bulleted, 5);
        assert_eq!(list.depth(), 2);
    }

    #[test]
    fn kind_switch_at_same_depth_replaces_the_level() {
        let (mut list, _) = ListContext::start(ListKind::Bulleted);
        list.transition(ListKind::Bulleted, 2);
        let markup = list.transition(ListKind::Ordered, 2);
        assert_eq!(markup, "</li></ul><ol>");
        assert_eq!(list.current(), Some(ListKind::Ordered));
        assert_eq!(list.close_all(), "</li></ol></li></ul>");
    }

    #[test]
    fn task_lists_close_without_items() {
        let state = BlockState::List(ListContext::start(ListKind::Task).0);
        assert_eq!(state.close(), "</ac:task-list>");
    }

    #[test]
    fn fence_info_selects_kind() {
        assert_eq!(FenceContext::open("```Mermaid").kind, FenceKind::Mermaid);
        assert_eq!(
            FenceContext::open("```rust ignore").kind,
            FenceKind::Code {
                language: Some("rust".into())
            }
        );
        assert_eq!(FenceContext::open("```").kind, FenceKind::Code { language: None });
    }

    #[test]
    fn fence_closes_on_a_long_enough_backtick_run() {
        let fence = FenceContext::open("````md");
        assert!(!fence.closes("```"));
        assert!(!fence.closes("````rust"));
        assert!(fence.closes("  `````  "));
    }

    #[test]
    fn blockquotes_close_every_level() {
        assert_eq!(
            BlockState::Blockquote(2).close(),
            "</blockquote></blockquote>"
        );
    }
}
