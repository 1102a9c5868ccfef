//! Immutable render state with pure transitions.
//!
//! Each transition returns a new context, so a child element can never leak
//! state back into its siblings.

/// Context threaded through the tag-tree walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    depth: usize,
    max_depth: usize,
    preformatted: bool,
    in_table_cell: bool,
}

impl RenderContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            preformatted: false,
            in_table_cell: false,
        }
    }

    /// Whether the walk should stop descending and fall back to plain text.
    pub fn depth_limit_reached(&self) -> bool {
        self.depth >= self.max_depth
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Descends one element level.
    pub fn enter_block(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Enters a table cell, where line breaks collapse to spaces.
    pub fn enter_table_cell(&self) -> Self {
        Self {
            in_table_cell: true,
            ..self.enter_block()
        }
    }

    /// Enters content whose whitespace is significant.
    pub fn enter_preformatted(&self) -> Self {
        Self {
            preformatted: true,
            ..self.enter_block()
        }
    }

    pub fn in_table_cell(&self) -> bool {
        self.in_table_cell
    }

    pub fn preserves_whitespace(&self) -> bool {
        self.preformatted
    }
}
