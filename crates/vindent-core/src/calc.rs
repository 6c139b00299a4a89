//! Indent width computation.
//!
//! Pure lookup against the externally maintained headline tree; no text
//! inspection and no side effects. All nesting information comes from the
//! parsed tree, never from raw line content.

use crate::host::{DocumentId, Position, SyntaxTreeService};
use std::sync::Arc;

/// Computes the indent width of individual lines for one document.
#[derive(Clone)]
pub struct IndentCalculator {
    doc: DocumentId,
    tree: Arc<dyn SyntaxTreeService>,
}

impl IndentCalculator {
    /// Create a calculator for `doc` backed by `tree`.
    pub fn new(doc: DocumentId, tree: Arc<dyn SyntaxTreeService>) -> Self {
        Self { doc, tree }
    }

    /// Indent width of `line`, in columns.
    ///
    /// Lines outside any headline and heading lines themselves are not
    /// indented. Body lines are indented one column deeper than their
    /// headline's level: level-1 bodies get width 2, level-2 bodies
    /// width 3, and so on.
    pub fn indent_size(&self, line: u32) -> u32 {
        let Some(headline) = self.tree.headline_at(self.doc, Position::line_start(line)) else {
            return 0;
        };
        if headline.start_line == line {
            return 0;
        }
        headline.level + 1
    }
}
