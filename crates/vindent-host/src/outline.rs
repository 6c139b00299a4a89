//! Org-style outline scanning.
//!
//! A heading line is a run of `*` followed by a space; the run length is
//! the nesting level. A headline's subtree spans from its heading line to
//! the line before the next heading of equal or shallower level, or the
//! end of the document. This module is the parser collaborator the engine
//! consults through `SyntaxTreeService`; the engine itself never sees
//! line text.

use vindent_core::{Headline, LineRange, Position};

/// A heading line found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeadingLine {
    line: u32,
    level: u32,
}

/// Nesting level of a heading line, or `None` for body lines.
fn heading_level(text: &str) -> Option<u32> {
    let stars = text.bytes().take_while(|&b| b == b'*').count();
    if stars > 0 && text.as_bytes().get(stars) == Some(&b' ') {
        Some(stars as u32)
    } else {
        None
    }
}

fn headings(lines: &[String]) -> Vec<HeadingLine> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, text)| {
            heading_level(text).map(|level| HeadingLine {
                line: i as u32,
                level,
            })
        })
        .collect()
}

/// Last line of the subtree rooted at `headings[idx]`.
fn subtree_end(headings: &[HeadingLine], idx: usize, last_line: u32) -> u32 {
    let level = headings[idx].level;
    headings[idx + 1..]
        .iter()
        .find(|h| h.level <= level)
        .map_or(last_line, |h| h.line - 1)
}

fn span_of(headings: &[HeadingLine], idx: usize, last_line: u32) -> LineRange {
    LineRange::new(headings[idx].line, subtree_end(headings, idx, last_line))
}

/// Nearest headline enclosing `pos`, with its parent's subtree span
/// resolved, or `None` when `pos` precedes every heading.
pub fn headline_at(lines: &[String], pos: Position) -> Option<Headline> {
    if lines.is_empty() {
        return None;
    }
    let last_line = (lines.len() - 1) as u32;
    let headings = headings(lines);

    // The nearest enclosing headline is the last heading at or before the
    // position: its subtree cannot end before the next heading, and there
    // is no heading in between.
    let idx = headings
        .iter()
        .rposition(|h| h.line <= pos.line)?;

    let level = headings[idx].level;
    let parent_span = headings[..idx]
        .iter()
        .rposition(|h| h.level < level)
        .map(|pidx| span_of(&headings, pidx, last_line));

    Some(Headline {
        start_line: headings[idx].line,
        level,
        span: span_of(&headings, idx, last_line),
        parent_span,
    })
}
