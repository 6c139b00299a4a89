//! In-memory document host.
//!
//! Implements all three engine-facing services over mutex-guarded state:
//! line storage with edit notification streams, the per-document enable
//! flag, marker storage, and outline lookups. Edits can be applied and
//! notified separately, which lets tests reproduce hosts that report an
//! edit before the syntax tree reflects it (the undo/redo case).

use crate::markers::MarkerTable;
use crate::outline;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;
use vindent_core::{
    DocumentId, DocumentService, Headline, LineRange, Marker, MarkerId, MarkerSpec, MarkerStore,
    Namespace, Position, SyntaxTreeService,
};

struct DocumentState {
    lines: Vec<String>,
    enabled: Option<bool>,
    subscribers: Vec<mpsc::UnboundedSender<LineRange>>,
}

/// In-memory implementation of the engine's host services.
#[derive(Default)]
pub struct InMemoryHost {
    documents: Mutex<HashMap<DocumentId, DocumentState>>,
    markers: MarkerTable,
    next_doc: AtomicU64,
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new document with the given text.
    pub fn create_document(&self, text: &str) -> DocumentId {
        let doc = DocumentId(self.next_doc.fetch_add(1, Ordering::SeqCst));
        let lines = text.split('\n').map(str::to_string).collect();
        self.documents.lock().insert(
            doc,
            DocumentState {
                lines,
                enabled: None,
                subscribers: Vec::new(),
            },
        );
        debug!(doc = %doc, "Document created");
        doc
    }

    /// Set the per-document enable flag.
    pub fn set_enabled(&self, doc: DocumentId, enabled: bool) {
        self.write_enabled(doc, enabled);
    }

    /// Replace `range` with `new_lines` and notify subscribers of the
    /// resulting range.
    pub fn replace_lines(&self, doc: DocumentId, range: LineRange, new_lines: &[&str]) {
        let notified = self.apply_silently(doc, range, new_lines);
        self.notify_edit(doc, notified);
    }

    /// Replace `range` with `new_lines` without notifying. Returns the
    /// range the replacement now occupies.
    ///
    /// Markers follow the edit the way a real overlay store's would:
    /// markers inside the replaced range are dropped and markers below it
    /// shift with the text, so a shrinking edit leaves nothing attached
    /// beyond the new end of the document.
    pub fn apply_silently(&self, doc: DocumentId, range: LineRange, new_lines: &[&str]) -> LineRange {
        let last = range.start + (new_lines.len() as u32).saturating_sub(1);
        let new_range = LineRange::new(range.start, last);

        let mut documents = self.documents.lock();
        let Some(state) = documents.get_mut(&doc) else {
            return new_range;
        };
        let start = range.start as usize;
        let end = (range.end as usize).min(state.lines.len().saturating_sub(1));
        state
            .lines
            .splice(start..=end, new_lines.iter().map(|s| s.to_string()));
        drop(documents);

        self.markers.splice(range, new_lines.len() as u32);
        new_range
    }

    /// Deliver an edit notification without touching the text, the way a
    /// host reports an undo/redo edit before its tree has settled.
    pub fn notify_edit(&self, doc: DocumentId, range: LineRange) {
        if let Some(state) = self.documents.lock().get_mut(&doc) {
            // Closed receivers mean cancelled subscriptions; prune them.
            state.subscribers.retain(|tx| tx.send(range).is_ok());
        }
    }

    /// Number of engine-owned markers currently in `doc`.
    pub fn marker_count(&self, doc: DocumentId) -> usize {
        self.markers.count(&Namespace::for_document(doc))
    }

    /// Engine-owned markers attached to `line` of `doc`.
    pub fn markers_at(&self, doc: DocumentId, line: u32) -> Vec<Marker> {
        self.markers
            .in_range(&Namespace::for_document(doc), LineRange::new(line, line))
    }

    /// Rendered indent width of `line`, as the marker set shows it.
    pub fn rendered_width(&self, doc: DocumentId, line: u32) -> usize {
        self.markers_at(doc, line)
            .first()
            .map_or(0, |m| m.text.len())
    }

    /// Number of live edit subscriptions for `doc`.
    pub fn subscriber_count(&self, doc: DocumentId) -> usize {
        self.documents
            .lock()
            .get(&doc)
            .map_or(0, |s| s.subscribers.len())
    }
}

impl DocumentService for InMemoryHost {
    fn last_line(&self, doc: DocumentId) -> u32 {
        self.documents
            .lock()
            .get(&doc)
            .map_or(0, |s| (s.lines.len().max(1) - 1) as u32)
    }

    fn read_enabled(&self, doc: DocumentId) -> Option<bool> {
        self.documents.lock().get(&doc).and_then(|s| s.enabled)
    }

    fn write_enabled(&self, doc: DocumentId, enabled: bool) {
        if let Some(state) = self.documents.lock().get_mut(&doc) {
            state.enabled = Some(enabled);
        }
    }

    fn subscribe_edits(&self, doc: DocumentId) -> mpsc::UnboundedReceiver<LineRange> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(state) = self.documents.lock().get_mut(&doc) {
            state.subscribers.push(tx);
        }
        rx
    }
}

impl SyntaxTreeService for InMemoryHost {
    fn headline_at(&self, doc: DocumentId, pos: Position) -> Option<Headline> {
        let documents = self.documents.lock();
        let state = documents.get(&doc)?;
        outline::headline_at(&state.lines, pos)
    }
}

impl MarkerStore for InMemoryHost {
    fn create(&self, ns: &Namespace, spec: MarkerSpec) -> MarkerId {
        self.markers.create(ns, spec)
    }

    fn in_range(&self, ns: &Namespace, range: LineRange) -> Vec<Marker> {
        self.markers.in_range(ns, range)
    }

    fn delete(&self, ns: &Namespace, id: MarkerId) {
        self.markers.delete(ns, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_document_and_line_count() {
        let host = InMemoryHost::new();
        let doc = host.create_document("one\ntwo\nthree");
        assert_eq!(host.last_line(doc), 2);
    }

    #[test]
    fn test_enable_flag_starts_unset() {
        let host = InMemoryHost::new();
        let doc = host.create_document("text");

        assert_eq!(host.read_enabled(doc), None);
        host.set_enabled(doc, true);
        assert_eq!(host.read_enabled(doc), Some(true));
    }

    #[test]
    fn test_replace_lines_notifies_subscribers() {
        let host = InMemoryHost::new();
        let doc = host.create_document("a\nb\nc");
        let mut edits = host.subscribe_edits(doc);

        host.replace_lines(doc, LineRange::new(1, 1), &["B"]);

        assert_eq!(edits.try_recv().unwrap(), LineRange::new(1, 1));
        assert_eq!(host.last_line(doc), 2);
    }

    #[test]
    fn test_replace_lines_grows_document() {
        let host = InMemoryHost::new();
        let doc = host.create_document("a\nb");

        host.replace_lines(doc, LineRange::new(1, 1), &["b", "c", "d"]);

        assert_eq!(host.last_line(doc), 3);
    }

    fn indent_spec(line: u32) -> MarkerSpec {
        MarkerSpec {
            line,
            column: 0,
            text: "  ".to_string(),
            style: "style".to_string(),
            bias: vindent_core::Bias::Left,
        }
    }

    #[test]
    fn test_shrinking_edit_moves_markers_with_text() {
        let host = InMemoryHost::new();
        let doc = host.create_document("* A\nb1\nb2\nb3");
        let ns = Namespace::for_document(doc);
        host.create(&ns, indent_spec(2));
        host.create(&ns, indent_spec(3));

        host.replace_lines(doc, LineRange::new(1, 2), &["b"]);

        // The replaced-range marker is gone; the one below followed its
        // line up, so nothing sits beyond the new last line.
        assert_eq!(host.last_line(doc), 2);
        assert!(host.markers_at(doc, 3).is_empty());
        assert_eq!(host.markers_at(doc, 2).len(), 1);
        assert_eq!(host.marker_count(doc), 1);
    }

    #[test]
    fn test_unknown_document_operations_are_ignored() {
        let host = InMemoryHost::new();
        let ghost = DocumentId(42);

        host.notify_edit(ghost, LineRange::new(0, 0));
        host.apply_silently(ghost, LineRange::new(0, 0), &["text"]);
        host.write_enabled(ghost, true);

        assert_eq!(host.read_enabled(ghost), None);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let host = InMemoryHost::new();
        let doc = host.create_document("a");

        let edits = host.subscribe_edits(doc);
        assert_eq!(host.subscriber_count(doc), 1);

        drop(edits);
        host.notify_edit(doc, LineRange::new(0, 0));
        assert_eq!(host.subscriber_count(doc), 0);
    }

    #[test]
    fn test_headline_lookup_through_host() {
        let host = InMemoryHost::new();
        let doc = host.create_document("* Heading\nbody");

        let h = host.headline_at(doc, Position::line_start(1)).unwrap();
        assert_eq!(h.start_line, 0);
        assert_eq!(h.level, 1);
    }
}
