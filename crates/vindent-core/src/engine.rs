//! Per-document overlay engine.
//!
//! `IndentEngine` owns all marker mutation for one document. Every update
//! path funnels through [`IndentEngine::set_indent`], which fully replaces
//! the markers of its range; because the replacement is idempotent and
//! range-complete, interleaved updates from different edits can never leave
//! stale markers behind.

use crate::calc::IndentCalculator;
use crate::config::EngineConfig;
use crate::host::{
    DocumentId, DocumentService, LineRange, MarkerStore, Namespace, Position, SyntaxTreeService,
};
use crate::mode::ModeWatch;
use crate::overlay::OverlayManager;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Incremental indentation overlay engine for one document.
pub struct IndentEngine {
    doc: DocumentId,
    docs: Arc<dyn DocumentService>,
    tree: Arc<dyn SyntaxTreeService>,
    calc: IndentCalculator,
    overlays: OverlayManager,
    config: EngineConfig,
    attached: AtomicBool,
    mode_watch: Mutex<Option<ModeWatch>>,
    edit_watch: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl IndentEngine {
    /// Create a detached engine for `doc`.
    pub fn new(
        doc: DocumentId,
        docs: Arc<dyn DocumentService>,
        tree: Arc<dyn SyntaxTreeService>,
        markers: Arc<dyn MarkerStore>,
        config: EngineConfig,
    ) -> Self {
        let namespace = Namespace::for_document(doc);
        Self {
            doc,
            docs: docs.clone(),
            tree: tree.clone(),
            calc: IndentCalculator::new(doc, tree),
            overlays: OverlayManager::new(markers, namespace, config.style.clone()),
            config,
            attached: AtomicBool::new(false),
            mode_watch: Mutex::new(None),
            edit_watch: Mutex::new(None),
        }
    }

    /// The document this engine renders overlays for.
    pub fn document(&self) -> DocumentId {
        self.doc
    }

    /// Whether the engine is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn full_range(&self) -> LineRange {
        LineRange::new(0, self.docs.last_line(self.doc))
    }

    /// Replace the markers of `range` with freshly computed ones.
    ///
    /// Unless `ignore_tree_expansion` is set, the range is first widened to
    /// the enclosing headline's parent subtree: a structural edit inside a
    /// subtree can change the indent of every line in it, not just the
    /// edited ones. The line preceding the widened range is re-rendered as
    /// well. Existing markers in the range are deleted before any new ones
    /// are created; the call never patches markers in place.
    pub fn set_indent(&self, range: LineRange, ignore_tree_expansion: bool) {
        let mut range = range;
        if !ignore_tree_expansion {
            if let Some(headline) = self
                .tree
                .headline_at(self.doc, Position::line_start(range.start))
            {
                // Top-level headlines have no parent; their own span still
                // covers every line the edit can affect.
                range = headline.parent_span.unwrap_or(headline.span);
            }
        }
        if range.start > 0 {
            range.start -= 1;
        }

        self.overlays.clear_range(range);
        for line in range.lines() {
            let width = self.calc.indent_size(line);
            if width > 0 {
                self.overlays.set_marker(line, width);
            }
        }
        trace!(doc = %self.doc, ?range, "Indent range rendered");
    }

    /// Attach the engine: render the whole document, start the mode watch,
    /// and subscribe to edit notifications.
    ///
    /// No-op when already attached, so a direct call and a mode-watch
    /// firing can never double-subscribe.
    pub fn attach(self: &Arc<Self>) {
        if self.attached.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(doc = %self.doc, "Attaching indent overlays");

        // The whole document is already the maximal range; no expansion.
        self.set_indent(self.full_range(), true);
        self.start_watch();
        self.spawn_edit_watch();
    }

    /// Detach the engine: write the enable flag back to false and clear
    /// every marker in the document.
    ///
    /// The mode watch keeps running so a later flag toggle re-attaches.
    pub fn detach(&self) {
        if !self.attached.swap(false, Ordering::SeqCst) {
            return;
        }
        info!(doc = %self.doc, "Detaching indent overlays");

        self.docs.write_enabled(self.doc, false);
        self.overlays.clear_range(self.full_range());

        // Cancel the edit subscription eagerly; repeated flag toggles must
        // not accumulate watch tasks that each reprocess every edit.
        if let Some(watch) = self.edit_watch.lock().take() {
            watch.abort();
        }
    }

    /// Start the periodic enable-flag poll. No-op while a poll task is
    /// already running.
    pub fn start_watch(self: &Arc<Self>) {
        let mut slot = self.mode_watch.lock();
        if slot.as_ref().is_some_and(|w| !w.is_finished()) {
            return;
        }
        debug!(doc = %self.doc, interval_ms = self.config.poll_interval_ms, "Starting mode watch");
        *slot = Some(ModeWatch::spawn(
            Arc::clone(self),
            self.config.poll_interval(),
        ));
    }

    /// Halt the periodic enable-flag poll.
    ///
    /// Only future firings are prevented; deferred edit updates already
    /// scheduled still run (and no-op once detached).
    pub fn stop_watch(&self) {
        if let Some(watch) = self.mode_watch.lock().take() {
            debug!(doc = %self.doc, "Stopping mode watch");
            watch.abort();
        }
    }

    /// One mode-watch firing: reconcile attachment with the enable flag.
    /// A flag that was never set reads as disabled.
    pub(crate) fn poll_enable_flag(self: &Arc<Self>) {
        let enabled = self.docs.read_enabled(self.doc).unwrap_or(false);
        if enabled && !self.is_attached() {
            self.attach();
        } else if !enabled && self.is_attached() {
            self.detach();
        }
    }

    /// Consume edit notifications until the engine detaches.
    ///
    /// Each edit gets two identical `set_indent` passes: one immediately
    /// for fast feedback, and one on the next scheduler turn. Undo/redo
    /// edits can be reported before the syntax tree reflects the new
    /// content; the deferred pass runs after the tree has settled and
    /// corrects anything the first pass computed from stale structure.
    fn spawn_edit_watch(self: &Arc<Self>) {
        let mut edits = self.docs.subscribe_edits(self.doc);
        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(range) = edits.recv().await {
                if !engine.is_attached() {
                    // Dropping the receiver cancels the subscription.
                    break;
                }
                engine.set_indent(range, false);

                let deferred = Arc::clone(&engine);
                tokio::spawn(async move {
                    tokio::task::yield_now().await;
                    // A detach may have landed in between; never recreate
                    // markers for a detached document.
                    if deferred.is_attached() {
                        deferred.set_indent(range, false);
                    }
                });
            }
            debug!(doc = %engine.doc, "Edit watch terminated");
        });
        *self.edit_watch.lock() = Some(handle);
    }
}
