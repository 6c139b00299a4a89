//! Host-side interfaces consumed by the engine.
//!
//! The engine never touches document text, marker storage, or outline
//! parsing directly. Everything it needs from the surrounding editor is
//! expressed through the three traits in this module, so hosts (and tests)
//! plug in their own implementations.

use tokio::sync::mpsc;

/// Opaque identifier for an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// A cursor position used for syntax-tree lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Zero-based line number
    pub line: u32,
    /// Zero-based column within the line
    pub column: u32,
}

impl Position {
    /// Position at the start of `line`.
    pub fn line_start(line: u32) -> Self {
        Self { line, column: 0 }
    }
}

/// An inclusive range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line of the range
    pub start: u32,
    /// Last line of the range (inclusive)
    pub end: u32,
}

impl LineRange {
    /// Create a range covering `start..=end`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `line` falls inside the range.
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }

    /// Iterate over the lines of the range.
    pub fn lines(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// Snapshot of the nearest headline enclosing a position.
///
/// The tree service resolves parent structure up front: the engine only
/// ever needs the parent's subtree span, never the parent node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// Line carrying the heading itself
    pub start_line: u32,
    /// Nesting depth, 1 for top-level headings
    pub level: u32,
    /// Subtree span of this headline (heading line through last body line)
    pub span: LineRange,
    /// Subtree span of the parent headline, if any
    pub parent_span: Option<LineRange>,
}

/// Identifier assigned to a marker by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Placement bias of an inline marker relative to text typed at its
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Marker stays left of newly typed text
    Left,
    /// Marker moves right of newly typed text
    Right,
}

/// Request to create one inline marker.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    /// Line the marker is attached to
    pub line: u32,
    /// Column the marker is attached to
    pub column: u32,
    /// Rendered text (indent spaces)
    pub text: String,
    /// Visual style tag
    pub style: String,
    /// Placement bias
    pub bias: Bias,
}

/// A marker as stored, returned by range queries.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Store-assigned identifier
    pub id: MarkerId,
    /// Line the marker is attached to
    pub line: u32,
    /// Rendered text
    pub text: String,
    /// Visual style tag
    pub style: String,
}

/// Isolation scope for one engine's markers.
///
/// The store guarantees markers in distinct namespaces never collide, so
/// the engine can clear its own range without touching unrelated
/// annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// The namespace owned by the indent engine for `doc`.
    pub fn for_document(doc: DocumentId) -> Self {
        Self(format!("vindent/{}", doc.0))
    }

    /// The namespace key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Document access: line count, enable flag, edit notifications.
pub trait DocumentService: Send + Sync {
    /// Last line number of the document (zero-based).
    fn last_line(&self, doc: DocumentId) -> u32;

    /// Read the per-document "indent overlay enabled" flag.
    ///
    /// Returns `None` when the flag has never been set; callers treat
    /// that the same as disabled.
    fn read_enabled(&self, doc: DocumentId) -> Option<bool>;

    /// Write the per-document enable flag.
    fn write_enabled(&self, doc: DocumentId, enabled: bool);

    /// Subscribe to edit notifications for `doc`.
    ///
    /// Each message is the line range affected by one edit. Dropping the
    /// receiver cancels the subscription.
    fn subscribe_edits(&self, doc: DocumentId) -> mpsc::UnboundedReceiver<LineRange>;
}

/// Marker creation, deletion and range queries, scoped by namespace.
pub trait MarkerStore: Send + Sync {
    /// Create one marker; the store assigns its id.
    fn create(&self, ns: &Namespace, spec: MarkerSpec) -> MarkerId;

    /// All markers in `ns` whose line falls within `range`.
    fn in_range(&self, ns: &Namespace, range: LineRange) -> Vec<Marker>;

    /// Delete a marker by id.
    fn delete(&self, ns: &Namespace, id: MarkerId);
}

/// Read access to the externally maintained headline tree.
pub trait SyntaxTreeService: Send + Sync {
    /// Nearest headline enclosing `pos`, or `None` at top level.
    fn headline_at(&self, doc: DocumentId, pos: Position) -> Option<Headline>;
}
