//! Overlay marker management.
//!
//! All marker mutation for one document flows through an `OverlayManager`
//! scoped to an engine-owned namespace, so indent markers never collide
//! with unrelated annotations and can be cleared wholesale by range.

use crate::host::{Bias, LineRange, MarkerSpec, MarkerStore, Namespace};
use std::sync::Arc;
use tracing::debug;

/// Creates and clears indent markers within one engine's namespace.
#[derive(Clone)]
pub struct OverlayManager {
    store: Arc<dyn MarkerStore>,
    namespace: Namespace,
    style: String,
}

impl OverlayManager {
    /// Create a manager writing into `namespace` with the given style tag.
    pub fn new(store: Arc<dyn MarkerStore>, namespace: Namespace, style: String) -> Self {
        Self {
            store,
            namespace,
            style,
        }
    }

    /// Remove every marker in this namespace whose line falls in `range`.
    pub fn clear_range(&self, range: LineRange) {
        let markers = self.store.in_range(&self.namespace, range);
        let count = markers.len();
        for marker in markers {
            self.store.delete(&self.namespace, marker.id);
        }
        if count > 0 {
            debug!(ns = %self.namespace.as_str(), ?range, count, "Cleared markers");
        }
    }

    /// Create one inline marker of `width` spaces at the start of `line`.
    ///
    /// Left bias keeps text typed at column 0 after the marker.
    pub fn set_marker(&self, line: u32, width: u32) {
        self.store.create(
            &self.namespace,
            MarkerSpec {
                line,
                column: 0,
                text: " ".repeat(width as usize),
                style: self.style.clone(),
                bias: Bias::Left,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DocumentId, Marker, MarkerId};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeStore {
        markers: Mutex<Vec<(Namespace, Marker)>>,
        next_id: Mutex<u64>,
    }

    impl MarkerStore for FakeStore {
        fn create(&self, ns: &Namespace, spec: MarkerSpec) -> MarkerId {
            let mut next = self.next_id.lock();
            let id = MarkerId(*next);
            *next += 1;
            self.markers.lock().push((
                ns.clone(),
                Marker {
                    id,
                    line: spec.line,
                    text: spec.text,
                    style: spec.style,
                },
            ));
            id
        }

        fn in_range(&self, ns: &Namespace, range: LineRange) -> Vec<Marker> {
            self.markers
                .lock()
                .iter()
                .filter(|(n, m)| n == ns && range.contains(m.line))
                .map(|(_, m)| m.clone())
                .collect()
        }

        fn delete(&self, ns: &Namespace, id: MarkerId) {
            self.markers
                .lock()
                .retain(|(n, m)| !(n == ns && m.id == id));
        }
    }

    fn manager(store: Arc<FakeStore>) -> OverlayManager {
        OverlayManager::new(
            store,
            Namespace::for_document(DocumentId(7)),
            "style".to_string(),
        )
    }

    #[test]
    fn test_set_marker_renders_spaces() {
        let store = Arc::new(FakeStore::default());
        let overlays = manager(store.clone());

        overlays.set_marker(4, 3);

        let markers = store.markers.lock();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].1.line, 4);
        assert_eq!(markers[0].1.text, "   ");
    }

    #[test]
    fn test_clear_range_only_touches_range() {
        let store = Arc::new(FakeStore::default());
        let overlays = manager(store.clone());

        overlays.set_marker(1, 2);
        overlays.set_marker(2, 2);
        overlays.set_marker(8, 2);

        overlays.clear_range(LineRange::new(0, 5));

        let markers = store.markers.lock();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].1.line, 8);
    }

    #[test]
    fn test_clear_range_leaves_other_namespaces() {
        let store = Arc::new(FakeStore::default());
        let ours = manager(store.clone());
        let theirs = OverlayManager::new(
            store.clone(),
            Namespace::for_document(DocumentId(8)),
            "style".to_string(),
        );

        ours.set_marker(1, 2);
        theirs.set_marker(1, 2);

        ours.clear_range(LineRange::new(0, 5));

        assert_eq!(store.markers.lock().len(), 1);
    }
}
