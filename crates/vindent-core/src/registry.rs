//! Engine memoization.
//!
//! One engine per document, held in an explicit map for the lifetime of
//! the process. Engines are never torn down here; document teardown
//! reclaims them with the host.

use crate::config::EngineConfig;
use crate::engine::IndentEngine;
use crate::host::{DocumentId, DocumentService, MarkerStore, SyntaxTreeService};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Memoizes one [`IndentEngine`] per document.
pub struct EngineRegistry {
    docs: Arc<dyn DocumentService>,
    tree: Arc<dyn SyntaxTreeService>,
    markers: Arc<dyn MarkerStore>,
    config: EngineConfig,
    engines: Mutex<HashMap<DocumentId, Arc<IndentEngine>>>,
}

impl EngineRegistry {
    /// Create a registry backed by the given host services.
    pub fn new(
        docs: Arc<dyn DocumentService>,
        tree: Arc<dyn SyntaxTreeService>,
        markers: Arc<dyn MarkerStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            docs,
            tree,
            markers,
            config,
            engines: Mutex::new(HashMap::new()),
        }
    }

    /// The engine for `doc`, constructing and registering it on first
    /// access. Repeated lookups return the same instance.
    pub fn get_or_create(&self, doc: DocumentId) -> Arc<IndentEngine> {
        let mut engines = self.engines.lock();
        if let Some(engine) = engines.get(&doc) {
            return engine.clone();
        }

        debug!(doc = %doc, "Creating indent engine");
        let engine = Arc::new(IndentEngine::new(
            doc,
            self.docs.clone(),
            self.tree.clone(),
            self.markers.clone(),
            self.config.clone(),
        ));
        engines.insert(doc, engine.clone());
        engine
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.engines.lock().len()
    }

    /// Whether no engine has been created yet.
    pub fn is_empty(&self) -> bool {
        self.engines.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Headline, LineRange, Marker, MarkerId, MarkerSpec, Namespace, Position};
    use tokio::sync::mpsc;

    struct NullHost;

    impl DocumentService for NullHost {
        fn last_line(&self, _doc: DocumentId) -> u32 {
            0
        }
        fn read_enabled(&self, _doc: DocumentId) -> Option<bool> {
            None
        }
        fn write_enabled(&self, _doc: DocumentId, _enabled: bool) {}
        fn subscribe_edits(&self, _doc: DocumentId) -> mpsc::UnboundedReceiver<LineRange> {
            mpsc::unbounded_channel().1
        }
    }

    impl SyntaxTreeService for NullHost {
        fn headline_at(&self, _doc: DocumentId, _pos: Position) -> Option<Headline> {
            None
        }
    }

    impl MarkerStore for NullHost {
        fn create(&self, _ns: &Namespace, _spec: MarkerSpec) -> MarkerId {
            MarkerId(0)
        }
        fn in_range(&self, _ns: &Namespace, _range: LineRange) -> Vec<Marker> {
            Vec::new()
        }
        fn delete(&self, _ns: &Namespace, _id: MarkerId) {}
    }

    fn registry() -> EngineRegistry {
        let host = Arc::new(NullHost);
        EngineRegistry::new(
            host.clone(),
            host.clone(),
            host,
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_get_or_create_memoizes() {
        let registry = registry();

        let a = registry.get_or_create(DocumentId(1));
        let b = registry.get_or_create(DocumentId(1));

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_documents_get_distinct_engines() {
        let registry = registry();

        let a = registry.get_or_create(DocumentId(1));
        let b = registry.get_or_create(DocumentId(2));

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let registry = registry();
        assert!(registry.is_empty());
    }
}
