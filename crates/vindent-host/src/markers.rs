//! In-memory marker storage.
//!
//! Markers live in per-namespace tables keyed by store-assigned ids, so
//! one namespace can be queried and cleared without scanning or touching
//! any other.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use vindent_core::{LineRange, Marker, MarkerId, MarkerSpec, Namespace};

/// Namespace-isolated marker table.
#[derive(Default)]
pub struct MarkerTable {
    tables: Mutex<HashMap<Namespace, HashMap<MarkerId, Marker>>>,
    next_id: AtomicU64,
}

impl MarkerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker, assigning it a fresh id.
    pub fn create(&self, ns: &Namespace, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let marker = Marker {
            id,
            line: spec.line,
            text: spec.text,
            style: spec.style,
        };
        self.tables
            .lock()
            .entry(ns.clone())
            .or_default()
            .insert(id, marker);
        id
    }

    /// Markers in `ns` whose line falls within `range`.
    pub fn in_range(&self, ns: &Namespace, range: LineRange) -> Vec<Marker> {
        self.tables
            .lock()
            .get(ns)
            .map(|table| {
                table
                    .values()
                    .filter(|m| range.contains(m.line))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove a marker by id.
    pub fn delete(&self, ns: &Namespace, id: MarkerId) {
        if let Some(table) = self.tables.lock().get_mut(ns) {
            table.remove(&id);
        }
    }

    /// Rewrite marker positions after a text edit, across all namespaces.
    ///
    /// Markers inside the replaced range are removed; markers past it
    /// shift by the line delta so they stay attached to the same text. A
    /// shrinking edit therefore never strands markers beyond the new end
    /// of the document.
    pub fn splice(&self, replaced: LineRange, new_len: u32) {
        let old_len = i64::from(replaced.end - replaced.start + 1);
        let delta = i64::from(new_len) - old_len;
        let mut tables = self.tables.lock();
        for table in tables.values_mut() {
            table.retain(|_, m| !replaced.contains(m.line));
            if delta != 0 {
                for m in table.values_mut() {
                    if m.line > replaced.end {
                        m.line = (i64::from(m.line) + delta) as u32;
                    }
                }
            }
        }
    }

    /// Total marker count in `ns`.
    pub fn count(&self, ns: &Namespace) -> usize {
        self.tables.lock().get(ns).map_or(0, HashMap::len)
    }
}
