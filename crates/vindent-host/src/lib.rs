//! Vindent Host
//!
//! In-memory implementations of the engine's host services:
//! - Document storage with edit notification streams and enable flags
//! - Namespace-isolated marker storage
//! - Org-style outline scanning behind `SyntaxTreeService`
//!
//! Used by the integration tests and by embedders who want a ready-made
//! host to drive `vindent-core` against.

mod document;
mod markers;
pub mod outline;

pub use document::InMemoryHost;
pub use markers::MarkerTable;
