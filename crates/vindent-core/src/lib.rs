//! Vindent Core
//!
//! Incremental virtual-indentation overlay engine for outline documents:
//! - Indent width computation from an externally maintained headline tree
//! - Namespace-isolated overlay marker replacement
//! - Two-phase edit-driven updates tolerant of stale tree state
//! - Enable-flag polling for attach/detach
//! - Per-document engine memoization
//!
//! The surrounding editor plugs in through the traits in [`host`]; the
//! engine never reads document text or mutates it.

mod calc;
mod config;
mod engine;
mod error;
pub mod host;
mod mode;
mod overlay;
mod registry;

pub use calc::IndentCalculator;
pub use config::EngineConfig;
pub use engine::IndentEngine;
pub use error::EngineError;
pub use host::{
    Bias, DocumentId, DocumentService, Headline, LineRange, Marker, MarkerId, MarkerSpec,
    MarkerStore, Namespace, Position, SyntaxTreeService,
};
pub use mode::ModeWatch;
pub use overlay::OverlayManager;
pub use registry::EngineRegistry;
