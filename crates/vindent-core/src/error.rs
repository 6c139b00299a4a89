//! Error types for the overlay engine.
//!
//! The engine treats host collaborators as infallible while a document is
//! alive (a missing enable flag reads as disabled, not as an error), so
//! the only fallible surface is configuration loading.

use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}
