//! Error types for the search-engine registry

use std::io;
use thiserror::Error;

/// Errors surfaced by [`crate::engines::SearchEngineRegistry`] operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The caller passed an engine the operation cannot accept, e.g. setting a
    /// non-member engine as default or adding a custom engine whose id is
    /// already taken.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not permitted for this engine, e.g. deleting a bundled
    /// (non-custom) engine.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The preference store rejected a write. In-memory state has already been
    /// updated and is the (not yet durable) source of truth.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PrefError),
}

/// Errors from the persistent preference store.
#[derive(Error, Debug)]
pub enum PrefError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
