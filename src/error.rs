//! Error types for the tune ingestion pipeline.
//!
//! - [`LoadError`] - Notation file loading errors
//! - [`StoreError`] - SQLite storage errors
//! - [`CollectError`] - Top-level book collection errors
//! - [`MenuError`] - Interactive menu errors
//!
//! Error conversion is automatic via `From` implementations, allowing `?`
//! to work across component boundaries. Decoding failures are deliberately
//! absent from this hierarchy: the loader's Latin-1 fallback cannot fail,
//! so only genuine I/O problems surface as errors.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while reading a notation file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read (missing, permissions, ...).
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the SQLite storage sink and query layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

// =============================================================================
// Collection Errors (top-level)
// =============================================================================

/// Top-level errors while collecting books from a directory tree.
///
/// Per-file load failures are not represented here: the collector reports
/// and skips them so one unreadable file never aborts its siblings.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The root directory could not be walked at all.
    #[error("failed to scan '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Storing a parsed record failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Menu Errors
// =============================================================================

/// Errors from the interactive menu loop.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Reading a choice or writing output failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collect(#[from] CollectError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

/// Result type for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;
