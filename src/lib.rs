//! # Tunebook - ABC notation tune book ingestion and query
//!
//! Tunebook walks a directory of numbered tune books, parses the ABC notation
//! files inside them into per-tune records, stores the records in SQLite and
//! answers simple filter queries over the resulting table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  abc_books/ │────▶│   Loader    │────▶│   Parser    │────▶│   SQLite    │
//! │  (per book) │     │ (utf8/lat1) │     │ (X:/T:/...) │     │   (tunes)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tunebook::{BookCollector, TuneStore};
//!
//! let mut store = TuneStore::open("tunes.db".as_ref())?;
//! let report = BookCollector::new("abc_books").collect(&mut store)?;
//! println!("stored {} tunes", report.total);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (TuneRecord, TuneBuilder)
//! - [`loader`] - File loading with UTF-8 / Latin-1 fallback decoding
//! - [`parser`] - Line-oriented tune record parser
//! - [`collector`] - Recursive book directory walk
//! - [`store`] - SQLite sink and in-memory query table
//! - [`menu`] - Interactive text menu

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod loader;
pub mod parser;

// Collection
pub mod collector;

// Storage
pub mod store;

// Interactive surface
pub mod menu;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CollectError, CollectResult, LoadError, LoadResult, MenuError, MenuResult, StoreError,
    StoreResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{TuneBuilder, TuneRecord};

// =============================================================================
// Re-exports - Loader
// =============================================================================

pub use loader::{decode, read_decoded, read_lines, Decoding};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{parse_lines, Parser};

// =============================================================================
// Re-exports - Collector
// =============================================================================

pub use collector::{BookCollector, BookReport, CollectReport, FileReport};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{TuneRow, TuneSink, TuneStore, TuneTable};

// =============================================================================
// Re-exports - Menu
// =============================================================================

pub use menu::Menu;
