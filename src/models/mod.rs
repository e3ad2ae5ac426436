//! Domain models for the tune ingestion pipeline.
//!
//! - [`TuneRecord`] - A finalized tune, ready for storage
//! - [`TuneBuilder`] - Incremental accumulator used by the parser while a
//!   record is still under construction

use serde::{Deserialize, Serialize};

// =============================================================================
// Tune Record
// =============================================================================

/// One parsed tune from an ABC notation file.
///
/// A record is only ever produced with a non-empty title; the parser drops
/// title-less blocks before they reach this type. The notation body is kept
/// verbatim and never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuneRecord {
    /// Tune identifier from the `X:` header, 0 if absent or unparseable.
    pub tune_id: i64,
    /// Title from the `T:` field. Always non-empty.
    pub title: String,
    /// Composer from the `C:` field, empty if absent.
    #[serde(default)]
    pub composer: String,
    /// Meter from the `M:` field, empty if absent.
    #[serde(default)]
    pub meter: String,
    /// Key from the `K:` field, empty if absent.
    #[serde(default)]
    pub key: String,
    /// Rhythm from the `R:` field, empty if absent.
    #[serde(default)]
    pub rhythm: String,
    /// Book number taken from the enclosing directory name, not the file.
    pub book_number: i64,
    /// All non-field, non-comment lines, newline-joined, in file order.
    pub abc_notation: String,
}

// =============================================================================
// Tune Builder
// =============================================================================

/// Accumulates header fields for the record currently being scanned.
///
/// Field writes are last-write-wins: a repeated tag before the next record
/// boundary overwrites the earlier value. [`TuneBuilder::finish`] converts the
/// accumulated state into an immutable [`TuneRecord`], or `None` when no
/// usable title was seen.
#[derive(Debug, Clone, Default)]
pub struct TuneBuilder {
    tune_id: i64,
    title: Option<String>,
    composer: Option<String>,
    meter: Option<String>,
    key: Option<String>,
    rhythm: Option<String>,
}

impl TuneBuilder {
    /// Start an empty builder with identifier 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder for a record opened by an `X:` header.
    pub fn with_id(tune_id: i64) -> Self {
        Self {
            tune_id,
            ..Self::default()
        }
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = Some(value.to_string());
    }

    pub fn set_composer(&mut self, value: &str) {
        self.composer = Some(value.to_string());
    }

    pub fn set_meter(&mut self, value: &str) {
        self.meter = Some(value.to_string());
    }

    pub fn set_key(&mut self, value: &str) {
        self.key = Some(value.to_string());
    }

    pub fn set_rhythm(&mut self, value: &str) {
        self.rhythm = Some(value.to_string());
    }

    /// Whether this builder would produce a record.
    ///
    /// A bare `T:` line stores an empty title, which does not count: only a
    /// non-empty title makes the record emittable.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Finalize into a [`TuneRecord`], attaching the caller-supplied book
    /// number and the newline-joined notation body.
    ///
    /// Returns `None` (discarding the accumulated state) when no non-empty
    /// title was captured.
    pub fn finish(self, book_number: i64, notation: &[String]) -> Option<TuneRecord> {
        let title = self.title.filter(|t| !t.is_empty())?;
        Some(TuneRecord {
            tune_id: self.tune_id,
            title,
            composer: self.composer.unwrap_or_default(),
            meter: self.meter.unwrap_or_default(),
            key: self.key.unwrap_or_default(),
            rhythm: self.rhythm.unwrap_or_default(),
            book_number,
            abc_notation: notation.join("\n"),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
