//! SQLite storage sink and in-memory query layer.
//!
//! Parsed tunes land in a single `tunes` table; queries read the whole table
//! back into a [`TuneTable`] and filter it in memory. The filters are plain
//! projections — exact match on book number, case-insensitive substring
//! match on rhythm, title and composer.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::TuneRecord;

// =============================================================================
// Sink contract
// =============================================================================

/// Anything that accepts finished tune records from the parser.
pub trait TuneSink {
    fn accept(&mut self, record: &TuneRecord) -> StoreResult<()>;
}

/// In-memory sink, mainly for tests and dry runs.
impl TuneSink for Vec<TuneRecord> {
    fn accept(&mut self, record: &TuneRecord) -> StoreResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

// =============================================================================
// Tune Store
// =============================================================================

/// SQLite-backed store for parsed tunes.
pub struct TuneStore {
    conn: Connection,
}

impl TuneStore {
    /// Open (creating if needed) the database at `path` and ensure the
    /// `tunes` table exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database, for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tunes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tune_id INTEGER,
                title TEXT,
                composer TEXT,
                meter TEXT,
                key TEXT,
                rhythm TEXT,
                book_number INTEGER,
                abc_notation TEXT
            )",
        )?;
        Ok(Self { conn })
    }

    /// Insert one record, letting SQLite assign the row id.
    pub fn insert(&self, record: &TuneRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO tunes
                (tune_id, title, composer, meter, key, rhythm, book_number, abc_notation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.tune_id,
                record.title,
                record.composer,
                record.meter,
                record.key,
                record.rhythm,
                record.book_number,
                record.abc_notation,
            ],
        )?;
        Ok(())
    }

    /// Load the whole table into memory for querying.
    pub fn select_all(&self) -> StoreResult<TuneTable> {
        let mut stmt = self.conn.prepare(
            "SELECT id, tune_id, title, composer, meter, key, rhythm, book_number, abc_notation
             FROM tunes ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TuneRow {
                id: row.get(0)?,
                tune_id: row.get(1)?,
                title: row.get(2)?,
                composer: row.get(3)?,
                meter: row.get(4)?,
                key: row.get(5)?,
                rhythm: row.get(6)?,
                book_number: row.get(7)?,
                abc_notation: row.get(8)?,
            })
        })?;
        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(TuneTable { rows })
    }
}

impl TuneSink for TuneStore {
    fn accept(&mut self, record: &TuneRecord) -> StoreResult<()> {
        self.insert(record)
    }
}

// =============================================================================
// In-memory table
// =============================================================================

/// One persisted row, including the synthetic id.
#[derive(Debug, Clone, Serialize)]
pub struct TuneRow {
    pub id: i64,
    pub tune_id: i64,
    pub title: String,
    pub composer: String,
    pub meter: String,
    pub key: String,
    pub rhythm: String,
    pub book_number: i64,
    pub abc_notation: String,
}

/// The full `tunes` table loaded into memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TuneTable {
    rows: Vec<TuneRow>,
}

impl TuneTable {
    pub fn rows(&self) -> &[TuneRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact match on book number.
    pub fn by_book(&self, book_number: i64) -> Vec<&TuneRow> {
        self.rows
            .iter()
            .filter(|r| r.book_number == book_number)
            .collect()
    }

    /// Case-insensitive substring match on rhythm.
    pub fn by_rhythm(&self, term: &str) -> Vec<&TuneRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|r| r.rhythm.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive substring match on title.
    pub fn by_title(&self, term: &str) -> Vec<&TuneRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Case-insensitive substring match on composer.
    pub fn by_composer(&self, term: &str) -> Vec<&TuneRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|r| r.composer.to_lowercase().contains(&needle))
            .collect()
    }

    /// Tune count per book number, ordered by book.
    pub fn book_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.book_number).or_insert(0) += 1;
        }
        counts
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TuneBuilder;

    fn record(title: &str, composer: &str, rhythm: &str, book: i64) -> TuneRecord {
        let mut b = TuneBuilder::with_id(1);
        b.set_title(title);
        b.set_composer(composer);
        b.set_rhythm(rhythm);
        b.finish(book, &["abc".to_string()]).unwrap()
    }

    fn seeded_store() -> TuneStore {
        let store = TuneStore::open_in_memory().unwrap();
        store.insert(&record("The Banshee", "Trad", "reel", 1)).unwrap();
        store.insert(&record("Banish Misfortune", "", "jig", 1)).unwrap();
        store.insert(&record("The Butterfly", "T. Potts", "slip jig", 2)).unwrap();
        store
    }

    #[test]
    fn test_insert_and_select_all() {
        let table = seeded_store().select_all().unwrap();
        assert_eq!(table.len(), 3);
        // Row ids are assigned by SQLite in insert order.
        assert_eq!(table.rows()[0].id, 1);
        assert_eq!(table.rows()[0].title, "The Banshee");
        assert_eq!(table.rows()[2].abc_notation, "abc");
    }

    #[test]
    fn test_filter_by_book() {
        let table = seeded_store().select_all().unwrap();
        assert_eq!(table.by_book(1).len(), 2);
        assert_eq!(table.by_book(2).len(), 1);
        assert!(table.by_book(99).is_empty());
    }

    #[test]
    fn test_filter_by_rhythm_case_insensitive() {
        let table = seeded_store().select_all().unwrap();
        let jigs = table.by_rhythm("JIG");
        assert_eq!(jigs.len(), 2);
        assert!(jigs.iter().all(|r| r.rhythm.contains("jig")));
    }

    #[test]
    fn test_filter_by_title_substring() {
        let table = seeded_store().select_all().unwrap();
        assert_eq!(table.by_title("ban").len(), 2);
        assert_eq!(table.by_title("butterfly").len(), 1);
        assert!(table.by_title("polka").is_empty());
    }

    #[test]
    fn test_filter_by_composer() {
        let table = seeded_store().select_all().unwrap();
        assert_eq!(table.by_composer("potts").len(), 1);
        // Empty term matches every row, including empty composers.
        assert_eq!(table.by_composer("").len(), 3);
    }

    #[test]
    fn test_book_counts() {
        let table = seeded_store().select_all().unwrap();
        let counts = table.book_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
    }

    #[test]
    fn test_store_as_sink() {
        let mut store = TuneStore::open_in_memory().unwrap();
        store.accept(&record("A", "", "reel", 3)).unwrap();
        assert_eq!(store.select_all().unwrap().len(), 1);
    }

    #[test]
    fn test_open_creates_file_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tunes.db");
        {
            let store = TuneStore::open(&path).unwrap();
            store.insert(&record("A", "", "reel", 1)).unwrap();
        }
        let store = TuneStore::open(&path).unwrap();
        assert_eq!(store.select_all().unwrap().len(), 1);
    }

    #[test]
    fn test_notation_newlines_survive_round_trip() {
        let store = TuneStore::open_in_memory().unwrap();
        let mut b = TuneBuilder::with_id(9);
        b.set_title("Multi");
        let rec = b
            .finish(4, &["N1".to_string(), "N2".to_string(), "N3".to_string()])
            .unwrap();
        store.insert(&rec).unwrap();

        let table = store.select_all().unwrap();
        assert_eq!(table.rows()[0].abc_notation, "N1\nN2\nN3");
    }
}
