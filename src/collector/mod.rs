//! Directory walk that turns numbered book folders into stored tunes.
//!
//! Every directory in the tree is visited. A directory whose basename is all
//! decimal digits is a book; each `.abc` file directly inside it is loaded,
//! parsed with that book number, and every emitted record forwarded to the
//! sink. Files sitting in non-numeric directories are never processed — no
//! book number can be attributed to them — but the walk still descends
//! through such directories, so numeric folders at any depth are found.
//!
//! Failures are file-scoped: an unreadable file is reported and skipped,
//! never aborting its siblings or the rest of the tree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{CollectError, CollectResult};
use crate::loader;
use crate::parser;
use crate::store::TuneSink;

/// Notation file extension, matched as a name suffix.
const ABC_EXT: &str = ".abc";

// =============================================================================
// Reports
// =============================================================================

/// Outcome of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    pub tunes: usize,
}

/// Outcome of one book directory.
#[derive(Debug, Clone, Serialize)]
pub struct BookReport {
    pub book_number: i64,
    pub files: Vec<FileReport>,
    pub tunes: usize,
}

/// Outcome of a whole collection run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectReport {
    pub books: Vec<BookReport>,
    /// Total records forwarded to the sink.
    pub total: usize,
    /// Title-less blocks discarded by the parser.
    pub dropped: usize,
    /// Files skipped because they could not be read.
    pub skipped_files: usize,
}

// =============================================================================
// Book Collector
// =============================================================================

/// Walks a root directory and feeds every book's tunes to a sink.
pub struct BookCollector {
    root: PathBuf,
}

impl BookCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk the tree and forward every parsed record to `sink`.
    pub fn collect<S: TuneSink>(&self, sink: &mut S) -> CollectResult<CollectReport> {
        let mut report = CollectReport::default();

        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // A broken root is fatal; anything deeper is skipped.
                    if err.depth() == 0 {
                        return Err(CollectError::Walk {
                            path: self.root.clone(),
                            source: err,
                        });
                    }
                    eprintln!("warning: skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(book_number) = book_number_of(entry.path()) else {
                continue;
            };
            let book = self.collect_book(entry.path(), book_number, sink, &mut report)?;
            report.total += book.tunes;
            report.books.push(book);
        }

        Ok(report)
    }

    /// Process the `.abc` files directly inside one book directory.
    fn collect_book<S: TuneSink>(
        &self,
        dir: &Path,
        book_number: i64,
        sink: &mut S,
        report: &mut CollectReport,
    ) -> CollectResult<BookReport> {
        let mut book = BookReport {
            book_number,
            files: Vec::new(),
            tunes: 0,
        };

        for path in abc_files(dir) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let lines = match loader::read_lines(&path) {
                Ok(lines) => lines,
                Err(err) => {
                    eprintln!("warning: skipping file: {err}");
                    report.skipped_files += 1;
                    continue;
                }
            };

            let (records, dropped) = parser::parse_lines(&lines, book_number);
            report.dropped += dropped;
            for record in &records {
                sink.accept(record)?;
            }
            book.tunes += records.len();
            book.files.push(FileReport {
                name,
                tunes: records.len(),
            });
        }

        Ok(book)
    }
}

/// Book number of a directory, if its basename is entirely decimal digits.
fn book_number_of(dir: &Path) -> Option<i64> {
    let name = dir.file_name()?.to_str()?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// The `.abc` files directly inside `dir`, sorted by name for stable output.
fn abc_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(ABC_EXT))
        })
        .collect();
    files.sort();
    files
}

// =============================================================================
// Tests
// =============================================================================
