//! Interactive text menu over the tune database.
//!
//! A numbered menu loops on free-text prompts that feed straight into the
//! query layer's filters. The table is loaded once at startup and reloaded
//! after the ingest option runs, so searches always see the stored rows.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::collector::BookCollector;
use crate::error::MenuResult;
use crate::store::{TuneRow, TuneStore, TuneTable};

const WIDTH: usize = 60;

/// Interactive menu bound to a books directory and a database path.
pub struct Menu {
    root: PathBuf,
    store: TuneStore,
    table: TuneTable,
}

impl Menu {
    /// Open the store and load whatever it already holds.
    pub fn open(root: impl Into<PathBuf>, db: &Path) -> MenuResult<Self> {
        let store = TuneStore::open(db)?;
        let table = store.select_all()?;
        Ok(Self {
            root: root.into(),
            store,
            table,
        })
    }

    /// Run the menu loop on stdin/stdout until the user exits.
    pub fn run(&mut self) -> MenuResult<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with(&mut stdin.lock(), &mut stdout.lock())
    }

    /// Menu loop over explicit streams, for tests.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> MenuResult<()> {
        writeln!(out, "\n{}", "=".repeat(WIDTH))?;
        writeln!(out, "{:^WIDTH$}", "ABC TUNE DATABASE")?;
        writeln!(out, "{}", "=".repeat(WIDTH))?;
        if self.table.is_empty() {
            writeln!(out, " No existing data found. Use option 4 to load ABC files.")?;
        } else {
            writeln!(out, " Loaded {} tunes from the database.", self.table.len())?;
        }

        loop {
            print_menu(out)?;
            let Some(choice) = prompt(input, out, " Enter choice (1-6): ")? else {
                return Ok(()); // EOF behaves like exit
            };

            match choice.as_str() {
                "1" => {
                    print_box(out, "Search Tunes by Title")?;
                    if let Some(term) = prompt(input, out, " Enter search term: ")? {
                        print_rows(out, &self.table.by_title(&term))?;
                    }
                }
                "2" => {
                    print_box(out, "Tunes by Book Number")?;
                    if let Some(raw) = prompt(input, out, " Enter book number: ")? {
                        match raw.parse::<i64>() {
                            Ok(book) => print_rows(out, &self.table.by_book(book))?,
                            Err(_) => writeln!(out, " Not a number: {raw}")?,
                        }
                    }
                }
                "3" => {
                    print_box(out, "Tunes by Rhythm Type")?;
                    if let Some(term) = prompt(input, out, " Enter rhythm (jig, reel, ...): ")? {
                        print_rows(out, &self.table.by_rhythm(&term))?;
                    }
                }
                "4" => {
                    print_box(out, "Load ABC Files")?;
                    let report = BookCollector::new(self.root.clone()).collect(&mut self.store)?;
                    for book in &report.books {
                        writeln!(out, " Book {}: {} tunes", book.book_number, book.tunes)?;
                    }
                    writeln!(out, " Total: {} tunes stored", report.total)?;
                    self.table = self.store.select_all()?;
                }
                "5" => {
                    print_box(out, "Database Summary")?;
                    writeln!(out, " {} tunes total", self.table.len())?;
                    for (book, count) in self.table.book_counts() {
                        writeln!(out, "   book {book}: {count} tunes")?;
                    }
                }
                "6" => {
                    writeln!(out, " Goodbye!")?;
                    return Ok(());
                }
                other => writeln!(out, " Invalid choice: {other}")?,
            }
        }
    }
}

fn print_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n{}", "-".repeat(WIDTH))?;
    writeln!(out, "{:^WIDTH$}", "MAIN MENU")?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;
    writeln!(out, " [1]  Search tunes by title")?;
    writeln!(out, " [2]  Get tunes by book number")?;
    writeln!(out, " [3]  Get tunes by rhythm type")?;
    writeln!(out, " [4]  Load ABC files into database")?;
    writeln!(out, " [5]  View database summary")?;
    writeln!(out, " [6]  Exit")?;
    writeln!(out, "{}", "-".repeat(WIDTH))
}

fn print_box<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "\n{}", "-".repeat(WIDTH))?;
    writeln!(out, " {title}")?;
    writeln!(out, "{}", "-".repeat(WIDTH))
}

/// Print a prompt and read one trimmed line; `None` on EOF.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_rows<W: Write>(out: &mut W, rows: &[&TuneRow]) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, " No matching tunes.");
    }
    for row in rows {
        let mut line = format!(" [book {}] #{} {}", row.book_number, row.tune_id, row.title);
        if !row.rhythm.is_empty() {
            line.push_str(&format!(" ({})", row.rhythm));
        }
        if !row.composer.is_empty() {
            line.push_str(&format!(" - {}", row.composer));
        }
        writeln!(out, "{line}")?;
    }
    writeln!(out, " {} match(es)", rows.len())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn menu_with_books() -> (tempfile::TempDir, Menu) {
        let tmp = tempfile::tempdir().unwrap();
        let book = tmp.path().join("5");
        fs::create_dir(&book).unwrap();
        fs::write(
            book.join("session.abc"),
            "X:1\nT:The Banshee\nR:reel\nnotes\nX:2\nT:Out on the Ocean\nR:jig\nmore\n",
        )
        .unwrap();
        let db = tmp.path().join("tunes.db");
        let menu = Menu::open(tmp.path(), &db).unwrap();
        (tmp, menu)
    }

    fn run(menu: &mut Menu, script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        menu.run_with(&mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_immediately() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "6\n");
        assert!(out.contains("MAIN MENU"));
        assert!(out.contains("No existing data found"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_load_then_search_title() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "4\n1\nbanshee\n6\n");
        assert!(out.contains("Book 5: 2 tunes"));
        assert!(out.contains("Total: 2 tunes stored"));
        assert!(out.contains("The Banshee"));
        assert!(out.contains("1 match(es)"));
    }

    #[test]
    fn test_filter_by_book_and_rhythm() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "4\n2\n5\n3\nJIG\n6\n");
        assert!(out.contains("2 match(es)"));
        assert!(out.contains("Out on the Ocean"));
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "9\n6\n");
        assert!(out.contains("Invalid choice: 9"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_eof_exits_cleanly() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "");
        assert!(out.contains("MAIN MENU"));
    }

    #[test]
    fn test_non_numeric_book_input_reported() {
        let (_tmp, mut menu) = menu_with_books();
        let out = run(&mut menu, "2\nseven\n6\n");
        assert!(out.contains("Not a number: seven"));
    }
}
