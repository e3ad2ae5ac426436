//! Tunebook CLI - Ingest ABC tune books into SQLite and query them
//!
//! # Main Commands
//!
//! ```bash
//! tunebook load                  # Scan abc_books/ and store every tune
//! tunebook menu                  # Interactive menu over the database
//! tunebook search "banshee"      # Title substring search
//! ```
//!
//! # Query Commands
//!
//! ```bash
//! tunebook book 7                # Tunes from book 7
//! tunebook rhythm jig            # Rhythm substring filter
//! tunebook composer carolan      # Composer substring filter
//! tunebook summary               # Row count and per-book tallies
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tunebook::{BookCollector, Menu, TuneRow, TuneStore, TuneTable};

#[derive(Parser)]
#[command(name = "tunebook")]
#[command(about = "Ingest ABC notation tune books into SQLite and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the books directory and store every parsed tune
    Load {
        /// Root directory holding numbered book folders
        #[arg(long, default_value = "abc_books")]
        root: PathBuf,

        /// SQLite database file
        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// Search tunes by title (case-insensitive substring)
    Search {
        /// Search term
        term: String,

        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// List tunes from one book
    Book {
        /// Book number (the folder name)
        number: i64,

        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// Filter tunes by rhythm type (case-insensitive substring)
    Rhythm {
        /// Rhythm term (jig, reel, ...)
        term: String,

        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// Filter tunes by composer (case-insensitive substring)
    Composer {
        /// Composer term
        term: String,

        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// Show row count and per-book tallies
    Summary {
        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },

    /// Interactive menu
    Menu {
        /// Root directory holding numbered book folders
        #[arg(long, default_value = "abc_books")]
        root: PathBuf,

        #[arg(long, default_value = "tunes.db")]
        db: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load { root, db } => cmd_load(&root, &db),
        Commands::Search { term, db } => cmd_search(&db, &term),
        Commands::Book { number, db } => cmd_book(&db, number),
        Commands::Rhythm { term, db } => cmd_rhythm(&db, &term),
        Commands::Composer { term, db } => cmd_composer(&db, &term),
        Commands::Summary { db } => cmd_summary(&db),
        Commands::Menu { root, db } => cmd_menu(root, &db),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_load(root: &Path, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Scanning {} ...", root.display());

    let mut store = TuneStore::open(db)?;
    let report = BookCollector::new(root).collect(&mut store)?;

    for book in &report.books {
        eprintln!(" Book {}", book.book_number);
        for file in &book.files {
            eprintln!("   {}: {} tune(s)", file.name, file.tunes);
        }
    }
    if report.dropped > 0 {
        eprintln!(" Discarded {} record(s) without a title", report.dropped);
    }
    if report.skipped_files > 0 {
        eprintln!(" Skipped {} unreadable file(s)", report.skipped_files);
    }
    eprintln!("Total tunes stored: {}", report.total);
    Ok(())
}

fn cmd_search(db: &Path, term: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(db)?;
    print_rows(&table.by_title(term))
}

fn cmd_book(db: &Path, number: i64) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(db)?;
    print_rows(&table.by_book(number))
}

fn cmd_rhythm(db: &Path, term: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(db)?;
    print_rows(&table.by_rhythm(term))
}

fn cmd_composer(db: &Path, term: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = load_table(db)?;
    print_rows(&table.by_composer(term))
}

fn load_table(db: &Path) -> Result<TuneTable, Box<dyn std::error::Error>> {
    let store = TuneStore::open(db)?;
    Ok(store.select_all()?)
}

fn print_rows(rows: &[&TuneRow]) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("{} match(es)", rows.len());
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn cmd_summary(db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = TuneStore::open(db)?;
    let table = store.select_all()?;

    println!("{} tunes total", table.len());
    for (book, count) in table.book_counts() {
        println!("  book {book}: {count} tunes");
    }
    Ok(())
}

fn cmd_menu(root: PathBuf, db: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut menu = Menu::open(root, db)?;
    menu.run()?;
    Ok(())
}
