//! Single-pass, line-oriented parser for ABC notation files.
//!
//! An ABC file holds any number of concatenated tune records. Each record is
//! opened by an `X:` header carrying a numeric identifier, followed by a mix
//! of metadata fields (`T:` title, `C:` composer, `M:` meter, `K:` key,
//! `R:` rhythm) and raw notation lines. The parser segments the stream at
//! record boundaries, captures the metadata fields last-write-wins, and keeps
//! every other non-comment line verbatim as the notation body. Notation is
//! never interpreted.
//!
//! The parser is an explicit fold over the line sequence: feed lines through
//! [`Parser::push_line`], which emits a finished [`TuneRecord`] whenever a
//! new record boundary closes the previous one, then call [`Parser::finish`]
//! to flush the record still under construction at end-of-input. Records
//! without a non-empty title are silently discarded (counted, never emitted).

use crate::models::{TuneBuilder, TuneRecord};

/// Marker opening a new tune record.
const RECORD_START: &str = "X:";
/// Marker for a comment line, ignored entirely.
const COMMENT: &str = "%";

// =============================================================================
// Line classification
// =============================================================================

/// The five recognized metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldTag {
    Title,
    Composer,
    Meter,
    Key,
    Rhythm,
}

/// What a single stripped line means to the parser.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `X:` header with the extracted tune identifier.
    Start(i64),
    /// One of the five metadata fields with its raw value.
    Field(FieldTag, &'a str),
    /// Verbatim notation content.
    Notation(&'a str),
    /// Blank or comment line.
    Ignored,
}

/// Classify one stripped line. Tests are applied in fixed priority order:
/// record start, then metadata tags, then notation, then blank/comment.
fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(RECORD_START) {
        return Line::Start(header_tune_id(rest));
    }
    for (prefix, tag) in [
        ("T:", FieldTag::Title),
        ("C:", FieldTag::Composer),
        ("M:", FieldTag::Meter),
        ("K:", FieldTag::Key),
        ("R:", FieldTag::Rhythm),
    ] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Line::Field(tag, rest);
        }
    }
    if !line.is_empty() && !line.starts_with(COMMENT) {
        return Line::Notation(line);
    }
    Line::Ignored
}

/// Extract the tune identifier from the text after the `X:` prefix.
///
/// Only decimal digits are kept (signs, decimals and stray text are
/// discarded); when no digits remain, or the digits overflow, the
/// identifier defaults to 0.
fn header_tune_id(rest: &str) -> i64 {
    let digits: String = rest.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// =============================================================================
// Parser
// =============================================================================

/// Stateful fold over one file's lines, producing [`TuneRecord`]s for a
/// single book.
#[derive(Debug)]
pub struct Parser {
    book_number: i64,
    current: TuneBuilder,
    notation: Vec<String>,
    dropped: usize,
}

impl Parser {
    /// Create a parser attributing every emitted record to `book_number`.
    pub fn for_book(book_number: i64) -> Self {
        Self {
            book_number,
            current: TuneBuilder::new(),
            notation: Vec::new(),
            dropped: 0,
        }
    }

    /// Feed one stripped line. Returns the previous record when this line
    /// opens a new boundary and the previous record was titled.
    pub fn push_line(&mut self, line: &str) -> Option<TuneRecord> {
        match classify(line) {
            Line::Start(tune_id) => {
                let emitted = self.take_current();
                self.current = TuneBuilder::with_id(tune_id);
                emitted
            }
            Line::Field(tag, value) => {
                match tag {
                    FieldTag::Title => self.current.set_title(value),
                    FieldTag::Composer => self.current.set_composer(value),
                    FieldTag::Meter => self.current.set_meter(value),
                    FieldTag::Key => self.current.set_key(value),
                    FieldTag::Rhythm => self.current.set_rhythm(value),
                }
                None
            }
            Line::Notation(text) => {
                self.notation.push(text.to_string());
                None
            }
            Line::Ignored => None,
        }
    }

    /// Flush the record under construction at end-of-input.
    pub fn finish(mut self) -> (Option<TuneRecord>, usize) {
        let emitted = self.take_current();
        (emitted, self.dropped)
    }

    /// Records discarded so far for lacking a title.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Finalize the current record and reset the notation buffer.
    ///
    /// A record with content but no non-empty title is counted as dropped;
    /// an untouched builder with no pending notation is not (nothing was
    /// actually discarded at the start of a file or after a clean emit).
    fn take_current(&mut self) -> Option<TuneRecord> {
        let builder = std::mem::take(&mut self.current);
        let had_content = builder.has_title() || !self.notation.is_empty();
        let emitted = builder.finish(self.book_number, &self.notation);
        self.notation.clear();
        if emitted.is_none() && had_content {
            self.dropped += 1;
        }
        emitted
    }
}

/// Parse a full line sequence for one book, collecting every emitted record.
///
/// Returns the records plus the count of title-less blocks that were
/// discarded, for callers that want to report them.
pub fn parse_lines<I, S>(lines: I, book_number: i64) -> (Vec<TuneRecord>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::for_book(book_number);
    let mut records = Vec::new();
    for line in lines {
        if let Some(record) = parser.push_line(line.as_ref()) {
            records.push(record);
        }
    }
    let (last, dropped) = parser.finish();
    records.extend(last);
    (records, dropped)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<TuneRecord> {
        parse_lines(input.lines().map(str::trim), 0).0
    }

    #[test]
    fn test_single_record_round_trip() {
        let input = "X:12\nT:The Banshee\nC:Trad\nM:6/8\nK:Dmaj\nR:jig\nN1\nN2\nN3";
        let records = parse(input);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.tune_id, 12);
        assert_eq!(r.title, "The Banshee");
        assert_eq!(r.composer, "Trad");
        assert_eq!(r.meter, "6/8");
        assert_eq!(r.key, "Dmaj");
        assert_eq!(r.rhythm, "jig");
        assert_eq!(r.abc_notation, "N1\nN2\nN3");
    }

    #[test]
    fn test_multi_record_file() {
        let input = "X:1\nT:A\nK:Cmaj\nabc line\nX:2\nT:B\nabc line2";
        let records = parse(input);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tune_id, 1);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].key, "Cmaj");
        assert_eq!(records[0].abc_notation, "abc line");
        assert_eq!(records[1].tune_id, 2);
        assert_eq!(records[1].title, "B");
        assert_eq!(records[1].key, "");
        assert_eq!(records[1].abc_notation, "abc line2");
    }

    #[test]
    fn test_tune_id_extraction() {
        assert_eq!(header_tune_id("123abc"), 123);
        assert_eq!(header_tune_id(""), 0);
        assert_eq!(header_tune_id("12a3"), 123);
        assert_eq!(header_tune_id("-42"), 42);
        assert_eq!(header_tune_id("no digits"), 0);
    }

    #[test]
    fn test_titleless_record_dropped() {
        let (records, dropped) = parse_lines("X:1\nK:Cmaj\nnotes".lines(), 0);
        assert!(records.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_bare_title_tag_counts_as_absent() {
        let (records, dropped) = parse_lines("X:1\nT:\nnotes".lines(), 0);
        assert!(records.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_every_emitted_record_is_titled() {
        let input = "X:1\nnotes\nX:2\nT:Ok\nmore\nX:3\nK:G";
        let records = parse(input);
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| !r.title.is_empty()));
    }

    #[test]
    fn test_comment_lines_excluded() {
        let input = "X:1\nT:A\n% a comment\nnotes\n%T:not a title";
        let records = parse(input);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].abc_notation, "notes");
    }

    #[test]
    fn test_blank_lines_ignored() {
        let input = "X:1\nT:A\n\nnotes\n\nmore";
        let records = parse(input);
        assert_eq!(records[0].abc_notation, "notes\nmore");
    }

    #[test]
    fn test_repeated_field_overwrites() {
        let input = "X:1\nT:First\nT:Second\nK:G\nK:D\nnotes";
        let records = parse(input);
        assert_eq!(records[0].title, "Second");
        assert_eq!(records[0].key, "D");
    }

    #[test]
    fn test_file_without_record_start() {
        // No X: at all: the implicit record is still emitted when titled.
        let input = "T:Orphan\nK:Amin\nnotes";
        let records = parse(input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tune_id, 0);
        assert_eq!(records[0].title, "Orphan");
        assert_eq!(records[0].abc_notation, "notes");
    }

    #[test]
    fn test_header_and_field_lines_not_in_notation() {
        let input = "X:1\nT:A\nC:B\nM:4/4\nK:G\nR:reel\nnotes";
        let records = parse(input);
        assert_eq!(records[0].abc_notation, "notes");
    }

    #[test]
    fn test_book_number_attached() {
        let (records, _) = parse_lines("X:1\nT:A".lines(), 7);
        assert_eq!(records[0].book_number, 7);
    }

    #[test]
    fn test_notation_does_not_leak_across_boundary() {
        let input = "X:1\nT:A\nfirst\nX:2\nT:B\nsecond";
        let records = parse(input);
        assert_eq!(records[0].abc_notation, "first");
        assert_eq!(records[1].abc_notation, "second");
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let (records, dropped) = parse_lines(std::iter::empty::<&str>(), 0);
        assert!(records.is_empty());
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_incremental_emission_at_boundary() {
        let mut parser = Parser::for_book(3);
        assert!(parser.push_line("X:1").is_none());
        assert!(parser.push_line("T:A").is_none());
        assert!(parser.push_line("notes").is_none());

        // The second X: closes and emits the first record.
        let first = parser.push_line("X:2").unwrap();
        assert_eq!(first.title, "A");
        assert_eq!(first.book_number, 3);

        assert!(parser.push_line("T:B").is_none());
        let (second, dropped) = parser.finish();
        assert_eq!(second.unwrap().title, "B");
        assert_eq!(dropped, 0);
    }
}
