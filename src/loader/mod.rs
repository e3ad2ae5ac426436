//! Notation file loading with a two-stage decode.
//!
//! Files are decoded as UTF-8 first; when the bytes are not valid UTF-8 the
//! whole file is re-decoded as Latin-1, which maps every byte to a character
//! and therefore cannot fail. No other fallback is attempted — any I/O
//! failure propagates to the caller untouched.

use std::fs;
use std::path::Path;

use crate::error::{LoadError, LoadResult};

/// How a file's bytes were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    Utf8,
    Latin1,
}

/// Read a notation file and return its lines, each stripped of surrounding
/// whitespace. Blank lines are preserved as empty strings so the caller sees
/// the file's original line structure.
pub fn read_lines(path: &Path) -> LoadResult<Vec<String>> {
    let (text, _) = read_decoded(path)?;
    Ok(text.lines().map(|ln| ln.trim().to_string()).collect())
}

/// Read a file and decode it, reporting which decoding was used.
pub fn read_decoded(path: &Path) -> LoadResult<(String, Decoding)> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode(bytes))
}

/// Decode raw bytes: UTF-8 when valid, otherwise the infallible Latin-1
/// byte-to-char mapping.
pub fn decode(bytes: Vec<u8>) -> (String, Decoding) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, Decoding::Utf8),
        Err(err) => {
            let text = encoding_rs::mem::decode_latin1(err.as_bytes()).into_owned();
            (text, Decoding::Latin1)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
