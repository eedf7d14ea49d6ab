//! Splitting input text into synthesis chunks

use crate::{TTSError, TTSResult};
use regex::Regex;

/// Compile a split pattern, reporting bad regexes as request errors
pub fn compile_split_pattern(pattern: &str) -> TTSResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| TTSError::InvalidRequest(format!("invalid split pattern '{pattern}': {e}")))
}

/// Split `text` into trimmed, non-blank chunks.
///
/// Leading and trailing whitespace of the whole text is dropped first, so a
/// whitespace-only input yields no chunks at all.
pub fn split_text(text: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .split(text.trim())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}
