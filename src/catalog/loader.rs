//! Literal pattern lists.
//!
//! Format: one raw literal per line. Surrounding ASCII whitespace is stripped,
//! blank lines are skipped, and duplicates are dropped keeping the first
//! occurrence. No escaping is applied; the bytes of a line are the pattern.

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use memchr::memchr_iter;

use super::LoadError;

/// Splits `text` into deduplicated literal patterns in first-seen order.
pub fn parse_patterns(text: &[u8]) -> Vec<Vec<u8>> {
    let mut seen: AHashSet<&[u8]> = AHashSet::new();
    let mut out = Vec::new();

    let mut start = 0usize;
    let ends = memchr_iter(b'\n', text).chain(std::iter::once(text.len()));
    for end in ends {
        let line = text[start..end].trim_ascii();
        start = (end + 1).min(text.len());
        if line.is_empty() {
            continue;
        }
        if seen.insert(line) {
            out.push(line.to_vec());
        }
    }
    out
}

/// Reads and parses a pattern file.
///
/// A file with no usable lines is an error: an empty catalog would silently
/// match nothing.
pub fn load_patterns(path: &Path) -> Result<Vec<Vec<u8>>, LoadError> {
    let text = fs::read(path).map_err(|err| LoadError::Io {
        path: path.to_path_buf(),
        err,
    })?;
    let patterns = parse_patterns(&text);
    if patterns.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(patterns)
}
