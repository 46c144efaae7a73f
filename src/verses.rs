//! Verse pagination for stored lyric text.
//!
//! Lyrics are stored as one blob where verses are separated by a blank line.
//! Some stored texts carry escaped newlines (the two characters `\` and `n`)
//! instead of real line feeds; those are normalized before splitting, so an
//! escaped blank line and a real blank line both separate verses.

use std::num::IntErrorKind;

pub const VERSES_PER_PAGE: usize = 2;

const VERSE_SEPARATOR: &str = "\n\n";
const ESCAPED_NEWLINE: &str = "\\n";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerseError {
    #[error("invalid page: {0}")]
    InvalidPage(String),

    #[error("page {page} exceeds available verses ({total})")]
    PageOutOfRange { page: u64, total: usize },
}

/// Parses the raw `page` query value. Missing, empty and `0` mean page 1.
/// Positive values too large for `u64` saturate, so they still land on the
/// out-of-range check rather than being reported as malformed.
pub fn parse_page(raw: Option<&str>) -> Result<u64, VerseError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };

    let page = match raw.parse::<u64>() {
        Ok(page) => page,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => return Err(VerseError::InvalidPage(raw.to_string())),
    };

    Ok(page.max(1))
}

pub fn split_verses(text: &str) -> Vec<String> {
    text.replace(ESCAPED_NEWLINE, "\n")
        .split(VERSE_SEPARATOR)
        .map(str::to_string)
        .collect()
}

pub fn page_count(text: &str) -> usize {
    split_verses(text).len().div_ceil(VERSES_PER_PAGE)
}

/// Returns the verses on the given 1-indexed page. Page 0 is read as page 1.
pub fn paginate(text: &str, page: u64) -> Result<Vec<String>, VerseError> {
    let page = page.max(1);
    let verses = split_verses(text);

    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(VERSES_PER_PAGE);
    if start >= verses.len() {
        return Err(VerseError::PageOutOfRange {
            page,
            total: verses.len(),
        });
    }

    let end = (start + VERSES_PER_PAGE).min(verses.len());
    Ok(verses[start..end].to_vec())
}
