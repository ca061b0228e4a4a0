#![forbid(unsafe_code)]

//! Grapheme-cluster helpers.
//!
//! Every index handed around by the inputs (cursor, selection, template
//! positions) counts extended grapheme clusters, never bytes or `char`s.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Iterate extended grapheme clusters.
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Number of extended grapheme clusters in `text`.
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Byte offset of grapheme `idx`, or `text.len()` past the end.
#[must_use]
pub fn grapheme_byte_offset(text: &str, idx: usize) -> usize {
    text.grapheme_indices(true)
        .nth(idx)
        .map_or(text.len(), |(i, _)| i)
}

/// Prefix of `text` holding at most `count` graphemes.
#[must_use]
pub fn take_graphemes(text: &str, count: usize) -> &str {
    &text[..grapheme_byte_offset(text, count)]
}

/// Terminal cell width of `text`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}
