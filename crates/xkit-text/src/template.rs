#![forbid(unsafe_code)]

//! Display templates (input masks).
//!
//! A mask mixes capture markers (`$`) with literal separators. Each `$`
//! consumes one grapheme of the raw value; every other grapheme is copied to
//! the display string as-is. The raw value is what a field stores and
//! validates; the display value is only for rendering.
//!
//! ```text
//! mask     ($$$) $$$-$$$$
//! raw      5551234
//! display  (555) 123-4
//! ```
//!
//! An empty mask is the identity mapping. A mask without any `$` is valid and
//! captures nothing.
//!
//! All positions are grapheme indices. Every function here is pure and runs
//! in time linear in the mask (or raw value).

use std::iter::Peekable;

use unicode_segmentation::{Graphemes, UnicodeSegmentation};

use crate::grapheme::take_graphemes;

/// The capture marker.
pub const CAPTURE: &str = "$";

/// Render `raw` through `mask`.
///
/// Walks both in lock-step and stops as soon as either runs out, so literals
/// after the last consumed raw grapheme are not emitted.
#[must_use]
pub fn format_value(raw: &str, mask: &str) -> String {
    if mask.is_empty() {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len() + mask.len());
    let mut raw = raw.graphemes(true).peekable();
    for cell in mask.graphemes(true) {
        let Some(next) = raw.peek() else {
            break;
        };
        if cell == CAPTURE {
            out.push_str(next);
            raw.next();
        } else {
            out.push_str(cell);
        }
    }
    out
}

/// Clamp a raw candidate to the number of capture slots in `mask`.
///
/// Truncation keeps a prefix, so the result borrows from `candidate`.
#[must_use]
pub fn value_by_template<'a>(candidate: &'a str, mask: &str) -> &'a str {
    if mask.is_empty() {
        return candidate;
    }
    take_graphemes(candidate, capture_count(mask))
}

/// Map a raw cursor index to a display cursor index.
///
/// Advances over the mask until `raw_index` captures have been passed, then
/// keeps going over literals up to (not including) the next `$`, so the caret
/// lands after a separator rather than before it.
#[must_use]
pub fn raw_cursor_to_display_cursor(raw_index: usize, mask: &str) -> usize {
    if mask.is_empty() {
        return raw_index;
    }
    let mut cells = mask.graphemes(true).peekable();
    let mut display = 0;
    let mut consumed = 0;
    while consumed < raw_index {
        let Some(cell) = cells.next() else {
            break;
        };
        if cell == CAPTURE {
            consumed += 1;
        }
        display += 1;
    }
    display + skip_literals(&mut cells)
}

/// Map a display index back to a raw index.
///
/// Counts the captures strictly before `display_index`. Indices past the end
/// of the mask clamp to the mask's capacity.
#[must_use]
pub fn display_cursor_to_raw_cursor(display_index: usize, mask: &str) -> usize {
    if mask.is_empty() {
        return display_index;
    }
    mask.graphemes(true)
        .take(display_index)
        .filter(|cell| *cell == CAPTURE)
        .count()
}

fn capture_count(mask: &str) -> usize {
    mask.graphemes(true).filter(|cell| *cell == CAPTURE).count()
}

fn skip_literals(cells: &mut Peekable<Graphemes<'_>>) -> usize {
    let mut skipped = 0;
    while cells.next_if(|cell| *cell != CAPTURE).is_some() {
        skipped += 1;
    }
    skipped
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parsed display mask.
///
/// Wraps the free functions and caches the capture count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    mask: String,
    captures: usize,
}

impl Template {
    /// Parse a mask. The empty mask is the identity template.
    #[must_use]
    pub fn new(mask: impl Into<String>) -> Self {
        let mask = mask.into();
        let captures = capture_count(&mask);
        Self { mask, captures }
    }

    /// The identity template.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// The mask text.
    #[must_use]
    pub fn mask(&self) -> &str {
        &self.mask
    }

    /// True for the empty mask.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mask.is_empty()
    }

    /// Maximum raw length, or `None` when unbounded (identity).
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        (!self.is_identity()).then_some(self.captures)
    }

    /// Render a raw value. See [`format_value`].
    #[must_use]
    pub fn format(&self, raw: &str) -> String {
        format_value(raw, &self.mask)
    }

    /// Clamp a raw candidate to capacity. See [`value_by_template`].
    #[must_use]
    pub fn clamp<'a>(&self, candidate: &'a str) -> &'a str {
        match self.capacity() {
            Some(cap) => take_graphemes(candidate, cap),
            None => candidate,
        }
    }

    /// Raw cursor to display cursor. See [`raw_cursor_to_display_cursor`].
    #[must_use]
    pub fn raw_to_display(&self, raw_index: usize) -> usize {
        raw_cursor_to_display_cursor(raw_index, &self.mask)
    }

    /// Display cursor to raw cursor. See [`display_cursor_to_raw_cursor`].
    #[must_use]
    pub fn display_to_raw(&self, display_index: usize) -> usize {
        display_cursor_to_raw_cursor(display_index, &self.mask)
    }

    /// Map a raw half-open selection `[start, end)` into display space.
    ///
    /// The end lands one past the last selected capture, so literals that
    /// trail the selection stay outside it.
    #[must_use]
    pub fn display_selection(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.raw_to_display(start);
        if end <= start {
            return (first, first);
        }
        (first, self.raw_to_display(end - 1) + 1)
    }
}

impl From<&str> for Template {
    fn from(mask: &str) -> Self {
        Self::new(mask)
    }
}

impl From<String> for Template {
    fn from(mask: String) -> Self {
        Self::new(mask)
    }
}
