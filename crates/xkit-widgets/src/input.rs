#![forbid(unsafe_code)]

//! Text input widget.
//!
//! A single-line text or password input with a synthetic caret, selection,
//! word-level editing, IME composition and an optional display template.
//! Grapheme-cluster aware: cursor and selection count clusters, never bytes.
//!
//! The stored value is always the *raw* value. A display template (see
//! [`xkit_text::Template`]) only changes what [`TextInput::view`] shows and
//! caps how many graphemes can be typed.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use xkit_core::event::{
    CompositionEvent, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton,
    MouseEventKind,
};
use xkit_core::invoke::invoke_optional;
use xkit_style::{ComponentKind, Theme};
use xkit_text::{
    CAPTURE, Template, display_width, grapheme_byte_offset, grapheme_count, take_graphemes,
};

type ChangeCallback = Box<dyn FnMut(&str)>;
type NotifyCallback = Box<dyn FnMut()>;
type BlurCallback = Box<dyn FnMut() -> bool>;

/// How the value is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    /// Graphemes shown as typed.
    #[default]
    Text,
    /// Every grapheme replaced by the theme's password glyph.
    Password,
}

/// In-progress IME composition: the preedit occupies `len` graphemes of the
/// value starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Composition {
    start: usize,
    len: usize,
}

/// A single-line text input widget.
#[derive(Default)]
pub struct TextInput {
    /// Raw value.
    value: String,
    /// Cursor position (grapheme index into the raw value).
    cursor: usize,
    /// Selection anchor (grapheme index). When set, selection spans from anchor to cursor.
    selection_anchor: Option<usize>,
    /// Placeholder text shown while unfocused and empty.
    placeholder: String,
    kind: InputKind,
    template: Template,
    /// Maximum length in graphemes (None = unlimited).
    max_length: Option<usize>,
    focused: bool,
    composition: Option<Composition>,
    on_change: Option<ChangeCallback>,
    on_focus: Option<NotifyCallback>,
    on_blur: Option<BlurCallback>,
    on_click: Option<NotifyCallback>,
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("value", &self.value)
            .field("cursor", &self.cursor)
            .field("selection_anchor", &self.selection_anchor)
            .field("kind", &self.kind)
            .field("template", &self.template.mask())
            .field("focused", &self.focused)
            .field("composition", &self.composition)
            .finish_non_exhaustive()
    }
}

impl TextInput {
    /// Create a new empty text input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty password input.
    #[must_use]
    pub fn password() -> Self {
        Self::new().with_kind(InputKind::Password)
    }

    // --- Builder methods ---

    /// Set the text value (builder). Clamped to capacity; cursor moves to the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.clamp_value();
        self.cursor = grapheme_count(&self.value);
        self.selection_anchor = None;
        self
    }

    /// Set the placeholder text (builder).
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set text or password mode (builder).
    #[must_use]
    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the display template (builder). Clamps the current value.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<Template>) -> Self {
        self.template = template.into();
        self.clamp_value();
        self
    }

    /// Set maximum length in graphemes (builder).
    #[must_use]
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self.clamp_value();
        self
    }

    /// Set whether the input is focused (builder). Does not fire callbacks.
    #[must_use]
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Called with the raw value after every edit.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Called when the input gains focus.
    #[must_use]
    pub fn on_focus(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    /// Called when the input is about to lose focus. Returning `true` keeps it focused.
    #[must_use]
    pub fn on_blur(mut self, f: impl FnMut() -> bool + 'static) -> Self {
        self.on_blur = Some(Box::new(f));
        self
    }

    /// Called on a primary-button press inside the input.
    #[must_use]
    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    // --- Value access ---

    /// Get the current raw value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as displayed through the template (unmasked).
    #[must_use]
    pub fn display_value(&self) -> String {
        self.template.format(&self.value)
    }

    /// Set the value, clamping it to capacity and the cursor to the new length.
    ///
    /// A programmatic set does not fire `on_change`.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.clamp_value();
        self.cursor = self.cursor.min(self.grapheme_count());
        self.selection_anchor = None;
        self.composition = None;
    }

    /// Clear all text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.selection_anchor = None;
        self.composition = None;
    }

    /// Get the cursor position (grapheme index into the raw value).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the value. Clears the selection.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.grapheme_count());
        self.selection_anchor = None;
    }

    /// Cursor position in display coordinates.
    #[must_use]
    pub fn display_cursor(&self) -> usize {
        self.template.raw_to_display(self.cursor)
    }

    /// Get selected text, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        let anchor = self.selection_anchor?;
        let (start, end) = self.selection_range(anchor);
        let byte_start = self.grapheme_byte_offset(start);
        let byte_end = self.grapheme_byte_offset(end);
        Some(&self.value[byte_start..byte_end])
    }

    /// Raw selection range `[start, end)`, if any.
    #[must_use]
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection_anchor
            .map(|anchor| self.selection_range(anchor))
    }

    /// Grapheme index where the current IME composition started.
    #[must_use]
    pub fn composition_index(&self) -> Option<usize> {
        self.composition.map(|c| c.start)
    }

    /// Input kind.
    #[must_use]
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Display template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether the input has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Maximum number of graphemes the value may hold.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        match (self.template.capacity(), self.max_length) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Focus ---

    /// Give the input focus, firing `on_focus` if it was unfocused.
    pub fn focus(&mut self) -> bool {
        if self.focused {
            return false;
        }
        self.focused = true;
        invoke_optional("on_focus", self.on_focus.as_deref_mut(), |cb| cb());
        true
    }

    /// Ask the input to give up focus.
    ///
    /// `on_blur` may veto by returning `true`. Returns whether focus was lost.
    pub fn blur(&mut self) -> bool {
        if !self.focused {
            return false;
        }
        let refocus =
            invoke_optional("on_blur", self.on_blur.as_deref_mut(), |cb| cb()).unwrap_or(false);
        if refocus {
            return false;
        }
        self.focused = false;
        self.composition = None;
        true
    }

    // --- Event handling ---

    /// Handle an input event.
    ///
    /// Returns `true` if the state changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat => {
                let before = self.value.clone();
                let handled = self.handle_key(key);
                if self.value != before {
                    self.notify_change();
                }
                handled
            }
            Event::Paste(paste) => {
                let before = self.value.clone();
                self.delete_selection();
                self.insert_str(&paste.text);
                let changed = self.value != before;
                if changed {
                    self.notify_change();
                }
                changed
            }
            Event::Focus(true) => self.focus(),
            Event::Focus(false) => self.blur(),
            Event::Composition(composition) => self.handle_composition(composition),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.click(usize::from(mouse.x));
                true
            }
            _ => false,
        }
    }

    /// Place the cursor at display column `display_x`, focusing the input
    /// and firing `on_click`.
    pub fn click(&mut self, display_x: usize) {
        invoke_optional("on_click", self.on_click.as_deref_mut(), |cb| cb());
        self.focus();
        let raw = self.template.display_to_raw(display_x);
        self.set_cursor(raw);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let shift = key.modifiers.contains(Modifiers::SHIFT);

        match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.delete_selection();
                self.insert_char(c);
                true
            }
            // Ctrl+A: select all
            KeyCode::Char('a') if ctrl => {
                self.select_all();
                true
            }
            KeyCode::Backspace => {
                if self.selection_anchor.is_some() {
                    self.delete_selection();
                } else if ctrl {
                    self.delete_word_back();
                } else {
                    self.delete_char_back();
                }
                true
            }
            KeyCode::Delete => {
                if self.selection_anchor.is_some() {
                    self.delete_selection();
                } else if ctrl {
                    self.delete_word_forward();
                } else {
                    self.delete_char_forward();
                }
                true
            }
            KeyCode::Left => {
                if ctrl {
                    self.move_cursor_word_left(shift);
                } else if shift {
                    self.ensure_selection_anchor();
                    self.cursor = self.cursor.saturating_sub(1);
                } else {
                    self.move_cursor_left();
                }
                true
            }
            KeyCode::Right => {
                if ctrl {
                    self.move_cursor_word_right(shift);
                } else if shift {
                    self.ensure_selection_anchor();
                    self.cursor = (self.cursor + 1).min(self.grapheme_count());
                } else {
                    self.move_cursor_right();
                }
                true
            }
            KeyCode::Home | KeyCode::End => {
                if shift {
                    self.ensure_selection_anchor();
                } else {
                    self.selection_anchor = None;
                }
                self.cursor = if key.code == KeyCode::Home {
                    0
                } else {
                    self.grapheme_count()
                };
                true
            }
            _ => false,
        }
    }

    fn handle_composition(&mut self, event: &CompositionEvent) -> bool {
        match event {
            CompositionEvent::Start => {
                self.delete_selection();
                self.composition = Some(Composition {
                    start: self.cursor,
                    len: 0,
                });
                true
            }
            CompositionEvent::Update(preedit) => {
                self.replace_preedit(preedit);
                true
            }
            CompositionEvent::End(committed) => {
                self.replace_preedit(committed);
                self.composition = None;
                self.notify_change();
                true
            }
        }
    }

    /// Swap the current preedit for `text`, starting a composition at the
    /// cursor if none is active.
    fn replace_preedit(&mut self, text: &str) {
        let current = *self.composition.get_or_insert(Composition {
            start: self.cursor,
            len: 0,
        });
        let byte_start = self.grapheme_byte_offset(current.start);
        let byte_end = self.grapheme_byte_offset(current.start + current.len);
        self.value.drain(byte_start..byte_end);
        self.cursor = current.start;
        let len = self.insert_str(text);
        self.composition = Some(Composition {
            start: current.start,
            len,
        });
    }

    fn notify_change(&mut self) {
        let value = &self.value;
        invoke_optional("on_change", self.on_change.as_deref_mut(), |cb| cb(value));
    }

    // --- Editing operations ---

    fn insert_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor as much of `text` as capacity allows. Line breaks
    /// and other control characters are dropped. Returns the grapheme count
    /// actually inserted.
    fn insert_str(&mut self, text: &str) -> usize {
        let clean: String = text.chars().filter(|c| !c.is_control()).collect();
        let count = self.grapheme_count();
        let room = self
            .capacity()
            .map_or(usize::MAX, |cap| cap.saturating_sub(count));
        let accepted = take_graphemes(&clean, room);
        if accepted.is_empty() {
            return 0;
        }
        let start = self.cursor;
        let byte_offset = self.grapheme_byte_offset(start);
        self.value.insert_str(byte_offset, accepted);
        // Joiners and jamo can merge clusters on either side of the insertion,
        // so the new cursor comes from the byte end, not a count difference.
        let end = byte_offset + accepted.len();
        self.cursor = grapheme_count(&self.value[..end]).min(self.grapheme_count());
        self.cursor.saturating_sub(start)
    }

    fn delete_char_back(&mut self) {
        if self.cursor > 0 {
            let byte_start = self.grapheme_byte_offset(self.cursor - 1);
            let byte_end = self.grapheme_byte_offset(self.cursor);
            self.value.drain(byte_start..byte_end);
            self.cursor -= 1;
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor < self.grapheme_count() {
            let byte_start = self.grapheme_byte_offset(self.cursor);
            let byte_end = self.grapheme_byte_offset(self.cursor + 1);
            self.value.drain(byte_start..byte_end);
        }
    }

    fn delete_word_back(&mut self) {
        let old_cursor = self.cursor;
        self.move_cursor_word_left(false);
        if self.cursor < old_cursor {
            let byte_start = self.grapheme_byte_offset(self.cursor);
            let byte_end = self.grapheme_byte_offset(old_cursor);
            self.value.drain(byte_start..byte_end);
        }
    }

    fn delete_word_forward(&mut self) {
        let old_cursor = self.cursor;
        self.move_cursor_word_right(false);
        let new_cursor = self.cursor;
        self.cursor = old_cursor;
        if new_cursor > old_cursor {
            let byte_start = self.grapheme_byte_offset(old_cursor);
            let byte_end = self.grapheme_byte_offset(new_cursor);
            self.value.drain(byte_start..byte_end);
        }
    }

    // --- Selection ---

    /// Select all text.
    pub fn select_all(&mut self) {
        self.selection_anchor = Some(0);
        self.cursor = self.grapheme_count();
    }

    /// Select the raw range `[start, end)`; the cursor lands on `end`.
    pub fn select(&mut self, start: usize, end: usize) {
        let count = self.grapheme_count();
        self.selection_anchor = Some(start.min(count));
        self.cursor = end.min(count);
    }

    fn delete_selection(&mut self) {
        if let Some(anchor) = self.selection_anchor.take() {
            let (start, end) = self.selection_range(anchor);
            let byte_start = self.grapheme_byte_offset(start);
            let byte_end = self.grapheme_byte_offset(end);
            self.value.drain(byte_start..byte_end);
            self.cursor = start;
        }
    }

    fn ensure_selection_anchor(&mut self) {
        if self.selection_anchor.is_none() {
            self.selection_anchor = Some(self.cursor);
        }
    }

    fn selection_range(&self, anchor: usize) -> (usize, usize) {
        if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        }
    }

    // --- Cursor movement ---

    fn move_cursor_left(&mut self) {
        if let Some(anchor) = self.selection_anchor.take() {
            self.cursor = self.cursor.min(anchor);
        } else if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn move_cursor_right(&mut self) {
        if let Some(anchor) = self.selection_anchor.take() {
            self.cursor = self.cursor.max(anchor);
        } else if self.cursor < self.grapheme_count() {
            self.cursor += 1;
        }
    }

    fn move_cursor_word_left(&mut self, select: bool) {
        if select {
            self.ensure_selection_anchor();
        } else {
            self.selection_anchor = None;
        }

        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = self.cursor;
        if pos == 0 {
            return;
        }

        let target_class = word_class(graphemes[pos - 1]);
        while pos > 0 && word_class(graphemes[pos - 1]) == target_class {
            pos -= 1;
        }
        self.cursor = pos;
    }

    fn move_cursor_word_right(&mut self, select: bool) {
        if select {
            self.ensure_selection_anchor();
        } else {
            self.selection_anchor = None;
        }

        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let max = graphemes.len();
        let mut pos = self.cursor;
        if pos >= max {
            return;
        }

        let target_class = word_class(graphemes[pos]);
        while pos < max && word_class(graphemes[pos]) == target_class {
            pos += 1;
        }
        self.cursor = pos;
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        grapheme_count(&self.value)
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        grapheme_byte_offset(&self.value, grapheme_idx)
    }

    fn clamp_value(&mut self) {
        if let Some(cap) = self.capacity() {
            let keep = take_graphemes(&self.value, cap).len();
            self.value.truncate(keep);
            self.cursor = self.cursor.min(cap);
        }
    }

    // --- View ---

    /// Describe what to draw.
    ///
    /// While focused, or whenever the value is non-empty, the view holds one
    /// cell per display grapheme. Otherwise it holds only the placeholder.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> InputView {
        if !self.focused && self.value.is_empty() {
            return InputView::placeholder(&self.placeholder, self.kind);
        }

        let space = theme.space(ComponentKind::Input);
        let password_glyph = theme.password_glyph(ComponentKind::Input).to_string();
        let display = self.display_value();
        let display_cursor = self.display_cursor();
        let (sel_start, sel_end) = self
            .selection()
            .map_or((0, 0), |(start, end)| self.template.display_selection(start, end));
        let raw_positions = self.raw_positions();

        let cells: Vec<InputCell> = display
            .graphemes(true)
            .enumerate()
            .map(|(idx, grapheme)| {
                let glyph = match self.kind {
                    InputKind::Text => grapheme.to_string(),
                    InputKind::Password => password_glyph.clone(),
                };
                let key = if glyph == " " {
                    space.to_string()
                } else {
                    glyph.clone()
                };
                let composing = match (self.composition, raw_positions.get(idx).copied().flatten()) {
                    (Some(c), Some(raw)) => raw >= c.start && raw < c.start + c.len,
                    _ => false,
                };
                InputCell {
                    width: display_width(&glyph),
                    glyph,
                    key,
                    caret: self.focused && idx == display_cursor,
                    selected: idx >= sel_start && idx < sel_end,
                    composing,
                }
            })
            .collect();

        let trailing_caret = (self.focused && cells.len() <= display_cursor)
            .then(|| theme.caret(ComponentKind::Input).to_string());

        InputView {
            cells,
            trailing_caret,
            placeholder: None,
            focused: self.focused,
            kind: self.kind,
            cursor: display_cursor,
        }
    }

    /// Raw index for each display cell, `None` for template literals.
    fn raw_positions(&self) -> Vec<Option<usize>> {
        if self.template.is_identity() {
            return (0..self.grapheme_count()).map(Some).collect();
        }
        let mut raw = 0;
        self.template
            .mask()
            .graphemes(true)
            .map(|cell| {
                (cell == CAPTURE).then(|| {
                    raw += 1;
                    raw - 1
                })
            })
            .collect()
    }
}

/// Word-movement class: whitespace, alphanumeric or punctuation.
fn word_class(g: &str) -> u8 {
    if g.chars().all(char::is_whitespace) {
        0
    } else if g.chars().any(char::is_alphanumeric) {
        1
    } else {
        2
    }
}

/// One display grapheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCell {
    /// What to draw.
    pub glyph: String,
    /// Terminal columns `glyph` occupies.
    pub width: usize,
    /// Glyph for the caret overlay on this cell (the theme's space glyph for spaces).
    pub key: String,
    /// The caret sits on this cell.
    pub caret: bool,
    /// Inside the selection.
    pub selected: bool,
    /// Part of an in-progress IME composition.
    pub composing: bool,
}

/// Renderer-agnostic description of a [`TextInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputView {
    /// Display cells (empty when the placeholder is shown).
    pub cells: Vec<InputCell>,
    /// Caret glyph drawn after the last cell when the caret is past the text.
    pub trailing_caret: Option<String>,
    /// Placeholder text, shown instead of cells.
    pub placeholder: Option<String>,
    /// Input focus.
    pub focused: bool,
    /// Text or password.
    pub kind: InputKind,
    /// Caret position in display cells.
    pub cursor: usize,
}

impl InputView {
    pub(crate) fn placeholder(placeholder: &str, kind: InputKind) -> Self {
        Self {
            cells: Vec::new(),
            trailing_caret: None,
            placeholder: Some(placeholder.to_string()),
            focused: false,
            kind,
            cursor: 0,
        }
    }

    /// An unfocused view of fixed text, falling back to `placeholder` when empty.
    pub(crate) fn static_text(text: &str, placeholder: &str) -> Self {
        if text.is_empty() {
            return Self::placeholder(placeholder, InputKind::Text);
        }
        let cells = text
            .graphemes(true)
            .map(|g| InputCell {
                width: display_width(g),
                glyph: g.to_string(),
                key: g.to_string(),
                caret: false,
                selected: false,
                composing: false,
            })
            .collect();
        Self {
            cells,
            trailing_caret: None,
            placeholder: None,
            focused: false,
            kind: InputKind::Text,
            cursor: 0,
        }
    }

    /// Concatenated glyphs, or the placeholder.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.placeholder {
            Some(placeholder) => placeholder.clone(),
            None => self.cells.iter().map(|c| c.glyph.as_str()).collect(),
        }
    }

    /// True when the placeholder is shown.
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Columns needed for the text or placeholder, excluding a trailing caret.
    #[must_use]
    pub fn width(&self) -> usize {
        match &self.placeholder {
            Some(placeholder) => display_width(placeholder),
            None => self.cells.iter().map(|c| c.width).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use xkit_core::event::{CompositionEvent, KeyEvent, MouseEvent, PasteEvent};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    #[test]
    fn test_empty_input() {
        let input = TextInput::new();
        assert!(input.value().is_empty());
        assert_eq!(input.cursor(), 0);
        assert!(input.selected_text().is_none());
    }

    #[test]
    fn test_with_value() {
        let input = TextInput::new().with_value("hello");
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_set_value() {
        let mut input = TextInput::new().with_value("hello world");
        input.set_value("hi");
        assert_eq!(input.value(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_clear() {
        let mut input = TextInput::new().with_value("hello");
        input.clear();
        assert!(input.value().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_insert_char_mid() {
        let mut input = TextInput::new().with_value("ac");
        input.cursor = 1;
        input.insert_char('b');
        assert_eq!(input.value(), "abc");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_max_length() {
        let mut input = TextInput::new().with_max_length(3);
        for c in "abcdef".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_template_caps_typing() {
        let mut input = TextInput::new().with_template("$$/$$");
        for c in "123456".chars() {
            input.handle_event(&key(KeyCode::Char(c)));
        }
        assert_eq!(input.value(), "1234");
        assert_eq!(input.display_value(), "12/34");
    }

    #[test]
    fn test_template_clamps_programmatic_value() {
        let input = TextInput::new()
            .with_template("$$$-$$$-$$$$")
            .with_value("123456789012");
        assert_eq!(input.value(), "1234567890");
        assert_eq!(input.display_value(), "123-456-7890");
    }

    #[test]
    fn test_delete_char_back_at_start() {
        let mut input = TextInput::new().with_value("abc");
        input.cursor = 0;
        input.delete_char_back();
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn test_delete_char_forward() {
        let mut input = TextInput::new().with_value("abc");
        input.cursor = 1;
        input.delete_char_forward();
        assert_eq!(input.value(), "ac");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_word_movement() {
        let mut input = TextInput::new().with_value("hello world");
        input.handle_event(&Event::Key(
            KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(input.cursor(), 6);
        input.handle_event(&Event::Key(
            KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(input.cursor(), 5);
        input.cursor = 0;
        input.move_cursor_word_right(false);
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_delete_word_forward() {
        let mut input = TextInput::new().with_value("hello world");
        input.cursor = 0;
        input.delete_word_forward();
        assert_eq!(input.value(), " world");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_handle_event_ctrl_backspace() {
        let mut input = TextInput::new().with_value("hello world");
        let event = Event::Key(KeyEvent::new(KeyCode::Backspace).with_modifiers(Modifiers::CTRL));
        assert!(input.handle_event(&event));
        assert_eq!(input.value(), "hello ");
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut input = TextInput::new().with_value("hello");
        input.select_all();
        input.handle_event(&key(KeyCode::Char('x')));
        assert_eq!(input.value(), "x");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_shift_left_creates_selection() {
        let mut input = TextInput::new().with_value("hello");
        let event = Event::Key(KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT));
        assert!(input.handle_event(&event));
        assert_eq!(input.cursor(), 4);
        assert_eq!(input.selection(), Some((4, 5)));
        assert_eq!(input.selected_text(), Some("o"));
    }

    #[test]
    fn test_left_collapses_selection() {
        let mut input = TextInput::new().with_value("hello");
        input.select(1, 4);
        input.handle_event(&key(KeyCode::Left));
        assert_eq!(input.cursor(), 1);
        assert!(input.selection().is_none());
    }

    #[test]
    fn test_home_end() {
        let mut input = TextInput::new().with_value("hello");
        input.handle_event(&key(KeyCode::Home));
        assert_eq!(input.cursor(), 0);
        input.handle_event(&key(KeyCode::End));
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_unicode_grapheme_handling() {
        let mut input = TextInput::new();
        input.set_value("cafe\u{0301}");
        assert_eq!(input.grapheme_count(), 4);
        input.cursor = 4;
        input.delete_char_back();
        assert_eq!(input.value(), "caf");
    }

    #[test]
    fn test_joiner_between_emoji_merges_clusters() {
        let mut input = TextInput::new().with_value("👍👍");
        input.set_cursor(1);
        assert!(input.handle_event(&key(KeyCode::Char('\u{200D}'))));
        assert_eq!(input.value(), "👍\u{200D}👍");
        assert_eq!(input.grapheme_count(), 1);
        assert_eq!(input.cursor(), 1);
        input.handle_event(&key(KeyCode::Char('x')));
        assert_eq!(input.value(), "👍\u{200D}👍x");
    }

    #[test]
    fn test_hangul_vowel_joins_neighbouring_jamo() {
        let mut input = TextInput::new().with_value("\u{1100}\u{11A8}");
        assert_eq!(input.grapheme_count(), 2);
        input.set_cursor(1);
        input.handle_event(&key(KeyCode::Char('\u{1161}')));
        assert_eq!(input.value(), "\u{1100}\u{1161}\u{11A8}");
        assert_eq!(input.grapheme_count(), 1);
        assert!(input.cursor() <= input.grapheme_count());
    }

    #[test]
    fn test_merging_paste_and_preedit_keep_cursor_in_bounds() {
        let mut input = TextInput::new().with_value("👍👍");
        input.set_cursor(1);
        input.handle_event(&Event::Paste(PasteEvent::bracketed("\u{200D}")));
        assert_eq!(input.cursor(), 1);

        let mut input = TextInput::new().with_value("👍👍").with_focused(true);
        input.set_cursor(1);
        input.handle_event(&Event::Composition(CompositionEvent::Start));
        input.handle_event(&Event::Composition(CompositionEvent::Update("\u{200D}".into())));
        input.handle_event(&Event::Composition(CompositionEvent::End(String::new())));
        assert!(input.cursor() <= input.grapheme_count());
        let _ = input.view(&Theme::default());
    }

    #[test]
    fn test_paste_drops_newlines_and_clamps() {
        let mut input = TextInput::new().with_template("$$$$");
        input.handle_event(&Event::Paste(PasteEvent::bracketed("12\n345")));
        assert_eq!(input.value(), "1234");
    }

    #[test]
    fn test_on_change_reports_raw_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut input = TextInput::new()
            .with_template("$$-$$")
            .on_change(move |v| sink.borrow_mut().push(v.to_string()));
        input.handle_event(&key(KeyCode::Char('1')));
        input.handle_event(&key(KeyCode::Char('2')));
        input.handle_event(&key(KeyCode::Char('3')));
        // Cursor movement does not change the value.
        input.handle_event(&key(KeyCode::Left));
        assert_eq!(*seen.borrow(), vec!["1", "12", "123"]);
    }

    #[test]
    fn test_panicking_on_change_is_suppressed() {
        let mut input = TextInput::new().on_change(|_| panic!("boom"));
        assert!(input.handle_event(&key(KeyCode::Char('a'))));
        assert_eq!(input.value(), "a");
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_panicking_callback_logs_warning() {
        let mut input = TextInput::new().on_change(|_| panic!("boom"));
        input.handle_event(&key(KeyCode::Char('a')));
        assert!(logs_contain("error happened during invoking on_change"));
    }

    #[test]
    fn test_focus_and_blur_callbacks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (f, b) = (Rc::clone(&log), Rc::clone(&log));
        let mut input = TextInput::new()
            .on_focus(move || f.borrow_mut().push("focus"))
            .on_blur(move || {
                b.borrow_mut().push("blur");
                false
            });
        assert!(input.handle_event(&Event::Focus(true)));
        assert!(input.is_focused());
        assert!(!input.handle_event(&Event::Focus(true)));
        assert!(input.handle_event(&Event::Focus(false)));
        assert!(!input.is_focused());
        assert_eq!(*log.borrow(), vec!["focus", "blur"]);
    }

    #[test]
    fn test_blur_veto_keeps_focus() {
        let mut input = TextInput::new().with_focused(true).on_blur(|| true);
        assert!(!input.handle_event(&Event::Focus(false)));
        assert!(input.is_focused());
    }

    #[test]
    fn test_panicking_blur_counts_as_no_refocus() {
        let mut input = TextInput::new().with_focused(true).on_blur(|| panic!("nope"));
        assert!(input.blur());
        assert!(!input.is_focused());
    }

    #[test]
    fn test_click_maps_display_column() {
        let clicks = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&clicks);
        let mut input = TextInput::new()
            .with_template("$$$-$$$")
            .with_value("123456")
            .on_click(move || *counter.borrow_mut() += 1);
        let event = Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), 5, 0));
        assert!(input.handle_event(&event));
        assert_eq!(input.cursor(), 4);
        assert!(input.is_focused());
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_composition_lifecycle() {
        let mut input = TextInput::new().with_value("ab").with_focused(true);
        input.handle_event(&Event::Composition(CompositionEvent::Start));
        assert_eq!(input.composition_index(), Some(2));
        input.handle_event(&Event::Composition(CompositionEvent::Update("k".into())));
        input.handle_event(&Event::Composition(CompositionEvent::Update("ka".into())));
        assert_eq!(input.value(), "abka");
        let view = input.view(&Theme::default());
        let composing: Vec<bool> = view.cells.iter().map(|c| c.composing).collect();
        assert_eq!(composing, vec![false, false, true, true]);

        input.handle_event(&Event::Composition(CompositionEvent::End("か".into())));
        assert_eq!(input.value(), "abか");
        assert_eq!(input.composition_index(), None);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_view_placeholder_when_unfocused_and_empty() {
        let input = TextInput::new().with_placeholder("Name");
        let view = input.view(&Theme::default());
        assert!(view.shows_placeholder());
        assert_eq!(view.text(), "Name");
        assert!(view.cells.is_empty());
    }

    #[test]
    fn test_view_focused_empty_shows_caret_only() {
        let input = TextInput::new().with_placeholder("Name").with_focused(true);
        let view = input.view(&Theme::default());
        assert!(!view.shows_placeholder());
        assert!(view.cells.is_empty());
        assert_eq!(view.trailing_caret.as_deref(), Some("_"));
    }

    #[test]
    fn test_view_unfocused_value_has_no_caret() {
        let input = TextInput::new().with_value("hi");
        let view = input.view(&Theme::default());
        assert_eq!(view.text(), "hi");
        assert!(view.cells.iter().all(|c| !c.caret));
        assert!(view.trailing_caret.is_none());
    }

    #[test]
    fn test_view_password_masks_every_cell() {
        let input = TextInput::password().with_value("a b");
        let view = input.view(&Theme::default());
        assert_eq!(view.text(), "***");
        assert!(view.cells.iter().all(|c| c.key == "*"));
    }

    #[test]
    fn test_view_space_uses_space_glyph_key() {
        let mut input = TextInput::new().with_value("a b").with_focused(true);
        input.set_cursor(1);
        let view = input.view(&Theme::default());
        assert_eq!(view.cells[1].glyph, " ");
        assert_eq!(view.cells[1].key, "␣");
        assert!(view.cells[1].caret);
        assert!(view.trailing_caret.is_none());
    }

    #[test]
    fn test_view_template_caret_after_literal() {
        let mut input = TextInput::new()
            .with_template("$$$-$$$-$$$$")
            .with_value("123456")
            .with_focused(true);
        input.set_cursor(3);
        let view = input.view(&Theme::default());
        assert_eq!(view.text(), "123-456");
        assert_eq!(view.cursor, 4);
        assert!(view.cells[4].caret);
    }

    #[test]
    fn test_view_trailing_caret_at_end() {
        let input = TextInput::new()
            .with_template("$$$-$$$")
            .with_value("123")
            .with_focused(true);
        let view = input.view(&Theme::default());
        assert_eq!(view.text(), "123");
        assert_eq!(view.cursor, 4);
        assert_eq!(view.trailing_caret.as_deref(), Some("_"));
    }

    #[test]
    fn test_view_selection_in_display_space() {
        let mut input = TextInput::new()
            .with_template("$$-$$")
            .with_value("1234")
            .with_focused(true);
        input.select(1, 3);
        let view = input.view(&Theme::default());
        let selected: Vec<bool> = view.cells.iter().map(|c| c.selected).collect();
        // The separator between the two selected digits is selected too.
        assert_eq!(selected, vec![false, true, true, true, false]);
    }

    #[test]
    fn test_view_selection_stops_before_trailing_literal() {
        let mut input = TextInput::new()
            .with_template("$$$-$$$")
            .with_value("123456")
            .with_focused(true);
        input.select(0, 3);
        let view = input.view(&Theme::default());
        let selected: Vec<bool> = view.cells.iter().map(|c| c.selected).collect();
        assert_eq!(selected, vec![true, true, true, false, false, false, false]);
    }

    #[test]
    fn test_view_cell_widths() {
        let input = TextInput::new().with_value("a日");
        let view = input.view(&Theme::default());
        let widths: Vec<usize> = view.cells.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![1, 2]);
        assert_eq!(view.width(), 3);

        let input = TextInput::password().with_value("日本");
        assert_eq!(input.view(&Theme::default()).width(), 2);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut input = TextInput::new();
        let release = Event::Key(KeyEvent::new(KeyCode::Char('a')).with_kind(KeyEventKind::Release));
        assert!(!input.handle_event(&release));
        assert!(input.value().is_empty());
    }
}
