#![forbid(unsafe_code)]

//! Dropdown / search-select widget.
//!
//! [`SelectInput`] pairs a search [`TextInput`] with an option list. Typing
//! filters the options through a match predicate; Up/Down move a highlight,
//! Enter toggles the highlighted option. At most one option is selected and
//! choosing the selected option again clears the selection.
//!
//! Options are identified by a stable string key, so selection survives
//! re-filtering and does not depend on `T: PartialEq`.

use std::collections::BTreeMap;
use std::fmt;

use xkit_core::best_effort;
use xkit_core::event::{Event, KeyCode, KeyEventKind};
use xkit_core::invoke::invoke_optional;
use xkit_style::Theme;

use crate::input::{InputView, TextInput};

type Formatter<T> = Box<dyn Fn(&T) -> String>;
type Matcher<T> = Box<dyn Fn(&T, &str) -> bool>;
type SelectedCallback<T> = Box<dyn FnMut(Option<&T>)>;
type SearchCallback = Box<dyn FnMut(&str)>;

// ---------------------------------------------------------------------------
// OptionCollection
// ---------------------------------------------------------------------------

/// The candidates a select offers, each with a stable key.
///
/// Keys should be unique; lookups return the first entry with a given key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCollection<T> {
    entries: Vec<(String, T)>,
}

impl<T> OptionCollection<T> {
    /// An ordered collection keyed by `key`.
    pub fn ordered(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> String) -> Self {
        Self {
            entries: items.into_iter().map(|item| (key(&item), item)).collect(),
        }
    }

    /// A keyed collection, iterated in key order.
    #[must_use]
    pub fn keyed(map: BTreeMap<String, T>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Option with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// True when an option has `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `(key, option)` pairs in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T> Default for OptionCollection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: fmt::Display> FromIterator<T> for OptionCollection<T> {
    /// Keys are the options' `Display` text.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::ordered(iter, ToString::to_string)
    }
}

impl<T> From<BTreeMap<String, T>> for OptionCollection<T> {
    fn from(map: BTreeMap<String, T>) -> Self {
        Self::keyed(map)
    }
}

// ---------------------------------------------------------------------------
// SelectInput
// ---------------------------------------------------------------------------

/// A search box over an option list with single, toggling selection.
pub struct SelectInput<T> {
    options: OptionCollection<T>,
    search: TextInput,
    placeholder: String,
    selected: Option<String>,
    /// Index into the filtered list.
    highlighted: usize,
    open: bool,
    focused: bool,
    short_format: Formatter<T>,
    long_format: Formatter<T>,
    matcher: Option<Matcher<T>>,
    on_option_selected: Option<SelectedCallback<T>>,
    on_search_changed: Option<SearchCallback>,
}

impl<T> fmt::Debug for SelectInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectInput")
            .field("options", &self.options.len())
            .field("search", &self.search.value())
            .field("selected", &self.selected)
            .field("highlighted", &self.highlighted)
            .field("open", &self.open)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Display + 'static> SelectInput<T> {
    /// A select whose short and long formats are the options' `Display` text.
    #[must_use]
    pub fn new(options: OptionCollection<T>) -> Self {
        Self {
            options,
            search: TextInput::new(),
            placeholder: String::new(),
            selected: None,
            highlighted: 0,
            open: false,
            focused: false,
            short_format: Box::new(|option: &T| option.to_string()),
            long_format: Box::new(|option: &T| option.to_string()),
            matcher: None,
            on_option_selected: None,
            on_search_changed: None,
        }
    }
}

impl<T> SelectInput<T> {
    // --- Builder methods ---

    /// Format shown in the input while unfocused.
    #[must_use]
    pub fn with_short_format(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.short_format = Box::new(f);
        self
    }

    /// Format shown in the option rows.
    #[must_use]
    pub fn with_long_format(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.long_format = Box::new(f);
        self
    }

    /// Match predicate `(option, search) -> bool`.
    ///
    /// The default is a case-insensitive substring test on the short format.
    #[must_use]
    pub fn with_matcher(mut self, f: impl Fn(&T, &str) -> bool + 'static) -> Self {
        self.matcher = Some(Box::new(f));
        self
    }

    /// Placeholder for the empty, unfocused input.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self.search = std::mem::take(&mut self.search).with_placeholder(self.placeholder.clone());
        self
    }

    /// Preselect the option with `key` (no notification).
    #[must_use]
    pub fn with_default_option(mut self, key: impl Into<String>) -> Self {
        self.set_default_option(Some(key.into()));
        self
    }

    /// Called with the new selection (or `None`) after every change.
    #[must_use]
    pub fn on_option_selected(mut self, f: impl FnMut(Option<&T>) + 'static) -> Self {
        self.on_option_selected = Some(Box::new(f));
        self
    }

    /// Called with the search text after every edit.
    #[must_use]
    pub fn on_search_changed(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_search_changed = Some(Box::new(f));
        self
    }

    // --- Accessors ---

    /// All options.
    #[must_use]
    pub fn options(&self) -> &OptionCollection<T> {
        &self.options
    }

    /// Replace the options. A selection whose key disappeared is dropped.
    pub fn set_options(&mut self, options: OptionCollection<T>) {
        self.options = options;
        if let Some(key) = &self.selected
            && !self.options.contains_key(key)
        {
            self.selected = None;
        }
        self.highlighted = 0;
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.value()
    }

    /// Replace the search text, firing `on_search_changed` if it changed.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search.value() {
            self.search.set_value(text);
            self.search.set_cursor(usize::MAX);
            self.search_changed();
        }
    }

    /// The selected option.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_deref().and_then(|key| self.options.get(key))
    }

    /// Key of the selected option.
    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Set the selection without notifying; an unknown key clears it.
    pub fn set_default_option(&mut self, key: Option<String>) {
        self.selected = key.filter(|k| self.options.contains_key(k));
    }

    /// Whether the option list is shown.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the search input has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Index of the highlighted row in [`filtered`](Self::filtered).
    #[must_use]
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Text the input shows: the search while focused, otherwise the short
    /// format of the selection (empty when nothing is selected).
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.focused {
            return self.search.value().to_string();
        }
        self.selected()
            .map(|option| self.format_short(option))
            .unwrap_or_default()
    }

    /// Short format of `option`. A panicking formatter yields `""`.
    #[must_use]
    pub fn format_short(&self, option: &T) -> String {
        best_effort("option_display_formatter", || (self.short_format)(option)).unwrap_or_default()
    }

    /// Long format of `option`. A panicking formatter yields `""`.
    #[must_use]
    pub fn format_long(&self, option: &T) -> String {
        best_effort("option_formatter", || (self.long_format)(option)).unwrap_or_default()
    }

    // --- Matching ---

    /// Whether `option` matches `search`. A panicking predicate is a miss.
    #[must_use]
    pub fn matches(&self, option: &T, search: &str) -> bool {
        best_effort("option_match_strategy", || match &self.matcher {
            Some(matcher) => matcher(option, search),
            None => (self.short_format)(option)
                .to_lowercase()
                .contains(&search.to_lowercase()),
        })
        .unwrap_or(false)
    }

    /// Options matching the current search, in collection order.
    #[must_use]
    pub fn filtered(&self) -> Vec<(&str, &T)> {
        let search = self.search.value();
        self.options
            .iter()
            .filter(|(_, option)| self.matches(option, search))
            .collect()
    }

    /// Text shown when nothing matches the search.
    #[must_use]
    pub fn empty_message(&self) -> Option<String> {
        self.filtered()
            .is_empty()
            .then(|| format!("No option matched \"{}\"", self.search.value()))
    }

    // --- Selection ---

    /// Toggle the option with `key`: select it, or clear the selection if it
    /// is already selected. Fires `on_option_selected`. Unknown keys are ignored.
    pub fn toggle_option(&mut self, key: &str) -> bool {
        if !self.options.contains_key(key) {
            return false;
        }
        self.selected = if self.selected.as_deref() == Some(key) {
            None
        } else {
            Some(key.to_string())
        };
        let option = self.selected.as_deref().and_then(|k| self.options.get(k));
        invoke_optional(
            "on_option_selected",
            self.on_option_selected.as_deref_mut(),
            |cb| cb(option),
        );
        true
    }

    /// Toggle the `index`-th row of the filtered list (a pointer click on a row).
    pub fn click_option(&mut self, index: usize) -> bool {
        let key = self
            .filtered()
            .get(index)
            .map(|(key, _)| (*key).to_string());
        match key {
            Some(key) => {
                self.highlighted = index;
                self.toggle_option(&key)
            }
            None => false,
        }
    }

    // --- Event handling ---

    /// Handle an input event.
    ///
    /// Returns `true` if the state changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event
            && self.focused
            && (key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat)
        {
            match key.code {
                KeyCode::Up => return self.move_highlight(false),
                KeyCode::Down => return self.move_highlight(true),
                KeyCode::Enter => return self.click_option(self.highlighted),
                KeyCode::Escape => {
                    let was_open = self.open;
                    self.open = false;
                    return was_open;
                }
                _ => {}
            }
        }
        self.forward(event)
    }

    fn forward(&mut self, event: &Event) -> bool {
        let before = self.search.value().to_string();
        let handled = self.search.handle_event(event);
        if self.search.value() != before {
            self.search_changed();
        }
        self.sync_focus();
        handled
    }

    fn search_changed(&mut self) {
        self.highlighted = 0;
        if self.focused {
            self.open = true;
        }
        let search = self.search.value();
        invoke_optional(
            "on_search_changed",
            self.on_search_changed.as_deref_mut(),
            |cb| cb(search),
        );
    }

    fn sync_focus(&mut self) {
        let focused = self.search.is_focused();
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        self.open = focused;
        if focused {
            self.highlighted = self
                .selected
                .as_deref()
                .and_then(|key| self.filtered().iter().position(|(k, _)| *k == key))
                .unwrap_or(0);
        }
    }

    fn move_highlight(&mut self, down: bool) -> bool {
        let len = self.filtered().len();
        if len == 0 {
            return false;
        }
        self.open = true;
        let current = self.highlighted.min(len - 1);
        self.highlighted = if down {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        true
    }

    // --- View ---

    /// Describe what to draw.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> SelectView {
        let input = if self.focused {
            self.search.view(theme)
        } else {
            InputView::static_text(&self.display_value(), &self.placeholder)
        };
        let rows: Vec<OptionRow> = self
            .filtered()
            .into_iter()
            .enumerate()
            .map(|(idx, (key, option))| OptionRow {
                key: key.to_string(),
                label: self.format_long(option),
                selected: self.selected.as_deref() == Some(key),
                highlighted: self.open && idx == self.highlighted,
            })
            .collect();
        let empty_message = rows
            .is_empty()
            .then(|| format!("No option matched \"{}\"", self.search.value()));
        SelectView {
            input,
            open: self.open,
            rows,
            empty_message,
        }
    }
}

/// One option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    /// Option key.
    pub key: String,
    /// Long format.
    pub label: String,
    /// This option is selected.
    pub selected: bool,
    /// Keyboard highlight.
    pub highlighted: bool,
}

/// Renderer-agnostic description of a [`SelectInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectView {
    /// The input line.
    pub input: InputView,
    /// Whether the option list is shown.
    pub open: bool,
    /// Matching options.
    pub rows: Vec<OptionRow>,
    /// Shown instead of rows when nothing matches.
    pub empty_message: Option<String>,
}
