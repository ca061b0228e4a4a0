#![forbid(unsafe_code)]

//! Phone input: country select plus local number.

use std::fmt;

use xkit_core::event::{Event, KeyCode, KeyEventKind};
use xkit_core::invoke::invoke_optional;
use xkit_style::Theme;
use xkit_text::Template;
use xkit_widgets::{InputView, SelectInput, SelectView, TextInput};

use super::countries::{Country, CountryTable, longest_dial_prefix};

type ChangeCallback = Box<dyn FnMut(&str)>;

/// Which half of the phone input receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhonePart {
    /// The country select.
    Country,
    /// The local-number input.
    #[default]
    Number,
}

/// A phone-number input whose value is `dial_code + local`.
///
/// Tab / BackTab move focus between the country select and the number while
/// the input is focused.
pub struct PhoneInput {
    country: SelectInput<Country>,
    number: TextInput,
    active: PhonePart,
    focused: bool,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for PhoneInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneInput")
            .field("country", &self.country.selected_key())
            .field("number", &self.number.value())
            .field("active", &self.active)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Default for PhoneInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneInput {
    /// A phone input over the full embedded country table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(CountryTable::global())
    }

    /// A phone input over `table`.
    #[must_use]
    pub fn with_table(table: &CountryTable) -> Self {
        Self {
            country: country_select(table),
            number: TextInput::new(),
            active: PhonePart::Number,
            focused: false,
            on_change: None,
        }
    }

    // --- Builder methods ---

    /// Offer only these countries of the embedded table (any case; empty
    /// offers all of them).
    #[must_use]
    pub fn with_countries<S: AsRef<str>>(mut self, allow: &[S]) -> Self {
        let table = CountryTable::global().filtered(allow);
        self.country.set_options(table.to_options());
        self
    }

    /// Preselect a country by ISO code (no notification).
    #[must_use]
    pub fn with_default_country(mut self, code: &str) -> Self {
        self.country.set_default_option(Some(code.to_lowercase()));
        self
    }

    /// Display template for the local number.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<Template>) -> Self {
        self.number = std::mem::take(&mut self.number).with_template(template);
        self
    }

    /// Placeholder for the local number.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.number = std::mem::take(&mut self.number).with_placeholder(placeholder);
        self
    }

    /// Called with the composite value after every change.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    // --- Value access ---

    /// Composite value: selected dial code followed by the local number.
    #[must_use]
    pub fn value(&self) -> String {
        let dial = self.country().map_or("", |c| c.dial_code.as_str());
        format!("{dial}{}", self.number.value())
    }

    /// Selected country.
    #[must_use]
    pub fn country(&self) -> Option<&Country> {
        self.country.selected()
    }

    /// Local part of the number.
    #[must_use]
    pub fn local_number(&self) -> &str {
        self.number.value()
    }

    /// Part receiving keys.
    #[must_use]
    pub fn active_part(&self) -> PhonePart {
        self.active
    }

    /// Whether either part has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The country select.
    #[must_use]
    pub fn country_select(&self) -> &SelectInput<Country> {
        &self.country
    }

    /// Split a composite number: the country with the longest matching dial
    /// prefix is selected and the rest becomes the local number. Without a
    /// matching prefix the selection is kept and the whole text is local.
    ///
    /// A programmatic set does not fire `on_change`.
    pub fn set_value(&mut self, composite: &str) {
        let preferred = self.country.selected_key();
        let key = longest_dial_prefix(self.country.options(), composite, preferred)
            .map(str::to_string);
        let local = match key {
            Some(key) => {
                let dial_len = self
                    .country
                    .options()
                    .get(&key)
                    .map_or(0, |c| c.dial_code.len());
                self.country.set_default_option(Some(key));
                &composite[dial_len..]
            }
            None => composite,
        };
        self.number.set_value(local);
        self.number.set_cursor(usize::MAX);
    }

    /// Select a country by ISO code, firing `on_change` when the value changes.
    pub fn set_country(&mut self, code: &str) -> bool {
        let key = code.to_lowercase();
        if self.country.selected_key() == Some(key.as_str()) {
            return false;
        }
        if !self.country.options().contains_key(&key) {
            return false;
        }
        self.with_change_tracking(|phone| {
            phone.country.toggle_option(&key);
        });
        true
    }

    // --- Event handling ---

    /// Handle an input event.
    ///
    /// Returns `true` if the state changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.with_change_tracking(|phone| phone.route(event))
    }

    fn route(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key)
                if self.focused
                    && matches!(key.code, KeyCode::Tab | KeyCode::BackTab)
                    && key.kind != KeyEventKind::Release =>
            {
                let next = match self.active {
                    PhonePart::Country => PhonePart::Number,
                    PhonePart::Number => PhonePart::Country,
                };
                self.focus_part(next);
                true
            }
            Event::Focus(true) => {
                let changed = self.dispatch(event);
                self.focused = true;
                changed
            }
            Event::Focus(false) => {
                let changed = self.dispatch(event);
                self.focused = match self.active {
                    PhonePart::Country => self.country.is_focused(),
                    PhonePart::Number => self.number.is_focused(),
                };
                changed
            }
            _ => self.dispatch(event),
        }
    }

    /// Move focus to `part`.
    pub fn focus_part(&mut self, part: PhonePart) {
        if part == self.active && self.focused {
            return;
        }
        self.dispatch(&Event::Focus(false));
        self.active = part;
        self.dispatch(&Event::Focus(true));
        self.focused = true;
    }

    fn dispatch(&mut self, event: &Event) -> bool {
        match self.active {
            PhonePart::Country => self.country.handle_event(event),
            PhonePart::Number => self.number.handle_event(event),
        }
    }

    /// Run `f`, then reconcile a country change and fire `on_change` if the
    /// composite value moved.
    fn with_change_tracking<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let before_value = self.value();
        let before_dial = self.country().map(|c| c.dial_code.clone());
        let result = f(self);

        let after_dial = self.country().map(|c| c.dial_code.clone());
        if after_dial != before_dial
            && let Some(previous) = before_dial
            && let Some(local) = self.number.value().strip_prefix(previous.as_str())
        {
            let local = local.to_string();
            self.number.set_value(local);
        }

        let after_value = self.value();
        if after_value != before_value {
            invoke_optional("on_change", self.on_change.as_deref_mut(), |cb| {
                cb(&after_value)
            });
        }
        result
    }

    // --- View ---

    /// Describe what to draw.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> PhoneView {
        PhoneView {
            country: self.country.view(theme),
            number: self.number.view(theme),
            value: self.value(),
            active: self.active,
        }
    }
}

fn country_select(table: &CountryTable) -> SelectInput<Country> {
    SelectInput::new(table.to_options())
        .with_short_format(|c: &Country| c.dial_code.clone())
        .with_matcher(|c: &Country, search: &str| {
            let search = search.to_lowercase();
            c.code.to_lowercase().contains(&search)
                || c.name.to_lowercase().contains(&search)
                || c.dial_code.contains(&search)
        })
}

/// Renderer-agnostic description of a [`PhoneInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneView {
    /// Country select.
    pub country: SelectView,
    /// Local number.
    pub number: InputView,
    /// Composite value.
    pub value: String,
    /// Part receiving keys.
    pub active: PhonePart,
}
