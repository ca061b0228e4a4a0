#![forbid(unsafe_code)]

//! xkit public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a prelude
//! for day-to-day usage.
//!
//! ```rust
//! use xkit::prelude::*;
//!
//! let form = Form::from_stages(vec![
//!     StageSpec::new().field("name", FieldSpec::text().required()),
//! ])?;
//! let mut state = FormState::new(form);
//! state.update_field("name", "Ada")?;
//! assert!(state.submit());
//! # Ok::<(), xkit::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use xkit_core::event::{
    CompositionEvent, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent,
    MouseEventKind, PasteEvent,
};
pub use xkit_core::invoke::{CallbackFailure, best_effort, try_invoke};

// --- Style re-exports ------------------------------------------------------

pub use xkit_style::{
    ColorParseError, ComponentKind, ComponentTheme, ResolvedStyle, Rgb, Theme, ThemeBuilder,
    ThemeColor,
};

// --- Text re-exports -------------------------------------------------------

pub use xkit_text::{
    Template, display_cursor_to_raw_cursor, format_value, raw_cursor_to_display_cursor,
    value_by_template,
};

// --- Widget re-exports -----------------------------------------------------

pub use xkit_widgets::{
    InputCell, InputKind, InputView, OptionCollection, OptionRow, SelectInput, SelectView,
    TextInput,
};

// --- Extras re-exports -----------------------------------------------------

#[cfg(feature = "extras")]
pub use xkit_extras::forms::{
    FieldErrors, FieldKind, FieldSpec, Form, FormError, FormState, StageSpec,
};
#[cfg(feature = "extras")]
pub use xkit_extras::phone::{Country, CountryTable, CountryTableError, PhoneInput, PhoneView};
#[cfg(feature = "extras")]
pub use xkit_extras::validation::{PrimitiveKind, Validator, ValidatorError, ValidatorMessages, Value};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for xkit.
#[derive(Debug)]
pub enum Error {
    /// A theme color string did not parse.
    Color(ColorParseError),
    /// A theme layer was not valid JSON for a theme.
    #[cfg(feature = "serde")]
    Theme(xkit_style::ThemeLoadError),
    /// A validator could not be built.
    #[cfg(feature = "extras")]
    Validator(ValidatorError),
    /// A form definition or operation was invalid.
    #[cfg(feature = "extras")]
    Form(FormError),
    /// The country table failed to load.
    #[cfg(feature = "extras")]
    Countries(CountryTableError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(err) => write!(f, "{err}"),
            #[cfg(feature = "serde")]
            Self::Theme(err) => write!(f, "{err}"),
            #[cfg(feature = "extras")]
            Self::Validator(err) => write!(f, "{err}"),
            #[cfg(feature = "extras")]
            Self::Form(err) => write!(f, "{err}"),
            #[cfg(feature = "extras")]
            Self::Countries(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Color(err) => Some(err),
            #[cfg(feature = "serde")]
            Self::Theme(err) => Some(err),
            #[cfg(feature = "extras")]
            Self::Validator(err) => Some(err),
            #[cfg(feature = "extras")]
            Self::Form(err) => Some(err),
            #[cfg(feature = "extras")]
            Self::Countries(err) => Some(err),
        }
    }
}

impl From<ColorParseError> for Error {
    fn from(err: ColorParseError) -> Self {
        Self::Color(err)
    }
}

#[cfg(feature = "serde")]
impl From<xkit_style::ThemeLoadError> for Error {
    fn from(err: xkit_style::ThemeLoadError) -> Self {
        Self::Theme(err)
    }
}

#[cfg(feature = "extras")]
impl From<ValidatorError> for Error {
    fn from(err: ValidatorError) -> Self {
        Self::Validator(err)
    }
}

#[cfg(feature = "extras")]
impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

#[cfg(feature = "extras")]
impl From<CountryTableError> for Error {
    fn from(err: CountryTableError) -> Self {
        Self::Countries(err)
    }
}

/// Standard result type for xkit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Event, InputKind, InputView, KeyCode, OptionCollection, Result, SelectInput,
        SelectView, Template, TextInput, Theme,
    };

    #[cfg(feature = "extras")]
    pub use crate::{
        FieldSpec, Form, FormState, PhoneInput, StageSpec, Validator, ValidatorMessages, Value,
    };

    pub use crate::{core, style, text, widgets};
    #[cfg(feature = "extras")]
    pub use crate::extras;
}

pub use xkit_core as core;
#[cfg(feature = "extras")]
pub use xkit_extras as extras;
pub use xkit_style as style;
pub use xkit_text as text;
pub use xkit_widgets as widgets;
