#![forbid(unsafe_code)]

//! Input widgets for xkit.
//!
//! Widgets own their editing state, consume [`xkit_core::event::Event`]s and
//! describe what to draw as plain view models ([`InputView`], [`SelectView`]).
//! They never draw anything themselves; a host maps the view onto its own
//! surface (terminal cells, DOM spans, test assertions).
//!
//! Callbacks installed on a widget run through
//! [`xkit_core::invoke::invoke_optional`]: a panicking callback is logged and
//! swallowed, and the widget keeps working.

pub mod input;
pub mod select;

pub use input::{InputCell, InputKind, InputView, TextInput};
pub use select::{OptionCollection, OptionRow, SelectInput, SelectView};
