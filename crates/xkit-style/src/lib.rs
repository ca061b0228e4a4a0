#![forbid(unsafe_code)]

//! Style primitives for xkit.
//!
//! - [`ThemeColor`] - a CSS-like color value (`currentColor`, `#rrggbb`, ...)
//! - [`Theme`] - per-component style lookup with a global fallback
//! - [`merge_json`] - depth-limited deep merge for layered theme files (feature `serde`)

pub mod color;
#[cfg(feature = "serde")]
pub mod merge;
pub mod theme;

pub use color::{ColorParseError, Rgb, ThemeColor};
#[cfg(feature = "serde")]
pub use merge::{DEFAULT_MERGE_DEPTH, merge_json};
pub use theme::{
    CARET_ENV, ComponentKind, ComponentTheme, ResolvedStyle, SPACE_GLYPH_ENV, Theme, ThemeBuilder,
};
#[cfg(feature = "serde")]
pub use theme::ThemeLoadError;
