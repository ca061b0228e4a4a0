#![forbid(unsafe_code)]

//! Per-component theme lookup.
//!
//! A [`Theme`] holds a partial [`ComponentTheme`] for every [`ComponentKind`]
//! plus a `global` section. Looking up a value for a component checks that
//! component's section first, then `global`, then the built-in default.
//! Widgets only ever read a theme; they never modify it.
//!
//! # Example
//! ```
//! use xkit_style::{ComponentKind, ComponentTheme, Theme, ThemeColor};
//!
//! let theme = Theme::builder()
//!     .global(ComponentTheme::new().with_color(ThemeColor::rgb(200, 200, 200)))
//!     .component(ComponentKind::Input, ComponentTheme::new().with_caret("|"))
//!     .build();
//!
//! assert_eq!(theme.caret(ComponentKind::Input), "|");
//! assert_eq!(theme.color(ComponentKind::Button), ThemeColor::rgb(200, 200, 200));
//! ```

use std::env;

use crate::color::ThemeColor;

/// Environment variable overriding the input caret glyph.
pub const CARET_ENV: &str = "XKIT_CARET";

/// Environment variable overriding the glyph shown for spaces.
pub const SPACE_GLYPH_ENV: &str = "XKIT_SPACE_GLYPH";

const FALLBACK_CARET: &str = "_";
const FALLBACK_SPACE: &str = "␣";
const FALLBACK_PADDING: &str = "0";
const FALLBACK_WIDTH: &str = "auto";
const FALLBACK_RADIUS: &str = "0";
const FALLBACK_PASSWORD: char = '*';

/// Components that read the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Text, password, search and phone inputs.
    Input,
    /// Buttons.
    Button,
}

/// Style primitives for one component. Unset values fall back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ComponentTheme {
    /// Glyph drawn for the caret past the end of the text.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub caret: Option<String>,
    /// Caret color.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub caret_color: Option<ThemeColor>,
    /// Glyph drawn in place of a space under the caret.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub space: Option<String>,
    /// Padding, in the host's units.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub padding: Option<String>,
    /// Text color.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<ThemeColor>,
    /// Width when the host gives no constraint.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub default_width: Option<String>,
    /// Border color.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub border_color: Option<ThemeColor>,
    /// Border radius, in the host's units.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub border_radius: Option<String>,
    /// Glyph replacing every character of a password.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub password_glyph: Option<char>,
}

impl ComponentTheme {
    /// An empty section (everything falls back).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the caret glyph.
    #[must_use]
    pub fn with_caret(mut self, caret: impl Into<String>) -> Self {
        self.caret = Some(caret.into());
        self
    }

    /// Set the caret color.
    #[must_use]
    pub fn with_caret_color(mut self, color: ThemeColor) -> Self {
        self.caret_color = Some(color);
        self
    }

    /// Set the space glyph.
    #[must_use]
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    /// Set the text color.
    #[must_use]
    pub fn with_color(mut self, color: ThemeColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the default width.
    #[must_use]
    pub fn with_default_width(mut self, width: impl Into<String>) -> Self {
        self.default_width = Some(width.into());
        self
    }

    /// Set the border color.
    #[must_use]
    pub fn with_border_color(mut self, color: ThemeColor) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Set the border radius.
    #[must_use]
    pub fn with_border_radius(mut self, radius: impl Into<String>) -> Self {
        self.border_radius = Some(radius.into());
        self
    }

    /// Set the password glyph.
    #[must_use]
    pub fn with_password_glyph(mut self, glyph: char) -> Self {
        self.password_glyph = Some(glyph);
        self
    }

    /// Field-wise overlay: values set in `other` win.
    #[must_use]
    pub fn overlaid(&self, other: &Self) -> Self {
        Self {
            caret: other.caret.clone().or_else(|| self.caret.clone()),
            caret_color: other.caret_color.or(self.caret_color),
            space: other.space.clone().or_else(|| self.space.clone()),
            padding: other.padding.clone().or_else(|| self.padding.clone()),
            color: other.color.or(self.color),
            default_width: other
                .default_width
                .clone()
                .or_else(|| self.default_width.clone()),
            border_color: other.border_color.or(self.border_color),
            border_radius: other
                .border_radius
                .clone()
                .or_else(|| self.border_radius.clone()),
            password_glyph: other.password_glyph.or(self.password_glyph),
        }
    }
}

/// A component's style with every fallback applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Caret glyph.
    pub caret: String,
    /// Caret color.
    pub caret_color: ThemeColor,
    /// Space glyph.
    pub space: String,
    /// Padding.
    pub padding: String,
    /// Text color.
    pub color: ThemeColor,
    /// Default width.
    pub default_width: String,
    /// Border color.
    pub border_color: ThemeColor,
    /// Border radius.
    pub border_radius: String,
    /// Password glyph.
    pub password_glyph: char,
}

/// Theme lookup keyed by component with a global fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Theme {
    /// Input section.
    pub input: ComponentTheme,
    /// Button section.
    pub button: ComponentTheme,
    /// Applies to every component lacking its own value.
    pub global: ComponentTheme,
}

impl Default for Theme {
    /// The stock theme: rounded inputs with an underscore caret that inherit
    /// the surrounding text color.
    fn default() -> Self {
        Self {
            input: ComponentTheme::new()
                .with_border_radius(".5em")
                .with_caret("_")
                .with_space("␣")
                .with_default_width("15em")
                .with_padding(".7em .7em")
                .with_color(ThemeColor::CurrentColor)
                .with_border_color(ThemeColor::CurrentColor)
                .with_caret_color(ThemeColor::CurrentColor),
            button: ComponentTheme::new(),
            global: ComponentTheme::new(),
        }
    }
}

impl Theme {
    /// Create a new theme builder starting from the stock theme.
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    /// A theme with nothing set; every lookup yields the built-in fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            input: ComponentTheme::new(),
            button: ComponentTheme::new(),
            global: ComponentTheme::new(),
        }
    }

    /// The raw section for `kind`.
    #[must_use]
    pub fn section(&self, kind: ComponentKind) -> &ComponentTheme {
        match kind {
            ComponentKind::Input => &self.input,
            ComponentKind::Button => &self.button,
        }
    }

    fn section_mut(&mut self, kind: ComponentKind) -> &mut ComponentTheme {
        match kind {
            ComponentKind::Input => &mut self.input,
            ComponentKind::Button => &mut self.button,
        }
    }

    /// Caret glyph for `kind`.
    #[must_use]
    pub fn caret(&self, kind: ComponentKind) -> &str {
        self.lookup_str(kind, |s| s.caret.as_deref(), FALLBACK_CARET)
    }

    /// Space glyph for `kind`.
    #[must_use]
    pub fn space(&self, kind: ComponentKind) -> &str {
        self.lookup_str(kind, |s| s.space.as_deref(), FALLBACK_SPACE)
    }

    /// Padding for `kind`.
    #[must_use]
    pub fn padding(&self, kind: ComponentKind) -> &str {
        self.lookup_str(kind, |s| s.padding.as_deref(), FALLBACK_PADDING)
    }

    /// Default width for `kind`.
    #[must_use]
    pub fn default_width(&self, kind: ComponentKind) -> &str {
        self.lookup_str(kind, |s| s.default_width.as_deref(), FALLBACK_WIDTH)
    }

    /// Border radius for `kind`.
    #[must_use]
    pub fn border_radius(&self, kind: ComponentKind) -> &str {
        self.lookup_str(kind, |s| s.border_radius.as_deref(), FALLBACK_RADIUS)
    }

    /// Text color for `kind`.
    #[must_use]
    pub fn color(&self, kind: ComponentKind) -> ThemeColor {
        self.lookup(kind, |s| s.color).unwrap_or_default()
    }

    /// Caret color for `kind`.
    #[must_use]
    pub fn caret_color(&self, kind: ComponentKind) -> ThemeColor {
        self.lookup(kind, |s| s.caret_color).unwrap_or_default()
    }

    /// Border color for `kind`.
    #[must_use]
    pub fn border_color(&self, kind: ComponentKind) -> ThemeColor {
        self.lookup(kind, |s| s.border_color).unwrap_or_default()
    }

    /// Password glyph for `kind`.
    #[must_use]
    pub fn password_glyph(&self, kind: ComponentKind) -> char {
        self.lookup(kind, |s| s.password_glyph)
            .unwrap_or(FALLBACK_PASSWORD)
    }

    /// Every value for `kind` with fallbacks applied.
    #[must_use]
    pub fn resolve(&self, kind: ComponentKind) -> ResolvedStyle {
        ResolvedStyle {
            caret: self.caret(kind).to_string(),
            caret_color: self.caret_color(kind),
            space: self.space(kind).to_string(),
            padding: self.padding(kind).to_string(),
            color: self.color(kind),
            default_width: self.default_width(kind).to_string(),
            border_color: self.border_color(kind),
            border_radius: self.border_radius(kind).to_string(),
            password_glyph: self.password_glyph(kind),
        }
    }

    /// A new theme with `overrides` laid over this one, section by section.
    #[must_use]
    pub fn merged(&self, overrides: &Theme) -> Theme {
        Theme {
            input: self.input.overlaid(&overrides.input),
            button: self.button.overlaid(&overrides.button),
            global: self.global.overlaid(&overrides.global),
        }
    }

    /// Apply `XKIT_CARET` / `XKIT_SPACE_GLYPH` to the input section.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(caret) = non_empty(CARET_ENV) {
            self.input.caret = Some(caret);
        }
        if let Some(space) = non_empty(SPACE_GLYPH_ENV) {
            self.input.space = Some(space);
        }
        self
    }

    fn lookup<T>(&self, kind: ComponentKind, get: impl Fn(&ComponentTheme) -> Option<T>) -> Option<T> {
        get(self.section(kind)).or_else(|| get(&self.global))
    }

    fn lookup_str<'a>(
        &'a self,
        kind: ComponentKind,
        get: impl Fn(&'a ComponentTheme) -> Option<&'a str>,
        fallback: &'static str,
    ) -> &'a str {
        get(self.section(kind))
            .or_else(|| get(&self.global))
            .unwrap_or(fallback)
    }
}

#[cfg(feature = "serde")]
mod load {
    use std::fmt;

    use super::Theme;
    use crate::merge::{DEFAULT_MERGE_DEPTH, merge_json};

    /// Failure loading a theme from JSON.
    #[derive(Debug)]
    pub struct ThemeLoadError {
        layer: usize,
        source: serde_json::Error,
    }

    impl ThemeLoadError {
        /// Index of the layer that failed (0 = first).
        #[must_use]
        pub fn layer(&self) -> usize {
            self.layer
        }
    }

    impl fmt::Display for ThemeLoadError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "theme layer {}: {}", self.layer, self.source)
        }
    }

    impl std::error::Error for ThemeLoadError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.source)
        }
    }

    impl Theme {
        /// Parse a theme document. Missing keys keep the stock values.
        ///
        /// # Errors
        /// Malformed JSON, unknown color syntax or wrongly typed values.
        pub fn from_json(json: &str) -> Result<Self, ThemeLoadError> {
            Self::from_json_layers(&[json])
        }

        /// Deep-merge several theme documents over the stock theme, later
        /// layers winning.
        ///
        /// # Errors
        /// The first layer that is not valid JSON, or a merged document
        /// that does not describe a theme (reported as the last layer).
        pub fn from_json_layers(layers: &[&str]) -> Result<Self, ThemeLoadError> {
            let base = serde_json::to_value(Theme::default()).map_err(|source| ThemeLoadError {
                layer: 0,
                source,
            })?;
            let mut merged = base;
            for (layer, text) in layers.iter().enumerate() {
                let value: serde_json::Value = serde_json::from_str(text)
                    .map_err(|source| ThemeLoadError { layer, source })?;
                merged = merge_json(&merged, &value, DEFAULT_MERGE_DEPTH);
            }
            serde_json::from_value(merged).map_err(|source| ThemeLoadError {
                layer: layers.len().saturating_sub(1),
                source,
            })
        }
    }
}

#[cfg(feature = "serde")]
pub use load::ThemeLoadError;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Theme`], starting from the stock theme.
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    /// Start from [`Theme::default`].
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
        }
    }

    /// Start from an existing theme.
    pub fn from_theme(theme: Theme) -> Self {
        Self { theme }
    }

    /// Overlay values onto a component section.
    #[must_use]
    pub fn component(mut self, kind: ComponentKind, section: ComponentTheme) -> Self {
        let slot = self.theme.section_mut(kind);
        *slot = slot.overlaid(&section);
        self
    }

    /// Overlay values onto the global section.
    #[must_use]
    pub fn global(mut self, section: ComponentTheme) -> Self {
        self.theme.global = self.theme.global.overlaid(&section);
        self
    }

    /// Replace a component section entirely (clearing stock values).
    #[must_use]
    pub fn replace_component(mut self, kind: ComponentKind, section: ComponentTheme) -> Self {
        *self.theme.section_mut(kind) = section;
        self
    }

    /// Build the theme.
    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
