#![forbid(unsafe_code)]

//! Color values used by themes.
//!
//! Themes describe colors the way a stylesheet would: either "inherit the
//! surrounding text color" or an explicit hex value. Parsing accepts
//! `currentColor` (case-insensitive), `#rgb`, `#rrggbb` and `#rrggbbaa`.

use std::fmt;
use std::str::FromStr;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A themeable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum ThemeColor {
    /// Inherit the host's current foreground color.
    #[default]
    CurrentColor,
    /// Opaque color.
    Rgb(Rgb),
    /// Color with alpha (0 = transparent).
    Rgba(Rgb, u8),
}

impl ThemeColor {
    /// Opaque color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// The explicit RGB value, or `None` for `currentColor`.
    #[must_use]
    pub const fn as_rgb(&self) -> Option<Rgb> {
        match self {
            Self::CurrentColor => None,
            Self::Rgb(rgb) | Self::Rgba(rgb, _) => Some(*rgb),
        }
    }

    /// Alpha channel; opaque colors and `currentColor` report 255.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        match self {
            Self::Rgba(_, a) => *a,
            _ => 255,
        }
    }
}

/// Error from parsing a [`ThemeColor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl ColorParseError {
    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for ThemeColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("currentcolor") {
            return Ok(Self::CurrentColor);
        }
        trimmed
            .strip_prefix('#')
            .and_then(parse_hex)
            .ok_or_else(|| ColorParseError {
                input: s.to_string(),
            })
    }
}

fn parse_hex(hex: &str) -> Option<ThemeColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(ThemeColor::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(ThemeColor::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(ThemeColor::Rgba(
            Rgb::new(byte(0)?, byte(2)?, byte(4)?),
            byte(6)?,
        )),
        _ => None,
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentColor => f.write_str("currentColor"),
            Self::Rgb(c) => write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
            Self::Rgba(c, a) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, a),
        }
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ThemeColor> for String {
    fn from(color: ThemeColor) -> Self {
        color.to_string()
    }
}

impl From<Rgb> for ThemeColor {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}
