#![forbid(unsafe_code)]

//! Dynamically typed values checked by a [`Validator`](super::Validator).

use std::fmt;

/// The primitive kind a validator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Text.
    String,
    /// Floating-point number.
    Number,
    /// `true` / `false`.
    Boolean,
}

impl PrimitiveKind {
    /// Lowercase name, as used in the `${type}` placeholder.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value to validate. Absence is modelled as `Option::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Text.
    Str(&'a str),
    /// Number.
    Number(f64),
    /// Boolean.
    Bool(bool),
}

impl<'a> Value<'a> {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Str(_) => PrimitiveKind::String,
            Self::Number(_) => PrimitiveKind::Number,
            Self::Bool(_) => PrimitiveKind::Boolean,
        }
    }

    /// Interpret raw field text as `kind`.
    ///
    /// Numbers parse as `f64` after trimming; booleans accept `true`/`false`
    /// in any case. Text that does not parse stays a string, so a validator
    /// expecting another kind reports a type mismatch.
    #[must_use]
    pub fn coerce(raw: &'a str, kind: PrimitiveKind) -> Self {
        let trimmed = raw.trim();
        match kind {
            PrimitiveKind::String => Self::Str(raw),
            PrimitiveKind::Number => trimmed
                .parse::<f64>()
                .map_or(Self::Str(raw), Self::Number),
            PrimitiveKind::Boolean => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Self::Bool(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Self::Bool(false)
                } else {
                    Self::Str(raw)
                }
            }
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
