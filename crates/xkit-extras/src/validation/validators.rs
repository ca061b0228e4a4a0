#![forbid(unsafe_code)]

//! The [`Validator`] builder and its result types.

use std::collections::BTreeMap;
use std::fmt;

use regex::{Regex, RegexBuilder};

use super::value::{PrimitiveKind, Value};

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// A required value was absent or empty.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// The value had the wrong primitive kind.
pub const ERROR_CODE_TYPE: &str = "type";
/// Below the minimum (length or value).
pub const ERROR_CODE_MIN: &str = "min";
/// Above the maximum (length or value).
pub const ERROR_CODE_MAX: &str = "max";
/// The pattern did not match.
pub const ERROR_CODE_PATTERN: &str = "regex";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Replace `${name}` placeholders with values from `params`.
///
/// Placeholders whose name is not in `params` are left verbatim, as is a
/// `${` with no closing brace.
///
/// ```rust
/// use xkit_extras::validation::compile_message;
///
/// let msg = compile_message("at least ${min}, see ${docs}", &[("min", "3".to_string())]);
/// assert_eq!(msg, "at least 3, see ${docs}");
/// ```
#[must_use]
pub fn compile_message(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Message templates used by a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorMessages {
    /// Missing or empty required value.
    pub required: String,
    /// Wrong kind; `${type}` is the expected kind.
    pub type_mismatch: String,
    /// Below minimum; `${min}`.
    pub min: String,
    /// Above maximum; `${max}`.
    pub max: String,
    /// Pattern mismatch; `${regex}` renders as `/source/flags`.
    pub regex: String,
}

impl Default for ValidatorMessages {
    fn default() -> Self {
        Self {
            required: "Required value is missing".into(),
            type_mismatch: "Value must be ${type}".into(),
            min: "Value must be larger or equal than ${min}".into(),
            max: "Value must less or equal than ${max}".into(),
            regex: "Value must be match pattern ${regex}".into(),
        }
    }
}

impl ValidatorMessages {
    /// Override the required message.
    #[must_use]
    pub fn with_required(mut self, template: impl Into<String>) -> Self {
        self.required = template.into();
        self
    }

    /// Override the type-mismatch message.
    #[must_use]
    pub fn with_type_mismatch(mut self, template: impl Into<String>) -> Self {
        self.type_mismatch = template.into();
        self
    }

    /// Override the minimum message.
    #[must_use]
    pub fn with_min(mut self, template: impl Into<String>) -> Self {
        self.min = template.into();
        self
    }

    /// Override the maximum message.
    #[must_use]
    pub fn with_max(mut self, template: impl Into<String>) -> Self {
        self.max = template.into();
        self
    }

    /// Override the pattern message.
    #[must_use]
    pub fn with_regex(mut self, template: impl Into<String>) -> Self {
        self.regex = template.into();
        self
    }
}

// ---------------------------------------------------------------------------
// ValidationError / ValidationResult
// ---------------------------------------------------------------------------

/// A failed check: stable code, message template and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Stable error code for programmatic handling.
    pub code: &'static str,
    /// Message template with `${name}` placeholders.
    pub message: String,
    /// Parameters for the template.
    pub params: BTreeMap<&'static str, String>,
}

impl ValidationError {
    /// Create an error with no parameters.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a template parameter.
    #[must_use]
    pub fn with_param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.insert(key, value.to_string());
        self
    }

    /// The message with parameters substituted.
    #[must_use]
    pub fn format_message(&self) -> String {
        let params: Vec<(&str, String)> = self
            .params
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        compile_message(&self.message, &params)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_message())
    }
}

impl std::error::Error for ValidationError {}

/// The result of a check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// Every constraint held.
    #[default]
    Valid,
    /// The first constraint that failed.
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Returns `true` if the result is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the error if the result is `Invalid`.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Returns the formatted message if the result is `Invalid`.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ValidationError::format_message)
    }
}

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// A validator could not be configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// The pattern is not a valid regular expression.
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A flag letter outside `gimsuy`.
    UnknownFlag(char),
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern /{pattern}/: {reason}")
            }
            Self::UnknownFlag(flag) => write!(f, "unknown regex flag '{flag}'"),
        }
    }
}

impl std::error::Error for ValidatorError {}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    fn compile(source: &str, flags: &str) -> Result<Self, ValidatorError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                // global, unicode and sticky do not change a yes/no match
                'g' | 'u' | 'y' => &mut builder,
                other => return Err(ValidatorError::UnknownFlag(other)),
            };
        }
        let regex = builder
            .build()
            .map_err(|err| ValidatorError::InvalidPattern {
                pattern: source.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    fn display(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }
}

/// Declarative constraint checker for one value.
///
/// Each configuration call consumes the validator and returns the configured
/// copy. Clone a partially configured validator to reuse it across fields;
/// the copies are independent.
///
/// Checks run in this order, stopping at the first failure:
///
/// 1. `required` and the value is absent
/// 2. the value's kind differs from the declared kind (absence counts)
/// 3. strings: empty under `required`, length below `min`, length above
///    `max`, pattern does not match
/// 4. numbers: below `min`, above `max`
///
/// String length counts Unicode scalar values.
#[derive(Debug, Clone)]
pub struct Validator {
    kind: PrimitiveKind,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<Pattern>,
    required: bool,
    messages: ValidatorMessages,
}

impl Validator {
    /// A validator for `kind` with the default messages.
    #[must_use]
    pub fn new(kind: PrimitiveKind) -> Self {
        Self::with_messages(kind, ValidatorMessages::default())
    }

    /// A validator for `kind` with explicit message templates.
    #[must_use]
    pub fn with_messages(kind: PrimitiveKind, messages: ValidatorMessages) -> Self {
        Self {
            kind,
            min: None,
            max: None,
            pattern: None,
            required: false,
            messages,
        }
    }

    /// Shorthand for `Validator::new(PrimitiveKind::String)`.
    #[must_use]
    pub fn string() -> Self {
        Self::new(PrimitiveKind::String)
    }

    /// Shorthand for `Validator::new(PrimitiveKind::Number)`.
    #[must_use]
    pub fn number() -> Self {
        Self::new(PrimitiveKind::Number)
    }

    /// Shorthand for `Validator::new(PrimitiveKind::Boolean)`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(PrimitiveKind::Boolean)
    }

    /// Change the expected kind.
    #[must_use]
    pub fn kind(mut self, kind: PrimitiveKind) -> Self {
        self.kind = kind;
        self
    }

    /// Minimum length (strings) or value (numbers).
    #[must_use]
    pub fn min(mut self, min: impl Into<f64>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Maximum length (strings) or value (numbers).
    #[must_use]
    pub fn max(mut self, max: impl Into<f64>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Require strings to contain a match of `pattern` (global flag).
    ///
    /// # Errors
    /// Returns [`ValidatorError::InvalidPattern`] when the pattern does not
    /// compile.
    pub fn regex(self, pattern: &str) -> Result<Self, ValidatorError> {
        self.regex_with_flags(pattern, "g")
    }

    /// Require strings to contain a match of `pattern` under `flags`.
    ///
    /// Flags use the familiar letters: `i` ignores case, `m` makes `^`/`$`
    /// match at line breaks, `s` lets `.` match newlines. `g`, `u` and `y`
    /// are accepted and have no effect on a match test.
    ///
    /// # Errors
    /// An unknown flag letter or a pattern that does not compile.
    pub fn regex_with_flags(mut self, pattern: &str, flags: &str) -> Result<Self, ValidatorError> {
        self.pattern = Some(Pattern::compile(pattern, flags)?);
        Ok(self)
    }

    /// Reject absent (and, for strings, empty) values.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Replace the message templates.
    #[must_use]
    pub fn messages(mut self, messages: ValidatorMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Declared kind.
    #[must_use]
    pub fn expected_kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Whether `required` was set.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check `value`, returning the first failed constraint.
    #[must_use]
    pub fn check(&self, value: Option<Value<'_>>) -> ValidationResult {
        match self.first_failure(value) {
            Some(err) => ValidationResult::Invalid(err),
            None => ValidationResult::Valid,
        }
    }

    /// Check `value`, returning the formatted message of the first failure.
    #[must_use]
    pub fn safe_validate(&self, value: Option<Value<'_>>) -> Option<String> {
        self.check(value).error_message()
    }

    fn first_failure(&self, value: Option<Value<'_>>) -> Option<ValidationError> {
        let Some(value) = value else {
            return Some(if self.required {
                self.required_error()
            } else {
                self.type_error()
            });
        };
        if value.kind() != self.kind {
            return Some(self.type_error());
        }
        match value {
            Value::Str(text) => self.check_str(text),
            Value::Number(n) => self.check_bounds(n),
            Value::Bool(_) => None,
        }
    }

    fn check_str(&self, text: &str) -> Option<ValidationError> {
        let len = text.chars().count();
        if self.required && len == 0 {
            return Some(self.required_error());
        }
        if let Some(err) = self.check_bounds(len as f64) {
            return Some(err);
        }
        match &self.pattern {
            Some(pattern) if !pattern.regex.is_match(text) => Some(
                ValidationError::new(ERROR_CODE_PATTERN, self.messages.regex.clone())
                    .with_param("regex", pattern.display()),
            ),
            _ => None,
        }
    }

    fn check_bounds(&self, n: f64) -> Option<ValidationError> {
        if let Some(min) = self.min
            && n < min
        {
            return Some(
                ValidationError::new(ERROR_CODE_MIN, self.messages.min.clone())
                    .with_param("min", min),
            );
        }
        if let Some(max) = self.max
            && n > max
        {
            return Some(
                ValidationError::new(ERROR_CODE_MAX, self.messages.max.clone())
                    .with_param("max", max),
            );
        }
        None
    }

    fn required_error(&self) -> ValidationError {
        ValidationError::new(ERROR_CODE_REQUIRED, self.messages.required.clone())
    }

    fn type_error(&self) -> ValidationError {
        ValidationError::new(ERROR_CODE_TYPE, self.messages.type_mismatch.clone())
            .with_param("type", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_message_leaves_unknown_placeholders() {
        let out = compile_message("${a} and ${b}", &[("a", "1".into())]);
        assert_eq!(out, "1 and ${b}");
    }

    #[test]
    fn compile_message_unterminated_placeholder() {
        assert_eq!(compile_message("cost ${min", &[("min", "1".into())]), "cost ${min");
        assert_eq!(compile_message("$5 {x}", &[]), "$5 {x}");
    }

    #[test]
    fn compile_message_replaces_every_occurrence() {
        assert_eq!(compile_message("${x}-${x}", &[("x", "y".into())]), "y-y");
    }

    #[test]
    fn required_string_order() {
        let v = Validator::string().required().max(5);
        assert_eq!(
            v.safe_validate(Some("".into())).as_deref(),
            Some("Required value is missing")
        );
        assert_eq!(
            v.safe_validate(Some("abcdef".into())).as_deref(),
            Some("Value must less or equal than 5")
        );
        assert_eq!(v.safe_validate(Some("ab".into())), None);
    }

    #[test]
    fn absent_value() {
        assert_eq!(
            Validator::string().required().safe_validate(None).as_deref(),
            Some("Required value is missing")
        );
        assert_eq!(
            Validator::string().safe_validate(None).as_deref(),
            Some("Value must be string")
        );
    }

    #[test]
    fn type_mismatch_names_kind() {
        let v = Validator::number();
        assert_eq!(
            v.safe_validate(Some("12".into())).as_deref(),
            Some("Value must be number")
        );
        let result = v.check(Some(Value::Bool(true)));
        let err = result.error().unwrap();
        assert_eq!(err.code, ERROR_CODE_TYPE);
        assert_eq!(err.params.get("type").map(String::as_str), Some("number"));
    }

    #[test]
    fn type_check_precedes_required_emptiness() {
        let v = Validator::number().required();
        assert_eq!(
            v.safe_validate(Some("".into())).as_deref(),
            Some("Value must be number")
        );
    }

    #[test]
    fn string_min_length() {
        let v = Validator::string().min(3);
        assert_eq!(
            v.safe_validate(Some("ab".into())).as_deref(),
            Some("Value must be larger or equal than 3")
        );
        assert_eq!(v.safe_validate(Some("abc".into())), None);
        // Empty strings are not "required" failures without the flag.
        assert_eq!(v.check(Some("".into())).error().unwrap().code, ERROR_CODE_MIN);
    }

    #[test]
    fn string_length_counts_scalars() {
        let v = Validator::string().max(2);
        assert_eq!(v.safe_validate(Some("日本".into())), None);
    }

    #[test]
    fn number_bounds() {
        let v = Validator::number().min(1).max(10.5);
        assert_eq!(
            v.safe_validate(Some(0.5.into())).as_deref(),
            Some("Value must be larger or equal than 1")
        );
        assert_eq!(
            v.safe_validate(Some(11.into())).as_deref(),
            Some("Value must less or equal than 10.5")
        );
        assert_eq!(v.safe_validate(Some(10.into())), None);
    }

    #[test]
    fn boolean_only_checks_kind() {
        let v = Validator::boolean().min(100);
        assert_eq!(v.safe_validate(Some(false.into())), None);
        assert_eq!(
            v.safe_validate(Some("false".into())).as_deref(),
            Some("Value must be boolean")
        );
    }

    #[test]
    fn regex_checked_after_lengths() {
        let v = Validator::string().max(4).regex("^[0-9]+$").unwrap();
        assert_eq!(v.check(Some("12345".into())).error().unwrap().code, ERROR_CODE_MAX);
        assert_eq!(
            v.safe_validate(Some("12a".into())).as_deref(),
            Some("Value must be match pattern /^[0-9]+$/g")
        );
        assert_eq!(v.safe_validate(Some("123".into())), None);
    }

    #[test]
    fn regex_is_unanchored_search() {
        let v = Validator::string().regex("b+").unwrap();
        assert_eq!(v.safe_validate(Some("abba".into())), None);
    }

    #[test]
    fn regex_flags() {
        let v = Validator::string().regex_with_flags("^abc$", "im").unwrap();
        assert_eq!(v.safe_validate(Some("x\nABC".into())), None);
        let err = Validator::string().regex_with_flags("a", "q").unwrap_err();
        assert_eq!(err, ValidatorError::UnknownFlag('q'));
    }

    #[test]
    fn invalid_pattern_is_error() {
        let err = Validator::string().regex("(").unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidPattern { ref pattern, .. } if pattern == "("));
        assert!(err.to_string().starts_with("invalid pattern /(/"));
    }

    #[test]
    fn custom_messages() {
        let messages = ValidatorMessages::default()
            .with_required("please fill in")
            .with_max("no more than ${max} chars (${unknown})");
        let v = Validator::with_messages(PrimitiveKind::String, messages)
            .required()
            .max(2);
        assert_eq!(v.safe_validate(Some("".into())).as_deref(), Some("please fill in"));
        assert_eq!(
            v.safe_validate(Some("abc".into())).as_deref(),
            Some("no more than 2 chars (${unknown})")
        );
    }

    #[test]
    fn clones_do_not_alias() {
        let base = Validator::string().min(2);
        let strict = base.clone().max(3);
        let loose = base.clone();
        assert_eq!(loose.safe_validate(Some("abcdef".into())), None);
        assert!(strict.safe_validate(Some("abcdef".into())).is_some());
        assert!(base.safe_validate(Some("a".into())).is_some());
    }

    #[test]
    fn kind_can_be_changed() {
        let v = Validator::string().kind(PrimitiveKind::Number).min(3);
        assert_eq!(v.expected_kind(), PrimitiveKind::Number);
        assert!(v.safe_validate(Some(2.into())).is_some());
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::new("x", "need ${n}").with_param("n", 4);
        assert_eq!(err.to_string(), "need 4");
    }
}
