#![forbid(unsafe_code)]

//! Declarative single-value validation.
//!
//! A [`Validator`] is configured once per field by chaining constraint calls
//! and then checks values without ever mutating itself:
//!
//! - a primitive kind (`string`, `number`, `boolean`)
//! - optional `min` / `max` (length for strings, value for numbers)
//! - an optional regular expression (strings only)
//! - an optional `required` flag
//!
//! Checks run in a fixed order and the first failure wins. Messages come from
//! a [`ValidatorMessages`] table supplied at construction and support
//! `${min}`, `${max}`, `${type}` and `${regex}` placeholders.
//!
//! # Example
//!
//! ```rust
//! use xkit_extras::validation::{Validator, Value};
//!
//! let name = Validator::string().required().max(5);
//! assert_eq!(name.safe_validate(Some(Value::from(""))).as_deref(), Some("Required value is missing"));
//! assert_eq!(name.safe_validate(Some("abcdef".into())).as_deref(), Some("Value must less or equal than 5"));
//! assert_eq!(name.safe_validate(Some("ab".into())), None);
//! ```
//!
//! Feature-gated under `validation`.

mod validators;
mod value;

pub use validators::{
    // Error codes
    ERROR_CODE_MAX,
    ERROR_CODE_MIN,
    ERROR_CODE_PATTERN,
    ERROR_CODE_REQUIRED,
    ERROR_CODE_TYPE,
    // Core types
    ValidationError,
    ValidationResult,
    Validator,
    ValidatorError,
    ValidatorMessages,
    // Helpers
    compile_message,
};
pub use value::{PrimitiveKind, Value};
