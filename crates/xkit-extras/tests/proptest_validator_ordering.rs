//! Property-based tests for the validator's check order.
//!
//! 1. Absent values fail with the required message when required, else the type message.
//! 2. A kind mismatch always reports the type message, whatever else is configured.
//! 3. String checks report required, then min, then max, then pattern.
//! 4. Number checks compare the value against the bounds.
//! 5. Checking never panics and is deterministic.

use proptest::prelude::*;
use xkit_extras::validation::{
    ERROR_CODE_MAX, ERROR_CODE_MIN, ERROR_CODE_PATTERN, ERROR_CODE_REQUIRED, ERROR_CODE_TYPE,
    PrimitiveKind, Validator, Value,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn code(validator: &Validator, value: Option<Value<'_>>) -> Option<&'static str> {
    validator.check(value).error().map(|e| e.code)
}

fn string_validator() -> impl Strategy<Value = (Validator, Option<usize>, Option<usize>, bool)> {
    (
        prop::option::of(0usize..6),
        prop::option::of(0usize..6),
        any::<bool>(),
    )
        .prop_map(|(min, max, required)| {
            let mut v = Validator::string();
            if let Some(min) = min {
                v = v.min(min as f64);
            }
            if let Some(max) = max {
                v = v.max(max as f64);
            }
            if required {
                v = v.required();
            }
            (v.regex("^[a-z]*$").unwrap(), min, max, required)
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Absence and kind mismatch
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn absent_value((v, _, _, required) in string_validator()) {
        let expected = if required { ERROR_CODE_REQUIRED } else { ERROR_CODE_TYPE };
        prop_assert_eq!(code(&v, None), Some(expected));
    }

    #[test]
    fn kind_mismatch_reports_type(n in any::<f64>(), b in any::<bool>(), (v, _, _, _) in string_validator()) {
        prop_assert_eq!(code(&v, Some(Value::Number(n))), Some(ERROR_CODE_TYPE));
        prop_assert_eq!(code(&v, Some(Value::Bool(b))), Some(ERROR_CODE_TYPE));
        let boolean = Validator::new(PrimitiveKind::Boolean).required();
        prop_assert_eq!(code(&boolean, Some(Value::Str(""))), Some(ERROR_CODE_TYPE));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. String check order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn string_checks_in_order(text in "[a-z0-9]{0,8}", (v, min, max, required) in string_validator()) {
        let len = text.chars().count();
        let expected = if required && len == 0 {
            Some(ERROR_CODE_REQUIRED)
        } else if min.is_some_and(|m| len < m) {
            Some(ERROR_CODE_MIN)
        } else if max.is_some_and(|m| len > m) {
            Some(ERROR_CODE_MAX)
        } else if !text.chars().all(|c| c.is_ascii_lowercase()) {
            Some(ERROR_CODE_PATTERN)
        } else {
            None
        };
        prop_assert_eq!(code(&v, Some(Value::Str(&text))), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Number bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn number_bounds(n in -100.0f64..100.0, min in -50.0f64..0.0, max in 0.0f64..50.0) {
        let v = Validator::number().min(min).max(max);
        let expected = if n < min {
            Some(ERROR_CODE_MIN)
        } else if n > max {
            Some(ERROR_CODE_MAX)
        } else {
            None
        };
        prop_assert_eq!(code(&v, Some(Value::Number(n))), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn checking_is_pure(text in "\\PC{0,12}", (v, _, _, _) in string_validator()) {
        let first = v.safe_validate(Some(Value::Str(&text)));
        let second = v.safe_validate(Some(Value::Str(&text)));
        prop_assert_eq!(first, second);
    }
}
