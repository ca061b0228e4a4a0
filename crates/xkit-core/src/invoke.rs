#![forbid(unsafe_code)]

//! Best-effort invocation of consumer-supplied callbacks.
//!
//! Widgets hand control to user code at well-defined points (`on_change`,
//! `on_blur`, option matchers, ...). A panic inside one of those closures must
//! not take the widget down with it: the panic is caught, logged at `warn`
//! level with the callback's name, and the widget carries on.
//!
//! ```
//! use xkit_core::invoke::{best_effort, try_invoke};
//!
//! assert_eq!(best_effort("double", || 21 * 2), Some(42));
//!
//! let failure = try_invoke("broken", || -> u8 { panic!("boom") }).unwrap_err();
//! assert_eq!(failure.callback, "broken");
//! assert_eq!(failure.message, "boom");
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A callback that panicked instead of returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    /// Name the callback was registered or invoked under.
    pub callback: &'static str,
    /// Message extracted from the panic payload.
    pub message: String,
}

impl CallbackFailure {
    fn from_panic(payload: Box<dyn Any + Send>, callback: &'static str) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { callback, message }
    }
}

impl fmt::Display for CallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error happened during invoking {}: {}",
            self.callback, self.message
        )
    }
}

impl std::error::Error for CallbackFailure {}

/// Run `f`, converting a panic into a [`CallbackFailure`].
///
/// Nothing is logged; use [`best_effort`] for the log-and-continue flavour.
pub fn try_invoke<R>(callback: &'static str, f: impl FnOnce() -> R) -> Result<R, CallbackFailure> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| CallbackFailure::from_panic(payload, callback))
}

/// Run `f`; on panic, log a warning naming `callback` and return `None`.
pub fn best_effort<R>(callback: &'static str, f: impl FnOnce() -> R) -> Option<R> {
    match try_invoke(callback, f) {
        Ok(value) => Some(value),
        Err(failure) => {
            crate::warn!(
                callback = failure.callback,
                panic = %failure.message,
                "error happened during invoking {}",
                failure.callback
            );
            None
        }
    }
}

/// Invoke a possibly-absent callback through [`best_effort`].
///
/// Returns `None` both when no callback is installed and when it panicked.
///
/// ```
/// use xkit_core::invoke::invoke_optional;
///
/// let mut seen = Vec::new();
/// let mut on_change: Option<Box<dyn FnMut(&str) + '_>> = Some(Box::new(|v| seen.push(v.to_string())));
/// invoke_optional("on_change", on_change.as_deref_mut(), |cb| cb("abc"));
/// drop(on_change);
/// assert_eq!(seen, vec!["abc"]);
/// ```
pub fn invoke_optional<C: ?Sized, R>(
    callback: &'static str,
    target: Option<&mut C>,
    call: impl FnOnce(&mut C) -> R,
) -> Option<R> {
    let target = target?;
    best_effort(callback, || call(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_invoke_returns_value() {
        assert_eq!(try_invoke("ok", || "value"), Ok("value"));
    }

    #[test]
    fn try_invoke_captures_str_payload() {
        let err = try_invoke::<()>("cb", || panic!("static message")).unwrap_err();
        assert_eq!(err.callback, "cb");
        assert_eq!(err.message, "static message");
    }

    #[test]
    fn try_invoke_captures_string_payload() {
        let code = 7;
        let err = try_invoke::<()>("cb", || panic!("code {code}")).unwrap_err();
        assert_eq!(err.message, "code 7");
    }

    #[test]
    fn try_invoke_unknown_payload() {
        let err = try_invoke::<()>("cb", || std::panic::panic_any(42_u32)).unwrap_err();
        assert_eq!(err.message, "unknown panic");
    }

    #[test]
    fn failure_display_names_callback() {
        let failure = CallbackFailure {
            callback: "on_blur",
            message: "boom".into(),
        };
        assert_eq!(
            failure.to_string(),
            "error happened during invoking on_blur: boom"
        );
    }

    #[test]
    fn best_effort_suppresses_panic() {
        assert_eq!(best_effort("cb", || -> u8 { panic!("nope") }), None);
        assert_eq!(best_effort("cb", || 3_u8), Some(3));
    }

    #[test]
    fn invoke_optional_absent_is_none() {
        let mut slot: Option<Box<dyn FnMut(u32) -> u32>> = None;
        assert_eq!(invoke_optional("cb", slot.as_deref_mut(), |cb| cb(1)), None);
    }

    #[test]
    fn invoke_optional_present_runs() {
        let mut slot: Option<Box<dyn FnMut(u32) -> u32>> = Some(Box::new(|x| x + 1));
        assert_eq!(invoke_optional("cb", slot.as_deref_mut(), |cb| cb(1)), Some(2));
    }

    #[test]
    fn state_survives_after_panic() {
        let mut count = 0;
        let mut slot: Option<Box<dyn FnMut() + '_>> = Some(Box::new(|| {
            count += 1;
            if count == 1 {
                panic!("first call fails");
            }
        }));
        assert_eq!(invoke_optional("cb", slot.as_deref_mut(), |cb| cb()), None);
        assert_eq!(invoke_optional("cb", slot.as_deref_mut(), |cb| cb()), Some(()));
        drop(slot);
        assert_eq!(count, 2);
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn best_effort_logs_callback_name() {
        assert_eq!(best_effort::<()>("on_focus", || panic!("kaboom")), None);
        assert!(logs_contain("error happened during invoking on_focus"));
        assert!(logs_contain("kaboom"));
    }
}
