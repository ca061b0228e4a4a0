#![forbid(unsafe_code)]

//! Core: input events, logging facade, and best-effort callback invocation.

pub mod event;
pub mod invoke;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};

pub use invoke::{CallbackFailure, best_effort, try_invoke};
