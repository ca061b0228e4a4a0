#![forbid(unsafe_code)]

//! Feature-gated extras for xkit.
//!
//! # Feature Flags
//!
//! | Feature      | Module         | Description                                        |
//! |--------------|----------------|----------------------------------------------------|
//! | `validation` | [`validation`] | Declarative single-value constraint checker        |
//! | `forms`      | [`forms`]      | Multi-stage form state machine                     |
//! | `phone`      | [`phone`]      | Country dial-code table and phone-number input     |

#[cfg(feature = "validation")]
pub mod validation;

#[cfg(feature = "forms")]
pub mod forms;

#[cfg(feature = "phone")]
pub mod phone;
