#![forbid(unsafe_code)]

//! Phone-number input with country dial-code lookup.
//!
//! - [`CountryTable`] - the embedded ISO country list keyed by lowercase code
//! - [`PhoneInput`] - a country select plus a local-number input whose
//!   combined value is `dial_code + local`
//!
//! # Example
//!
//! ```rust
//! use xkit_extras::phone::{CountryTable, PhoneInput};
//!
//! let vn = CountryTable::global().get("VN").unwrap();
//! assert_eq!(vn.dial_code, "+84");
//!
//! let mut phone = PhoneInput::new().with_countries(&["us", "vn"]);
//! phone.set_value("+84901234567");
//! assert_eq!(phone.country().map(|c| c.code.as_str()), Some("VN"));
//! assert_eq!(phone.local_number(), "901234567");
//! ```
//!
//! Feature-gated under `phone`.

mod countries;
mod input;

pub use countries::{Country, CountryTable, CountryTableError};
pub use input::{PhoneInput, PhonePart, PhoneView};
