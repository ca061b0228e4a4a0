#![forbid(unsafe_code)]

//! Text primitives for xkit inputs.
//!
//! - [`Template`] - display mask that maps a raw value onto a formatted string
//! - grapheme helpers shared by the editing widgets
//!
//! # Example
//! ```
//! use xkit_text::{Template, format_value, raw_cursor_to_display_cursor};
//!
//! let mask = "$$$-$$$-$$$$";
//! assert_eq!(format_value("1234567890", mask), "123-456-7890");
//! assert_eq!(raw_cursor_to_display_cursor(3, mask), 4);
//!
//! let phone = Template::new(mask);
//! assert_eq!(phone.capacity(), Some(10));
//! assert_eq!(phone.clamp("123456789012"), "1234567890");
//! ```

pub mod grapheme;
pub mod template;

pub use grapheme::{
    display_width, grapheme_byte_offset, grapheme_count, graphemes, take_graphemes,
};
pub use template::{
    CAPTURE, Template, display_cursor_to_raw_cursor, format_value, raw_cursor_to_display_cursor,
    value_by_template,
};
