//! Pack and unpack fixed-layout binary records from compact format tokens.
//!
//! # Crate Structure
//!
//! - [`codec`] — Token grammar, `pack`, `unpack` and `calc_size`
//! - [`layout`] — Named record layouts loaded from JSON (behind `layout` feature)
//!
//! ```
//! use binpack::codec::{pack, unpack, Value};
//!
//! let bytes = pack(&["<H", "4s"], &[Value::U16(0x1234), Value::from("hi")]).unwrap();
//! assert_eq!(&bytes[..], b"\x34\x12hi\0\0");
//! assert_eq!(unpack(&["<H", "4s"], &bytes).unwrap()[1], Value::from("hi\0\0"));
//! ```

/// Re-export codec types.
pub mod codec {
    pub use binpack_codec::*;
}

/// Re-export layout types (requires `layout` feature).
#[cfg(feature = "layout")]
pub mod layout {
    pub use binpack_layout::*;
}
