//! Format-token driven packing of fixed-layout binary records.
//!
//! A format is an ordered list of short tokens, one per field:
//! - An optional byte-order marker: `<` little-endian, `>` big-endian
//! - A type code: `?` bool, `B` u8, `h`/`H` u16, `i`/`I`/`l`/`L` u32,
//!   `q`/`Q` u64, `f` f32, `d` f64, or `Ns` for an `N`-byte string
//!
//! Every call starts out big-endian. A marker switches the order for its own
//! token and every later token of the same call.
//!
//! ```
//! use binpack_codec::{calc_size, pack, unpack, Value};
//!
//! let format = ["I", "?", "<H", "6s"];
//! let values = [
//!     Value::U32(4),
//!     Value::Bool(true),
//!     Value::U16(0x1234),
//!     Value::from("Golang"),
//! ];
//!
//! let bytes = pack(&format, &values).unwrap();
//! assert_eq!(bytes.len(), calc_size(&format).unwrap());
//! assert_eq!(unpack(&format, &bytes).unwrap(), values);
//! ```

mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
mod primitive;
pub mod size;
pub mod token;
pub mod value;

pub use decoder::unpack;
pub use encoder::{pack, pack_into};
pub use error::{ErrorKind, PackError, Result};
pub use format::Format;
pub use size::calc_size;
pub use token::{ByteOrder, Kind, Token, TypeCode, MAX_FORMAT_SIZE};
pub use value::Value;
