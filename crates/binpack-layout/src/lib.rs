//! Named record layouts for binpack.
//!
//! A layout gives every field of a binary record a name and a format token,
//! and is stored as JSON:
//!
//! ```json
//! {
//!   "name": "udp-header",
//!   "description": "RFC 768 header",
//!   "fields": [
//!     { "name": "src_port", "token": ">H" },
//!     { "name": "dst_port", "token": "H" },
//!     { "name": "length", "token": "H" },
//!     { "name": "checksum", "token": "H" }
//!   ]
//! }
//! ```
//!
//! Layouts are validated on registration, so every registered layout packs
//! and unpacks without token errors.

pub mod config;
pub mod error;
pub mod layout;
pub mod registry;
mod validator;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use layout::{FieldDef, Layout, LayoutDef, Record};
pub use registry::LayoutRegistry;
