//! Format token grammar.
//!
//! ```text
//! token := [order] code
//! order := '<' | '>'
//! code  := '?' | 'B' | 'h' | 'H' | 'i' | 'I' | 'l' | 'L'
//!        | 'q' | 'Q' | 'f' | 'd' | digits 's'
//! ```

use std::fmt;

use crate::error::{PackError, Result};

/// Largest encoded size a format may describe, in bytes.
///
/// Buffers cannot exceed `isize::MAX` bytes, so wider strings and larger
/// totals are rejected as unknown tokens.
pub const MAX_FORMAT_SIZE: usize = isize::MAX as usize;

/// Byte order of multi-byte scalars.
///
/// Every pack or unpack call starts in [`ByteOrder::BigEndian`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// The kind of value a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
}

impl Kind {
    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Str => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type code of a token, with the width for fixed strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Bool,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Fixed-width string of `N` bytes.
    Str(usize),
}

impl TypeCode {
    /// The value kind this code packs and unpacks.
    pub fn kind(self) -> Kind {
        match self {
            TypeCode::Bool => Kind::Bool,
            TypeCode::U8 => Kind::U8,
            TypeCode::U16 => Kind::U16,
            TypeCode::U32 => Kind::U32,
            TypeCode::U64 => Kind::U64,
            TypeCode::F32 => Kind::F32,
            TypeCode::F64 => Kind::F64,
            TypeCode::Str(_) => Kind::Str,
        }
    }

    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            TypeCode::Bool | TypeCode::U8 => 1,
            TypeCode::U16 => 2,
            TypeCode::U32 | TypeCode::F32 => 4,
            TypeCode::U64 | TypeCode::F64 => 8,
            TypeCode::Str(width) => width,
        }
    }
}

/// One parsed format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    order: Option<ByteOrder>,
    code: TypeCode,
}

impl Token {
    /// Byte-order override carried by this token, if any.
    pub fn order(&self) -> Option<ByteOrder> {
        self.order
    }

    pub fn code(&self) -> TypeCode {
        self.code
    }

    pub fn kind(&self) -> Kind {
        self.code.kind()
    }

    pub fn width(&self) -> usize {
        self.code.width()
    }
}

/// Parse the token at `index` of a format.
///
/// `index` only feeds the error; parsing is context free.
pub(crate) fn parse_token(index: usize, raw: &str) -> Result<Token> {
    let (order, rest) = match raw.as_bytes().first() {
        Some(b'<') => (Some(ByteOrder::LittleEndian), &raw[1..]),
        Some(b'>') => (Some(ByteOrder::BigEndian), &raw[1..]),
        _ => (None, raw),
    };

    let code = match rest {
        "?" => TypeCode::Bool,
        "B" => TypeCode::U8,
        "h" | "H" => TypeCode::U16,
        "i" | "I" | "l" | "L" => TypeCode::U32,
        "q" | "Q" => TypeCode::U64,
        "f" => TypeCode::F32,
        "d" => TypeCode::F64,
        _ => parse_string_width(rest)
            .map(TypeCode::Str)
            .ok_or_else(|| PackError::unknown_token(index, raw))?,
    };

    Ok(Token { order, code })
}

fn parse_string_width(code: &str) -> Option<usize> {
    let digits = code.strip_suffix('s')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse()
        .ok()
        .filter(|width| *width <= MAX_FORMAT_SIZE)
}

/// Add a token width to a running format size, staying within
/// [`MAX_FORMAT_SIZE`].
pub(crate) fn add_width(size: usize, width: usize) -> Option<usize> {
    size.checked_add(width)
        .filter(|total| *total <= MAX_FORMAT_SIZE)
}
