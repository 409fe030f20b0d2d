use std::fmt;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};

use crate::error::{PackError, Result};
use crate::token::{add_width, parse_token, Token};
use crate::value::Value;
use crate::{decoder, encoder};

/// A parsed, reusable format.
///
/// Parsing validates every token once; the resulting `Format` can pack and
/// unpack any number of records without re-reading the token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    raw: Vec<String>,
    tokens: Vec<Token>,
    size: usize,
}

impl Format {
    /// Parse an ordered list of format tokens.
    pub fn parse<S: AsRef<str>>(format: &[S]) -> Result<Self> {
        let mut raw = Vec::with_capacity(format.len());
        let mut tokens = Vec::with_capacity(format.len());
        let mut size = 0usize;

        for (index, text) in format.iter().enumerate() {
            let text = text.as_ref();
            let token = parse_token(index, text)?;
            size = add_width(size, token.width())
                .ok_or_else(|| PackError::unknown_token(index, text))?;
            raw.push(text.to_string());
            tokens.push(token);
        }

        tracing::trace!(tokens = tokens.len(), size, "parsed format");
        Ok(Self { raw, tokens, size })
    }

    /// Total encoded size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tokens (and therefore values) in the format.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The token at `index` as it was written.
    pub fn token_str(&self, index: usize) -> Option<&str> {
        self.raw.get(index).map(String::as_str)
    }

    /// Pack `values` into a new buffer of exactly [`Format::size`] bytes.
    ///
    /// Values beyond the format length are ignored.
    pub fn pack(&self, values: &[Value]) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        self.pack_into(values, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append packed `values` to `dst`, returning the number of bytes written.
    ///
    /// On error `dst` is left exactly as it was.
    pub fn pack_into(&self, values: &[Value], dst: &mut BytesMut) -> Result<usize> {
        encoder::check_value_count(self.len(), values.len())?;
        encoder::encode(self, values, dst)?;
        Ok(self.size)
    }

    /// Unpack one value per token from the front of `buf`.
    ///
    /// Bytes beyond [`Format::size`] are ignored.
    pub fn unpack(&self, buf: &[u8]) -> Result<Vec<Value>> {
        decoder::decode(self, buf)
    }
}

impl FromStr for Format {
    type Err = PackError;

    /// Parse a comma separated token list such as `"I,?,d,6s"`.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Self::parse::<&str>(&[]);
        }
        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
        Self::parse(&tokens)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ByteOrder, TypeCode, MAX_FORMAT_SIZE};

    #[test]
    fn test_parse_tracks_size_and_tokens() {
        let format = Format::parse(&["I", "?", "d", "6s"]).unwrap();
        assert_eq!(format.len(), 4);
        assert_eq!(format.size(), 19);
        assert_eq!(format.tokens()[3].code(), TypeCode::Str(6));
        assert_eq!(format.token_str(1), Some("?"));
        assert_eq!(format.token_str(4), None);
    }

    #[test]
    fn test_parse_accepts_owned_strings() {
        let tokens = vec!["<H".to_string(), "B".to_string()];
        let format = Format::parse(&tokens).unwrap();
        assert_eq!(format.tokens()[0].order(), Some(ByteOrder::LittleEndian));
        assert_eq!(format.size(), 3);
    }

    #[test]
    fn test_from_str_and_display() {
        let format: Format = "I, ?,d ,6s".parse().unwrap();
        assert_eq!(format.size(), 19);
        assert_eq!(format.to_string(), "I,?,d,6s");

        let empty: Format = "  ".parse().unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.size(), 0);
    }

    #[test]
    fn test_from_str_rejects_empty_item() {
        let err = "I,,B".parse::<Format>().unwrap_err();
        assert_eq!(err, PackError::unknown_token(1, ""));
    }

    #[test]
    fn test_size_overflow_is_rejected() {
        let huge = format!("{}s", usize::MAX);
        let err = Format::parse(&["B", huge.as_str()]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(1, &huge));
    }

    #[test]
    fn test_total_beyond_buffer_limit_is_rejected() {
        let half = format!("{}s", MAX_FORMAT_SIZE / 2 + 1);
        let err = Format::parse(&[half.as_str(), half.as_str()]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(1, &half));
    }

    #[test]
    fn test_pack_into_appends() {
        let format = Format::parse(&[">H"]).unwrap();
        let mut dst = BytesMut::from(&b"xy"[..]);
        let written = format.pack_into(&[Value::U16(0x1234)], &mut dst).unwrap();
        assert_eq!(written, 2);
        assert_eq!(&dst[..], &[b'x', b'y', 0x12, 0x34]);
    }
}
