use crate::cursor::ByteReader;
use crate::error::{PackError, Result};
use crate::format::Format;
use crate::primitive::decode_value;
use crate::token::ByteOrder;
use crate::value::Value;

/// Unpack one value per token from the front of `buf`.
///
/// `buf` must hold at least [`calc_size`](crate::calc_size) bytes; anything
/// after that is ignored. Fixed-width strings come back with their padding.
///
/// ```
/// use binpack_codec::{unpack, Value};
///
/// let values = unpack(&["<H", "4s"], b"\x34\x12hi\0\0").unwrap();
/// assert_eq!(values, vec![Value::U16(0x1234), Value::from("hi\0\0")]);
/// ```
pub fn unpack<S: AsRef<str>>(format: &[S], buf: &[u8]) -> Result<Vec<Value>> {
    Format::parse(format)?.unpack(buf)
}

pub(crate) fn decode(format: &Format, buf: &[u8]) -> Result<Vec<Value>> {
    if format.size() > buf.len() {
        return Err(PackError::BufferTooShort {
            needed: format.size(),
            available: buf.len(),
        });
    }

    let mut reader = ByteReader::new(buf);
    let mut order = ByteOrder::default();
    let mut values = Vec::with_capacity(format.len());

    for (index, token) in format.tokens().iter().enumerate() {
        order = token.order().unwrap_or(order);
        values.push(decode_value(index, token.code(), order, &mut reader)?);
    }

    tracing::trace!(
        tokens = values.len(),
        consumed = reader.position(),
        trailing = reader.remaining(),
        "unpacked record"
    );
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::pack;

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_unpack_mixed_record() {
        let format = ["I", "?", "d", "6s"];
        let values = vec![
            Value::U32(4),
            Value::Bool(true),
            Value::F64(3.14),
            Value::from("Golang"),
        ];
        let bytes = pack(&format, &values).unwrap();
        assert_eq!(unpack(&format, &bytes).unwrap(), values);
    }

    #[test]
    fn test_padding_is_kept() {
        let values = unpack(&["4s"], b"hi\0\0").unwrap();
        assert_eq!(values, vec![Value::from("hi\0\0")]);
    }

    #[test]
    fn test_short_buffer() {
        let err = unpack(&["I"], &[0, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            PackError::BufferTooShort {
                needed: 4,
                available: 3
            }
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let values = unpack(&["B"], &[1, 2, 3]).unwrap();
        assert_eq!(values, vec![Value::U8(1)]);
    }

    #[test]
    fn test_byte_order_swaps_multibyte_values() {
        let bytes = pack(&["<I"], &[Value::U32(0x0102_0304)]).unwrap();
        let swapped = unpack(&[">I"], &bytes).unwrap();
        assert_eq!(swapped, vec![Value::U32(0x0403_0201)]);

        let bytes = pack(&["<B"], &[Value::U8(0x12)]).unwrap();
        assert_eq!(unpack(&[">B"], &bytes).unwrap(), vec![Value::U8(0x12)]);
    }

    #[test]
    fn test_order_persists_until_next_marker() {
        let values = unpack(&["<H", "H", ">H"], &[1, 0, 2, 0, 0, 3]).unwrap();
        assert_eq!(values, vec![Value::U16(1), Value::U16(2), Value::U16(3)]);
    }

    #[test]
    fn test_unknown_token_before_size_check() {
        let err = unpack(&["I", "Z"], &[]).unwrap_err();
        assert!(matches!(err, PackError::UnknownToken { index: 1, .. }));
    }

    #[test]
    fn test_nonzero_bool_decodes_true() {
        let values = unpack(&["?", "?"], &[0, 2]).unwrap();
        assert_eq!(values, vec![Value::Bool(false), Value::Bool(true)]);
    }
}
