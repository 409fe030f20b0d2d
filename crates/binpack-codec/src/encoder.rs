use bytes::{Bytes, BytesMut};

use crate::error::{PackError, Result};
use crate::format::Format;
use crate::primitive::{check_value, encode_value};
use crate::token::ByteOrder;
use crate::value::Value;

/// Pack `values` according to `format`.
///
/// The result is exactly [`calc_size`](crate::calc_size) bytes long. Values
/// beyond the format length are ignored; fewer values than tokens is an error.
///
/// ```
/// use binpack_codec::{pack, Value};
///
/// let bytes = pack(&["<H"], &[Value::U16(0x1234)]).unwrap();
/// assert_eq!(&bytes[..], &[0x34, 0x12]);
/// ```
pub fn pack<S: AsRef<str>>(format: &[S], values: &[Value]) -> Result<Bytes> {
    check_value_count(format.len(), values.len())?;
    Format::parse(format)?.pack(values)
}

/// Append packed `values` to `dst`, returning the number of bytes written.
///
/// On error `dst` keeps its original contents.
pub fn pack_into<S: AsRef<str>>(
    format: &[S],
    values: &[Value],
    dst: &mut BytesMut,
) -> Result<usize> {
    check_value_count(format.len(), values.len())?;
    Format::parse(format)?.pack_into(values, dst)
}

pub(crate) fn check_value_count(format: usize, values: usize) -> Result<()> {
    if format > values {
        return Err(PackError::FormatLengthMismatch { format, values });
    }
    Ok(())
}

pub(crate) fn encode(format: &Format, values: &[Value], dst: &mut BytesMut) -> Result<()> {
    // Every value is checked before the buffer grows.
    for (index, (token, value)) in format.tokens().iter().zip(values).enumerate() {
        let raw = format.token_str(index).unwrap_or_default();
        if let Err(err) = check_value(index, raw, token.code(), value) {
            tracing::debug!(index, error = %err, "pack failed");
            return Err(err);
        }
    }

    let start = dst.len();
    dst.reserve(format.size());

    let mut order = ByteOrder::default();
    for (index, (token, value)) in format.tokens().iter().zip(values).enumerate() {
        order = token.order().unwrap_or(order);
        let raw = format.token_str(index).unwrap_or_default();
        if let Err(err) = encode_value(index, raw, token.code(), order, value, dst) {
            dst.truncate(start);
            return Err(err);
        }
    }

    debug_assert_eq!(dst.len() - start, format.size());
    tracing::trace!(
        tokens = format.len(),
        ignored = values.len().saturating_sub(format.len()),
        bytes = format.size(),
        "packed record"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Kind;

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_pack_mixed_record() {
        let values = [
            Value::U32(4),
            Value::Bool(true),
            Value::F64(3.14),
            Value::from("Golang"),
        ];
        let bytes = pack(&["I", "?", "d", "6s"], &values).unwrap();

        let mut expected = vec![0, 0, 0, 4, 1];
        expected.extend_from_slice(&3.14f64.to_be_bytes());
        expected.extend_from_slice(b"Golang");
        assert_eq!(bytes.len(), 19);
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_pack_little_and_big_endian() {
        assert_eq!(&pack(&["<H"], &[Value::U16(0x1234)]).unwrap()[..], &[0x34, 0x12]);
        assert_eq!(&pack(&[">H"], &[Value::U16(0x1234)]).unwrap()[..], &[0x12, 0x34]);
    }

    #[test]
    fn test_order_persists_until_next_marker() {
        let values = [Value::U16(1), Value::U16(2), Value::U16(3)];
        let bytes = pack(&["<H", "H", ">H"], &values).unwrap();
        assert_eq!(&bytes[..], &[1, 0, 2, 0, 0, 3]);
    }

    #[test]
    fn test_order_does_not_leak_between_calls() {
        pack(&["<H"], &[Value::U16(1)]).unwrap();
        let bytes = pack(&["H"], &[Value::U16(1)]).unwrap();
        assert_eq!(&bytes[..], &[0, 1]);
    }

    #[test]
    fn test_pads_short_strings() {
        let bytes = pack(&["4s"], &[Value::from("hi")]).unwrap();
        assert_eq!(&bytes[..], b"hi\0\0");
    }

    #[test]
    fn test_extra_values_are_ignored() {
        let bytes = pack(&["B"], &[Value::U8(9), Value::from("unused")]).unwrap();
        assert_eq!(&bytes[..], &[9]);
    }

    #[test]
    fn test_too_few_values() {
        let err = pack(&["B", "B"], &[Value::U8(1)]).unwrap_err();
        assert_eq!(
            err,
            PackError::FormatLengthMismatch {
                format: 2,
                values: 1
            }
        );
    }

    #[test]
    fn test_length_is_checked_before_tokens() {
        let err = pack(&["Z", "B"], &[Value::U8(1)]).unwrap_err();
        assert!(matches!(err, PackError::FormatLengthMismatch { .. }));
    }

    #[test]
    fn test_type_mismatch_names_expected_kind() {
        let err = pack(&["B", "I"], &[Value::U8(1), Value::U16(2)]).unwrap_err();
        assert_eq!(
            err,
            PackError::TypeMismatch {
                index: 1,
                token: "I".to_string(),
                expected: Kind::U32,
                found: Kind::U16,
            }
        );
    }

    #[test]
    fn test_unknown_token_writes_nothing() {
        let mut dst = BytesMut::from(&b"keep"[..]);
        let err = pack_into(&["B", "x"], &[Value::U8(1), Value::U8(2)], &mut dst).unwrap_err();
        assert!(matches!(err, PackError::UnknownToken { index: 1, .. }));
        assert_eq!(&dst[..], b"keep");
    }

    #[test]
    fn test_failed_pack_into_rolls_back() {
        let mut dst = BytesMut::from(&b"keep"[..]);
        let values = [Value::U16(7), Value::from("too long")];
        let err = pack_into(&["H", "3s"], &values, &mut dst).unwrap_err();
        assert!(matches!(err, PackError::StringTooLong { index: 1, .. }));
        assert_eq!(&dst[..], b"keep");
    }

    #[test]
    fn test_width_beyond_buffer_limit_is_an_error() {
        let huge = format!("{}s", isize::MAX as u64 + 1);
        let err = pack(&[huge.as_str()], &[Value::from("x")]).unwrap_err();
        assert_eq!(err, PackError::unknown_token(0, &huge));
    }

    #[test]
    fn test_values_are_checked_before_reserving() {
        let huge = format!("{}s", isize::MAX);
        let err = pack(&[huge.as_str()], &[Value::U8(1)]).unwrap_err();
        assert!(matches!(err, PackError::TypeMismatch { index: 0, .. }));

        let err = pack(&["B", "2s"], &[Value::U8(1), Value::from("abc")]).unwrap_err();
        assert!(matches!(err, PackError::StringTooLong { index: 1, .. }));
    }

    #[test]
    fn test_empty_format() {
        let bytes = pack::<&str>(&[], &[]).unwrap();
        assert!(bytes.is_empty());
    }
}
