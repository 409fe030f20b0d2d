//! Per-type encode and decode routines shared by the encoder and decoder.

use bytes::{BufMut, BytesMut};

use crate::cursor::ByteReader;
use crate::error::{PackError, Result};
use crate::token::{ByteOrder, TypeCode};
use crate::value::Value;

macro_rules! put_scalar {
    ($dst:expr, $order:expr, $value:expr, $put_be:ident, $put_le:ident) => {
        match $order {
            ByteOrder::BigEndian => $dst.$put_be($value),
            ByteOrder::LittleEndian => $dst.$put_le($value),
        }
    };
}

macro_rules! read_scalar {
    ($reader:expr, $order:expr, $ty:ty) => {{
        let bytes = $reader.read_array::<{ std::mem::size_of::<$ty>() }>()?;
        match $order {
            ByteOrder::BigEndian => <$ty>::from_be_bytes(bytes),
            ByteOrder::LittleEndian => <$ty>::from_le_bytes(bytes),
        }
    }};
}

/// Check that `value` can be packed as `code` without writing anything.
///
/// `raw` is the token as written in the format, used in error reports.
pub(crate) fn check_value(index: usize, raw: &str, code: TypeCode, value: &Value) -> Result<()> {
    match (code, value) {
        (TypeCode::Bool, Value::Bool(_))
        | (TypeCode::U8, Value::U8(_))
        | (TypeCode::U16, Value::U16(_))
        | (TypeCode::U32, Value::U32(_))
        | (TypeCode::U64, Value::U64(_))
        | (TypeCode::F32, Value::F32(_))
        | (TypeCode::F64, Value::F64(_)) => Ok(()),
        (TypeCode::Str(width), Value::Str(v)) if v.len() > width => {
            Err(PackError::StringTooLong {
                index,
                width,
                len: v.len(),
            })
        }
        (TypeCode::Str(_), Value::Str(_)) => Ok(()),
        (code, value) => Err(PackError::TypeMismatch {
            index,
            token: raw.to_string(),
            expected: code.kind(),
            found: value.kind(),
        }),
    }
}

/// Append `value` as `code` in `order`.
///
/// Writes exactly `code.width()` bytes on success and nothing on failure.
pub(crate) fn encode_value(
    index: usize,
    raw: &str,
    code: TypeCode,
    order: ByteOrder,
    value: &Value,
    dst: &mut BytesMut,
) -> Result<()> {
    check_value(index, raw, code, value)?;
    match (code, value) {
        (TypeCode::Bool, Value::Bool(v)) => dst.put_u8(u8::from(*v)),
        (TypeCode::U8, Value::U8(v)) => dst.put_u8(*v),
        (TypeCode::U16, Value::U16(v)) => put_scalar!(dst, order, *v, put_u16, put_u16_le),
        (TypeCode::U32, Value::U32(v)) => put_scalar!(dst, order, *v, put_u32, put_u32_le),
        (TypeCode::U64, Value::U64(v)) => put_scalar!(dst, order, *v, put_u64, put_u64_le),
        (TypeCode::F32, Value::F32(v)) => put_scalar!(dst, order, *v, put_f32, put_f32_le),
        (TypeCode::F64, Value::F64(v)) => put_scalar!(dst, order, *v, put_f64, put_f64_le),
        (TypeCode::Str(width), Value::Str(v)) => {
            dst.put_slice(v.as_bytes());
            dst.put_bytes(0, width - v.len());
        }
        _ => {}
    }
    Ok(())
}

/// Consume `code.width()` bytes from `reader` and decode them in `order`.
pub(crate) fn decode_value(
    index: usize,
    code: TypeCode,
    order: ByteOrder,
    reader: &mut ByteReader<'_>,
) -> Result<Value> {
    let value = match code {
        TypeCode::Bool => Value::Bool(reader.read_array::<1>()?[0] != 0),
        TypeCode::U8 => Value::U8(reader.read_array::<1>()?[0]),
        TypeCode::U16 => Value::U16(read_scalar!(reader, order, u16)),
        TypeCode::U32 => Value::U32(read_scalar!(reader, order, u32)),
        TypeCode::U64 => Value::U64(read_scalar!(reader, order, u64)),
        TypeCode::F32 => Value::F32(read_scalar!(reader, order, f32)),
        TypeCode::F64 => Value::F64(read_scalar!(reader, order, f64)),
        TypeCode::Str(width) => {
            let bytes = reader.read_exact(width)?;
            let text = std::str::from_utf8(bytes).map_err(|_| PackError::InvalidUtf8 { index })?;
            Value::Str(text.to_string())
        }
    };
    Ok(value)
}
