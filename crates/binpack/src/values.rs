//! Conversion between JSON input/output and codec values.
//!
//! JSON has one number type, so each value is coerced to the exact kind its
//! token expects, with range checks.

use binpack_codec::{Format, Kind, Value};
use binpack_layout::Layout;
use serde_json::{Map, Number};

use crate::exit::{CliError, CliResult, DATA_INVALID};

/// Coerce a JSON value to `kind`.
pub fn coerce(kind: Kind, json: &serde_json::Value) -> Result<Value, String> {
    let mismatch = || format!("expected {kind}, got {json}");
    let value = match kind {
        Kind::Bool => Value::Bool(json.as_bool().ok_or_else(mismatch)?),
        Kind::U8 => Value::U8(unsigned(json, kind)?),
        Kind::U16 => Value::U16(unsigned(json, kind)?),
        Kind::U32 => Value::U32(unsigned(json, kind)?),
        Kind::U64 => Value::U64(json.as_u64().ok_or_else(mismatch)?),
        Kind::F32 => Value::F32(narrow_f32(json.as_f64().ok_or_else(mismatch)?)?),
        Kind::F64 => Value::F64(json.as_f64().ok_or_else(mismatch)?),
        Kind::Str => Value::Str(json.as_str().ok_or_else(mismatch)?.to_string()),
    };
    Ok(value)
}

fn unsigned<T: TryFrom<u64>>(json: &serde_json::Value, kind: Kind) -> Result<T, String> {
    let n = json
        .as_u64()
        .ok_or_else(|| format!("expected {kind}, got {json}"))?;
    T::try_from(n).map_err(|_| format!("{n} is out of range for {kind}"))
}

fn narrow_f32(v: f64) -> Result<f32, String> {
    let narrowed = v as f32;
    if v.is_finite() && !narrowed.is_finite() {
        return Err(format!("{v} is out of range for {}", Kind::F32));
    }
    Ok(narrowed)
}

/// Coerce a JSON array to positional values for `format`.
///
/// Items beyond the format length are dropped, as the codec would ignore
/// them. A short array is left short so the codec reports it.
pub fn positional(format: &Format, json: &serde_json::Value) -> CliResult<Vec<Value>> {
    let items = json
        .as_array()
        .ok_or_else(|| CliError::new(DATA_INVALID, "values must be a JSON array"))?;

    format
        .tokens()
        .iter()
        .zip(items)
        .enumerate()
        .map(|(index, (token, item))| {
            coerce(token.kind(), item)
                .map_err(|msg| CliError::new(DATA_INVALID, format!("value {index}: {msg}")))
        })
        .collect()
}

/// Coerce a JSON object to named values for `layout`.
pub fn named(
    layout: &Layout,
    json: &Map<String, serde_json::Value>,
) -> CliResult<Vec<(String, Value)>> {
    json.iter()
        .map(|(name, item)| {
            let kind = layout
                .field_index(name)
                .map(|index| layout.format().tokens()[index].kind())
                .ok_or_else(|| {
                    CliError::new(
                        DATA_INVALID,
                        format!("layout '{}' has no field named '{name}'", layout.name()),
                    )
                })?;
            let value = coerce(kind, item)
                .map_err(|msg| CliError::new(DATA_INVALID, format!("field '{name}': {msg}")))?;
            Ok((name.clone(), value))
        })
        .collect()
}

/// JSON rendering of a decoded value. Non-finite floats become `null`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::U8(v) => (*v).into(),
        Value::U16(v) => (*v).into(),
        Value::U32(v) => (*v).into(),
        Value::U64(v) => (*v).into(),
        Value::F32(v) => float(f64::from(*v)),
        Value::F64(v) => float(*v),
        Value::Str(v) => serde_json::Value::String(v.clone()),
    }
}

fn float(v: f64) -> serde_json::Value {
    Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
