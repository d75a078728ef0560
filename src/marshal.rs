//! Conversions between native values and Lua values.
//!
//! Nothing here keeps state between calls. Values created by [`encode`] are owned by
//! the caller and released as soon as they are dropped.

use crate::error::BridgeError;
use crate::value::{Arg, ResultKind, ResultValue};
use mlua::{Lua, Table, Value};

/// Turns one native argument into a Lua value. `position` is 1-based and only used
/// for error reporting.
pub fn encode(lua: &Lua, position: usize, arg: Arg<'_>) -> Result<Value, BridgeError> {
    match arg {
        Arg::Str(s) => lua
            .create_string(s)
            .map(Value::String)
            .map_err(|err| BridgeError::Encoding {
                position,
                reason: err.to_string(),
            }),
        Arg::Int(n) => Ok(Value::Integer(n)),
        Arg::Float(x) => Ok(Value::Number(x)),
    }
}

/// Converts a returned Lua value into the requested kind.
///
/// A missing return value must be handled by the caller before decoding; `nil` here
/// is simply a value of the wrong kind.
pub fn decode(value: Value, kind: ResultKind) -> Result<ResultValue, BridgeError> {
    match kind {
        ResultKind::Unit => Ok(ResultValue::Absent),
        ResultKind::Int => decode_int(&value).map(ResultValue::Int),
        ResultKind::Float => match value {
            Value::Number(x) => Ok(ResultValue::Float(x)),
            Value::Integer(n) => Ok(ResultValue::Float(n as f64)),
            other => Err(mismatch(kind, &other)),
        },
        ResultKind::StringList => match value {
            Value::Table(table) => decode_strings(&table).map(ResultValue::StringList),
            other => Err(mismatch(kind, &other)),
        },
    }
}

fn decode_int(value: &Value) -> Result<i64, BridgeError> {
    match *value {
        Value::Integer(n) => Ok(n),
        // Lua 5.4 division always yields a float, so whole floats count as integers.
        Value::Number(x) if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 => {
            Ok(x as i64)
        }
        Value::Number(x) => Err(BridgeError::Decoding(format!(
            "expected an integer, got the number {x}"
        ))),
        ref other => Err(mismatch(ResultKind::Int, other)),
    }
}

/// Reads `table[1..=#table]` in order. Any element that is not a string fails the
/// whole decode.
fn decode_strings(table: &Table) -> Result<Vec<String>, BridgeError> {
    let len = table.raw_len();
    let mut items = Vec::with_capacity(len);
    for position in 1..=len {
        let item: Value = table
            .raw_get(position)
            .map_err(|err| BridgeError::Decoding(err.to_string()))?;
        let text = match item {
            Value::String(text) => text,
            other => {
                return Err(BridgeError::Decoding(format!(
                    "list element {position} is {}, not a string",
                    other.type_name()
                )));
            }
        };
        let text = text.to_str().map_err(|_| {
            BridgeError::Decoding(format!("list element {position} is not valid UTF-8"))
        })?;
        items.push(String::from(&*text));
    }
    Ok(items)
}

fn mismatch(kind: ResultKind, value: &Value) -> BridgeError {
    BridgeError::Decoding(format!("expected {kind}, got {}", value.type_name()))
}
