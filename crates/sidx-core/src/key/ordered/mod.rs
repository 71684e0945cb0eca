//! Module: key::ordered
//! Responsibility: order-preserving encode/decode of one typed field.
//! Does not own: composite key assembly (see `key::codec`).
//! Boundary: the only place that knows per-type byte layouts.

mod error;
mod normalize;
mod parts;
mod semantics;

use crate::{
    key::KeyField,
    types::{LogicalType, Width},
    value::Value,
};

pub(crate) use parts::SEPARATOR;

pub use error::{KeyDecodeError, ValueEncodeError};

const NULL_FLAG: u8 = 0x00;
const PRESENT_FLAG: u8 = 0x01;
const CHAR_PAD: u8 = b' ';
const BINARY_PAD: u8 = 0x00;

///
/// FieldPosition
///
/// Where a field sits inside its composite key. Only ascending
/// variable-width fields in the `Last` position omit their separator.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldPosition {
    Inner,
    Last,
}

impl FieldPosition {
    #[must_use]
    pub const fn of(index: usize, len: usize) -> Self {
        if index + 1 == len {
            Self::Last
        } else {
            Self::Inner
        }
    }
}

const fn is_terminated(field: &KeyField, position: FieldPosition) -> bool {
    matches!(position, FieldPosition::Inner) || field.order.is_desc()
}

/// Encode one field value into `out`, applying null framing, separators and
/// DESC inversion. On error `out` is left exactly as it was.
pub fn encode_field(
    out: &mut Vec<u8>,
    field: &KeyField,
    value: &Value,
    position: FieldPosition,
) -> Result<(), ValueEncodeError> {
    let start = out.len();
    let result = encode_field_ascending(out, field, value, position);
    if result.is_err() {
        out.truncate(start);
        return result;
    }

    if field.order.is_desc() {
        parts::invert_in_place(&mut out[start..]);
    }

    Ok(())
}

/// Encode one field as a self-delimiting standalone byte sequence.
pub fn encode(value: &Value, field: &KeyField) -> Result<Vec<u8>, ValueEncodeError> {
    let mut out = Vec::new();
    encode_field(&mut out, field, value, FieldPosition::Inner)?;

    Ok(out)
}

fn encode_field_ascending(
    out: &mut Vec<u8>,
    field: &KeyField,
    value: &Value,
    position: FieldPosition,
) -> Result<(), ValueEncodeError> {
    match field.ty.width() {
        Width::Fixed(width) => {
            if value.is_null() {
                if !field.nullable {
                    return Err(ValueEncodeError::NullNotAllowed { ty: field.ty });
                }
                out.push(NULL_FLAG);
                out.resize(out.len() + width, 0);
                return Ok(());
            }

            if field.nullable {
                out.push(PRESENT_FLAG);
            }
            push_fixed_payload(out, field.ty, value)
        }
        Width::Variable => {
            if value.is_null() {
                if !field.nullable {
                    return Err(ValueEncodeError::NullNotAllowed { ty: field.ty });
                }
            } else {
                let payload = variable_payload(field.ty, value)?;
                parts::push_escaped(out, &payload);
            }

            if is_terminated(field, position) {
                out.push(SEPARATOR);
            }
            Ok(())
        }
    }
}

/// Decode one field starting at `offset`, returning the value and the number
/// of bytes consumed (separator included).
pub fn decode_field(
    bytes: &[u8],
    offset: usize,
    field: &KeyField,
    position: FieldPosition,
) -> Result<(Value, usize), KeyDecodeError> {
    let rest = bytes.get(offset..).ok_or(KeyDecodeError::Truncated)?;

    match field.ty.width() {
        Width::Fixed(width) => {
            let total = width + usize::from(field.nullable);
            let raw = rest.get(..total).ok_or(KeyDecodeError::Truncated)?;
            let mut ascending = raw.to_vec();
            if field.order.is_desc() {
                parts::invert_in_place(&mut ascending);
            }

            let payload = if field.nullable {
                match ascending[0] {
                    NULL_FLAG => {
                        if ascending[1..].iter().any(|&byte| byte != 0) {
                            return Err(KeyDecodeError::InvalidNullPadding);
                        }
                        return Ok((Value::Null, total));
                    }
                    PRESENT_FLAG => &ascending[1..],
                    other => return Err(KeyDecodeError::InvalidNullFlag(other)),
                }
            } else {
                ascending.as_slice()
            };

            Ok((decode_fixed_payload(field.ty, payload)?, total))
        }
        Width::Variable => {
            let (segment, consumed) = if is_terminated(field, position) {
                let separator = field.order.apply(SEPARATOR);
                let end = rest
                    .iter()
                    .position(|&byte| byte == separator)
                    .ok_or(KeyDecodeError::MissingTerminator)?;
                (&rest[..end], end + 1)
            } else {
                (rest, rest.len())
            };

            if segment.is_empty() {
                if !field.nullable {
                    return Err(KeyDecodeError::UnexpectedNull { ty: field.ty });
                }
                return Ok((Value::Null, consumed));
            }

            let mut ascending = segment.to_vec();
            if field.order.is_desc() {
                parts::invert_in_place(&mut ascending);
            }
            let payload = parts::unescape(&ascending)?;

            Ok((decode_variable_payload(field.ty, &payload)?, consumed))
        }
    }
}

/// Decode a standalone field produced by [`encode`].
pub fn decode(
    bytes: &[u8],
    offset: usize,
    field: &KeyField,
) -> Result<(Value, usize), KeyDecodeError> {
    decode_field(bytes, offset, field, FieldPosition::Inner)
}

/// Encode a non-null value into its stored cell form: the ascending payload
/// with no null flag, escaping or separator.
pub fn encode_cell(ty: LogicalType, value: &Value) -> Result<Vec<u8>, ValueEncodeError> {
    if value.is_null() {
        return Err(ValueEncodeError::NullNotAllowed { ty });
    }

    let mut out = Vec::new();
    match ty.width() {
        Width::Fixed(_) => push_fixed_payload(&mut out, ty, value)?,
        Width::Variable => out = variable_payload(ty, value)?,
    }

    Ok(out)
}

/// Decode a stored cell produced by [`encode_cell`].
pub fn decode_cell(ty: LogicalType, bytes: &[u8]) -> Result<Value, KeyDecodeError> {
    match ty.width() {
        Width::Fixed(width) => {
            if bytes.len() != width {
                return Err(KeyDecodeError::InvalidWidth {
                    expected: width,
                    found: bytes.len(),
                });
            }
            decode_fixed_payload(ty, bytes)
        }
        Width::Variable => decode_variable_payload(ty, bytes),
    }
}

fn int_in_range<T: TryFrom<i64>>(ty: LogicalType, value: &Value) -> Result<T, ValueEncodeError> {
    match value {
        Value::Int(v) => T::try_from(*v).map_err(|_| ValueEncodeError::OutOfRange { ty, value: *v }),
        other => Err(mismatch(ty, other)),
    }
}

const fn mismatch(ty: LogicalType, value: &Value) -> ValueEncodeError {
    ValueEncodeError::TypeMismatch {
        ty,
        kind: value.kind(),
    }
}

fn push_padded(
    out: &mut Vec<u8>,
    ty: LogicalType,
    bytes: &[u8],
    width: usize,
    pad: u8,
) -> Result<(), ValueEncodeError> {
    if bytes.len() > width {
        return Err(ValueEncodeError::TooWide {
            ty,
            len: bytes.len(),
        });
    }

    out.extend_from_slice(bytes);
    out.resize(out.len() + (width - bytes.len()), pad);

    Ok(())
}

fn push_fixed_payload(
    out: &mut Vec<u8>,
    ty: LogicalType,
    value: &Value,
) -> Result<(), ValueEncodeError> {
    match (ty, value) {
        (LogicalType::Boolean, Value::Bool(v)) => out.push(u8::from(*v)),
        (LogicalType::TinyInt, _) => {
            out.extend_from_slice(&semantics::ordered_i8_bytes(int_in_range(ty, value)?));
        }
        (LogicalType::SmallInt, _) => {
            out.extend_from_slice(&semantics::ordered_i16_bytes(int_in_range(ty, value)?));
        }
        (LogicalType::Integer, _) => {
            out.extend_from_slice(&semantics::ordered_i32_bytes(int_in_range(ty, value)?));
        }
        (LogicalType::BigInt, _) => {
            out.extend_from_slice(&semantics::ordered_i64_bytes(int_in_range(ty, value)?));
        }
        (LogicalType::Float, Value::Float32(v)) => {
            out.extend_from_slice(&semantics::ordered_f32_bytes(*v));
        }
        (LogicalType::Double, Value::Float64(v)) => {
            out.extend_from_slice(&semantics::ordered_f64_bytes(*v));
        }
        (LogicalType::Date, Value::Date(v)) => {
            out.extend_from_slice(&semantics::ordered_i32_bytes(*v));
        }
        (LogicalType::Timestamp, Value::Timestamp(v)) => {
            out.extend_from_slice(&semantics::ordered_i64_bytes(*v));
        }
        (LogicalType::Char(n), Value::Text(v)) => {
            push_padded(out, ty, v.as_bytes(), usize::from(n), CHAR_PAD)?;
        }
        (LogicalType::Binary(n), Value::Bytes(v)) => {
            push_padded(out, ty, v, usize::from(n), BINARY_PAD)?;
        }
        _ => return Err(mismatch(ty, value)),
    }

    Ok(())
}

fn variable_payload(ty: LogicalType, value: &Value) -> Result<Vec<u8>, ValueEncodeError> {
    match (ty, value) {
        (LogicalType::Varchar, Value::Text(v)) => Ok(v.as_bytes().to_vec()),
        (LogicalType::VarBinary, Value::Bytes(v)) => Ok(v.clone()),
        (LogicalType::Decimal, Value::Decimal(v)) => {
            let mut out = Vec::new();
            normalize::push_decimal_payload(&mut out, *v)?;
            Ok(out)
        }
        _ => Err(mismatch(ty, value)),
    }
}

fn array<const N: usize>(payload: &[u8]) -> Result<[u8; N], KeyDecodeError> {
    payload.try_into().map_err(|_| KeyDecodeError::InvalidWidth {
        expected: N,
        found: payload.len(),
    })
}

fn decode_fixed_payload(ty: LogicalType, payload: &[u8]) -> Result<Value, KeyDecodeError> {
    let value = match ty {
        LogicalType::Boolean => match payload {
            [0] => Value::Bool(false),
            [1] => Value::Bool(true),
            [other] => return Err(KeyDecodeError::InvalidBoolean(*other)),
            _ => return Err(KeyDecodeError::Truncated),
        },
        LogicalType::TinyInt => Value::Int(i64::from(semantics::i8_from_ordered(array(payload)?))),
        LogicalType::SmallInt => {
            Value::Int(i64::from(semantics::i16_from_ordered(array(payload)?)))
        }
        LogicalType::Integer => Value::Int(i64::from(semantics::i32_from_ordered(array(payload)?))),
        LogicalType::BigInt => Value::Int(semantics::i64_from_ordered(array(payload)?)),
        LogicalType::Float => Value::Float32(semantics::f32_from_ordered(array(payload)?)),
        LogicalType::Double => Value::Float64(semantics::f64_from_ordered(array(payload)?)),
        LogicalType::Date => Value::Date(semantics::i32_from_ordered(array(payload)?)),
        LogicalType::Timestamp => Value::Timestamp(semantics::i64_from_ordered(array(payload)?)),
        LogicalType::Char(_) => {
            let end = payload
                .iter()
                .rposition(|&byte| byte != CHAR_PAD)
                .map_or(0, |idx| idx + 1);
            let text = std::str::from_utf8(&payload[..end])
                .map_err(|_| KeyDecodeError::InvalidUtf8)?;
            Value::Text(text.to_string())
        }
        LogicalType::Binary(_) => Value::Bytes(payload.to_vec()),
        LogicalType::Varchar | LogicalType::VarBinary | LogicalType::Decimal => {
            return decode_variable_payload(ty, payload);
        }
    };

    Ok(value)
}

fn decode_variable_payload(ty: LogicalType, payload: &[u8]) -> Result<Value, KeyDecodeError> {
    match ty {
        LogicalType::Varchar => String::from_utf8(payload.to_vec())
            .map(Value::Text)
            .map_err(|_| KeyDecodeError::InvalidUtf8),
        LogicalType::VarBinary => Ok(Value::Bytes(payload.to_vec())),
        LogicalType::Decimal => normalize::decode_decimal_payload(payload).map(Value::Decimal),
        _ => decode_fixed_payload(ty, payload),
    }
}
