//! Module: key::ordered::normalize
//! Responsibility: normalized decimal payload encode/decode.
//! Does not own: variable-width escaping or DESC inversion.
//! Boundary: internal helper for ordered field encoding.

use crate::key::ordered::{
    KeyDecodeError, ValueEncodeError,
    parts::push_inverted,
    semantics::{i32_from_ordered, ordered_i32_bytes},
};
use rust_decimal::Decimal;

const NEGATIVE_MARKER: u8 = 0x00;
const ZERO_MARKER: u8 = 0x01;
const POSITIVE_MARKER: u8 = 0x02;

const DECIMAL_DIGIT_BUFFER_LEN: usize = 39;
const DECIMAL_MAX_SCALE: u32 = 28;
const EXPONENT_LEN: usize = 4;

const DECIMAL_POSITIVE_TERMINATOR: u8 = 0x00;
const DECIMAL_NEGATIVE_TERMINATOR: u8 = 0xFF;

// Decimal ordering is sign bucket + exponent + significant digits + terminator.
pub(super) fn push_decimal_payload(
    out: &mut Vec<u8>,
    value: Decimal,
) -> Result<(), ValueEncodeError> {
    let normalized = value.normalize();
    if normalized.is_zero() {
        out.push(ZERO_MARKER);
        return Ok(());
    }

    let mantissa = normalized.mantissa();
    let mut digits_buf = [0u8; DECIMAL_DIGIT_BUFFER_LEN];
    let digit_len = write_u128_decimal_digits(mantissa.unsigned_abs(), &mut digits_buf);
    let exponent = decimal_exponent(normalized.scale(), digit_len)?;

    let exponent_bytes = ordered_i32_bytes(exponent);
    let digits_bytes = &digits_buf[..digit_len];

    if mantissa.is_negative() {
        out.push(NEGATIVE_MARKER);
        push_inverted(out, &exponent_bytes);
        push_inverted(out, digits_bytes);
        out.push(DECIMAL_NEGATIVE_TERMINATOR);
    } else {
        out.push(POSITIVE_MARKER);
        out.extend_from_slice(&exponent_bytes);
        out.extend_from_slice(digits_bytes);
        out.push(DECIMAL_POSITIVE_TERMINATOR);
    }

    Ok(())
}

// Inverse of `push_decimal_payload`; the payload must be consumed exactly.
pub(super) fn decode_decimal_payload(payload: &[u8]) -> Result<Decimal, KeyDecodeError> {
    let (&marker, rest) = payload.split_first().ok_or(KeyDecodeError::InvalidDecimal)?;

    let negative = match marker {
        ZERO_MARKER if rest.is_empty() => return Ok(Decimal::ZERO),
        NEGATIVE_MARKER => true,
        POSITIVE_MARKER => false,
        _ => return Err(KeyDecodeError::InvalidDecimal),
    };

    if rest.len() < EXPONENT_LEN + 2 {
        return Err(KeyDecodeError::InvalidDecimal);
    }

    // Negative payloads are stored inverted; restore ascending bytes first.
    let restored: Vec<u8> = if negative {
        rest.iter().map(|byte| !byte).collect()
    } else {
        rest.to_vec()
    };

    let (exponent_bytes, tail) = restored.split_at(EXPONENT_LEN);
    let (&terminator, digits) = tail.split_last().ok_or(KeyDecodeError::InvalidDecimal)?;
    if terminator != DECIMAL_POSITIVE_TERMINATOR || digits.is_empty() {
        return Err(KeyDecodeError::InvalidDecimal);
    }

    let mut exponent_buf = [0u8; EXPONENT_LEN];
    exponent_buf.copy_from_slice(exponent_bytes);
    let exponent = i64::from(i32_from_ordered(exponent_buf));

    let mut mantissa: u128 = 0;
    for &digit in digits {
        if !digit.is_ascii_digit() {
            return Err(KeyDecodeError::InvalidDecimal);
        }
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(u128::from(digit - b'0')))
            .ok_or(KeyDecodeError::InvalidDecimal)?;
    }

    let digit_count = i64::try_from(digits.len()).map_err(|_| KeyDecodeError::InvalidDecimal)?;
    let mut scale = digit_count - 1 - exponent;
    while scale < 0 {
        mantissa = mantissa
            .checked_mul(10)
            .ok_or(KeyDecodeError::InvalidDecimal)?;
        scale += 1;
    }

    let scale = u32::try_from(scale).map_err(|_| KeyDecodeError::InvalidDecimal)?;
    if scale > DECIMAL_MAX_SCALE {
        return Err(KeyDecodeError::InvalidDecimal);
    }

    let signed = i128::try_from(mantissa).map_err(|_| KeyDecodeError::InvalidDecimal)?;
    let signed = if negative { -signed } else { signed };

    Decimal::try_from_i128_with_scale(signed, scale).map_err(|_| KeyDecodeError::InvalidDecimal)
}

fn write_u128_decimal_digits(mut value: u128, out: &mut [u8; DECIMAL_DIGIT_BUFFER_LEN]) -> usize {
    let mut write_idx = DECIMAL_DIGIT_BUFFER_LEN;

    loop {
        write_idx = write_idx.saturating_sub(1);
        let remainder = u8::try_from(value % 10).unwrap_or(0);
        out[write_idx] = b'0' + remainder;
        value /= 10;

        if value == 0 {
            break;
        }
    }

    let len = DECIMAL_DIGIT_BUFFER_LEN.saturating_sub(write_idx);
    out.copy_within(write_idx..DECIMAL_DIGIT_BUFFER_LEN, 0);
    len
}

fn decimal_exponent(scale: u32, digit_len: usize) -> Result<i32, ValueEncodeError> {
    if scale > DECIMAL_MAX_SCALE {
        return Err(ValueEncodeError::DecimalExponentOverflow);
    }

    let digit_count =
        u32::try_from(digit_len).map_err(|_| ValueEncodeError::DecimalExponentOverflow)?;
    let normalized_digits = digit_count
        .checked_sub(1)
        .ok_or(ValueEncodeError::DecimalExponentOverflow)?;

    let exponent = i64::from(normalized_digits) - i64::from(scale);

    i32::try_from(exponent).map_err(|_| ValueEncodeError::DecimalExponentOverflow)
}

///
/// TESTS
///
