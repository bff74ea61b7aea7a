//! Decimal amounts sent as numbers or numeric strings.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::{DecodeError, DecodeReason, TargetType};

/// Nullable decimal: null, missing, or empty string decode to `None`.
pub fn decode_decimal(value: &Value) -> Result<Option<Decimal>, DecodeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse(trimmed)
                .map(Some)
                .ok_or_else(|| fail(value, DecodeReason::Invalid))
        }
        // A JSON number that rust_decimal cannot hold is too large or too precise.
        Value::Number(n) => parse(&n.to_string())
            .map(Some)
            .ok_or_else(|| fail(value, DecodeReason::OutOfRange)),
        _ => Err(fail(value, DecodeReason::UnexpectedType)),
    }
}

/// Non-nullable decimal: null, missing, or empty string decode to zero.
pub fn decode_decimal_or_zero(value: &Value) -> Result<Decimal, DecodeError> {
    Ok(decode_decimal(value)?.unwrap_or(Decimal::ZERO))
}

/// Plain or scientific notation.
pub(super) fn parse(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn fail(value: &Value, reason: DecodeReason) -> DecodeError {
    DecodeError::new(value, TargetType::Decimal, reason)
}
