//! Integers sent as numbers, numeric strings, or whole-valued decimals.

use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use super::decimal;
use super::{DecodeError, DecodeReason, TargetType};

pub fn decode_i64(value: &Value) -> Result<i64, DecodeError> {
    integral(value, TargetType::Int64)
}

pub fn decode_i32(value: &Value) -> Result<i32, DecodeError> {
    let n = integral(value, TargetType::Int32)?;
    i32::try_from(n).map_err(|_| DecodeError::new(value, TargetType::Int32, DecodeReason::OutOfRange))
}

/// Nullable int64: null, missing, or empty string decode to `None`.
pub fn decode_opt_i64(value: &Value) -> Result<Option<i64>, DecodeError> {
    if is_blank(value) {
        return Ok(None);
    }
    decode_i64(value).map(Some)
}

/// Nullable int32: null, missing, or empty string decode to `None`.
pub fn decode_opt_i32(value: &Value) -> Result<Option<i32>, DecodeError> {
    if is_blank(value) {
        return Ok(None);
    }
    decode_i32(value).map(Some)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn integral(value: &Value, target: TargetType) -> Result<i64, DecodeError> {
    let text = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.to_string()
        }
        Value::String(s) => s.trim().to_string(),
        _ => return Err(DecodeError::new(value, target, DecodeReason::UnexpectedType)),
    };
    if let Ok(i) = text.parse::<i64>() {
        return Ok(i);
    }
    let d = decimal::parse(&text)
        .ok_or_else(|| DecodeError::new(value, target, DecodeReason::Invalid))?;
    if !d.fract().is_zero() {
        return Err(DecodeError::new(value, target, DecodeReason::PrecisionLoss));
    }
    d.to_i64()
        .ok_or_else(|| DecodeError::new(value, target, DecodeReason::OutOfRange))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_string_decodes() {
        assert_eq!(decode_i64(&json!("123")).unwrap(), 123);
        assert_eq!(decode_i32(&json!(" 123 ")).unwrap(), 123);
        assert_eq!(decode_i64(&json!(-7)).unwrap(), -7);
    }

    #[test]
    fn whole_valued_decimals_decode() {
        assert_eq!(decode_i64(&json!("123.0")).unwrap(), 123);
        assert_eq!(decode_i32(&json!("1.2e2")).unwrap(), 120);
        let v: Value = serde_json::from_str("42.000").unwrap();
        assert_eq!(decode_i64(&v).unwrap(), 42);
    }

    #[test]
    fn fractional_values_are_precision_loss() {
        let err = decode_i64(&json!("123.5")).unwrap_err();
        assert_eq!(err.reason, DecodeReason::PrecisionLoss);
        assert_eq!(err.raw, "123.5");
        let v: Value = serde_json::from_str("7.25").unwrap();
        let err = decode_i32(&v).unwrap_err();
        assert_eq!(err.reason, DecodeReason::PrecisionLoss);
        assert_eq!(err.target, TargetType::Int32);
    }

    #[test]
    fn out_of_range_fails() {
        let err = decode_i32(&json!("3000000000")).unwrap_err();
        assert_eq!(err.reason, DecodeReason::OutOfRange);
        let err = decode_i64(&json!("99999999999999999999")).unwrap_err();
        assert_eq!(err.reason, DecodeReason::OutOfRange);
    }

    #[test]
    fn garbage_and_blank() {
        assert_eq!(decode_i64(&json!("12abc")).unwrap_err().reason, DecodeReason::Invalid);
        assert_eq!(decode_i64(&json!("")).unwrap_err().reason, DecodeReason::Invalid);
        assert_eq!(
            decode_i64(&Value::Null).unwrap_err().reason,
            DecodeReason::UnexpectedType
        );
        assert_eq!(decode_opt_i64(&json!("")).unwrap(), None);
        assert_eq!(decode_opt_i32(&Value::Null).unwrap(), None);
        assert_eq!(decode_opt_i32(&json!("5")).unwrap(), Some(5));
    }
}
