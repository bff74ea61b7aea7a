//! Tolerant decoding of loosely typed wire values.
//!
//! The upstream API sends numbers as strings, dates in several layouts, and
//! Unix timestamps. Decoders here accept all of those and produce canonical
//! values, or a `DecodeError` naming the raw value and the target type. A
//! decode failure is never turned into a default, with two exceptions:
//! null/empty decimals (`None` or zero) and empty date strings (the minimum
//! date sentinel).

mod datetime;
mod decimal;
pub mod fields;
mod integer;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub use datetime::{
    decode_datetime, decode_opt_datetime, encode_datetime, is_min_datetime, min_datetime,
    parse_datetime,
};
pub use decimal::{decode_decimal, decode_decimal_or_zero};
pub use integer::{decode_i32, decode_i64, decode_opt_i32, decode_opt_i64};

/// Canonical type a wire value is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Decimal,
    Int32,
    Int64,
    DateTime,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Decimal => write!(f, "decimal"),
            TargetType::Int32 => write!(f, "int32"),
            TargetType::Int64 => write!(f, "int64"),
            TargetType::DateTime => write!(f, "date-time"),
        }
    }
}

/// Why a value could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeReason {
    /// Not parseable as the target type.
    Invalid,
    /// Has a fractional part but the target is an integer.
    PrecisionLoss,
    /// Parseable, but outside the target's range.
    OutOfRange,
    /// JSON type that can never hold the target (bool, array, object, or null
    /// where a value is required).
    UnexpectedType,
}

impl fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeReason::Invalid => write!(f, "invalid format"),
            DecodeReason::PrecisionLoss => write!(f, "precision loss"),
            DecodeReason::OutOfRange => write!(f, "out of range"),
            DecodeReason::UnexpectedType => write!(f, "unexpected JSON type"),
        }
    }
}

/// A wire value that could not be decoded into its target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {raw:?} as {target}: {reason}")]
pub struct DecodeError {
    pub raw: String,
    pub target: TargetType,
    pub reason: DecodeReason,
}

impl DecodeError {
    pub(crate) fn new(value: &Value, target: TargetType, reason: DecodeReason) -> Self {
        Self {
            raw: raw_text(value),
            target,
            reason,
        }
    }
}

/// Text of a wire value as it appeared (strings without quotes).
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A successfully decoded scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedScalar {
    Decimal(Decimal),
    Int32(i32),
    Int64(i64),
    Instant(DateTime<Utc>),
}

/// Decode a wire value into the non-nullable form of `target`.
pub fn decode(value: &Value, target: TargetType) -> Result<DecodedScalar, DecodeError> {
    Ok(match target {
        TargetType::Decimal => DecodedScalar::Decimal(decode_decimal_or_zero(value)?),
        TargetType::Int32 => DecodedScalar::Int32(decode_i32(value)?),
        TargetType::Int64 => DecodedScalar::Int64(decode_i64(value)?),
        TargetType::DateTime => DecodedScalar::Instant(decode_datetime(value)?),
    })
}
