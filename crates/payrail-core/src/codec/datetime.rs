//! Date-times in ISO-8601 / RFC 3339, a few local layouts, or Unix epoch seconds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::{DecodeError, DecodeReason, TargetType};

/// Naive layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

/// ISO-8601 offsets that RFC 3339 rejects, such as `+0200`.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Seconds from 0001-01-01T00:00:00Z to the Unix epoch.
const MIN_DATETIME_SECS: i64 = -62_135_596_800;

/// Sentinel for an empty date string in a non-nullable field.
pub fn min_datetime() -> DateTime<Utc> {
    DateTime::from_timestamp(MIN_DATETIME_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub fn is_min_datetime(value: &DateTime<Utc>) -> bool {
    *value == min_datetime()
}

/// Parse a date-time string. Offsets are honored; naive values are UTC; an
/// all-digit string, optionally negative, is Unix epoch seconds.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if is_epoch(text) {
        return text.parse::<i64>().ok().and_then(from_epoch);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Digits with an optional leading minus.
fn is_epoch(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn from_epoch(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Non-nullable date-time: an empty string decodes to `min_datetime()`.
/// Null is a failure.
pub fn decode_datetime(value: &Value) -> Result<DateTime<Utc>, DecodeError> {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(min_datetime()),
        Value::Null => Err(fail(value, DecodeReason::UnexpectedType)),
        other => decode_present(other),
    }
}

/// Nullable date-time: null, missing, or empty string decode to `None`.
pub fn decode_opt_datetime(value: &Value) -> Result<Option<DateTime<Utc>>, DecodeError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        other => decode_present(other).map(Some),
    }
}

fn decode_present(value: &Value) -> Result<DateTime<Utc>, DecodeError> {
    match value {
        Value::String(s) => parse_datetime(s).ok_or_else(|| fail(value, DecodeReason::Invalid)),
        Value::Number(n) => {
            let secs = n.as_i64().ok_or_else(|| fail(value, DecodeReason::Invalid))?;
            from_epoch(secs).ok_or_else(|| fail(value, DecodeReason::OutOfRange))
        }
        _ => Err(fail(value, DecodeReason::UnexpectedType)),
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-01T12:00:00.000Z`.
pub fn encode_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn fail(value: &Value, reason: DecodeReason) -> DecodeError {
    DecodeError::new(value, TargetType::DateTime, reason)
}
