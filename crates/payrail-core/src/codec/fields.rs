//! Serde adapters for DTO fields, used as `#[serde(default, with = "...")]`.
//!
//! Deserialization goes through the tolerant decoders. Serialization is
//! canonical: decimals as exact JSON numbers, integers as numbers, dates as
//! ISO-8601 UTC with milliseconds.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::str::FromStr;

fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
    Value::deserialize(d)
}

fn exact_number<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    match Number::from_str(&value.to_string()) {
        Ok(n) => n.serialize(s),
        Err(e) => Err(<S::Error as serde::ser::Error>::custom(e)),
    }
}

pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        exact_number(value, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        crate::codec::decode_decimal_or_zero(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod option_decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => exact_number(v, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        crate::codec::decode_decimal(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod int32 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i32(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        crate::codec::decode_i32(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod option_int32 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i32>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_i32(*v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        crate::codec::decode_opt_i32(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod int64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        crate::codec::decode_i64(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod option_int64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_i64(*v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        crate::codec::decode_opt_i64(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

/// Required date-time. A missing field should default to `min_datetime()`,
/// either via `default = "crate::codec::min_datetime"` or the struct's
/// `Default`, so it matches the empty-string case.
pub mod datetime {
    use super::*;
    use chrono::{DateTime, Utc};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&crate::codec::encode_datetime(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        crate::codec::decode_datetime(&raw(d)?).map_err(serde::de::Error::custom)
    }
}

pub mod option_datetime {
    use super::*;
    use chrono::{DateTime, Utc};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&crate::codec::encode_datetime(v)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        crate::codec::decode_opt_datetime(&raw(d)?).map_err(serde::de::Error::custom)
    }
}
