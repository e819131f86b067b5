//! JSON payload codec.
//!
//! Payloads are plain JSON text with two conventions on top:
//!
//! - decimals are written as float literals (precision beyond `f64` is lost),
//! - timestamps are written as a tagged object
//!   `{"__class__": "datetime", "__value__": "2024-01-02T03:04:05.000006Z"}`.
//!
//! [`decode`] revives tagged objects bottom-up. A `datetime` tag must match
//! `%Y-%m-%dT%H:%M:%S.%fZ` exactly, fractional seconds included. A `Decimal`
//! tag decodes as a float. Objects with any other tag stay plain objects.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;
use serde::Serialize;
use serde_json::Number;

use crate::error::{CodecError, Result};
use crate::json::{JsonValue, Map};

/// Key holding the tag of a tagged object.
pub const CLASS_KEY: &str = "__class__";

/// Key holding the payload of a tagged object.
pub const VALUE_KEY: &str = "__value__";

/// Tag of an encoded timestamp.
pub const DATETIME_TAG: &str = "datetime";

/// Tag of an encoded decimal.
pub const DECIMAL_TAG: &str = "Decimal";

/// Format written for timestamps: always six fractional digits and a `Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}T\d{1,2}:\d{1,2}:\d{1,2}\.\d{1,6}Z$")
        .expect("timestamp pattern is valid")
});

/// Encodes a value as JSON payload text.
///
/// Fails with [`CodecError::Unsupported`] when the value has no JSON
/// representation, such as a map with non-string keys or a decimal too
/// large for a float.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| CodecError::Unsupported(e.to_string()))
}

/// Decodes JSON payload text, reviving tagged objects.
pub fn decode(text: &str) -> Result<JsonValue> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    revive(raw)
}

/// Revives tagged objects in an already parsed value.
pub fn revive(raw: serde_json::Value) -> Result<JsonValue> {
    match raw {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(revive)
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        serde_json::Value::Object(entries) => {
            let map = entries
                .into_iter()
                .map(|(key, value)| Ok((key, revive(value)?)))
                .collect::<Result<Map>>()?;
            object_hook(map)
        }
        scalar => Ok(JsonValue::from(scalar)),
    }
}

fn object_hook(map: Map) -> Result<JsonValue> {
    match map.get(CLASS_KEY).and_then(JsonValue::as_str) {
        Some(DATETIME_TAG) => match map.get(VALUE_KEY) {
            Some(JsonValue::String(text)) => parse_timestamp(text).map(JsonValue::Timestamp),
            _ => Err(CodecError::MissingTaggedValue {
                class: DATETIME_TAG.to_string(),
            }),
        },
        Some(DECIMAL_TAG) => match map.get(VALUE_KEY) {
            Some(JsonValue::String(text)) => float_value(text),
            Some(JsonValue::Number(n)) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| CodecError::InvalidDecimal(n.to_string())),
            _ => Err(CodecError::MissingTaggedValue {
                class: DECIMAL_TAG.to_string(),
            }),
        },
        _ => Ok(JsonValue::Object(map)),
    }
}

fn float_value(text: &str) -> Result<JsonValue> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(JsonValue::Number)
        .ok_or_else(|| CodecError::InvalidDecimal(text.to_string()))
}

/// Parses a stored timestamp, strictly in `%Y-%m-%dT%H:%M:%S.%fZ` form.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let invalid = || CodecError::InvalidTimestamp {
        value: text.to_string(),
    };
    if !TIMESTAMP_SHAPE.is_match(text) {
        return Err(invalid());
    }
    let ts = NaiveDateTime::parse_from_str(text, TIMESTAMP_PARSE_FORMAT).map_err(|_| invalid())?;
    // chrono reads a seconds field of 60 as a leap second.
    if ts.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(ts)
}

/// Formats a timestamp the way it is stored inside a tagged object.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter writing a `NaiveDateTime` as a tagged timestamp object.
///
/// ```rust
/// use chrono::NaiveDateTime;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "oxide_json_core::codec::timestamp")]
///     at: NaiveDateTime,
/// }
/// ```
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp, CLASS_KEY, DATETIME_TAG, VALUE_KEY};

    #[derive(Deserialize)]
    struct Tagged {
        #[serde(rename = "__class__")]
        class: String,
        #[serde(rename = "__value__")]
        value: String,
    }

    /// Writes `{"__class__": "datetime", "__value__": "..."}`.
    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(CLASS_KEY, DATETIME_TAG)?;
        map.serialize_entry(VALUE_KEY, &format_timestamp(ts))?;
        map.end()
    }

    /// Reads a tagged timestamp object.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let tagged = Tagged::deserialize(deserializer)?;
        if tagged.class != DATETIME_TAG {
            return Err(D::Error::custom(format!(
                "expected a '{DATETIME_TAG}' tagged object, found '{}'",
                tagged.class
            )));
        }
        parse_timestamp(&tagged.value).map_err(D::Error::custom)
    }
}

/// Serde adapter writing a `BigDecimal` as a float literal.
pub mod decimal {
    use std::str::FromStr;

    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes the decimal as an `f64`.
    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        match value.to_f64().filter(|f| f.is_finite()) {
            Some(f) => serializer.serialize_f64(f),
            None => Err(S::Error::custom(format!("Decimal('{value}')"))),
        }
    }

    /// Reads a float literal back into a decimal.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let f = f64::deserialize(deserializer)?;
        BigDecimal::from_str(&f.to_string()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::str::FromStr;

    fn ts(micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_micro_opt(8, 15, 42, micro)
            .unwrap()
    }

    #[test]
    fn test_encode_timestamp_is_tagged() {
        let text = encode(&JsonValue::from(ts(7))).unwrap();
        assert_eq!(
            text,
            r#"{"__class__":"datetime","__value__":"2023-11-05T08:15:42.000007Z"}"#
        );
    }

    #[test]
    fn test_encode_decimal_as_float() {
        let value = JsonValue::from(BigDecimal::from_str("3.14").unwrap());
        assert_eq!(encode(&value).unwrap(), "3.14");
    }

    #[test]
    fn test_encode_rejects_non_string_keys() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "pair");
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported(_)));
    }

    #[test]
    fn test_decode_nested_timestamp() {
        let text = r#"{"events": [{"at": {"__class__": "datetime", "__value__": "2023-11-05T08:15:42.5Z"}}]}"#;
        let value = decode(text).unwrap();
        let at = value.get("events").and_then(JsonValue::as_array).unwrap()[0]
            .get("at")
            .and_then(JsonValue::as_timestamp)
            .copied();
        assert_eq!(at, Some(ts(500_000)));
    }

    #[test]
    fn test_decode_rejects_missing_fraction() {
        let text = r#"{"__class__": "datetime", "__value__": "2023-11-05T08:15:42Z"}"#;
        assert!(matches!(
            decode(text),
            Err(CodecError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_zone_marker() {
        let text = r#"{"__class__": "datetime", "__value__": "2023-11-05T08:15:42.000001"}"#;
        assert!(decode(text).is_err());
    }

    #[test]
    fn test_decode_rejects_impossible_date() {
        let text = r#"{"__class__": "datetime", "__value__": "2023-13-05T08:15:42.000001Z"}"#;
        assert!(matches!(
            decode(text),
            Err(CodecError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_leap_second() {
        let text = r#"{"__class__": "datetime", "__value__": "2024-01-01T23:59:60.000000Z"}"#;
        assert!(matches!(
            decode(text),
            Err(CodecError::InvalidTimestamp { .. })
        ));
        assert!(parse_timestamp("2024-01-01T23:59:59.999999Z").is_ok());
    }

    #[test]
    fn test_decode_datetime_without_value() {
        let text = r#"{"__class__": "datetime"}"#;
        assert!(matches!(
            decode(text),
            Err(CodecError::MissingTaggedValue { .. })
        ));
    }

    #[test]
    fn test_decode_decimal_tag() {
        let value = decode(r#"{"__class__": "Decimal", "__value__": "2.50"}"#).unwrap();
        assert_eq!(value, JsonValue::from(2.5));
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let text = r#"{"__class__": "uuid", "__value__": "abc"}"#;
        let value = decode(text).unwrap();
        assert_eq!(
            value,
            JsonValue::from(json!({"__class__": "uuid", "__value__": "abc"}))
        );
    }

    #[test]
    fn test_decode_syntax_error() {
        assert!(matches!(decode("{\"a\": "), Err(CodecError::Syntax(_))));
    }

    #[test]
    fn test_serde_adapters() {
        #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Entry {
            #[serde(with = "timestamp")]
            at: NaiveDateTime,
            #[serde(with = "decimal")]
            amount: BigDecimal,
        }

        let entry = Entry {
            at: ts(123_456),
            amount: BigDecimal::from_str("19.99").unwrap(),
        };
        let text = encode(&entry).unwrap();
        assert_eq!(
            text,
            r#"{"at":{"__class__":"datetime","__value__":"2023-11-05T08:15:42.123456Z"},"amount":19.99}"#
        );
        let back: Entry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, entry);
    }
}
