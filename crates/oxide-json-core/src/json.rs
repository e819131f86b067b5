//! The value model carried by JSON columns.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::Number;

use crate::codec;

/// Object representation. Keys are kept sorted.
pub type Map = BTreeMap<String, JsonValue>;

/// A JSON value, extended with the two rich leaves the payload codec knows
/// about.
///
/// `Timestamp` round-trips through the tagged-object convention.
/// `Decimal` is encode-only: it is written as a float literal and therefore
/// decodes as a [`JsonValue::Number`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    /// `null`.
    #[default]
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// A finite number.
    Number(Number),
    /// A string.
    String(String),
    /// A naive timestamp, stored as `{"__class__": "datetime", ...}`.
    Timestamp(NaiveDateTime),
    /// An arbitrary precision decimal, stored as a float.
    Decimal(BigDecimal),
    /// An ordered sequence.
    Array(Vec<JsonValue>),
    /// A mapping from string keys.
    Object(Map),
}

/// Container shape of a value, used to pick a mutation-tracking wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Anything that is not a container.
    Scalar,
    /// An object.
    Mapping,
    /// An array.
    Sequence,
}

impl JsonValue {
    /// Returns the container shape of this value.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Object(_) => Shape::Mapping,
            Self::Array(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }

    /// Returns a short name of the value's kind, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Decimal(_) => "decimal",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns true for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number as `i64`, if it is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the number as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is one.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Vec<Self>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => codec::timestamp::serialize(ts, serializer),
            Self::Decimal(d) => codec::decimal::serialize(d, serializer),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(map) => serializer.collect_map(map),
        }
    }
}

impl JsonValue {
    /// Plain `serde_json` form used for display. Mirrors the payload
    /// encoding, except that a decimal outside the `f64` range is kept as
    /// its decimal text in a string.
    fn to_display_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Timestamp(ts) => {
                let mut tagged = serde_json::Map::new();
                tagged.insert(codec::CLASS_KEY.to_string(), codec::DATETIME_TAG.into());
                tagged.insert(
                    codec::VALUE_KEY.to_string(),
                    codec::format_timestamp(ts).into(),
                );
                serde_json::Value::Object(tagged)
            }
            Self::Decimal(d) => d
                .to_f64()
                .and_then(Number::from_f64)
                .map_or_else(
                    || serde_json::Value::String(d.to_string()),
                    serde_json::Value::Number,
                ),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_display_json).collect())
            }
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_display_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_json())
    }
}

impl From<serde_json::Value> for JsonValue {
    /// Converts a plain `serde_json` value. Tagged objects are kept as
    /// objects; use [`codec::decode`] to revive them.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for JsonValue {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDateTime> for JsonValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<BigDecimal> for JsonValue {
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<JsonValue>> From<HashSet<T>> for JsonValue {
    /// Sets have no JSON form; they become arrays in iteration order,
    /// which for a hash set is unspecified.
    fn from(value: HashSet<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<JsonValue>> From<BTreeSet<T>> for JsonValue {
    /// Ordered sets become arrays in ascending order.
    fn from(value: BTreeSet<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<Self> for JsonValue {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}
