//! SQL values and parameter handling.

/// A SQL value that can be used as a parameter.
///
/// JSON payloads travel as [`SqlValue::Text`] holding the encoded document.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

/// A step into a JSON document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JsonKey {
    /// Object key.
    Key(String),
    /// Array index. Negative indexes count from the end where the
    /// database supports it.
    Index(i64),
}

impl JsonKey {
    /// Renders the step as path-array text.
    #[must_use]
    pub fn as_path_segment(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }
}

impl From<&str> for JsonKey {
    fn from(key: &str) -> Self {
        Self::Key(String::from(key))
    }
}

impl From<String> for JsonKey {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for JsonKey {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for JsonKey {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<usize> for JsonKey {
    fn from(index: usize) -> Self {
        Self::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl ToSqlValue for JsonKey {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Self::Key(key) => SqlValue::Text(key),
            Self::Index(index) => SqlValue::Int(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_key_binds_by_kind() {
        assert_eq!(
            JsonKey::from("name").to_sql_value(),
            SqlValue::Text(String::from("name"))
        );
        assert_eq!(JsonKey::from(2).to_sql_value(), SqlValue::Int(2));
        assert_eq!(JsonKey::from(-1_i64).as_path_segment(), "-1");
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some("x").to_sql_value(), SqlValue::Text(String::from("x")));
    }
}
