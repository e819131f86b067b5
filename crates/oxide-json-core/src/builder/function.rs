//! Declarations of the JSON SQL functions.

use super::expr::ExprBuilder;
use super::value::JsonKey;
use crate::types::DataType;

/// A SQL function with a declared return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFunction {
    /// Function name as written in SQL.
    pub name: &'static str,
    /// Type of the call expression.
    pub return_type: DataType,
}

impl SqlFunction {
    /// `to_json(value)`.
    pub const TO_JSON: Self = Self {
        name: "to_json",
        return_type: DataType::Json,
    };

    /// `json_array_length(array)`.
    pub const JSON_ARRAY_LENGTH: Self = Self {
        name: "json_array_length",
        return_type: DataType::Integer,
    };

    /// `json_extract_path(doc, key, ...)`.
    pub const JSON_EXTRACT_PATH: Self = Self {
        name: "json_extract_path",
        return_type: DataType::Json,
    };

    /// `json_extract_path_text(doc, key, ...)`.
    pub const JSON_EXTRACT_PATH_TEXT: Self = Self {
        name: "json_extract_path_text",
        return_type: DataType::Text,
    };

    /// Builds a call expression typed with the declared return type.
    #[must_use]
    pub fn call(&self, args: Vec<ExprBuilder>) -> ExprBuilder {
        ExprBuilder::call(self.name, args, self.return_type.clone())
    }
}

/// `to_json(expr)`.
#[must_use]
pub fn to_json(expr: impl Into<ExprBuilder>) -> ExprBuilder {
    SqlFunction::TO_JSON.call(vec![expr.into()])
}

/// `json_array_length(expr)`.
#[must_use]
pub fn json_array_length(expr: impl Into<ExprBuilder>) -> ExprBuilder {
    SqlFunction::JSON_ARRAY_LENGTH.call(vec![expr.into()])
}

/// `json_extract_path(expr, keys...)`. Path keys are bound as text.
#[must_use]
pub fn json_extract_path<K: Into<JsonKey> + Clone>(
    expr: impl Into<ExprBuilder>,
    keys: &[K],
) -> ExprBuilder {
    SqlFunction::JSON_EXTRACT_PATH.call(path_args(expr.into(), keys))
}

/// `json_extract_path_text(expr, keys...)`. Path keys are bound as text.
#[must_use]
pub fn json_extract_path_text<K: Into<JsonKey> + Clone>(
    expr: impl Into<ExprBuilder>,
    keys: &[K],
) -> ExprBuilder {
    SqlFunction::JSON_EXTRACT_PATH_TEXT.call(path_args(expr.into(), keys))
}

fn path_args<K: Into<JsonKey> + Clone>(expr: ExprBuilder, keys: &[K]) -> Vec<ExprBuilder> {
    let mut args = vec![expr];
    args.extend(
        keys.iter()
            .cloned()
            .map(|key| ExprBuilder::value(key.into().as_path_segment())),
    );
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{json_col, SqlValue};

    #[test]
    fn test_declared_return_types() {
        assert_eq!(to_json(json_col("data")).data_type(), Some(&DataType::Json));
        assert_eq!(
            json_array_length(json_col("tags")).data_type(),
            Some(&DataType::Integer)
        );
        assert_eq!(
            json_extract_path(json_col("data"), &["a"]).data_type(),
            Some(&DataType::Json)
        );
        assert_eq!(
            json_extract_path_text(json_col("data"), &["a"]).data_type(),
            Some(&DataType::Text)
        );
    }

    #[test]
    fn test_extract_path_binds_keys_as_text() {
        let keys = [JsonKey::from("items"), JsonKey::from(3)];
        let expr = json_extract_path_text(json_col("data"), &keys);
        assert_eq!(expr.sql(), "json_extract_path_text(data, ?, ?)");
        assert_eq!(
            expr.params(),
            &[
                SqlValue::Text(String::from("items")),
                SqlValue::Text(String::from("3"))
            ]
        );
    }

    #[test]
    fn test_call_composes_with_operators() {
        let expr = json_array_length(json_col("data").get_value("tags")).gt(2);
        assert_eq!(expr.sql(), "json_array_length(data -> ?) > ?");
        assert_eq!(expr.params().len(), 2);
        assert_eq!(expr.data_type(), Some(&DataType::Boolean));
    }
}
