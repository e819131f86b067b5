//! JSON path operators and result type inference for custom operators.

use super::expr::{Column, ExprBuilder};
use super::value::{JsonKey, SqlValue};
use crate::types::DataType;

/// Infers the result type of binary operators applied to JSON operands.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonComparator;

impl JsonComparator {
    const COMPARISONS: &'static [&'static str] = &[
        "=", "!=", "<>", "<", ">", "<=", ">=", "LIKE", "NOT LIKE", "IS", "IS NOT", "@>", "<@",
    ];

    /// Returns the result type of `left <op> right`.
    ///
    /// `->` and `#>` produce JSON, `->>` and `#>>` produce text. Other
    /// operators follow the concatenable default: comparisons produce a
    /// boolean, everything else keeps the left operand's type.
    #[must_use]
    pub fn adapt_operator(op: &str, left: Option<&DataType>) -> Option<DataType> {
        match op.trim() {
            "->" | "#>" => Some(DataType::Json),
            "->>" | "#>>" => Some(DataType::Text),
            other if Self::is_comparison(other) => Some(DataType::Boolean),
            _ => left.cloned(),
        }
    }

    fn is_comparison(op: &str) -> bool {
        Self::COMPARISONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(op))
    }
}

/// Renders path steps as a PostgreSQL text array literal, e.g. `{"a","0"}`.
#[must_use]
pub fn path_literal(keys: &[JsonKey]) -> String {
    let items: Vec<String> = keys
        .iter()
        .map(|key| {
            let segment = key.as_path_segment();
            format!("\"{}\"", segment.replace('\\', "\\\\").replace('"', "\\\""))
        })
        .collect();
    format!("{{{}}}", items.join(","))
}

impl ExprBuilder {
    /// Applies a binary operator, inferring the result type from the
    /// operator and this expression's type.
    #[must_use]
    pub fn op(self, token: &str, other: impl Into<Self>) -> Self {
        let inferred = JsonComparator::adapt_operator(token, self.data_type());
        Self::binary(self, token, other.into()).with_inferred(inferred)
    }

    /// `expr ->> key`: the element as text.
    #[must_use]
    pub fn get_text(self, key: impl Into<JsonKey>) -> Self {
        self.op("->>", Self::value(key.into()))
    }

    /// `expr -> key`: the element as JSON, so it can be indexed further.
    #[must_use]
    pub fn get_value(self, key: impl Into<JsonKey>) -> Self {
        self.op("->", Self::value(key.into()))
    }

    /// `expr #> CAST(? AS TEXT[])`: the element at a path as JSON.
    #[must_use]
    pub fn get_path<K: Into<JsonKey> + Clone>(self, keys: &[K]) -> Self {
        self.op("#>", Self::path_param(keys))
    }

    /// `expr #>> CAST(? AS TEXT[])`: the element at a path as text.
    #[must_use]
    pub fn get_path_text<K: Into<JsonKey> + Clone>(self, keys: &[K]) -> Self {
        self.op("#>>", Self::path_param(keys))
    }

    // PostgreSQL has no `json #> text` operator, so the path is cast.
    fn path_param<K: Into<JsonKey> + Clone>(keys: &[K]) -> Self {
        let keys: Vec<JsonKey> = keys.iter().cloned().map(Into::into).collect();
        Self::from(SqlValue::Text(path_literal(&keys))).cast(DataType::array_of(DataType::Text))
    }
}

impl Column {
    /// See [`ExprBuilder::op`].
    #[must_use]
    pub fn op(self, token: &str, other: impl Into<ExprBuilder>) -> ExprBuilder {
        ExprBuilder::from(self).op(token, other)
    }

    /// See [`ExprBuilder::get_text`].
    #[must_use]
    pub fn get_text(self, key: impl Into<JsonKey>) -> ExprBuilder {
        ExprBuilder::from(self).get_text(key)
    }

    /// See [`ExprBuilder::get_value`].
    #[must_use]
    pub fn get_value(self, key: impl Into<JsonKey>) -> ExprBuilder {
        ExprBuilder::from(self).get_value(key)
    }

    /// See [`ExprBuilder::get_path`].
    #[must_use]
    pub fn get_path<K: Into<JsonKey> + Clone>(self, keys: &[K]) -> ExprBuilder {
        ExprBuilder::from(self).get_path(keys)
    }

    /// See [`ExprBuilder::get_path_text`].
    #[must_use]
    pub fn get_path_text<K: Into<JsonKey> + Clone>(self, keys: &[K]) -> ExprBuilder {
        ExprBuilder::from(self).get_path_text(keys)
    }
}
