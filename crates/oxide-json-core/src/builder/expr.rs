//! Typed expression builder.
//!
//! Every expression carries the SQL text, its bound parameters and, when it
//! can be inferred, the data type the expression evaluates to.

use super::value::{SqlValue, ToSqlValue};
use crate::types::DataType;

/// Creates an untyped column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        table: None,
        name: String::from(name),
        data_type: None,
    }
}

/// Creates a reference to a JSON column.
#[must_use]
pub fn json_col(name: &str) -> Column {
    col(name).typed(DataType::Json)
}

/// A column reference.
#[derive(Debug, Clone)]
pub struct Column {
    /// Optional table qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
    /// Declared type of the column, if known.
    pub data_type: Option<DataType>,
}

impl Column {
    /// Creates a qualified column reference.
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(String::from(table)),
            name: String::from(name),
            data_type: None,
        }
    }

    /// Declares the column's type.
    #[must_use]
    pub fn typed(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.table {
            Some(t) => format!("{t}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).eq(value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).not_eq(value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).lt(value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> ExprBuilder {
        ExprBuilder::from(self).gt(value)
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> ExprBuilder {
        ExprBuilder::from(self).is_null()
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> ExprBuilder {
        ExprBuilder::from(self).is_not_null()
    }
}

/// A typed expression builder.
#[derive(Debug, Clone)]
pub struct ExprBuilder {
    sql: String,
    params: Vec<SqlValue>,
    data_type: Option<DataType>,
}

impl ExprBuilder {
    /// Creates a new expression from raw SQL.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: vec![],
            data_type: None,
        }
    }

    /// Creates an expression from a value (parameterized).
    #[must_use]
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::from(value.to_sql_value())
    }

    /// Creates a parameter holding an encoded JSON document.
    #[must_use]
    pub fn json_param(encoded: String) -> Self {
        Self::from(SqlValue::Text(encoded)).with_type(DataType::Json)
    }

    /// Overrides the inferred type.
    #[must_use]
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub(crate) fn with_inferred(mut self, data_type: Option<DataType>) -> Self {
        self.data_type = data_type;
        self
    }

    /// Creates a binary expression whose type is left unset.
    pub(crate) fn binary(left: Self, op: &str, right: Self) -> Self {
        let mut params = left.params;
        params.extend(right.params);
        Self {
            sql: format!("{} {op} {}", left.sql, right.sql),
            params,
            data_type: None,
        }
    }

    fn comparison(self, op: &str, right: Self) -> Self {
        Self::binary(self, op, right).with_type(DataType::Boolean)
    }

    fn postfix(operand: Self, op: &str) -> Self {
        Self {
            sql: format!("{} {op}", operand.sql),
            params: operand.params,
            data_type: Some(DataType::Boolean),
        }
    }

    /// Creates a function call expression.
    pub(crate) fn call(name: &str, args: Vec<Self>, data_type: DataType) -> Self {
        let mut params = Vec::new();
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(arg.sql);
            params.extend(arg.params);
        }
        Self {
            sql: format!("{name}({})", rendered.join(", ")),
            params,
            data_type: Some(data_type),
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.comparison("AND", other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.comparison("OR", other)
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self {
            sql: format!("({})", self.sql),
            params: self.params,
            data_type: self.data_type,
        }
    }

    /// `CAST(expr AS type)`, typed as the target.
    #[must_use]
    pub fn cast(self, data_type: DataType) -> Self {
        Self {
            sql: format!("CAST({} AS {})", self.sql, data_type.to_sql()),
            params: self.params,
            data_type: Some(data_type),
        }
    }

    /// Negates the expression with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            sql: format!("NOT {}", self.sql),
            params: self.params,
            data_type: Some(DataType::Boolean),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Self {
        self.comparison("=", Self::value(value))
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(self, value: T) -> Self {
        self.comparison("!=", Self::value(value))
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Self {
        self.comparison("<", Self::value(value))
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Self {
        self.comparison(">", Self::value(value))
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(self, value: T) -> Self {
        self.comparison(">=", Self::value(value))
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Self {
        self.comparison("LIKE", Self::value(pattern))
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::postfix(self, "IS NULL")
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::postfix(self, "IS NOT NULL")
    }

    /// Returns the SQL string.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the parameters.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Returns the inferred result type.
    #[must_use]
    pub fn data_type(&self) -> Option<&DataType> {
        self.data_type.as_ref()
    }

    /// Consumes the builder and returns the SQL and parameters.
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

impl From<Column> for ExprBuilder {
    fn from(col: Column) -> Self {
        Self {
            sql: col.to_sql(),
            params: vec![],
            data_type: col.data_type,
        }
    }
}

impl From<SqlValue> for ExprBuilder {
    fn from(value: SqlValue) -> Self {
        let data_type = match &value {
            SqlValue::Null => None,
            SqlValue::Bool(_) => Some(DataType::Boolean),
            SqlValue::Int(_) => Some(DataType::Bigint),
            SqlValue::Float(_) => Some(DataType::Double),
            SqlValue::Text(_) => Some(DataType::Text),
            SqlValue::Blob(_) => Some(DataType::Blob),
        };
        Self {
            sql: String::from("?"),
            params: vec![value],
            data_type,
        }
    }
}
