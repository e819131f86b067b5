//! PostgreSQL dialect.

use super::Dialect;
use crate::schema::ColumnDefinition;
use crate::types::DataType;

/// PostgreSQL dialect for DDL generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn map_data_type(&self, dt: &DataType) -> String {
        match dt {
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Blob => "BYTEA".to_string(),
            DataType::Array(inner) => format!("{}[]", self.map_data_type(inner)),
            other => other.to_sql(),
        }
    }

    fn autoincrement_keyword(&self) -> String {
        // Auto-increment is expressed through SERIAL types instead.
        String::new()
    }

    fn column_definition(&self, col: &ColumnDefinition) -> String {
        let data_type = if col.autoincrement && col.primary_key {
            match col.data_type {
                DataType::Integer | DataType::Smallint => "SERIAL".to_string(),
                DataType::Bigint => "BIGSERIAL".to_string(),
                _ => self.map_data_type(&col.data_type),
            }
        } else {
            self.map_data_type(&col.data_type)
        };

        let mut sql = format!("{} {}", self.quote_identifier(&col.name), data_type);
        if col.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else {
            if !col.nullable {
                sql.push_str(" NOT NULL");
            }
            if col.unique {
                sql.push_str(" UNIQUE");
            }
        }
        if let Some(ref default) = col.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{array, bigint, json, DefaultValue};

    #[test]
    fn test_map_data_type() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.map_data_type(&DataType::Json), "JSON");
        assert_eq!(dialect.map_data_type(&DataType::Double), "DOUBLE PRECISION");
        assert_eq!(
            dialect.map_data_type(&DataType::array_of(DataType::Blob)),
            "BYTEA[]"
        );
        assert_eq!(
            dialect.map_data_type(&DataType::array_of(DataType::Json)),
            "JSON[]"
        );
    }

    #[test]
    fn test_column_definitions() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.column_definition(&bigint("id").primary_key().autoincrement()),
            "\"id\" BIGSERIAL PRIMARY KEY"
        );
        assert_eq!(
            dialect.column_definition(
                &json("data")
                    .not_null()
                    .default(DefaultValue::String("{}".to_string()))
            ),
            "\"data\" JSON NOT NULL DEFAULT '{}'"
        );
        assert_eq!(
            dialect.column_definition(&array("scores", DataType::Integer)),
            "\"scores\" INTEGER[]"
        );
    }
}
