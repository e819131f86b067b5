//! Dialect-specific DDL generation.
//!
//! Both dialects render the JSON type as plain `JSON`. They differ in how
//! arrays are stored: PostgreSQL has native `T[]` columns, SQLite keeps the
//! elements as JSON text.

mod postgres;
mod sqlite;

pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::schema::{ColumnDefinition, DefaultValue};
use crate::types::DataType;

/// Trait for dialect-specific SQL generation.
pub trait Dialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Maps a `DataType` to the dialect-specific SQL type.
    fn map_data_type(&self, dt: &DataType) -> String;

    /// Returns the AUTOINCREMENT keyword for this dialect.
    fn autoincrement_keyword(&self) -> String;

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        default.to_sql()
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Generates SQL for a column definition.
    fn column_definition(&self, col: &ColumnDefinition) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&col.name),
            self.map_data_type(&col.data_type)
        );

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
        if col.autoincrement {
            sql.push_str(&self.autoincrement_keyword());
        }

        if let Some(ref default) = col.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }

        sql
    }

    /// Generates SQL for CREATE TABLE.
    fn create_table(&self, table: &str, columns: &[ColumnDefinition], if_not_exists: bool) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (\n");

        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("    {}", self.column_definition(c)))
            .collect();
        sql.push_str(&column_defs.join(",\n"));

        sql.push_str("\n)");
        sql
    }
}
