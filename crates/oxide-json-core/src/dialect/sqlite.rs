//! SQLite dialect.

use super::Dialect;
use crate::types::DataType;

/// SQLite dialect for DDL generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn map_data_type(&self, dt: &DataType) -> String {
        // SQLite has dynamic typing with type affinity
        match dt {
            DataType::Smallint | DataType::Integer | DataType::Bigint | DataType::Boolean => {
                "INTEGER".to_string()
            }
            DataType::Real | DataType::Double | DataType::Decimal { .. } => "REAL".to_string(),
            DataType::Varchar(_) | DataType::Text => "TEXT".to_string(),
            DataType::Blob => "BLOB".to_string(),
            DataType::Date | DataType::Time | DataType::Timestamp => "TEXT".to_string(),
            // Arrays have no native form, the elements are kept as JSON text.
            DataType::Json | DataType::Array(_) => "JSON".to_string(),
            DataType::Custom(name) => name.clone(),
        }
    }

    fn autoincrement_keyword(&self) -> String {
        " AUTOINCREMENT".to_string()
    }
}
