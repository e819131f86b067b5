//! Model trait for entities with tracked columns.

use std::sync::Arc;

use oxide_json_core::builder::SqlValue;
use oxide_json_core::schema::ColumnDefinition;
use sqlx::sqlite::SqliteRow;

use crate::attribute::InstanceState;
use crate::error::Result;
use crate::registry::MutableRegistry;

/// A database model whose JSON and ARRAY columns track in-place edits.
///
/// # Example
///
/// ```ignore
/// struct Document {
///     id: Option<i64>,
///     title: String,
///     state: Arc<InstanceState>,
///     data: MutableColumn,
/// }
///
/// impl Model for Document {
///     const TABLE: &'static str = "documents";
///
///     fn columns() -> Vec<ColumnDefinition> {
///         vec![
///             bigint("id").primary_key().autoincrement(),
///             text("title").not_null(),
///             json("data"),
///         ]
///     }
///     // ...
/// }
/// ```
pub trait Model: Sized + Send + Sync + 'static {
    /// Table name.
    const TABLE: &'static str;

    /// Primary key column name.
    const PRIMARY_KEY: &'static str = "id";

    /// Column definitions, primary key included.
    fn columns() -> Vec<ColumnDefinition>;

    /// Returns the primary key, `None` before the first insert.
    fn pk(&self) -> Option<i64>;

    /// Stores the primary key assigned on insert.
    fn set_pk(&mut self, pk: i64);

    /// Returns the change state of this instance.
    fn state(&self) -> &Arc<InstanceState>;

    /// Renders the value of a non primary key column for binding.
    fn column_value(&self, column: &str) -> Result<SqlValue>;

    /// Builds an instance from a fetched row. Tracked columns are created
    /// through `registry` and loaded without being flagged.
    fn from_row(row: &SqliteRow, registry: &MutableRegistry) -> Result<Self>;

    /// Returns all column names.
    fn column_names() -> Vec<String> {
        Self::columns().into_iter().map(|c| c.name).collect()
    }
}
