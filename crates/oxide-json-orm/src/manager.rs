//! Manager for database access.

use std::marker::PhantomData;
use std::sync::Arc;

use oxide_json_core::builder::{ExprBuilder, SqlValue};
use oxide_json_core::dialect::{Dialect, SqliteDialect};
use oxide_json_core::{DataType, TypeRegistry};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Row, Sqlite, SqlitePool};
use tracing::{debug, warn};

use crate::error::{OrmError, Result};
use crate::model::Model;
use crate::registry::MutableRegistry;

/// A column as reported by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedColumn {
    /// Column name.
    pub name: String,
    /// Declared type text.
    pub declared: String,
    /// Resolved type, `None` when the name is not registered.
    pub data_type: Option<DataType>,
}

/// Database access for one model.
///
/// Holds the mutable registry its rows are instrumented with.
#[derive(Debug)]
pub struct Manager<M: Model> {
    registry: Arc<MutableRegistry>,
    dialect: SqliteDialect,
    _marker: PhantomData<M>,
}

impl<M: Model> Clone for Manager<M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            dialect: self.dialect,
            _marker: PhantomData,
        }
    }
}

impl<M: Model> Manager<M> {
    /// Creates a manager using `registry` for tracked columns.
    pub fn new(registry: Arc<MutableRegistry>) -> Self {
        Self {
            registry,
            dialect: SqliteDialect::new(),
            _marker: PhantomData,
        }
    }

    /// Returns the mutable registry.
    pub fn registry(&self) -> &MutableRegistry {
        &self.registry
    }

    fn select_columns(&self) -> String {
        M::column_names()
            .iter()
            .map(|name| self.dialect.quote_identifier(name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Creates the model's table if it does not exist.
    pub async fn create_table(&self, pool: &SqlitePool) -> Result<()> {
        let sql = self.dialect.create_table(M::TABLE, &M::columns(), true);
        debug!(table = M::TABLE, "Creating table");
        sqlx::query(&sql).execute(pool).await?;
        Ok(())
    }

    /// Inserts a new instance and stores its primary key.
    pub async fn insert(&self, pool: &SqlitePool, entity: &mut M) -> Result<i64> {
        let columns: Vec<String> = M::column_names()
            .into_iter()
            .filter(|name| name != M::PRIMARY_KEY)
            .collect();
        let values = columns
            .iter()
            .map(|name| entity.column_value(name))
            .collect::<Result<Vec<_>>>()?;

        let names: Vec<String> = columns
            .iter()
            .map(|name| self.dialect.quote_identifier(name))
            .collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            self.dialect.quote_identifier(M::TABLE),
            names.join(", ")
        );
        debug!(table = M::TABLE, sql = %sql, "Inserting row");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_param(query, value);
        }
        let id = query.execute(pool).await?.last_insert_rowid();
        entity.set_pk(id);
        entity.state().commit();
        Ok(id)
    }

    /// Gets an object by its primary key.
    pub async fn get(&self, pool: &SqlitePool, pk: i64) -> Result<M> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            self.select_columns(),
            self.dialect.quote_identifier(M::TABLE),
            self.dialect.quote_identifier(M::PRIMARY_KEY)
        );
        let row = sqlx::query(&sql)
            .bind(pk)
            .fetch_optional(pool)
            .await?
            .ok_or(OrmError::NotFound)?;
        M::from_row(&row, &self.registry)
    }

    /// Returns every object matching `condition`.
    pub async fn filter(&self, pool: &SqlitePool, condition: ExprBuilder) -> Result<Vec<M>> {
        let (condition, params) = condition.build();
        let sql = format!(
            "SELECT {} FROM {} WHERE {condition} ORDER BY {}",
            self.select_columns(),
            self.dialect.quote_identifier(M::TABLE),
            self.dialect.quote_identifier(M::PRIMARY_KEY)
        );
        debug!(table = M::TABLE, sql = %sql, "Filtering rows");

        let mut query = sqlx::query(&sql);
        for value in params {
            query = bind_param(query, value);
        }
        query
            .fetch_all(pool)
            .await?
            .iter()
            .map(|row| M::from_row(row, &self.registry))
            .collect()
    }

    /// Flushes modified columns with an UPDATE, then clears the change set.
    ///
    /// Returns the number of columns written. Unmodified instances issue no
    /// statement.
    pub async fn save(&self, pool: &SqlitePool, entity: &M) -> Result<usize> {
        let modified = entity.state().modified();
        if modified.is_empty() {
            debug!(table = M::TABLE, "Nothing to flush");
            return Ok(0);
        }
        let pk = entity.pk().ok_or(OrmError::NotFound)?;

        let assignments: Vec<String> = modified
            .iter()
            .map(|name| format!("{} = ?", self.dialect.quote_identifier(name)))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.dialect.quote_identifier(M::TABLE),
            assignments.join(", "),
            self.dialect.quote_identifier(M::PRIMARY_KEY)
        );
        debug!(table = M::TABLE, pk, columns = ?modified, "Flushing modified columns");

        let mut query = sqlx::query(&sql);
        for name in &modified {
            query = bind_param(query, entity.column_value(name)?);
        }
        let result = query.bind(pk).execute(pool).await?;
        if result.rows_affected() == 0 {
            warn!(table = M::TABLE, pk, "Flush matched no row");
            return Err(OrmError::NotFound);
        }
        entity.state().commit();
        Ok(modified.len())
    }

    /// Reads the table's columns and resolves their declared types.
    pub async fn reflect_columns(
        &self,
        pool: &SqlitePool,
        types: &TypeRegistry,
    ) -> Result<Vec<ReflectedColumn>> {
        let rows = sqlx::query("SELECT name, type FROM pragma_table_info(?) ORDER BY cid")
            .bind(M::TABLE)
            .fetch_all(pool)
            .await?;
        rows.iter()
            .map(|row| -> Result<ReflectedColumn> {
                let name: String = row.try_get("name")?;
                let declared: String = row.try_get("type")?;
                let data_type = types.resolve(&declared);
                Ok(ReflectedColumn {
                    name,
                    declared,
                    data_type,
                })
            })
            .collect()
    }
}

/// Binds a SqlValue parameter to a query.
fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}
