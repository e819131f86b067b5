#![allow(dead_code)]

use std::sync::Arc;

use oxide_json_core::builder::SqlValue;
use oxide_json_core::schema::{bigint, text, ColumnDefinition};
use oxide_json_core::DataType;
use oxide_json_orm::{
    ArrayField, Field, FieldOptions, InstanceState, JsonField, Manager, Model, MutableColumn,
    MutableRegistry, OrmError, Result,
};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

pub async fn setup_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create pool")
}

pub fn registry() -> Arc<MutableRegistry> {
    Arc::new(MutableRegistry::new().with_json().with_array())
}

pub async fn setup_manager() -> (SqlitePool, Manager<Document>) {
    let pool = setup_pool().await;
    let manager = Manager::new(registry());
    manager
        .create_table(&pool)
        .await
        .expect("Failed to create table");
    (pool, manager)
}

pub fn tags_type() -> DataType {
    DataType::array_of(DataType::Text)
}

/// A document with a JSON body and a list of tags.
#[derive(Debug)]
pub struct Document {
    pub id: Option<i64>,
    pub title: String,
    pub state: Arc<InstanceState>,
    pub data: MutableColumn,
    pub tags: MutableColumn,
}

impl Document {
    pub fn new(registry: &MutableRegistry, title: &str) -> Self {
        let state = InstanceState::new();
        let data = registry
            .instrument(&state, "data", &DataType::Json)
            .expect("JSON tracking is active");
        let tags = registry
            .instrument(&state, "tags", &tags_type())
            .expect("ARRAY tracking is active");
        Self {
            id: None,
            title: title.to_string(),
            state,
            data,
            tags,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data.set(data).expect("data is an object");
        self
    }

    pub fn with_tags(mut self, tags: serde_json::Value) -> Self {
        self.tags.set(tags).expect("tags is an array");
        self
    }

    pub fn rename(&mut self, title: &str) {
        self.title = title.to_string();
        self.state.flag_modified("title");
    }
}

impl Model for Document {
    const TABLE: &'static str = "documents";

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            bigint("id").primary_key().autoincrement(),
            text("title").not_null(),
            JsonField::new()
                .options(FieldOptions::new().null(true))
                .column("data"),
            ArrayField::new(DataType::Text)
                .options(FieldOptions::new().null(true))
                .column("tags"),
        ]
    }

    fn pk(&self) -> Option<i64> {
        self.id
    }

    fn set_pk(&mut self, pk: i64) {
        self.id = Some(pk);
    }

    fn state(&self) -> &Arc<InstanceState> {
        &self.state
    }

    fn column_value(&self, column: &str) -> Result<SqlValue> {
        match column {
            "title" => Ok(SqlValue::Text(self.title.clone())),
            "data" => self.data.render_bind(),
            "tags" => self.tags.render_bind(),
            other => Err(OrmError::InvalidField(other.to_string())),
        }
    }

    fn from_row(row: &SqliteRow, registry: &MutableRegistry) -> Result<Self> {
        let state = InstanceState::new();
        let mut data = registry.instrument(&state, "data", &DataType::Json)?;
        data.load_row(row)?;
        let mut tags = registry.instrument(&state, "tags", &tags_type())?;
        tags.load_row(row)?;
        Ok(Self {
            id: Some(row.try_get("id")?),
            title: row.try_get("title")?,
            state,
            data,
            tags,
        })
    }
}
