//! JSON columns against an in-memory SQLite database.

mod common;
use common::*;

use chrono::NaiveDate;
use oxide_json_core::builder::{json_array_length, json_col};
use oxide_json_core::{DataType, JsonValue, Map, TypeRegistry};
use oxide_json_orm::{Json, Node, OrmError};
use serde_json::json;

#[tokio::test]
async fn test_insert_and_get() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    let mut doc = Document::new(&registry, "report")
        .with_data(json!({"author": {"name": "ada"}}))
        .with_tags(json!(["draft"]));
    let id = manager.insert(&pool, &mut doc).await.unwrap();
    assert_eq!(doc.id, Some(id));
    assert!(!doc.state.has_changes());

    let loaded = manager.get(&pool, id).await.unwrap();
    assert_eq!(loaded.title, "report");
    assert_eq!(
        loaded.data.to_value(),
        JsonValue::from(json!({"author": {"name": "ada"}}))
    );
    assert_eq!(loaded.tags.to_value(), JsonValue::from(json!(["draft"])));
    assert!(!loaded.state.has_changes());
}

#[tokio::test]
async fn test_get_missing_row() {
    let (pool, manager) = setup_manager().await;
    let err = manager.get(&pool, 42).await.unwrap_err();
    assert!(matches!(err, OrmError::NotFound));
}

#[tokio::test]
async fn test_in_place_mutation_survives_reload() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    let mut doc = Document::new(&registry, "report").with_data(json!({"a": [1, 2, 3]}));
    let id = manager.insert(&pool, &mut doc).await.unwrap();

    let mut loaded = manager.get(&pool, id).await.unwrap();
    loaded
        .data
        .dict_mut()
        .and_then(|data| data.get_list("a"))
        .unwrap()
        .push(4);
    assert_eq!(manager.save(&pool, &loaded).await.unwrap(), 1);
    assert!(!loaded.state.has_changes());

    let reloaded = manager.get(&pool, id).await.unwrap();
    assert_eq!(
        reloaded.data.to_value(),
        JsonValue::from(json!({"a": [1, 2, 3, 4]}))
    );
}

#[tokio::test]
async fn test_save_writes_only_modified_columns() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    let mut doc = Document::new(&registry, "report")
        .with_data(json!({"v": 1}))
        .with_tags(json!(["a"]));
    let id = manager.insert(&pool, &mut doc).await.unwrap();
    assert_eq!(manager.save(&pool, &doc).await.unwrap(), 0);

    doc.tags.list_mut().unwrap().push("b");
    doc.rename("renamed");
    assert_eq!(manager.save(&pool, &doc).await.unwrap(), 2);

    let reloaded = manager.get(&pool, id).await.unwrap();
    assert_eq!(reloaded.title, "renamed");
    assert_eq!(reloaded.tags.to_value(), JsonValue::from(json!(["a", "b"])));
    assert_eq!(reloaded.data.to_value(), JsonValue::from(json!({"v": 1})));
}

#[tokio::test]
async fn test_save_without_row_fails() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    let mut doc = Document::new(&registry, "ghost").with_data(json!({}));
    doc.id = Some(999);
    let err = manager.save(&pool, &doc).await.unwrap_err();
    assert!(matches!(err, OrmError::NotFound));
    assert!(doc.state.is_modified("data"));
}

#[tokio::test]
async fn test_null_columns() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    let mut doc = Document::new(&registry, "empty");
    let id = manager.insert(&pool, &mut doc).await.unwrap();
    let mut loaded = manager.get(&pool, id).await.unwrap();
    assert!(loaded.data.is_null());
    assert!(loaded.tags.is_null());

    loaded.data.set(json!({"filled": true})).unwrap();
    manager.save(&pool, &loaded).await.unwrap();
    loaded.data.set_null();
    manager.save(&pool, &loaded).await.unwrap();
    assert!(manager.get(&pool, id).await.unwrap().data.is_null());
}

#[tokio::test]
async fn test_timestamps_round_trip_through_storage() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();
    let created = NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|d| d.and_hms_micro_opt(9, 30, 15, 123_456))
        .unwrap();

    let mut body = Map::new();
    body.insert("created".to_string(), JsonValue::Timestamp(created));
    let mut doc = Document::new(&registry, "event");
    doc.data.set(JsonValue::Object(body)).unwrap();
    let id = manager.insert(&pool, &mut doc).await.unwrap();

    let stored: String = sqlx::query_scalar("SELECT data FROM documents WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(
        stored,
        r#"{"created":{"__class__":"datetime","__value__":"2024-05-17T09:30:15.123456Z"}}"#
    );

    let raw: Json = sqlx::query_scalar("SELECT data FROM documents WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(
        raw.0.get("created").and_then(JsonValue::as_timestamp),
        Some(&created)
    );

    let loaded = manager.get(&pool, id).await.unwrap();
    let created_node = loaded
        .data
        .get()
        .and_then(|t| t.as_dict())
        .and_then(|d| d.peek("created"))
        .cloned();
    assert_eq!(created_node, Some(Node::Plain(JsonValue::Timestamp(created))));
}

#[tokio::test]
async fn test_invalid_stored_timestamp_fails_to_load() {
    let (pool, manager) = setup_manager().await;
    sqlx::query("INSERT INTO documents (title, data) VALUES (?, ?)")
        .bind("broken")
        .bind(r#"{"t": {"__class__": "datetime", "__value__": "2024-05-17"}}"#)
        .execute(&pool)
        .await
        .unwrap();

    let err = manager.get(&pool, 1).await.unwrap_err();
    assert!(matches!(err, OrmError::Database(_)), "{err:?}");
}

#[tokio::test]
async fn test_filter_by_json_path() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    for (title, name) in [("one", "ada"), ("two", "grace"), ("three", "ada")] {
        let mut doc =
            Document::new(&registry, title).with_data(json!({"author": {"name": name}}));
        manager.insert(&pool, &mut doc).await.unwrap();
    }

    let found = manager
        .filter(
            &pool,
            json_col("data").get_value("author").get_text("name").eq("ada"),
        )
        .await
        .unwrap();
    let titles: Vec<&str> = found.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "three"]);
}

#[tokio::test]
async fn test_filter_by_array_length() {
    let (pool, manager) = setup_manager().await;
    let registry = registry();

    for (title, tags) in [("none", json!([])), ("few", json!(["a", "b"]))] {
        let mut doc = Document::new(&registry, title).with_tags(tags);
        manager.insert(&pool, &mut doc).await.unwrap();
    }

    let found = manager
        .filter(&pool, json_array_length(json_col("tags")).gt(1))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "few");
}

#[tokio::test]
async fn test_reflect_columns() {
    let (pool, manager) = setup_manager().await;

    let columns = manager
        .reflect_columns(&pool, &TypeRegistry::new().with_json())
        .await
        .unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "title", "data", "tags"]);
    assert_eq!(columns[2].declared, "JSON");
    assert_eq!(columns[2].data_type, Some(DataType::Json));

    let without_json = manager
        .reflect_columns(&pool, &TypeRegistry::new())
        .await
        .unwrap();
    assert_eq!(without_json[2].data_type, None);
    assert_eq!(without_json[1].data_type, Some(DataType::Text));
}
