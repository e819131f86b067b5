//! JSON path operators, result type inference and the JSON functions,
//! together with DDL for JSON columns.

use oxide_json_core::builder::{
    json_array_length, json_extract_path, json_extract_path_text, to_json, SqlFunction,
};
use oxide_json_core::dialect::{Dialect, PostgresDialect, SqliteDialect};
use oxide_json_core::schema::{bigint, json};
use oxide_json_core::{col, json_col, DataType, ExprBuilder, SqlValue, TypeRegistry};

// ===================================================================
// Path operators
// ===================================================================

#[test]
fn chained_lookup_binds_every_step() {
    let (sql, params) = json_col("data")
        .get_value("orders")
        .get_value(-1)
        .get_text("sku")
        .build();
    assert_eq!(sql, "data -> ? -> ? ->> ?");
    assert_eq!(
        params,
        vec![
            SqlValue::Text("orders".to_string()),
            SqlValue::Int(-1),
            SqlValue::Text("sku".to_string()),
        ]
    );
}

#[test]
fn text_lookup_then_comparison_is_boolean() {
    let expr = json_col("profile").get_text("country").eq("NZ");
    assert_eq!(expr.sql(), "profile ->> ? = ?");
    assert_eq!(expr.data_type(), Some(&DataType::Boolean));
}

#[test]
fn lookups_on_untyped_expressions_are_still_typed() {
    assert_eq!(
        col("raw").get_value("a").data_type(),
        Some(&DataType::Json)
    );
    assert_eq!(
        ExprBuilder::raw("CAST(x AS JSON)").get_path_text(&["a", "b"]).data_type(),
        Some(&DataType::Text)
    );
}

#[test]
fn concatenation_keeps_the_left_type() {
    let expr = json_col("data").op("||", json_col("extra"));
    assert_eq!(expr.sql(), "data || extra");
    assert_eq!(expr.data_type(), Some(&DataType::Json));
}

#[test]
fn containment_is_boolean() {
    let expr = json_col("data").op("@>", ExprBuilder::json_param(r#"{"a":1}"#.to_string()));
    assert_eq!(expr.data_type(), Some(&DataType::Boolean));
}

// ===================================================================
// Functions
// ===================================================================

#[test]
fn function_declarations() {
    assert_eq!(SqlFunction::JSON_ARRAY_LENGTH.name, "json_array_length");
    assert_eq!(SqlFunction::JSON_ARRAY_LENGTH.return_type, DataType::Integer);
    assert_eq!(SqlFunction::JSON_EXTRACT_PATH_TEXT.name, "json_extract_path_text");
    assert_eq!(SqlFunction::TO_JSON.return_type, DataType::Json);
}

#[test]
fn function_calls_render() {
    assert_eq!(to_json(col("name")).sql(), "to_json(name)");
    assert_eq!(
        json_array_length(json_col("tags")).sql(),
        "json_array_length(tags)"
    );
    let expr = json_extract_path(json_col("data"), &["a", "b"]);
    assert_eq!(expr.sql(), "json_extract_path(data, ?, ?)");
    let expr = json_extract_path_text(json_col("data"), &["a"]).eq("x");
    assert_eq!(expr.sql(), "json_extract_path_text(data, ?) = ?");
}

// ===================================================================
// DDL and reflection
// ===================================================================

#[test]
fn json_columns_render_as_json_in_every_dialect() {
    let columns = [bigint("id").primary_key(), json("data").not_null()];
    let sqlite = SqliteDialect::new().create_table("docs", &columns, false);
    let postgres = PostgresDialect::new().create_table("docs", &columns, false);
    assert!(sqlite.contains("\"data\" JSON NOT NULL"), "{sqlite}");
    assert!(postgres.contains("\"data\" JSON NOT NULL"), "{postgres}");
}

#[test]
fn reflected_json_column_resolves_to_json() {
    let registry = TypeRegistry::new().with_json();
    assert_eq!(registry.resolve("JSON"), Some(DataType::Json));
    assert_eq!(registry.resolve("json[]"), Some(DataType::array_of(DataType::Json)));
}
