//! # oxide-json-core
//!
//! JSON column support for SQL builders.
//!
//! This crate provides:
//! - [`JsonValue`], the value model stored in JSON columns, including
//!   timestamps and decimals
//! - A [`codec`] turning values into JSON payload text and back
//! - [`JsonType`], the column type descriptor (`JSON` in DDL, codec on binds)
//! - A [`TypeRegistry`] resolving reflected column type names
//! - Dialect type compilers and `CREATE TABLE` generation
//! - Expression builders with the JSON path operators `->`, `->>`, `#>`
//!   and `#>>`, and the JSON SQL functions
//!
//! ## Payload Encoding
//!
//! ```rust
//! use chrono::NaiveDate;
//! use oxide_json_core::{codec, JsonValue};
//!
//! let created = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_micro_opt(12, 30, 0, 250)
//!     .unwrap();
//! let text = codec::encode(&JsonValue::from(created)).unwrap();
//! assert_eq!(
//!     text,
//!     r#"{"__class__":"datetime","__value__":"2024-03-01T12:30:00.000250Z"}"#
//! );
//! assert_eq!(codec::decode(&text).unwrap(), JsonValue::Timestamp(created));
//! ```
//!
//! ## JSON Path Expressions
//!
//! ```rust
//! use oxide_json_core::builder::json_col;
//! use oxide_json_core::DataType;
//!
//! let expr = json_col("data").get_value("author").get_text("name");
//! assert_eq!(expr.sql(), "data -> ? ->> ?");
//! assert_eq!(expr.data_type(), Some(&DataType::Text));
//! ```

pub mod builder;
pub mod codec;
pub mod dialect;
mod error;
mod json;
pub mod schema;
pub mod types;

pub use builder::{col, json_col, Column, ExprBuilder, JsonKey, SqlValue, ToSqlValue};
pub use error::{CodecError, Result};
pub use json::{JsonValue, Map, Shape};
pub use types::{DataType, JsonType, TypeRegistry};
