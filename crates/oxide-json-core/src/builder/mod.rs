//! Expression builder with JSON path operators.
//!
//! # Example
//!
//! ```rust
//! use oxide_json_core::builder::{json_array_length, json_col};
//!
//! let (sql, params) = json_col("data")
//!     .get_value("author")
//!     .get_text("email")
//!     .eq("ada@example.com")
//!     .and(json_array_length(json_col("data").get_value("tags")).gt(0))
//!     .build();
//!
//! assert_eq!(sql, "data -> ? ->> ? = ? AND json_array_length(data -> ?) > ?");
//! assert_eq!(params.len(), 5);
//! ```

mod expr;
mod function;
mod json;
pub mod value;

pub use expr::{col, json_col, Column, ExprBuilder};
pub use function::{
    json_array_length, json_extract_path, json_extract_path_text, to_json, SqlFunction,
};
pub use json::{path_literal, JsonComparator};
pub use value::{JsonKey, SqlValue, ToSqlValue};
