//! # oxide-json-orm
//!
//! Mutation-tracked JSON and ARRAY columns for SQLite-backed models.
//!
//! This crate provides:
//! - [`TrackedDict`] and [`TrackedList`], containers that report in-place
//!   edits at any depth to the entity owning them
//! - [`MutableRegistry`], the explicit activation of tracking for the JSON
//!   and ARRAY column types
//! - [`InstanceState`] and [`MutableColumn`], the per-entity change set
//! - [`Json`], the sqlx hook decoding payloads through the codec
//! - [`Manager`], which flushes only modified columns
//!
//! ## Tracking Nested Edits
//!
//! ```rust
//! use oxide_json_core::DataType;
//! use oxide_json_orm::{InstanceState, MutableRegistry};
//! use serde_json::json;
//!
//! let registry = MutableRegistry::new().with_json().with_array();
//! let state = InstanceState::new();
//! let mut data = registry.instrument(&state, "data", &DataType::Json).unwrap();
//!
//! data.load(json!({"a": [1, 2, 3]}).into()).unwrap();
//! assert!(!state.has_changes());
//!
//! data.dict_mut()
//!     .and_then(|dict| dict.get_list("a"))
//!     .unwrap()
//!     .push(4);
//! assert!(state.is_modified("data"));
//! ```

pub mod attribute;
pub mod driver;
mod error;
pub mod fields;
pub mod manager;
pub mod model;
pub mod registry;
pub mod tracking;

pub use attribute::{InstanceState, MutableColumn};
pub use driver::Json;
pub use error::{OrmError, Result};
pub use fields::{ArrayField, Field, FieldOptions, JsonField};
pub use manager::{Manager, ReflectedColumn};
pub use model::Model;
pub use registry::MutableRegistry;
pub use tracking::{
    coerce, ChangeListener, MutableKind, Node, NodeMut, Parents, Tracked, TrackedDict,
    TrackedList, TrackingState,
};
