//! Field types for model definitions.

mod json;

pub use json::{ArrayField, JsonField};

use oxide_json_core::schema::{ColumnDefinition, DefaultValue};
use oxide_json_core::DataType;

use crate::error::{OrmError, Result};

/// Common field options.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    /// Whether the field can be null.
    pub null: bool,
    /// Default payload text for the column.
    pub default: Option<String>,
    /// Whether the field must be unique.
    pub unique: bool,
}

impl FieldOptions {
    /// Creates new field options with defaults.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the null option.
    #[must_use]
    pub fn null(mut self, value: bool) -> Self {
        self.null = value;
        self
    }

    /// Sets the default payload.
    #[must_use]
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the unique option.
    #[must_use]
    pub fn unique(mut self, value: bool) -> Self {
        self.unique = value;
        self
    }
}

/// Trait for field types that can generate column definitions.
pub trait Field {
    /// Returns the column type for this field.
    fn data_type(&self) -> DataType;

    /// Returns the field options.
    fn options(&self) -> &FieldOptions;

    /// Validates stored payload text for this field.
    fn validate(&self, value: &str) -> std::result::Result<(), String>;

    /// Validates a value, naming the field in the error.
    fn clean(&self, name: &str, value: &str) -> Result<()> {
        self.validate(value)
            .map_err(|reason| OrmError::InvalidField(format!("{name}: {reason}")))
    }

    /// Builds the column definition for a field called `name`.
    fn column(&self, name: &str) -> ColumnDefinition {
        let options = self.options();
        let mut column = ColumnDefinition::new(name, self.data_type());
        if !options.null {
            column = column.not_null();
        }
        if options.unique {
            column = column.unique();
        }
        if let Some(default) = &options.default {
            column = column.default(DefaultValue::String(default.clone()));
        }
        column
    }
}
