//! JSON and ARRAY field types.

use oxide_json_core::{codec, DataType, Shape};

use super::{Field, FieldOptions};

/// A JSON document field. Tracked values must be objects.
///
/// # Example
///
/// ```ignore
/// let data = JsonField::new().options(FieldOptions::new().default("{}"));
/// let column = data.column("data");
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonField {
    /// Field options.
    pub options: FieldOptions,
}

impl JsonField {
    /// Creates a new JsonField.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets field options.
    #[must_use]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }
}

impl Field for JsonField {
    fn data_type(&self) -> DataType {
        DataType::Json
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        let decoded = codec::decode(value).map_err(|e| e.to_string())?;
        match decoded.shape() {
            Shape::Mapping => Ok(()),
            Shape::Scalar if decoded.is_null() && self.options.null => Ok(()),
            _ => Err(format!("Expected a JSON object, found {}", decoded.type_name())),
        }
    }
}

/// An array field of a given element type. Tracked values must be arrays.
#[derive(Debug, Clone)]
pub struct ArrayField {
    /// Element type.
    pub element: DataType,
    /// Field options.
    pub options: FieldOptions,
}

impl ArrayField {
    /// Creates a new ArrayField of `element`.
    pub fn new(element: DataType) -> Self {
        Self {
            element,
            options: FieldOptions::new(),
        }
    }

    /// Sets field options.
    #[must_use]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }
}

impl Field for ArrayField {
    fn data_type(&self) -> DataType {
        DataType::array_of(self.element.clone())
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn validate(&self, value: &str) -> Result<(), String> {
        let decoded = codec::decode(value).map_err(|e| e.to_string())?;
        match decoded.shape() {
            Shape::Sequence => Ok(()),
            Shape::Scalar if decoded.is_null() && self.options.null => Ok(()),
            _ => Err(format!("Expected a JSON array, found {}", decoded.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrmError;
    use oxide_json_core::schema::DefaultValue;

    #[test]
    fn test_json_field_column() {
        let field = JsonField::new().options(FieldOptions::new().default("{}"));
        let column = field.column("data");
        assert_eq!(column.data_type, DataType::Json);
        assert!(!column.nullable);
        assert_eq!(column.default, Some(DefaultValue::String("{}".to_string())));
    }

    #[test]
    fn test_json_field_validation() {
        let field = JsonField::new();
        assert!(field.validate(r#"{"a": 1}"#).is_ok());
        assert!(field.validate("[1]").is_err());
        assert!(field.validate("null").is_err());
        assert!(field.validate("{").is_err());
        assert!(JsonField::new()
            .options(FieldOptions::new().null(true))
            .validate("null")
            .is_ok());
        let err = field
            .validate(r#"{"t": {"__class__": "datetime", "__value__": "x"}}"#)
            .unwrap_err();
        assert!(err.contains("does not match format"), "{err}");
    }

    #[test]
    fn test_array_field() {
        let field = ArrayField::new(DataType::Text).options(FieldOptions::new().null(true));
        assert_eq!(field.data_type(), DataType::array_of(DataType::Text));
        assert!(field.column("tags").nullable);
        assert!(field.validate(r#"["a", "b"]"#).is_ok());
        let err = field.clean("tags", r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, OrmError::InvalidField(ref msg) if msg.starts_with("tags:")));
    }
}
