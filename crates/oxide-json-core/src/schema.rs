//! Column definitions for `CREATE TABLE` generation.

use crate::types::DataType;

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// String default, also used for JSON payload text.
    String(String),
    /// Raw SQL expression (e.g., CURRENT_TIMESTAMP).
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(i) => i.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether the column is nullable.
    pub nullable: bool,
    /// Default value.
    pub default: Option<DefaultValue>,
    /// Whether this is a primary key.
    pub primary_key: bool,
    /// Whether this column is unique.
    pub unique: bool,
    /// Whether this column auto-increments.
    pub autoincrement: bool,
}

impl ColumnDefinition {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            autoincrement: false,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the column as PRIMARY KEY.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the column as UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the column as AUTOINCREMENT.
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Creates a BIGINT column.
#[must_use]
pub fn bigint(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Bigint)
}

/// Creates an INTEGER column.
#[must_use]
pub fn integer(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Integer)
}

/// Creates a TEXT column.
#[must_use]
pub fn text(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Text)
}

/// Creates a VARCHAR column.
#[must_use]
pub fn varchar(name: &str, max_length: u32) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Varchar(Some(max_length)))
}

/// Creates a BOOLEAN column.
#[must_use]
pub fn boolean(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Boolean)
}

/// Creates a TIMESTAMP column.
#[must_use]
pub fn timestamp(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Timestamp)
}

/// Creates a JSON column.
#[must_use]
pub fn json(name: &str) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::Json)
}

/// Creates an ARRAY column of the given element type.
#[must_use]
pub fn array(name: &str, element: DataType) -> ColumnDefinition {
    ColumnDefinition::new(name, DataType::array_of(element))
}
