//! Column data types, the JSON column type descriptor and the registry of
//! reflected type names.

use core::fmt;
use std::collections::HashMap;

use serde::Serialize;

use crate::builder::SqlValue;
use crate::codec;
use crate::error::Result;

/// SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,
    /// Binary large object.
    Blob,
    /// Date.
    Date,
    /// Time.
    Time,
    /// Timestamp.
    Timestamp,
    /// Boolean.
    Boolean,
    /// JSON document.
    Json,
    /// Array of another type.
    Array(Box<DataType>),
    /// Custom type (for database-specific types).
    Custom(String),
}

impl DataType {
    /// Creates an array type.
    #[must_use]
    pub fn array_of(inner: Self) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Returns the name type compilers and the mutable registry dispatch on.
    ///
    /// All arrays share the `ARRAY` name regardless of their element type.
    #[must_use]
    pub fn visit_name(&self) -> &str {
        match self {
            Self::Smallint => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::Bigint => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Decimal { .. } => "DECIMAL",
            Self::Varchar(_) => "VARCHAR",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Boolean => "BOOLEAN",
            Self::Json => JsonType::VISIT_NAME,
            Self::Array(_) => ARRAY_VISIT_NAME,
            Self::Custom(name) => name,
        }
    }

    /// Returns whether values of this type support `||` concatenation.
    #[must_use]
    pub const fn is_concatenable(&self) -> bool {
        matches!(
            self,
            Self::Varchar(_) | Self::Text | Self::Blob | Self::Json | Self::Array(_)
        )
    }

    /// Returns the generic SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Varchar(len) => match len {
                Some(n) => format!("VARCHAR({n})"),
                None => String::from("VARCHAR"),
            },
            Self::Json => String::from(JsonType.compile_ddl()),
            Self::Array(inner) => format!("{}[]", inner.to_sql()),
            other => other.visit_name().to_string(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Visit name shared by all array types.
pub const ARRAY_VISIT_NAME: &str = "ARRAY";

/// The JSON column type.
///
/// Binds go through [`codec::encode`]. Results are passed through untouched
/// because the driver hook has already decoded them. Every dialect renders
/// the type as plain `JSON`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonType;

impl JsonType {
    /// Name used by type compilers.
    pub const VISIT_NAME: &'static str = "JSON";

    /// Key under which the type is found when reflecting a schema.
    pub const REFLECTED_NAME: &'static str = "json";

    /// Creates the descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// JSON sits in the concatenable branch of the type hierarchy.
    #[must_use]
    pub const fn is_concatenable(&self) -> bool {
        true
    }

    /// Returns the data type this descriptor stands for.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        DataType::Json
    }

    /// Renders a value for binding. `None` binds `NULL`.
    pub fn render_bind<T: Serialize + ?Sized>(&self, value: Option<&T>) -> Result<SqlValue> {
        match value {
            Some(value) => codec::encode(value).map(SqlValue::Text),
            None => Ok(SqlValue::Null),
        }
    }

    /// Processes a fetched value. The driver already decoded it.
    #[must_use]
    pub fn render_result<T>(&self, raw: T) -> T {
        raw
    }

    /// Returns the DDL type name.
    #[must_use]
    pub const fn compile_ddl(&self) -> &'static str {
        Self::VISIT_NAME
    }
}

/// Maps reflected column type names to data types.
///
/// Lookups are case-insensitive and ignore type arguments, so `VARCHAR(30)`
/// resolves through the `varchar` entry. A trailing `[]` resolves to an
/// array of the element type.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    names: HashMap<String, DataType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry with the standard SQL type names.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, data_type) in [
            ("smallint", DataType::Smallint),
            ("int2", DataType::Smallint),
            ("integer", DataType::Integer),
            ("int", DataType::Integer),
            ("int4", DataType::Integer),
            ("bigint", DataType::Bigint),
            ("int8", DataType::Bigint),
            ("real", DataType::Real),
            ("float4", DataType::Real),
            ("double", DataType::Double),
            ("double precision", DataType::Double),
            ("float8", DataType::Double),
            (
                "decimal",
                DataType::Decimal {
                    precision: None,
                    scale: None,
                },
            ),
            (
                "numeric",
                DataType::Decimal {
                    precision: None,
                    scale: None,
                },
            ),
            ("varchar", DataType::Varchar(None)),
            ("character varying", DataType::Varchar(None)),
            ("text", DataType::Text),
            ("blob", DataType::Blob),
            ("bytea", DataType::Blob),
            ("date", DataType::Date),
            ("time", DataType::Time),
            ("timestamp", DataType::Timestamp),
            ("datetime", DataType::Timestamp),
            ("boolean", DataType::Boolean),
            ("bool", DataType::Boolean),
        ] {
            registry.register(name, data_type);
        }
        registry
    }

    /// Creates a registry without any names.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Registers a reflected name, returning the type it replaced.
    pub fn register(&mut self, name: &str, data_type: DataType) -> Option<DataType> {
        self.names.insert(name.trim().to_ascii_lowercase(), data_type)
    }

    /// Registers the JSON type under `json`. Calling it again is a no-op.
    pub fn register_json(&mut self) -> &mut Self {
        self.register(JsonType::REFLECTED_NAME, JsonType.data_type());
        self
    }

    /// Builder form of [`TypeRegistry::register_json`].
    #[must_use]
    pub fn with_json(mut self) -> Self {
        self.register_json();
        self
    }

    /// Resolves a reflected column type.
    #[must_use]
    pub fn resolve(&self, reflected: &str) -> Option<DataType> {
        let name = reflected.trim().to_ascii_lowercase();
        if let Some(element) = name.strip_suffix("[]") {
            return self.resolve(element).map(DataType::array_of);
        }
        let base = name.split('(').next().unwrap_or_default().trim();
        self.names.get(base).cloned()
    }

    /// Returns whether a reflected name is known.
    #[must_use]
    pub fn contains(&self, reflected: &str) -> bool {
        self.resolve(reflected).is_some()
    }
}
