//! sqlx integration: JSON payloads decode through the codec on fetch.

use oxide_json_core::{codec, JsonValue};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteTypeInfo, SqliteValueRef};
use sqlx::{Database, Decode, Encode, Sqlite, Type};

/// A JSON column value as seen by sqlx.
///
/// Decoding runs [`codec::decode`], so tagged timestamps come back as
/// [`JsonValue::Timestamp`] from any query, raw ones included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Json(pub JsonValue);

impl Json {
    /// Returns the decoded value.
    #[must_use]
    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl From<JsonValue> for Json {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

impl Type<Sqlite> for Json {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    // A `JSON` declared column has numeric affinity, so scalar payloads may
    // come back as INTEGER or REAL. The payload itself is checked on decode.
    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'r> Decode<'r, Sqlite> for Json {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <String as Decode<Sqlite>>::decode(value)?;
        Ok(Self(codec::decode(&text)?))
    }
}

impl<'q> Encode<'q, Sqlite> for Json {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        let text = codec::encode(&self.0)?;
        <String as Encode<'q, Sqlite>>::encode(text, buf)
    }
}
