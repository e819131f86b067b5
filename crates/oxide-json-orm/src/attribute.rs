//! Per-entity change state and tracked column holders.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use oxide_json_core::builder::SqlValue;
use oxide_json_core::{JsonType, JsonValue};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use crate::driver::Json;
use crate::error::Result;
use crate::tracking::{ChangeListener, MutableKind, Node, Tracked, TrackedDict, TrackedList};

/// The set of attributes of one entity changed since the last flush.
#[derive(Debug, Default)]
pub struct InstanceState {
    modified: Mutex<BTreeSet<&'static str>>,
}

impl InstanceState {
    /// Creates a clean state.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Marks an attribute as modified.
    pub fn flag_modified(&self, key: &'static str) {
        self.modified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
    }

    /// Returns the modified attributes in name order.
    #[must_use]
    pub fn modified(&self) -> Vec<&'static str> {
        self.modified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    /// Returns whether `key` is modified.
    #[must_use]
    pub fn is_modified(&self, key: &str) -> bool {
        self.modified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Returns whether anything is modified.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self
            .modified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Clears the modified set after a flush.
    pub fn commit(&self) {
        self.modified
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Flags one attribute of one entity.
#[derive(Debug)]
struct AttributeListener {
    state: Weak<InstanceState>,
    key: &'static str,
}

impl ChangeListener for AttributeListener {
    fn changed(&self) {
        if let Some(state) = self.state.upgrade() {
            state.flag_modified(self.key);
        }
    }
}

/// A JSON or ARRAY attribute whose in-place edits flag the owning entity.
///
/// The holder keeps its listener alive. The tracked tree only references it
/// weakly, so dropping the entity silences the tree.
#[derive(Debug)]
pub struct MutableColumn {
    key: &'static str,
    kind: MutableKind,
    listener: Arc<AttributeListener>,
    value: Option<Tracked>,
}

impl MutableColumn {
    pub(crate) fn new(state: &Arc<InstanceState>, key: &'static str, kind: MutableKind) -> Self {
        Self {
            key,
            kind,
            listener: Arc::new(AttributeListener {
                state: Arc::downgrade(state),
                key,
            }),
            value: None,
        }
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the tracking kind.
    #[must_use]
    pub fn kind(&self) -> MutableKind {
        self.kind
    }

    fn replace(&mut self, value: Option<Tracked>) {
        if let Some(previous) = &self.value {
            previous.parents().detach(&self.listener);
        }
        if let Some(next) = &value {
            next.parents().attach(&self.listener);
        }
        self.value = value;
    }

    /// Assigns a value, coercing it into a tracked container, and flags the
    /// attribute.
    pub fn set(&mut self, value: impl Into<Node>) -> Result<()> {
        let tracked = self.kind.coerce(self.key, value)?;
        self.replace(Some(tracked));
        self.listener.changed();
        Ok(())
    }

    /// Assigns SQL `NULL` and flags the attribute.
    pub fn set_null(&mut self) {
        self.replace(None);
        self.listener.changed();
    }

    /// Moves the value out, leaving `NULL`, and flags the attribute.
    pub fn take(&mut self) -> Option<Tracked> {
        let value = self.value.take();
        if let Some(previous) = &value {
            previous.parents().detach(&self.listener);
        }
        self.listener.changed();
        value
    }

    /// Installs a value loaded from storage without flagging the attribute.
    pub fn load(&mut self, value: JsonValue) -> Result<()> {
        if value.is_null() {
            self.replace(None);
        } else {
            let tracked = self.kind.coerce(self.key, value)?;
            self.replace(Some(tracked));
        }
        Ok(())
    }

    /// Loads the column of the same name from a row.
    pub fn load_row(&mut self, row: &SqliteRow) -> Result<()> {
        let stored: Option<Json> = row.try_get(self.key)?;
        debug!(column = self.key, null = stored.is_none(), "Loading tracked column");
        self.load(stored.map(Json::into_inner).unwrap_or_default())
    }

    /// Returns whether the attribute is `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the tracked value.
    #[must_use]
    pub fn get(&self) -> Option<&Tracked> {
        self.value.as_ref()
    }

    /// Returns the tracked value for in-place edits.
    pub fn get_mut(&mut self) -> Option<&mut Tracked> {
        self.value.as_mut()
    }

    /// Returns the tracked object for in-place edits.
    pub fn dict_mut(&mut self) -> Option<&mut TrackedDict> {
        self.value.as_mut().and_then(Tracked::as_dict_mut)
    }

    /// Returns the tracked array for in-place edits.
    pub fn list_mut(&mut self) -> Option<&mut TrackedList> {
        self.value.as_mut().and_then(Tracked::as_list_mut)
    }

    /// Snapshots the value; `NULL` becomes [`JsonValue::Null`].
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        self.value
            .as_ref()
            .map_or(JsonValue::Null, Tracked::to_value)
    }

    /// Renders the value for binding.
    pub fn render_bind(&self) -> Result<SqlValue> {
        Ok(JsonType.render_bind(self.value.as_ref())?)
    }
}
