//! Mutation-tracking containers for JSON documents.
//!
//! A tracked tree is made of [`TrackedDict`] and [`TrackedList`] nodes that
//! share one [`Parents`] channel. Every mutation, at any depth, reports
//! through the channel to the attribute listeners of the owning entities.
//!
//! Plain objects and arrays stored inside a tree are wrapped the first time
//! they are read and whenever they are written, so nested edits are always
//! observed.

mod dict;
mod list;

pub use dict::TrackedDict;
pub use list::TrackedList;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use oxide_json_core::JsonValue;
use serde::{Serialize, Serializer};

use crate::error::{OrmError, Result};

/// Receives change notifications from a tracked tree.
pub trait ChangeListener: Send + Sync {
    /// Called after a mutation completed.
    fn changed(&self);
}

/// Whether a tree has a live listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No live listener; mutations notify nobody.
    Detached,
    /// At least one live listener is attached.
    Attached,
}

/// The channel shared by every container of a tree.
///
/// Listeners are held weakly: a tree never keeps its owner alive.
#[derive(Clone, Default)]
pub struct Parents {
    listeners: Arc<Mutex<Vec<Weak<dyn ChangeListener>>>>,
}

impl Parents {
    /// Creates a channel without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Weak<dyn ChangeListener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches a listener. Returns `false` when it was already attached.
    pub fn attach<L: ChangeListener + 'static>(&self, listener: &Arc<L>) -> bool {
        let weak: Weak<L> = Arc::downgrade(listener);
        let weak: Weak<dyn ChangeListener> = weak;
        let mut listeners = self.lock();
        listeners.retain(|existing| existing.strong_count() > 0);
        if listeners.iter().any(|existing| Weak::ptr_eq(existing, &weak)) {
            return false;
        }
        listeners.push(weak);
        true
    }

    /// Detaches a listener.
    pub fn detach<L: ChangeListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        let weak: Weak<dyn ChangeListener> = weak;
        self.lock()
            .retain(|existing| existing.strong_count() > 0 && !Weak::ptr_eq(existing, &weak));
    }

    /// Notifies every live listener.
    pub fn changed(&self) {
        let live: Vec<Arc<dyn ChangeListener>> = {
            let mut listeners = self.lock();
            listeners.retain(|existing| existing.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.changed();
        }
    }

    /// Returns the number of live listeners.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|existing| existing.strong_count() > 0)
            .count()
    }

    /// Returns whether a live listener is attached.
    #[must_use]
    pub fn state(&self) -> TrackingState {
        if self.live_count() == 0 {
            TrackingState::Detached
        } else {
            TrackingState::Attached
        }
    }

    /// Returns whether both handles are the same channel.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.listeners, &other.listeners)
    }
}

impl fmt::Debug for Parents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parents")
            .field("live", &self.live_count())
            .finish()
    }
}

/// A slot inside a tracked container.
#[derive(Debug, Clone)]
pub enum Node {
    /// A scalar, or a container that has not been wrapped yet.
    Plain(JsonValue),
    /// A tracked object.
    Dict(TrackedDict),
    /// A tracked array.
    List(TrackedList),
}

impl Node {
    /// Wraps plain containers and moves wrappers onto `parents`.
    pub(crate) fn wrap(self, parents: &Parents) -> Self {
        match self {
            Self::Plain(JsonValue::Object(map)) => {
                Self::Dict(TrackedDict::from_map(map, parents.clone()))
            }
            Self::Plain(JsonValue::Array(items)) => {
                Self::List(TrackedList::from_items(items, parents.clone()))
            }
            Self::Plain(scalar) => Self::Plain(scalar),
            Self::Dict(mut dict) => {
                dict.adopt(parents);
                Self::Dict(dict)
            }
            Self::List(mut list) => {
                list.adopt(parents);
                Self::List(list)
            }
        }
    }

    pub(crate) fn coerce_in_place(&mut self, parents: &Parents) {
        if let Self::Plain(value @ (JsonValue::Object(_) | JsonValue::Array(_))) = self {
            let value = std::mem::take(value);
            *self = Self::Plain(value).wrap(parents);
        }
    }

    pub(crate) fn adopt(&mut self, parents: &Parents) {
        match self {
            Self::Plain(_) => {}
            Self::Dict(dict) => dict.adopt(parents),
            Self::List(list) => list.adopt(parents),
        }
    }

    /// Moves the node onto a fresh channel, cutting it loose from its tree.
    pub(crate) fn detached(mut self) -> Self {
        self.adopt(&Parents::new());
        self
    }

    pub(crate) fn view(&mut self) -> NodeMut<'_> {
        match self {
            Self::Plain(value) => NodeMut::Scalar(value),
            Self::Dict(dict) => NodeMut::Dict(dict),
            Self::List(list) => NodeMut::List(list),
        }
    }

    /// Returns whether the node is a tracking container.
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        matches!(self, Self::Dict(_) | Self::List(_))
    }

    /// Snapshots the node as a plain value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Dict(dict) => dict.to_value(),
            Self::List(list) => list.to_value(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Plain(value) => value.serialize(serializer),
            Self::Dict(dict) => dict.serialize(serializer),
            Self::List(list) => list.serialize(serializer),
        }
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        Self::Plain(value)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        Self::Plain(value.into())
    }
}

impl From<TrackedDict> for Node {
    fn from(dict: TrackedDict) -> Self {
        Self::Dict(dict)
    }
}

impl From<TrackedList> for Node {
    fn from(list: TrackedList) -> Self {
        Self::List(list)
    }
}

impl From<Tracked> for Node {
    fn from(tracked: Tracked) -> Self {
        match tracked {
            Tracked::Dict(dict) => Self::Dict(dict),
            Tracked::List(list) => Self::List(list),
        }
    }
}

macro_rules! node_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::Plain(JsonValue::from(value))
                }
            }
        )*
    };
}

node_from_scalar!(bool, i32, i64, f64, &str, String, chrono::NaiveDateTime);

/// Mutable view of a slot, after plain containers have been wrapped.
#[derive(Debug)]
pub enum NodeMut<'a> {
    /// A scalar leaf. Replace it through the parent container.
    Scalar(&'a JsonValue),
    /// A tracked object.
    Dict(&'a mut TrackedDict),
    /// A tracked array.
    List(&'a mut TrackedList),
}

impl<'a> NodeMut<'a> {
    /// Returns the scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&JsonValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the tracked object, if this is one.
    #[must_use]
    pub fn into_dict(self) -> Option<&'a mut TrackedDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Returns the tracked array, if this is one.
    #[must_use]
    pub fn into_list(self) -> Option<&'a mut TrackedList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Snapshots the viewed value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        match self {
            Self::Scalar(value) => (*value).clone(),
            Self::Dict(dict) => dict.to_value(),
            Self::List(list) => list.to_value(),
        }
    }
}

/// The tracking kind associated with a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutableKind {
    /// Values are tracked as [`TrackedDict`].
    Dict,
    /// Values are tracked as [`TrackedList`].
    List,
}

impl MutableKind {
    /// Coerces a value into this kind's container.
    pub fn coerce(self, key: &str, node: impl Into<Node>) -> Result<Tracked> {
        match self {
            Self::Dict => TrackedDict::coerce(key, node).map(Tracked::Dict),
            Self::List => TrackedList::coerce(key, node).map(Tracked::List),
        }
    }
}

/// A top-level tracked value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tracked {
    /// A tracked object.
    Dict(TrackedDict),
    /// A tracked array.
    List(TrackedList),
}

impl Tracked {
    /// Returns the channel of the tree.
    #[must_use]
    pub fn parents(&self) -> &Parents {
        match self {
            Self::Dict(dict) => dict.parents(),
            Self::List(list) => list.parents(),
        }
    }

    /// Returns the tracking kind.
    #[must_use]
    pub const fn kind(&self) -> MutableKind {
        match self {
            Self::Dict(_) => MutableKind::Dict,
            Self::List(_) => MutableKind::List,
        }
    }

    /// Returns the object, if this is one.
    #[must_use]
    pub fn as_dict(&self) -> Option<&TrackedDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::List(_) => None,
        }
    }

    /// Returns the object mutably, if this is one.
    pub fn as_dict_mut(&mut self) -> Option<&mut TrackedDict> {
        match self {
            Self::Dict(dict) => Some(dict),
            Self::List(_) => None,
        }
    }

    /// Returns the array, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&TrackedList> {
        match self {
            Self::List(list) => Some(list),
            Self::Dict(_) => None,
        }
    }

    /// Returns the array mutably, if this is one.
    pub fn as_list_mut(&mut self) -> Option<&mut TrackedList> {
        match self {
            Self::List(list) => Some(list),
            Self::Dict(_) => None,
        }
    }

    /// Snapshots the tree as a plain value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        match self {
            Self::Dict(dict) => dict.to_value(),
            Self::List(list) => list.to_value(),
        }
    }
}

impl Serialize for Tracked {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Dict(dict) => dict.serialize(serializer),
            Self::List(list) => list.serialize(serializer),
        }
    }
}

/// Coerces a value into whichever container matches its shape.
///
/// Wrappers are returned unchanged, objects become [`TrackedDict`] and
/// arrays become [`TrackedList`]. Anything else is rejected.
pub fn coerce(key: &str, node: impl Into<Node>) -> Result<Tracked> {
    match node.into() {
        Node::Dict(dict) => Ok(Tracked::Dict(dict)),
        Node::List(list) => Ok(Tracked::List(list)),
        Node::Plain(JsonValue::Object(map)) => {
            Ok(Tracked::Dict(TrackedDict::from_map(map, Parents::new())))
        }
        Node::Plain(JsonValue::Array(items)) => {
            Ok(Tracked::List(TrackedList::from_items(items, Parents::new())))
        }
        Node::Plain(other) => Err(not_coercible(key, &other)),
    }
}

pub(crate) fn not_coercible(key: &str, value: &JsonValue) -> OrmError {
    OrmError::NotCoercible {
        key: key.to_string(),
        found: value.type_name(),
    }
}
