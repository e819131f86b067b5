//! Tracked JSON objects.

use std::collections::BTreeMap;

use oxide_json_core::{JsonValue, Map};
use serde::{Serialize, Serializer};

use super::{not_coercible, Node, NodeMut, Parents, TrackingState};
use crate::error::Result;

/// A JSON object that reports every mutation to its parents.
///
/// Cloning produces an independent tree on a fresh, detached channel.
#[derive(Debug, Default)]
pub struct TrackedDict {
    entries: BTreeMap<String, Node>,
    parents: Parents,
}

impl TrackedDict {
    /// Creates an empty, detached object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(map: Map, parents: Parents) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Node::Plain(v))).collect(),
            parents,
        }
    }

    /// Coerces a value into a tracked object.
    ///
    /// A `TrackedDict` is returned unchanged, a plain object is wrapped and
    /// anything else is rejected.
    pub fn coerce(key: &str, node: impl Into<Node>) -> Result<Self> {
        match node.into() {
            Node::Dict(dict) => Ok(dict),
            Node::Plain(JsonValue::Object(map)) => Ok(Self::from_map(map, Parents::new())),
            Node::Plain(other) => Err(not_coercible(key, &other)),
            Node::List(list) => Err(not_coercible(key, &list.to_value())),
        }
    }

    /// Returns the channel shared with the rest of the tree.
    #[must_use]
    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    /// Returns whether a live listener observes the tree.
    #[must_use]
    pub fn tracking_state(&self) -> TrackingState {
        self.parents.state()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the object is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &String> + '_ {
        self.entries.keys()
    }

    /// Reads a slot without wrapping it.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Reads a slot, wrapping a plain container in place first.
    pub fn get(&mut self, key: &str) -> Option<NodeMut<'_>> {
        let node = self.entries.get_mut(key)?;
        node.coerce_in_place(&self.parents);
        Some(node.view())
    }

    /// Reads a nested object.
    pub fn get_dict(&mut self, key: &str) -> Option<&mut TrackedDict> {
        self.get(key).and_then(NodeMut::into_dict)
    }

    /// Reads a nested array.
    pub fn get_list(&mut self, key: &str) -> Option<&mut super::TrackedList> {
        self.get(key).and_then(NodeMut::into_list)
    }

    /// Iterates over all slots, wrapping plain containers.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, NodeMut<'_>)> + '_ {
        let parents = &self.parents;
        self.entries.iter_mut().map(move |(key, node)| {
            node.coerce_in_place(parents);
            (key, node.view())
        })
    }

    /// Sets `key`, returning the previous slot cut loose from the tree.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        let node = value.into().wrap(&self.parents);
        let previous = self.entries.insert(key.into(), node).map(Node::detached);
        self.changed();
        previous
    }

    /// Removes `key`. Missing keys leave the tree untouched and unnotified.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let previous = self.entries.remove(key)?;
        self.changed();
        Some(previous.detached())
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed();
    }

    /// Inserts every pair, notifying once.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Node>,
    {
        for (key, value) in pairs {
            let node = value.into().wrap(&self.parents);
            self.entries.insert(key.into(), node);
        }
        self.changed();
    }

    /// Snapshots the object as a plain value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(
            self.entries
                .iter()
                .map(|(key, node)| (key.clone(), node.to_value()))
                .collect(),
        )
    }

    /// Reports a mutation to every live listener.
    pub fn changed(&self) {
        self.parents.changed();
    }

    pub(crate) fn adopt(&mut self, parents: &Parents) {
        self.parents = parents.clone();
        for node in self.entries.values_mut() {
            node.adopt(parents);
        }
    }
}

impl Clone for TrackedDict {
    fn clone(&self) -> Self {
        let mut copy = Self {
            entries: self.entries.clone(),
            parents: self.parents.clone(),
        };
        copy.adopt(&Parents::new());
        copy
    }
}

impl PartialEq for TrackedDict {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl Serialize for TrackedDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}
