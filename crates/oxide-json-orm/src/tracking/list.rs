//! Tracked JSON arrays.

use std::ops::{Bound, RangeBounds};

use oxide_json_core::JsonValue;
use serde::{Serialize, Serializer};

use super::{not_coercible, Node, NodeMut, Parents, TrackedDict, TrackingState};
use crate::error::{OrmError, Result};

/// A JSON array that reports every mutation to its parents.
///
/// Indexes are positional. Out-of-range reads return `None`, out-of-range
/// writes fail with [`OrmError::IndexOutOfRange`] and leave the array and
/// its listeners untouched.
#[derive(Debug, Default)]
pub struct TrackedList {
    items: Vec<Node>,
    parents: Parents,
}

impl TrackedList {
    /// Creates an empty, detached array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_items(items: Vec<JsonValue>, parents: Parents) -> Self {
        Self {
            items: items.into_iter().map(Node::Plain).collect(),
            parents,
        }
    }

    /// Coerces a value into a tracked array.
    pub fn coerce(key: &str, node: impl Into<Node>) -> Result<Self> {
        match node.into() {
            Node::List(list) => Ok(list),
            Node::Plain(JsonValue::Array(items)) => Ok(Self::from_items(items, Parents::new())),
            Node::Plain(other) => Err(not_coercible(key, &other)),
            Node::Dict(dict) => Err(not_coercible(key, &dict.to_value())),
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

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reads a slot without wrapping it.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    /// Reads a slot, wrapping a plain container in place first.
    pub fn get(&mut self, index: usize) -> Option<NodeMut<'_>> {
        let node = self.items.get_mut(index)?;
        node.coerce_in_place(&self.parents);
        Some(node.view())
    }

    /// Reads a nested object.
    pub fn get_dict(&mut self, index: usize) -> Option<&mut TrackedDict> {
        self.get(index).and_then(NodeMut::into_dict)
    }

    /// Reads a nested array.
    pub fn get_list(&mut self, index: usize) -> Option<&mut TrackedList> {
        self.get(index).and_then(NodeMut::into_list)
    }

    /// Iterates over all slots, wrapping plain containers.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = NodeMut<'_>> + '_ {
        let parents = &self.parents;
        self.items.iter_mut().map(move |node| {
            node.coerce_in_place(parents);
            node.view()
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(OrmError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Replaces the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: impl Into<Node>) -> Result<Node> {
        self.check_index(index)?;
        let node = value.into().wrap(&self.parents);
        let previous = std::mem::replace(&mut self.items[index], node);
        self.changed();
        Ok(previous.detached())
    }

    /// Removes the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Node> {
        self.check_index(index)?;
        let previous = self.items.remove(index);
        self.changed();
        Ok(previous.detached())
    }

    /// Replaces a range with new elements, returning the removed ones.
    ///
    /// Bounds past the end are clamped, as in slice assignment.
    pub fn splice<R, I>(&mut self, range: R, replacement: I) -> Vec<Node>
    where
        R: RangeBounds<usize>,
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let (start, end) = self.clamp(&range);
        let parents = self.parents.clone();
        let nodes: Vec<Node> = replacement
            .into_iter()
            .map(|value| value.into().wrap(&parents))
            .collect();
        let removed: Vec<Node> = self
            .items
            .splice(start..end, nodes)
            .map(Node::detached)
            .collect();
        self.changed();
        removed
    }

    /// Deletes a range, returning the removed elements.
    pub fn delete_range<R: RangeBounds<usize>>(&mut self, range: R) -> Vec<Node> {
        self.splice(range, std::iter::empty::<Node>())
    }

    fn clamp<R: RangeBounds<usize>>(&self, range: &R) -> (usize, usize) {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        (start, end.max(start))
    }

    /// Appends an element.
    pub fn push(&mut self, value: impl Into<Node>) {
        let node = value.into().wrap(&self.parents);
        self.items.push(node);
        self.changed();
    }

    /// Inserts an element before `index`. Indexes past the end append.
    pub fn insert(&mut self, index: usize, value: impl Into<Node>) {
        let node = value.into().wrap(&self.parents);
        let index = index.min(self.items.len());
        self.items.insert(index, node);
        self.changed();
    }

    /// Appends every element, notifying once.
    pub fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let parents = self.parents.clone();
        self.items
            .extend(values.into_iter().map(|value| value.into().wrap(&parents)));
        self.changed();
    }

    /// Removes and returns the element at `index`, or the last one.
    pub fn pop(&mut self, index: Option<usize>) -> Result<Node> {
        match index {
            Some(index) => self.remove_at(index),
            None => {
                let previous = self.items.pop().ok_or(OrmError::IndexOutOfRange {
                    index: 0,
                    len: 0,
                })?;
                self.changed();
                Ok(previous.detached())
            }
        }
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns `None` without notifying when no element matches.
    pub fn remove(&mut self, value: &JsonValue) -> Option<Node> {
        let index = self.items.iter().position(|node| node.to_value() == *value)?;
        let previous = self.items.remove(index);
        self.changed();
        Some(previous.detached())
    }

    /// Snapshots the array as a plain value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Array(self.items.iter().map(Node::to_value).collect())
    }

    /// Reports a mutation to every live listener.
    pub fn changed(&self) {
        self.parents.changed();
    }

    pub(crate) fn adopt(&mut self, parents: &Parents) {
        self.parents = parents.clone();
        for node in &mut self.items {
            node.adopt(parents);
        }
    }
}

impl Clone for TrackedList {
    fn clone(&self) -> Self {
        let mut copy = Self {
            items: self.items.clone(),
            parents: self.parents.clone(),
        };
        copy.adopt(&Parents::new());
        copy
    }
}

impl PartialEq for TrackedList {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl Serialize for TrackedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}
