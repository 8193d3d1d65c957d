// Copyright 2018 Jeffery Xiao, 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Node storage: where a list allocates and releases its nodes.
//!
//! A list only needs "store this node, give me a stable key" and "release
//! the node behind this key". Keys stay valid until the node is removed,
//! and the key `usize::MAX` is never handed out since the list reserves it
//! for its sentinel.
//!
//! Two implementations are provided:
//!
//! | Storage | Capacity | Use |
//! |---------|----------|-----|
//! | `slab::Slab<Node<T>>` | growable | default |
//! | [`BoundedSlab`] | fixed element count | when memory must be capped |

use crate::node::Node;
use slab::Slab;
use std::fmt;

/// Error returned when fixed-capacity storage is full. Carries back the
/// node that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Slab-like node storage with stable keys.
pub trait NodeStorage<T> {
    /// Stores a node, returning its key.
    fn try_insert(&mut self, node: Node<T>) -> Result<usize, Full<Node<T>>>;

    /// Removes and returns the node at `key`, if present.
    fn remove(&mut self, key: usize) -> Option<Node<T>>;

    /// Returns a reference to the node at `key`, if present.
    fn get(&self, key: usize) -> Option<&Node<T>>;

    /// Returns a mutable reference to the node at `key`, if present.
    fn get_mut(&mut self, key: usize) -> Option<&mut Node<T>>;

    /// Releases every node.
    fn clear(&mut self);

    /// Number of nodes currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if no node is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most nodes this storage will ever hold, `None` if unbounded.
    fn capacity_limit(&self) -> Option<usize>;

    /// A fresh, empty storage configured like this one.
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}

impl<T> NodeStorage<T> for Slab<Node<T>> {
    #[inline]
    fn try_insert(&mut self, node: Node<T>) -> Result<usize, Full<Node<T>>> {
        Ok(self.insert(node))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<Node<T>> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&Node<T>> {
        Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        Slab::get_mut(self, key)
    }

    fn clear(&mut self) {
        Slab::clear(self)
    }

    #[inline]
    fn len(&self) -> usize {
        Slab::len(self)
    }

    fn capacity_limit(&self) -> Option<usize> {
        None
    }

    fn empty_like(&self) -> Self {
        Slab::new()
    }
}

/// Slab storage that refuses to grow past a fixed number of nodes.
///
/// # Examples
///
/// ```
/// use linked_skiplist::{BoundedSlab, Error, GeometricLevelGenerator, LinkedSkipList};
///
/// let storage = BoundedSlab::with_capacity(2);
/// let mut list = LinkedSkipList::with_storage(storage, GeometricLevelGenerator::seeded(7));
/// list.try_insert(1).unwrap();
/// list.try_insert(2).unwrap();
/// assert_eq!(list.try_insert(3), Err(Error::StorageFull { capacity: 2 }));
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BoundedSlab<T> {
    slab: Slab<Node<T>>,
    capacity: usize,
}

impl<T> BoundedSlab<T> {
    /// Creates storage for at most `capacity` nodes. The memory is
    /// reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        BoundedSlab {
            slab: Slab::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> NodeStorage<T> for BoundedSlab<T> {
    fn try_insert(&mut self, node: Node<T>) -> Result<usize, Full<Node<T>>> {
        if self.slab.len() >= self.capacity {
            return Err(Full(node));
        }
        Ok(self.slab.insert(node))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<Node<T>> {
        self.slab.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&Node<T>> {
        self.slab.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        self.slab.get_mut(key)
    }

    fn clear(&mut self) {
        self.slab.clear()
    }

    #[inline]
    fn len(&self) -> usize {
        self.slab.len()
    }

    fn capacity_limit(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn empty_like(&self) -> Self {
        BoundedSlab::with_capacity(self.capacity)
    }
}
