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

//! The storage unit shared by the ring and the skiplist index.

use smallvec::{smallvec, SmallVec};

/// Maximum number of skiplist levels. Levels are numbered `0..MAX_LEVEL`.
pub const MAX_LEVEL: usize = 16;

/// Reserved key naming the sentinel. Storage never hands this key out.
pub(crate) const SENTINEL: usize = usize::MAX;

/// A node of a [`LinkedSkipList`](crate::LinkedSkipList).
///
/// Nodes are only ever created by the list itself; they are public so that
/// custom [`NodeStorage`](crate::NodeStorage) implementations can hold them.
/// Every link is a storage key, none of them owns anything.
#[derive(Clone, Debug)]
pub struct Node<T> {
    // `None` exactly for the sentinel.
    value: Option<T>,
    pub(crate) prev: usize,
    pub(crate) next: usize,
    // `forward[i]` is the next node present at level `i`; `len() == level + 1`.
    pub(crate) forward: SmallVec<[usize; 4]>,
    pub(crate) stamp: u64,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, level: usize, stamp: u64) -> Self {
        debug_assert!(level < MAX_LEVEL);
        Node {
            value: Some(value),
            prev: SENTINEL,
            next: SENTINEL,
            forward: smallvec![SENTINEL; level + 1],
            stamp,
        }
    }

    /// A sentinel linked to itself at every level: the empty ring.
    pub(crate) fn sentinel(stamp: u64) -> Self {
        Node {
            value: None,
            prev: SENTINEL,
            next: SENTINEL,
            forward: smallvec![SENTINEL; MAX_LEVEL],
            stamp,
        }
    }

    /// Returns the value held by this node, `None` for the sentinel.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the highest level this node participates in.
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }

    /// Returns `true` if this node is the sentinel of its list.
    pub fn is_sentinel(&self) -> bool {
        self.value.is_none()
    }

    pub(crate) fn into_value(self) -> Option<T> {
        self.value
    }
}
