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

//! The doubly linked ring: `prev`/`next` over every node plus the sentinel.
//!
//! The ring alone decides traversal order and element count. It never looks
//! at the skiplist towers.

use crate::storage::NodeStorage;
use crate::LinkedSkipList;

impl<T, S: NodeStorage<T>, G> LinkedSkipList<T, S, G> {
    /// Links `key` into the ring right before `boundary`.
    pub(crate) fn splice_before(&mut self, key: usize, boundary: usize) {
        let prev = self.node(boundary).prev;
        {
            let node = self.node_mut(key);
            node.prev = prev;
            node.next = boundary;
        }
        self.node_mut(prev).next = key;
        self.node_mut(boundary).prev = key;
        self.len += 1;
    }

    /// Unlinks `key` from the ring. The node's own links are left as they
    /// were, so its former neighbours can still be read from it.
    pub(crate) fn unlink(&mut self, key: usize) {
        let (prev, next) = {
            let node = self.node(key);
            (node.prev, node.next)
        };
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
        self.len -= 1;
    }
}
