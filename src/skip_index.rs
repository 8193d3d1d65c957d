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

//! The skiplist towers overlaid on the ring.
//!
//! ```text
//! Level 2:  HEAD ────────────────────► 5 ─────────────────────► HEAD
//! Level 1:  HEAD ───────► 3 ─────────► 5 ───────► 8 ──────────► HEAD
//! Level 0:  HEAD ──► 1 ──► 3 ──► 3 ──► 5 ──► 7 ──► 8 ──► 9 ────► HEAD
//! ```
//!
//! Every chain starts and ends at the sentinel. Levels above `max_level`
//! are empty, i.e. the sentinel points straight back to itself.
//!
//! A search walks from the sentinel at `max_level` down to level 0,
//! recording for each level the last node visited before dropping down
//! (the *update* array). Those nodes are the splice points for insertion
//! and removal.

use crate::node::{MAX_LEVEL, SENTINEL};
use crate::storage::NodeStorage;
use crate::LinkedSkipList;
use log::debug;
use std::cmp::Ordering;

/// Where a search stops among nodes equal to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Bound {
    /// Stop before the first node `>= target`.
    Lower,
    /// Stop before the first node `> target`.
    Upper,
}

impl Bound {
    #[inline]
    fn advances<T: Ord>(self, candidate: &T, target: &T) -> bool {
        match self {
            Bound::Lower => candidate < target,
            Bound::Upper => candidate <= target,
        }
    }
}

impl<T: Ord, S: NodeStorage<T>, G> LinkedSkipList<T, S, G> {
    /// Returns the per-level predecessors of `target`. Entries above
    /// `max_level` are the sentinel.
    pub(crate) fn locate(&self, target: &T, bound: Bound) -> [usize; MAX_LEVEL] {
        let mut update = [SENTINEL; MAX_LEVEL];
        let mut curr = SENTINEL;
        for level in (0..=self.max_level).rev() {
            loop {
                let next = self.node(curr).forward[level];
                if next == SENTINEL || !bound.advances(self.value_at(next), target) {
                    break;
                }
                curr = next;
            }
            update[level] = curr;
        }
        update
    }

    /// Returns the leftmost node equal to `target`.
    pub(crate) fn find_key(&self, target: &T) -> Option<usize> {
        let update = self.locate(target, Bound::Lower);
        let candidate = self.node(update[0]).forward[0];
        if candidate != SENTINEL && self.value_at(candidate) == target {
            Some(candidate)
        } else {
            None
        }
    }

    /// Threads `key` into every level of its tower, after the predecessors
    /// in `update`.
    pub(crate) fn link_tower(&mut self, key: usize, update: &[usize; MAX_LEVEL]) {
        let level = self.node(key).level();
        if level > self.max_level {
            debug!("max level grows {} -> {}", self.max_level, level);
            self.max_level = level;
        }
        for (i, &pred) in update.iter().enumerate().take(level + 1) {
            let succ = self.node(pred).forward[i];
            self.node_mut(key).forward[i] = succ;
            self.node_mut(pred).forward[i] = key;
        }
    }

    /// Removes `key` from every level of its tower, then lowers `max_level`
    /// past any level left empty.
    pub(crate) fn unlink_tower(&mut self, key: usize) {
        let preds = self.tower_predecessors(key);
        let level = self.node(key).level();
        for (i, pred) in preds.iter().enumerate().take(level + 1) {
            debug_assert!(pred.is_some(), "node {} missing from level {}", key, i);
            if let Some(pred) = *pred {
                let succ = self.node(key).forward[i];
                self.node_mut(pred).forward[i] = succ;
            }
        }
        while self.max_level > 0 && self.head.forward[self.max_level] == SENTINEL {
            self.max_level -= 1;
            debug!("max level shrinks to {}", self.max_level);
        }
    }

    /// The node right before `key` at each level of its tower.
    ///
    /// A lower-bound search lands before the first node equal to the
    /// value; from there each level is walked across the run of equal
    /// values until `key` itself turns up.
    fn tower_predecessors(&self, key: usize) -> [Option<usize>; MAX_LEVEL] {
        let target = self.value_at(key);
        let update = self.locate(target, Bound::Lower);
        let mut preds = [None; MAX_LEVEL];
        for (i, pred) in preds.iter_mut().enumerate().take(self.node(key).level() + 1) {
            let mut curr = update[i];
            loop {
                let next = self.node(curr).forward[i];
                if next == key {
                    *pred = Some(curr);
                    break;
                }
                if next == SENTINEL || self.value_at(next).cmp(target) == Ordering::Greater {
                    break;
                }
                curr = next;
            }
        }
        preds
    }
}
