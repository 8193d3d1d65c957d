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

//! A sorted sequence container built from two structures sharing one set of
//! nodes.
//!
//! - a circular doubly linked ring with a single sentinel, which gives O(1)
//!   previous/next steps and O(1) splicing once a node is located;
//! - a skiplist overlaid on the same nodes, which gives O(Log N) average
//!   case search, insertion and deletion by value.
//!
//! Values are always kept in ascending order. Equal values are kept in
//! insertion order. Traversal only ever follows the ring, so how tall a
//! node's skiplist tower is never affects iteration.
//!
//! Nodes live in a [`NodeStorage`] arena and every link is a storage key,
//! so the two linkages never own anything: the list owns all nodes through
//! its storage. Positions are handed out as [`Finger`]s, which stay valid
//! until the node they point at is erased.
//!
//! # Examples
//!
//! ```
//! use linked_skiplist::LinkedSkipList;
//!
//! let mut list = LinkedSkipList::new();
//! list.insert(5);
//! list.insert(3);
//! list.insert(8);
//! list.insert(1);
//! assert_eq!(list.iter().collect::<Vec<_>>(), vec![&1, &3, &5, &8]);
//!
//! let three = list.find(&3);
//! assert_eq!(list.get(three), Ok(&3));
//! let after = list.erase(three).unwrap();
//! assert_eq!(list.get(after), Ok(&5));
//! assert!(!list.contains(&3));
//! ```

#![warn(missing_docs)]

mod error;
pub mod level;
mod node;
mod ring;
mod skip_index;
pub mod storage;

pub use crate::error::{Error, Result};
pub use crate::level::{GeometricLevelGenerator, LevelGenerator};
pub use crate::node::{Node, MAX_LEVEL};
pub use crate::storage::{BoundedSlab, Full, NodeStorage};

use crate::node::SENTINEL;
use crate::skip_index::Bound;
use log::{debug, trace};
use slab::Slab;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// A position in a [`LinkedSkipList`]: either an element or the end.
///
/// Fingers compare by node identity, not by value. A finger is invalidated
/// only when its node is erased (or the list is cleared); every other
/// finger survives insertions and erasures. Using an invalidated finger, or
/// one from another list, yields [`Error::InvalidFinger`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Finger {
    list: u64,
    pub(crate) key: usize,
    stamp: u64,
}

/// A sorted list with skiplist search.
///
/// - `T`: element type, ordered by `Ord`
/// - `S`: node storage, a growable slab by default
/// - `G`: level generator, a seeded-from-entropy geometric one by default
pub struct LinkedSkipList<T, S = Slab<Node<T>>, G = GeometricLevelGenerator> {
    head: Node<T>,
    storage: S,
    len: usize,
    max_level: usize,
    levels: G,
    id: u64,
    next_stamp: u64,
}

impl<T: Ord> LinkedSkipList<T> {
    /// Constructs a new, empty `LinkedSkipList<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let list: LinkedSkipList<u32> = LinkedSkipList::new();
    /// assert!(list.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_storage(Slab::new(), GeometricLevelGenerator::new())
    }

    /// Constructs a list holding `count` default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let list: LinkedSkipList<i64> = LinkedSkipList::with_default(3);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![&0, &0, &0]);
    /// ```
    pub fn with_default(count: usize) -> Self
    where
        T: Default,
    {
        let mut list = Self::new();
        for _ in 0..count {
            list.insert(T::default());
        }
        list
    }

    /// Constructs a list holding `count` copies of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let list = LinkedSkipList::from_elem('x', 5);
    /// assert_eq!(list.len(), 5);
    /// assert!(list.iter().all(|&c| c == 'x'));
    /// ```
    pub fn from_elem(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new();
        for _ in 0..count {
            list.insert(value.clone());
        }
        list
    }
}

impl<T: Ord, G: LevelGenerator> LinkedSkipList<T, Slab<Node<T>>, G> {
    /// Constructs a new, empty list drawing tower heights from `levels`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{GeometricLevelGenerator, LinkedSkipList};
    ///
    /// let mut list = LinkedSkipList::with_level_generator(GeometricLevelGenerator::seeded(1));
    /// list.insert("b");
    /// list.insert("a");
    /// assert_eq!(list.front(), Ok(&"a"));
    /// ```
    pub fn with_level_generator(levels: G) -> Self {
        Self::with_storage(Slab::new(), levels)
    }
}

impl<T, S: NodeStorage<T>, G> LinkedSkipList<T, S, G> {
    #[inline]
    fn node(&self, key: usize) -> &Node<T> {
        if key == SENTINEL {
            &self.head
        } else {
            self.storage.get(key).expect("dangling link")
        }
    }

    #[inline]
    fn node_mut(&mut self, key: usize) -> &mut Node<T> {
        if key == SENTINEL {
            &mut self.head
        } else {
            self.storage.get_mut(key).expect("dangling link")
        }
    }

    #[inline]
    fn value_at(&self, key: usize) -> &T {
        self.node(key).value().expect("sentinel holds no value")
    }

    fn take_stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    fn finger_at(&self, key: usize) -> Finger {
        Finger {
            list: self.id,
            key,
            stamp: self.node(key).stamp,
        }
    }

    /// Maps a finger back to its node, rejecting stale and foreign fingers.
    fn resolve(&self, finger: Finger) -> Result<usize> {
        if finger.list != self.id {
            return Err(Error::InvalidFinger);
        }
        let node = if finger.key == SENTINEL {
            &self.head
        } else {
            self.storage.get(finger.key).ok_or(Error::InvalidFinger)?
        };
        if node.stamp != finger.stamp {
            return Err(Error::InvalidFinger);
        }
        Ok(finger.key)
    }

    /// Returns the number of elements in the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list = LinkedSkipList::new();
    /// list.insert(1);
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the most elements this list could ever hold.
    pub fn max_len(&self) -> usize {
        self.storage
            .capacity_limit()
            .unwrap_or(isize::MAX as usize / mem::size_of::<Node<T>>().max(1))
    }

    /// Returns the highest skiplist level currently in use.
    pub fn level(&self) -> usize {
        self.max_level
    }

    /// Returns a finger to the smallest element, or [`end`](Self::end) if
    /// the list is empty.
    pub fn begin(&self) -> Finger {
        self.finger_at(self.head.next)
    }

    /// Returns the finger one past the largest element.
    pub fn end(&self) -> Finger {
        self.finger_at(SENTINEL)
    }

    /// Returns the finger after `finger`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{Error, LinkedSkipList};
    ///
    /// let list: LinkedSkipList<_> = [2, 1].into();
    /// let second = list.next(list.begin()).unwrap();
    /// assert_eq!(list.get(second), Ok(&2));
    /// assert_eq!(list.next(second), Ok(list.end()));
    /// assert_eq!(list.next(list.end()), Err(Error::PastEnd));
    /// ```
    pub fn next(&self, finger: Finger) -> Result<Finger> {
        let key = self.resolve(finger)?;
        if key == SENTINEL {
            return Err(Error::PastEnd);
        }
        Ok(self.finger_at(self.node(key).next))
    }

    /// Returns the finger before `finger`. Stepping back from
    /// [`end`](Self::end) reaches the largest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{Error, LinkedSkipList};
    ///
    /// let list: LinkedSkipList<_> = [2, 1].into();
    /// let last = list.prev(list.end()).unwrap();
    /// assert_eq!(list.get(last), Ok(&2));
    /// assert_eq!(list.prev(list.begin()), Err(Error::BeforeBegin));
    /// ```
    pub fn prev(&self, finger: Finger) -> Result<Finger> {
        let key = self.resolve(finger)?;
        let prev = self.node(key).prev;
        if prev == SENTINEL {
            return Err(Error::BeforeBegin);
        }
        Ok(self.finger_at(prev))
    }

    /// Returns the element `finger` points at.
    pub fn get(&self, finger: Finger) -> Result<&T> {
        let key = self.resolve(finger)?;
        self.node(key).value().ok_or(Error::EndDereference)
    }

    /// Returns the smallest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{Error, LinkedSkipList};
    ///
    /// let mut list = LinkedSkipList::new();
    /// assert_eq!(list.front(), Err(Error::Empty));
    /// list.insert(4);
    /// list.insert(2);
    /// assert_eq!(list.front(), Ok(&2));
    /// ```
    pub fn front(&self) -> Result<&T> {
        self.node(self.head.next).value().ok_or(Error::Empty)
    }

    /// Returns the largest element.
    pub fn back(&self) -> Result<&T> {
        self.node(self.head.prev).value().ok_or(Error::Empty)
    }

    /// Returns an iterator over the list, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let list: LinkedSkipList<_> = [3, 1, 2].into();
    /// let mut iterator = list.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next_back(), Some(&3));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> LinkedSkipListIter<'_, T, S> {
        LinkedSkipListIter {
            head: &self.head,
            storage: &self.storage,
            front: self.head.next,
            back: self.head.prev,
            remaining: self.len,
        }
    }

    /// Returns an iterator starting at `finger` and running to the end.
    ///
    /// The remaining length is counted up front by walking the ring once.
    pub fn iter_from(&self, finger: Finger) -> Result<LinkedSkipListIter<'_, T, S>> {
        let start = self.resolve(finger)?;
        let mut remaining = 0;
        let mut key = start;
        while key != SENTINEL {
            remaining += 1;
            key = self.node(key).next;
        }
        Ok(LinkedSkipListIter {
            head: &self.head,
            storage: &self.storage,
            front: start,
            back: self.head.prev,
            remaining,
        })
    }

    /// Clears the list, removing all values. Every outstanding finger,
    /// including [`end`](Self::end), is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list = LinkedSkipList::new();
    /// list.insert(1);
    /// list.insert(2);
    /// list.clear();
    /// assert_eq!(list.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        debug!("clear {} elements", self.len);
        self.storage.clear();
        let stamp = self.take_stamp();
        self.head = Node::sentinel(stamp);
        self.len = 0;
        self.max_level = 0;
    }

    /// Swaps the contents of two lists in O(1). Fingers follow their
    /// elements into the other list.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T: Ord, S: NodeStorage<T>, G: LevelGenerator> LinkedSkipList<T, S, G> {
    /// Constructs a new, empty list on the given storage. Anything already
    /// in `storage` is released.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{BoundedSlab, GeometricLevelGenerator, LinkedSkipList};
    ///
    /// let mut list = LinkedSkipList::with_storage(
    ///     BoundedSlab::with_capacity(16),
    ///     GeometricLevelGenerator::seeded(3),
    /// );
    /// list.try_insert(10).unwrap();
    /// assert_eq!(list.max_len(), 16);
    /// ```
    pub fn with_storage(mut storage: S, levels: G) -> Self {
        storage.clear();
        LinkedSkipList {
            head: Node::sentinel(0),
            storage,
            len: 0,
            max_level: 0,
            levels,
            id: NEXT_LIST_ID.fetch_add(1, AtomicOrdering::Relaxed),
            next_stamp: 1,
        }
    }

    /// Inserts a value at its sorted position, after any equal values, and
    /// returns a finger to it.
    ///
    /// Fails only when the storage is full, in which case the list is left
    /// untouched.
    pub fn try_insert(&mut self, value: T) -> Result<Finger> {
        let level = self.levels.random_level().min(MAX_LEVEL - 1);
        let stamp = self.take_stamp();
        let key = self
            .storage
            .try_insert(Node::new(value, level, stamp))
            .map_err(|_| Error::StorageFull {
                capacity: self.storage.capacity_limit().unwrap_or(usize::MAX),
            })?;

        let update = self.locate(self.value_at(key), Bound::Upper);
        let boundary = self.node(update[0]).forward[0];
        self.splice_before(key, boundary);
        self.link_tower(key, &update);
        trace!("insert at level {}, {} elements", level, self.len);
        Ok(self.finger_at(key))
    }

    /// Inserts a value at its sorted position, after any equal values, and
    /// returns a finger to it.
    ///
    /// # Panics
    ///
    /// Panics if the storage is full. Use [`try_insert`](Self::try_insert)
    /// with bounded storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list = LinkedSkipList::new();
    /// list.insert(2);
    /// let finger = list.insert(1);
    /// assert_eq!(list.begin(), finger);
    /// ```
    pub fn insert(&mut self, value: T) -> Finger {
        self.try_insert(value)
            .unwrap_or_else(|err| panic!("insert failed: {}", err))
    }

    /// Inserts a value, accepting a position hint for list-like call sites.
    ///
    /// The hint must be a valid finger into this list but does not affect
    /// placement: the value always lands at its sorted position.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list: LinkedSkipList<_> = [0, 10, 20, 30].into();
    /// let hint = list.begin();
    /// list.insert_hint(hint, 15).unwrap();
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![&0, &10, &15, &20, &30]);
    /// ```
    pub fn insert_hint(&mut self, hint: Finger, value: T) -> Result<Finger> {
        self.resolve(hint)?;
        self.try_insert(value)
    }

    /// Inserts `count` copies of `value`, returning a finger to the first
    /// one inserted, or `None` if `count` is zero.
    pub fn insert_repeated(&mut self, count: usize, value: T) -> Result<Option<Finger>>
    where
        T: Clone,
    {
        let mut first = None;
        for _ in 0..count {
            let finger = self.try_insert(value.clone())?;
            first.get_or_insert(finger);
        }
        Ok(first)
    }

    /// Inserts every value of `values`, returning a finger to the smallest
    /// one inserted (the first inserted among equals), or `None` if
    /// `values` is empty.
    ///
    /// Values inserted before a failure stay in the list.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<Option<Finger>> {
        let mut smallest: Option<Finger> = None;
        for value in values {
            let finger = self.try_insert(value)?;
            let replace = match smallest {
                None => true,
                Some(current) => self.value_at(finger.key) < self.value_at(current.key),
            };
            if replace {
                smallest = Some(finger);
            }
        }
        Ok(smallest)
    }

    /// Inserts a value. The value goes to its sorted position like any
    /// other insert; it only lands at the front if it is the new minimum.
    ///
    /// # Panics
    ///
    /// Panics if the storage is full.
    pub fn push_front(&mut self, value: T) -> Finger {
        self.insert(value)
    }

    /// Inserts a value. The value goes to its sorted position like any
    /// other insert; it only lands at the back if it is the new maximum.
    ///
    /// # Panics
    ///
    /// Panics if the storage is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list: LinkedSkipList<_> = [1, 3, 5].into();
    /// list.push_back(4);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![&1, &3, &4, &5]);
    /// ```
    pub fn push_back(&mut self, value: T) -> Finger {
        self.insert(value)
    }

    /// Removes the smallest element and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::{Error, LinkedSkipList};
    ///
    /// let mut list: LinkedSkipList<_> = [2, 1].into();
    /// assert_eq!(list.pop_front(), Ok(1));
    /// assert_eq!(list.pop_front(), Ok(2));
    /// assert_eq!(list.pop_front(), Err(Error::Empty));
    /// ```
    pub fn pop_front(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.remove_key(self.head.next))
    }

    /// Removes the largest element and returns it.
    pub fn pop_back(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.remove_key(self.head.prev))
    }

    /// Returns a finger to the first element equal to `value`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let list: LinkedSkipList<_> = [1, 2, 3, 4, 5].into();
    /// assert_eq!(list.get(list.find(&3)), Ok(&3));
    /// assert_eq!(list.find(&99), list.end());
    /// ```
    pub fn find(&self, value: &T) -> Finger {
        match self.find_key(value) {
            Some(key) => self.finger_at(key),
            None => self.end(),
        }
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find_key(value).is_some()
    }

    /// Removes the first element equal to `value` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list: LinkedSkipList<_> = [10, 10, 5].into();
    /// assert_eq!(list.remove(&10), Some(10));
    /// assert_eq!(list.remove(&7), None);
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![&5, &10]);
    /// ```
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let key = self.find_key(value)?;
        Some(self.remove_key(key))
    }

    /// Erases the element at `finger` and returns a finger to the element
    /// that followed it.
    pub fn erase(&mut self, finger: Finger) -> Result<Finger> {
        let key = self.resolve(finger)?;
        if key == SENTINEL {
            return Err(Error::EndErase);
        }
        let next = self.node(key).next;
        self.remove_key(key);
        Ok(self.finger_at(next))
    }

    /// Erases the half-open range `[first, last)` and returns `last`.
    ///
    /// Nothing is erased unless `last` can be reached from `first`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut list: LinkedSkipList<_> = [1, 2, 3, 4, 5, 6, 7].into();
    /// let (first, last) = (list.find(&3), list.find(&6));
    /// list.erase_range(first, last).unwrap();
    /// assert_eq!(list.iter().collect::<Vec<_>>(), vec![&1, &2, &6, &7]);
    /// ```
    pub fn erase_range(&mut self, first: Finger, last: Finger) -> Result<Finger> {
        let start = self.resolve(first)?;
        let stop = self.resolve(last)?;

        let mut doomed = vec![];
        let mut key = start;
        while key != stop {
            if key == SENTINEL {
                return Err(Error::InvalidRange);
            }
            doomed.push(key);
            key = self.node(key).next;
        }
        for key in doomed {
            self.remove_key(key);
        }
        Ok(last)
    }

    fn remove_key(&mut self, key: usize) -> T {
        self.unlink_tower(key);
        self.unlink(key);
        trace!("erase, {} elements", self.len);
        self.storage
            .remove(key)
            .and_then(Node::into_value)
            .expect("erased node holds a value")
    }

    /// Replaces the contents with `values`.
    pub fn assign<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<()> {
        self.clear();
        for value in values {
            self.try_insert(value)?;
        }
        Ok(())
    }

    /// Replaces the contents with a copy of `other`'s.
    pub fn assign_from(&mut self, other: &Self) -> Result<()>
    where
        T: Clone,
    {
        self.assign(other.iter().cloned())
    }

    /// Deep-copies the list into fresh storage configured like this one.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        G: Clone,
    {
        let mut copy = Self::with_storage(self.storage.empty_like(), self.levels.clone());
        for value in self.iter() {
            copy.try_insert(value.clone())?;
        }
        Ok(copy)
    }

    /// Moves the contents out in O(1), leaving `self` a valid, empty list.
    /// Fingers follow their elements into the returned list.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_skiplist::LinkedSkipList;
    ///
    /// let mut a: LinkedSkipList<_> = [1, 2].into();
    /// let finger = a.find(&2);
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(b.get(finger), Ok(&2));
    /// a.insert(7);
    /// assert_eq!(a.len(), 1);
    /// ```
    pub fn take(&mut self) -> Self
    where
        G: Clone,
    {
        let fresh = Self::with_storage(self.storage.empty_like(), self.levels.clone());
        mem::replace(self, fresh)
    }
}

impl<T: Ord, S: NodeStorage<T>, G: LevelGenerator + Clone> Clone for LinkedSkipList<T, S, G>
where
    T: Clone,
{
    /// # Panics
    ///
    /// Panics if the copy does not fit in storage configured like the
    /// source's, which cannot happen for the storages in this crate.
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|err| panic!("clone failed: {}", err))
    }
}

impl<T: Ord, S: NodeStorage<T> + Default, G: LevelGenerator + Default> Default
    for LinkedSkipList<T, S, G>
{
    fn default() -> Self {
        Self::with_storage(S::default(), G::default())
    }
}

impl<T: Ord, S: NodeStorage<T>, G: LevelGenerator> Extend<T> for LinkedSkipList<T, S, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for LinkedSkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = LinkedSkipList::new();
        list.extend(iter);
        list
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for LinkedSkipList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: PartialEq, S: NodeStorage<T>, G> PartialEq for LinkedSkipList<T, S, G> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, S: NodeStorage<T>, G> Eq for LinkedSkipList<T, S, G> {}

impl<T: PartialOrd, S: NodeStorage<T>, G> PartialOrd for LinkedSkipList<T, S, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, S: NodeStorage<T>, G> Ord for LinkedSkipList<T, S, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, S: NodeStorage<T>, G> Hash for LinkedSkipList<T, S, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T: Debug, S: NodeStorage<T>, G> Debug for LinkedSkipList<T, S, G> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, S: NodeStorage<T>, G> IntoIterator for LinkedSkipList<T, S, G> {
    type IntoIter = LinkedSkipListIntoIter<T, S>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        LinkedSkipListIntoIter {
            front: self.head.next,
            back: self.head.prev,
            remaining: self.len,
            storage: self.storage,
            marker: PhantomData,
        }
    }
}

impl<'a, T, S: NodeStorage<T>, G> IntoIterator for &'a LinkedSkipList<T, S, G> {
    type IntoIter = LinkedSkipListIter<'a, T, S>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `LinkedSkipList<T>`.
///
/// This iterator yields the elements in ascending order, releasing each
/// node as it goes.
pub struct LinkedSkipListIntoIter<T, S> {
    storage: S,
    front: usize,
    back: usize,
    remaining: usize,
    marker: PhantomData<T>,
}

impl<T, S: NodeStorage<T>> Iterator for LinkedSkipListIntoIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.storage.remove(self.front)?;
        self.front = node.next;
        node.into_value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S: NodeStorage<T>> DoubleEndedIterator for LinkedSkipListIntoIter<T, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.storage.remove(self.back)?;
        self.back = node.prev;
        node.into_value()
    }
}

impl<T, S: NodeStorage<T>> ExactSizeIterator for LinkedSkipListIntoIter<T, S> {}

impl<T, S: NodeStorage<T>> FusedIterator for LinkedSkipListIntoIter<T, S> {}

/// An iterator for `LinkedSkipList<T>`.
///
/// This iterator walks the ring in ascending order and yields immutable
/// references.
pub struct LinkedSkipListIter<'a, T, S> {
    head: &'a Node<T>,
    storage: &'a S,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T, S: NodeStorage<T>> LinkedSkipListIter<'a, T, S> {
    fn node(&self, key: usize) -> &'a Node<T> {
        if key == SENTINEL {
            self.head
        } else {
            self.storage.get(key).expect("dangling link")
        }
    }
}

impl<'a, T, S: NodeStorage<T>> Iterator for LinkedSkipListIter<'a, T, S> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.node(self.front);
        self.front = node.next;
        node.value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, S: NodeStorage<T>> DoubleEndedIterator for LinkedSkipListIter<'a, T, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let node = self.node(self.back);
        self.back = node.prev;
        node.value()
    }
}

impl<'a, T, S: NodeStorage<T>> ExactSizeIterator for LinkedSkipListIter<'a, T, S> {}

impl<'a, T, S: NodeStorage<T>> FusedIterator for LinkedSkipListIter<'a, T, S> {}

impl<'a, T, S> Clone for LinkedSkipListIter<'a, T, S> {
    fn clone(&self) -> Self {
        LinkedSkipListIter {
            head: self.head,
            storage: self.storage,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Checks the internal validity of a LinkedSkipList.
///
/// Verifies that the ring is consistent in both directions and sorted,
/// that the element count matches, and that each skiplist level is exactly
/// the ring order restricted to the nodes tall enough for it.
///
/// # Panics
///
/// Panics on the first violated invariant.
pub fn check_valid<T, S, G>(list: &LinkedSkipList<T, S, G>)
where
    T: Ord + Debug,
    S: NodeStorage<T>,
{
    assert!(list.head.is_sentinel());
    assert_eq!(list.head.forward.len(), MAX_LEVEL);

    let mut ring = vec![];
    let mut prev = SENTINEL;
    let mut key = list.head.next;
    while key != SENTINEL {
        let node = list.node(key);
        assert!(!node.is_sentinel());
        assert_eq!(node.prev, prev, "broken prev link at {:?}", node.value());
        assert!(node.level() < MAX_LEVEL);
        ring.push(key);
        assert!(ring.len() <= list.len, "ring longer than len");
        prev = key;
        key = node.next;
    }
    assert_eq!(list.head.prev, prev);
    assert_eq!(ring.len(), list.len);
    assert_eq!(list.storage.len(), list.len);

    for pair in ring.windows(2) {
        assert!(list.value_at(pair[0]) <= list.value_at(pair[1]));
    }

    for level in 0..MAX_LEVEL {
        let mut chain = vec![];
        let mut key = list.head.forward[level];
        while key != SENTINEL {
            let node = list.node(key);
            assert!(node.level() >= level);
            chain.push(key);
            assert!(chain.len() <= list.len, "level {} does not return to the sentinel", level);
            key = node.forward[level];
        }
        let expected: Vec<usize> = ring
            .iter()
            .copied()
            .filter(|&key| list.node(key).level() >= level)
            .collect();
        assert_eq!(chain, expected, "level {} out of step with the ring", level);
        if level > list.max_level {
            assert!(chain.is_empty(), "level {} above max level {}", level, list.max_level);
        }
    }
    if list.max_level > 0 {
        assert_ne!(list.head.forward[list.max_level], SENTINEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_empty() {
        let list: LinkedSkipList<u32> = LinkedSkipList::new();
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let list: LinkedSkipList<u32> = LinkedSkipList::new();
        check_valid(&list);
        assert!(list.is_empty());
        assert_eq!(list.begin(), list.end());
        assert_eq!(list.level(), 0);
    }

    #[test]
    fn test_insert() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        check_valid(&list);
        let finger = list.insert(1);

        check_valid(&list);
        assert_eq!(list.get(finger), Ok(&1));
        assert_eq!(list.begin(), finger);
    }

    #[test]
    fn test_insert_order() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(5);
        list.insert(3);
        list.insert(8);
        list.insert(1);
        check_valid(&list);
        assert_eq!(list.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5, &8]);
    }

    #[test]
    fn test_insert_duplicates_keep_insertion_order() {
        // Ordered by the first field only, so equal keys stay distinguishable.
        #[derive(Debug, Clone, Copy)]
        struct Keyed(u32, u32);
        impl PartialEq for Keyed {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl Eq for Keyed {}
        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Keyed {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        let mut keyed: LinkedSkipList<Keyed> = LinkedSkipList::new();
        for tag in 0..20 {
            keyed.insert(Keyed(tag % 3, tag));
        }
        check_valid(&keyed);
        let tags: Vec<u32> = keyed.iter().map(|k| k.1).collect();
        assert_eq!(
            tags,
            vec![0, 3, 6, 9, 12, 15, 18, 1, 4, 7, 10, 13, 16, 19, 2, 5, 8, 11, 14, 17]
        );
        assert_eq!(keyed.get(keyed.find(&Keyed(1, 0))).map(|k| k.1), Ok(1));
    }

    #[test]
    fn test_remove() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(1);
        let ret = list.remove(&1);

        check_valid(&list);
        assert_eq!(list.front(), Err(Error::Empty));
        assert_eq!(ret, Some(1));
        assert_eq!(list.remove(&1), None);
    }

    #[test]
    fn test_remove_two() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(1);
        list.insert(2);
        let ret = list.remove(&1);

        check_valid(&list);
        assert_eq!(list.front(), Ok(&2));
        assert_eq!(ret, Some(1));
    }

    #[test]
    fn test_erase_returns_successor() {
        let mut list: LinkedSkipList<u32> = (1..=5).collect();
        let finger = list.find(&3);
        let next = list.erase(finger).unwrap();
        check_valid(&list);
        assert_eq!(list.get(next), Ok(&4));
        assert_eq!(list.get(finger), Err(Error::InvalidFinger));

        let last = list.find(&5);
        assert_eq!(list.erase(last), Ok(list.end()));
        assert_eq!(list.erase(list.end()), Err(Error::EndErase));
        check_valid(&list);
    }

    #[test]
    fn test_push_front() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(1);
        list.push_front(2);

        check_valid(&list);
        assert_eq!(list.front(), Ok(&1));
        assert_eq!(list.back(), Ok(&2));
    }

    #[test]
    fn test_push_back() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(3);
        list.push_back(2);

        check_valid(&list);
        assert_eq!(list.back(), Ok(&3));
    }

    #[test]
    fn test_pop_front() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(1);
        list.insert(2);

        check_valid(&list);
        assert_eq!(list.pop_front(), Ok(1));
        check_valid(&list);
    }

    #[test]
    fn test_pop_back() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        list.insert(1);
        list.insert(2);
        assert_eq!(list.pop_back(), Ok(2));
        assert_eq!(list.pop_back(), Ok(1));
        assert_eq!(list.pop_back(), Err(Error::Empty));
        check_valid(&list);
    }

    #[test]
    fn test_finger_walk() {
        let list: LinkedSkipList<u32> = [30, 10, 20].into();
        let mut forward = vec![];
        let mut finger = list.begin();
        while finger != list.end() {
            forward.push(*list.get(finger).unwrap());
            finger = list.next(finger).unwrap();
        }
        assert_eq!(forward, vec![10, 20, 30]);

        let mut backward = vec![];
        let mut finger = list.end();
        while finger != list.begin() {
            finger = list.prev(finger).unwrap();
            backward.push(*list.get(finger).unwrap());
        }
        assert_eq!(backward, vec![30, 20, 10]);
        assert_eq!(list.get(list.end()), Err(Error::EndDereference));
    }

    #[test]
    fn test_empty_list_navigation() {
        let list: LinkedSkipList<u32> = LinkedSkipList::new();
        assert_eq!(list.next(list.end()), Err(Error::PastEnd));
        assert_eq!(list.prev(list.end()), Err(Error::BeforeBegin));
        assert_eq!(list.back(), Err(Error::Empty));
    }

    #[test]
    fn test_foreign_finger() {
        let a: LinkedSkipList<u32> = [1, 2].into();
        let mut b: LinkedSkipList<u32> = [1, 2].into();
        let finger = a.find(&1);
        assert_eq!(b.get(finger), Err(Error::InvalidFinger));
        assert_eq!(b.erase(finger), Err(Error::InvalidFinger));
        assert_eq!(b.erase(a.end()), Err(Error::InvalidFinger));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_stale_finger_after_slot_reuse() {
        let mut list: LinkedSkipList<u32> = LinkedSkipList::new();
        let old = list.insert(1);
        list.erase(old).unwrap();
        let new = list.insert(2);
        assert_eq!(old.key, new.key);
        assert_eq!(list.get(old), Err(Error::InvalidFinger));
        assert_eq!(list.get(new), Ok(&2));
    }

    #[test]
    fn test_clear_invalidates_end() {
        let mut list: LinkedSkipList<u32> = (0..50).collect();
        let end = list.end();
        let some = list.find(&25);
        list.clear();
        check_valid(&list);
        assert_eq!(list.len(), 0);
        assert_eq!(list.level(), 0);
        assert_eq!(list.get(some), Err(Error::InvalidFinger));
        assert_eq!(list.prev(end), Err(Error::InvalidFinger));
        list.insert(3);
        check_valid(&list);
        assert_eq!(list.front(), Ok(&3));
    }

    #[test]
    fn test_erase_range_unreachable() {
        let mut list: LinkedSkipList<u32> = (1..=7).collect();
        let (first, last) = (list.find(&6), list.find(&3));
        assert_eq!(list.erase_range(first, last), Err(Error::InvalidRange));
        assert_eq!(list.len(), 7);
        check_valid(&list);

        let end = list.end();
        let first = list.find(&5);
        assert_eq!(list.erase_range(first, end), Ok(end));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![&1, &2, &3, &4]);
        check_valid(&list);
    }

    #[test]
    fn test_insert_hint_ignored_for_placement() {
        let mut list: LinkedSkipList<u32> = [0, 10, 20, 30, 40].into();
        let hint = list.find(&30);
        let finger = list.insert_hint(hint, 15).unwrap();
        check_valid(&list);
        assert_eq!(list.next(finger).and_then(|f| list.get(f)), Ok(&20));
        assert_eq!(list.prev(finger).and_then(|f| list.get(f)), Ok(&10));

        let other: LinkedSkipList<u32> = LinkedSkipList::new();
        assert_eq!(list.insert_hint(other.end(), 1), Err(Error::InvalidFinger));
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_insert_repeated_and_all() {
        let mut list: LinkedSkipList<u32> = [5].into();
        let first = list.insert_repeated(3, 7).unwrap().unwrap();
        assert_eq!(list.prev(first).and_then(|f| list.get(f)), Ok(&5));
        assert_eq!(list.insert_repeated(0, 9), Ok(None));

        let smallest = list.insert_all(vec![9, 2, 8, 2]).unwrap().unwrap();
        check_valid(&list);
        assert_eq!(list.get(smallest), Ok(&2));
        assert_eq!(list.begin(), smallest);
        assert_eq!(list.insert_all(Vec::new()), Ok(None));
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            vec![2, 2, 5, 7, 7, 7, 8, 9]
        );
    }

    #[test]
    fn test_bounded_storage_failure_leaves_list_unchanged() {
        let mut list = LinkedSkipList::with_storage(
            BoundedSlab::with_capacity(3),
            GeometricLevelGenerator::seeded(9),
        );
        for value in [4, 2, 6] {
            list.try_insert(value).unwrap();
        }
        let level = list.level();
        assert_eq!(list.try_insert(5), Err(Error::StorageFull { capacity: 3 }));
        check_valid(&list);
        assert_eq!(list.len(), 3);
        assert_eq!(list.level(), level);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 4, 6]);

        assert_eq!(list.pop_front(), Ok(2));
        list.try_insert(5).unwrap();
        check_valid(&list);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a: LinkedSkipList<u32> = (0..100).rev().collect();
        let b = a.clone();
        a.clear();
        check_valid(&b);
        assert_eq!(b.len(), 100);
        assert_eq!(b.iter().copied().collect::<Vec<_>>(), (0..100).collect::<Vec<_>>());
        assert!(a.is_empty());
    }

    #[test]
    fn test_assign() {
        let source: LinkedSkipList<u32> = [3, 1, 2].into();
        let mut target: LinkedSkipList<u32> = [9, 9].into();
        target.assign_from(&source).unwrap();
        check_valid(&target);
        assert_eq!(target, source);

        target.assign(vec![6, 5]).unwrap();
        assert_eq!(target.iter().copied().collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut a: LinkedSkipList<u32> = (0..10).collect();
        let b = a.take();
        check_valid(&a);
        check_valid(&b);
        assert_eq!(a.len(), 0);
        assert_eq!(b.len(), 10);
        a.insert(1);
        assert_eq!(a.front(), Ok(&1));
    }

    #[test]
    fn test_swap() {
        let mut a: LinkedSkipList<u32> = [1, 2, 3].into();
        let mut b: LinkedSkipList<u32> = [7].into();
        let finger = a.find(&2);
        a.swap(&mut b);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 3);
        assert_eq!(b.get(finger), Ok(&2));
        assert_eq!(a.get(finger), Err(Error::InvalidFinger));
    }

    #[test]
    fn test_into_iter() {
        let list: LinkedSkipList<u32> = [2, 3, 1].into();
        check_valid(&list);
        assert_eq!(list.into_iter().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_into_iter_both_ends() {
        let list: LinkedSkipList<String> = ["b", "d", "a", "c"].iter().map(|s| s.to_string()).collect();
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next_back().as_deref(), Some("d"));
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next_back().as_deref(), Some("c"));
        assert_eq!(iter.next().as_deref(), Some("b"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_iter() {
        let list: LinkedSkipList<u32> = [2, 3, 1].into();
        check_valid(&list);
        assert_eq!(list.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
        assert_eq!(list.iter().rev().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
        assert_eq!(list.iter().len(), 3);
    }

    #[test]
    fn test_iter_from() {
        let list: LinkedSkipList<u32> = (1..=6).collect();
        let iter = list.iter_from(list.find(&4)).unwrap();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<_>>(), vec![&4, &5, &6]);
        assert_eq!(list.iter_from(list.end()).unwrap().count(), 0);
    }

    #[test]
    fn test_ordering_and_debug() {
        let a: LinkedSkipList<u32> = [1, 2].into();
        let b: LinkedSkipList<u32> = [1, 3].into();
        assert!(a < b);
        assert_ne!(a, b);
        assert_eq!(format!("{:?}", b), "[1, 3]");
    }

    #[test]
    fn test_with_default_and_from_elem() {
        let zeros: LinkedSkipList<u8> = LinkedSkipList::with_default(3);
        assert_eq!(zeros.iter().copied().collect::<Vec<_>>(), vec![0, 0, 0]);
        let xs = LinkedSkipList::from_elem('X', 5);
        check_valid(&xs);
        assert_eq!(xs.len(), 5);
    }

    #[test]
    fn test_many_inserts_and_removals() {
        let mut list = LinkedSkipList::with_level_generator(GeometricLevelGenerator::seeded(17));
        for i in 0..1000u32 {
            list.insert((i * 7919) % 1000);
        }
        check_valid(&list);
        assert!(list.level() > 3);
        for i in (0..1000u32).step_by(2) {
            assert_eq!(list.remove(&i), Some(i));
        }
        check_valid(&list);
        assert_eq!(list.len(), 500);
        assert!(list.iter().all(|v| v % 2 == 1));
    }
}
