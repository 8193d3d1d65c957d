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

use thiserror::Error;

/// Errors reported by [`LinkedSkipList`](crate::LinkedSkipList).
///
/// Every error leaves the list exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `front`, `back` or a pop on an empty list.
    #[error("list is empty")]
    Empty,

    /// The finger was erased, cleared, or belongs to another list.
    #[error("finger does not point into this list")]
    InvalidFinger,

    /// Dereferencing the end finger.
    #[error("cannot dereference the end finger")]
    EndDereference,

    /// Erasing the end finger.
    #[error("cannot erase the end finger")]
    EndErase,

    /// Advancing past the end finger.
    #[error("cannot advance past the end")]
    PastEnd,

    /// Stepping back from the first element.
    #[error("cannot step before the beginning")]
    BeforeBegin,

    /// `last` is not reachable from `first`.
    #[error("range end is not reachable from range start")]
    InvalidRange,

    /// Node storage refused a new node.
    #[error("node storage is full (capacity {capacity})")]
    StorageFull {
        /// The capacity of the storage that refused the node.
        capacity: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
