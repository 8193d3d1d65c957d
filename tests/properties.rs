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

//! Model-based checks: every operation is mirrored on a sorted `Vec` of
//! `(value, serial)` pairs, where the serial records insertion order so
//! duplicate placement can be compared exactly.

use linked_skiplist::{check_valid, Error, GeometricLevelGenerator, LinkedSkipList};
use proptest::prelude::*;
use std::cmp::Ordering;

/// A value tagged with its insertion serial. Only `value` takes part in
/// comparisons.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    value: u8,
    serial: u32,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tagged {}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove(u8),
    EraseAt(usize),
    PopFront,
    PopBack,
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..32).prop_map(Op::Insert),
        2 => (0u8..32).prop_map(Op::Remove),
        2 => any::<usize>().prop_map(Op::EraseAt),
        1 => Just(Op::PopFront),
        1 => Just(Op::PopBack),
        1 => Just(Op::Clear),
    ]
}

fn serials(list: &LinkedSkipList<Tagged>) -> Vec<(u8, u32)> {
    list.iter().map(|t| (t.value, t.serial)).collect()
}

/// Model insert: after every equal value.
fn model_insert(model: &mut Vec<(u8, u32)>, value: u8, serial: u32) {
    let at = model.partition_point(|&(v, _)| v <= value);
    model.insert(at, (value, serial));
}

proptest! {
    #[test]
    fn matches_sorted_vec_model(ops in prop::collection::vec(op(), 0..200), seed in any::<u64>()) {
        let mut list = LinkedSkipList::with_level_generator(GeometricLevelGenerator::seeded(seed));
        let mut model: Vec<(u8, u32)> = vec![];
        let mut serial = 0;

        for op in ops {
            match op {
                Op::Insert(value) => {
                    let finger = list.insert(Tagged { value, serial });
                    prop_assert_eq!(list.get(finger).map(|t| t.serial), Ok(serial));
                    model_insert(&mut model, value, serial);
                    serial += 1;
                }
                Op::Remove(value) => {
                    let removed = list.remove(&Tagged { value, serial: 0 }).map(|t| t.serial);
                    let at = model.iter().position(|&(v, _)| v == value);
                    let expected = at.map(|at| model.remove(at).1);
                    prop_assert_eq!(removed, expected);
                }
                Op::EraseAt(index) => {
                    if !model.is_empty() {
                        let index = index % model.len();
                        let mut finger = list.begin();
                        for _ in 0..index {
                            finger = list.next(finger).unwrap();
                        }
                        let next = list.erase(finger).unwrap();
                        model.remove(index);
                        match model.get(index) {
                            Some(&(_, s)) => {
                                prop_assert_eq!(list.get(next).map(|t| t.serial), Ok(s));
                            }
                            None => {
                                prop_assert_eq!(next, list.end());
                            }
                        }
                    }
                }
                Op::PopFront => {
                    let expected = if model.is_empty() { Err(Error::Empty) } else { Ok(model.remove(0).1) };
                    prop_assert_eq!(list.pop_front().map(|t| t.serial), expected);
                }
                Op::PopBack => {
                    let expected = model.pop().map(|(_, s)| s).ok_or(Error::Empty);
                    prop_assert_eq!(list.pop_back().map(|t| t.serial), expected);
                }
                Op::Clear => {
                    list.clear();
                    model.clear();
                }
            }
            check_valid(&list);
            prop_assert_eq!(list.len(), model.len());
        }
        prop_assert_eq!(serials(&list), model);
    }

    #[test]
    fn iteration_is_sorted_and_complete(values in prop::collection::vec(any::<i32>(), 0..300)) {
        let list: LinkedSkipList<i32> = values.iter().copied().collect();
        check_valid(&list);
        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), sorted.clone());
        sorted.reverse();
        prop_assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn duplicates_land_after_existing_equals(
        existing in 0usize..20,
        smaller in prop::collection::vec(0u8..10, 0..20),
        larger in prop::collection::vec(11u8..20, 0..20),
    ) {
        let mut list = LinkedSkipList::new();
        let mut serial = 0;
        for value in smaller.iter().chain(larger.iter()) {
            list.insert(Tagged { value: *value, serial });
            serial += 1;
        }
        for _ in 0..existing {
            list.insert(Tagged { value: 10, serial });
            serial += 1;
        }
        let newest = list.insert(Tagged { value: 10, serial });
        check_valid(&list);

        let next = list.next(newest).unwrap();
        if next != list.end() {
            prop_assert!(list.get(next).unwrap().value > 10);
        }
        let tens: Vec<u32> = list.iter().filter(|t| t.value == 10).map(|t| t.serial).collect();
        prop_assert_eq!(tens.len(), existing + 1);
        prop_assert!(tens.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(tens.last().copied(), Some(serial));
    }

    #[test]
    fn contains_round_trip(values in prop::collection::hash_set(any::<i16>(), 1..100)) {
        let mut list: LinkedSkipList<i16> = values.iter().copied().collect();
        for value in &values {
            prop_assert!(list.contains(value));
        }
        for value in &values {
            prop_assert_eq!(list.remove(value), Some(*value));
            prop_assert!(!list.contains(value));
        }
        check_valid(&list);
        prop_assert!(list.is_empty());
    }

    #[test]
    fn copies_are_independent(values in prop::collection::vec(any::<u32>(), 0..100)) {
        let mut a: LinkedSkipList<u32> = values.iter().copied().collect();
        let b = a.clone();
        a.clear();
        a.insert(7);
        check_valid(&b);
        let mut sorted = values;
        sorted.sort();
        prop_assert_eq!(b.len(), sorted.len());
        prop_assert_eq!(b.into_iter().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn take_leaves_usable_empty_list(values in prop::collection::vec(any::<u32>(), 0..100), extra in any::<u32>()) {
        let mut a: LinkedSkipList<u32> = values.iter().copied().collect();
        let b = a.take();
        prop_assert_eq!(a.len(), 0);
        prop_assert_eq!(b.len(), values.len());
        a.insert(extra);
        check_valid(&a);
        check_valid(&b);
        prop_assert_eq!(a.front(), Ok(&extra));
    }
}
