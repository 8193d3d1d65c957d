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

//! Walks through the basic list operations and prints the list after each.
//!
//! Usage: `linked-skiplist-demo [SEED]`. With a seed the tower heights are
//! reproducible; set `RUST_LOG=trace` to watch them being linked.

use linked_skiplist::{
    check_valid, GeometricLevelGenerator, LevelGenerator, LinkedSkipList, NodeStorage, Result,
};
use log::info;
use std::fmt::Display;
use std::process;

fn print_state<T, S, G>(name: &str, list: &LinkedSkipList<T, S, G>)
where
    T: Display,
    S: NodeStorage<T>,
{
    let values: Vec<String> = list.iter().map(|v| v.to_string()).collect();
    println!(
        "{} {{ {} }} Size: {}{}",
        name,
        values.join(", "),
        list.len(),
        if list.is_empty() { " (Empty)" } else { "" }
    );
}

fn basic_operations<S, G>(mut list: LinkedSkipList<i32, S, G>) -> Result<()>
where
    S: NodeStorage<i32>,
    G: LevelGenerator,
{
    println!("\n--- Basic Operations ---");
    print_state("Initial", &list);

    list.push_back(10);
    list.push_front(5);
    list.push_back(20);
    list.push_front(0);
    print_state("After push", &list);
    println!("Front: {}, Back: {}", list.front()?, list.back()?);

    list.pop_front()?;
    print_state("After pop_front", &list);
    list.pop_back()?;
    print_state("After pop_back", &list);
    list.clear();
    print_state("After clear", &list);
    check_valid(&list);
    Ok(())
}

fn fingers<S, G>(mut list: LinkedSkipList<i32, S, G>) -> Result<()>
where
    S: NodeStorage<i32>,
    G: LevelGenerator,
{
    println!("\n--- Fingers & Middle Ops ---");
    for i in 0..5 {
        list.push_back(i * 10);
    }
    print_state("Initial", &list);

    let mut forward = vec![];
    let mut finger = list.begin();
    while finger != list.end() {
        forward.push(list.get(finger)?.to_string());
        finger = list.next(finger)?;
    }
    println!("Forward: {}", forward.join(" "));

    let mut backward = vec![];
    let mut finger = list.end();
    while finger != list.begin() {
        finger = list.prev(finger)?;
        backward.push(list.get(finger)?.to_string());
    }
    println!("Backward: {}", backward.join(" "));

    let hint = list.next(list.next(list.begin())?)?;
    list.insert_hint(hint, 15)?;
    print_state("After insert 15 near position 2", &list);

    let twenty = list.find(&20);
    if twenty != list.end() {
        list.erase(twenty)?;
    }
    print_state("After erase 20", &list);
    check_valid(&list);
    Ok(())
}

fn searching<S, G>(mut list: LinkedSkipList<i32, S, G>) -> Result<()>
where
    S: NodeStorage<i32>,
    G: LevelGenerator,
{
    println!("\n--- Searching ---");
    for i in 0..10 {
        list.push_back(i * 5);
    }
    print_state("List", &list);
    info!("{} elements over {} levels", list.len(), list.level() + 1);

    for probe in [25, 100] {
        println!("Contains {}? {}", probe, if list.contains(&probe) { "Yes" } else { "No" });
    }
    for probe in [15, 50] {
        match list.get(list.find(&probe)) {
            Ok(value) => println!("Found {}. Value: {}", probe, value),
            Err(_) => println!("{} not found.", probe),
        }
    }
    check_valid(&list);
    Ok(())
}

fn copies_and_errors() -> Result<()> {
    println!("\n--- Copy, Move & Construction ---");
    let mut original: LinkedSkipList<i32> = [3, 1, 2].into();
    let copy = original.clone();
    original.clear();
    print_state("Copy after clearing the original", &copy);

    let mut source = copy.clone();
    let moved = source.take();
    print_state("Moved", &moved);
    print_state("Source after move", &source);
    source.insert(42);
    print_state("Source reused", &source);

    let mut assigned: LinkedSkipList<i32> = LinkedSkipList::from_elem(9, 2);
    print_state("Before assign", &assigned);
    assigned.assign_from(&moved)?;
    print_state("After assign", &assigned);

    let defaults: LinkedSkipList<i32> = LinkedSkipList::with_default(3);
    print_state("Three defaults", &defaults);

    let mut empty: LinkedSkipList<i32> = LinkedSkipList::new();
    if let Err(err) = empty.front() {
        println!("front() on empty: {}", err);
    }
    if let Err(err) = empty.pop_back() {
        println!("pop_back() on empty: {}", err);
    }
    check_valid(&assigned);
    Ok(())
}

fn run(seed: Option<u64>) -> Result<()> {
    let levels = || match seed {
        Some(seed) => GeometricLevelGenerator::seeded(seed),
        None => GeometricLevelGenerator::new(),
    };
    basic_operations(LinkedSkipList::with_level_generator(levels()))?;
    fingers(LinkedSkipList::with_level_generator(levels()))?;
    searching(LinkedSkipList::with_level_generator(levels()))?;
    copies_and_errors()
}

fn main() {
    env_logger::init();

    let seed = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        None => None,
        Some(Ok(seed)) => Some(seed),
        Some(Err(err)) => {
            eprintln!("invalid seed: {}", err);
            process::exit(2);
        }
    };
    if let Err(err) = run(seed) {
        eprintln!("demo failed: {}", err);
        process::exit(1);
    }
}
