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

#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use linked_skiplist::{check_valid, Error, Finger, LinkedSkipList};
use log::debug;

/// A finger held across operations, plus the model index of its element.
type Held = Option<(Finger, usize)>;

fn shift_after_insert(held: &mut Held, at: usize) {
    if let Some((_, index)) = held {
        if *index >= at {
            *index += 1;
        }
    }
}

fn shift_after_remove(held: &mut Held, at: usize) {
    if let Some((_, index)) = *held {
        if index == at {
            *held = None;
        } else if index > at {
            *held = held.map(|(finger, index)| (finger, index - 1));
        }
    }
}

fn fuzztest(data: &[u8]) -> arbitrary::Result<()> {
    let _ = env_logger::try_init();
    let mut u = Unstructured::new(data);
    let mut list: LinkedSkipList<u8> = LinkedSkipList::new();
    let mut list2: LinkedSkipList<u8> = LinkedSkipList::new();
    let mut model = Vec::<u8>::new();
    let mut model2 = Vec::<u8>::new();
    let mut finger1: Held = None;
    let mut finger2: Held = None;

    let iterations = u.arbitrary_len::<u8>()?;
    for _ in 0..iterations {
        let op: u8 = u.arbitrary()?;
        match op % 9 {
            0 => {
                let val: u8 = u.arbitrary()?;
                let keepfinger: bool = u.arbitrary()?;
                debug!("insert {} (kept finger {})", val, keepfinger);
                let fngr = list.insert(val);
                let at = model.partition_point(|&v| v <= val);
                model.insert(at, val);
                shift_after_insert(&mut finger1, at);
                shift_after_insert(&mut finger2, at);
                if keepfinger {
                    finger2 = finger1;
                    finger1 = Some((fngr, at));
                }
            }
            1 => {
                for (finger, index) in finger1.iter().chain(finger2.iter()) {
                    debug!("get finger at {}", index);
                    assert_eq!(list.get(*finger), Ok(&model[*index]));
                }
            }
            2 => {
                let val: u8 = u.arbitrary()?;
                debug!("remove {}", val);
                match model.iter().position(|&v| v == val) {
                    Some(at) => {
                        assert_eq!(list.remove(&val), Some(model.remove(at)));
                        shift_after_remove(&mut finger1, at);
                        shift_after_remove(&mut finger2, at);
                    }
                    None => assert_eq!(list.remove(&val), None),
                }
            }
            3 => {
                debug!("swap");
                list.swap(&mut list2);
                std::mem::swap(&mut model, &mut model2);
                if let Some((finger, _)) = finger1 {
                    assert_eq!(list.get(finger), Err(Error::InvalidFinger));
                }
                finger1 = None;
                finger2 = None;
            }
            4 => {
                debug!("take");
                list2 = list.take();
                model2 = std::mem::take(&mut model);
                if let Some((finger, index)) = finger1 {
                    assert_eq!(list2.get(finger), Ok(&model2[index]));
                    assert_eq!(list.get(finger), Err(Error::InvalidFinger));
                }
                finger1 = None;
                finger2 = None;
            }
            5 => {
                debug!("clear");
                let end = list.end();
                list.clear();
                model.clear();
                assert_eq!(list.get(end), Err(Error::InvalidFinger));
                finger1 = None;
                finger2 = None;
            }
            6 => {
                if let Some((finger, at)) = finger1 {
                    debug!("erase at {}", at);
                    let next = list.erase(finger).unwrap();
                    model.remove(at);
                    finger1 = None;
                    shift_after_remove(&mut finger2, at);
                    match model.get(at) {
                        Some(val) => assert_eq!(list.get(next), Ok(val)),
                        None => assert_eq!(next, list.end()),
                    }
                }
            }
            7 => {
                if let (Some((first, start)), Some((last, stop))) = (finger2, finger1) {
                    debug!("erase range {}..{}", start, stop);
                    if start <= stop {
                        assert_eq!(list.erase_range(first, last), Ok(last));
                        model.drain(start..stop);
                        finger1 = Some((last, start));
                        if start != stop {
                            finger2 = None;
                        }
                    } else {
                        assert_eq!(list.erase_range(first, last), Err(Error::InvalidRange));
                    }
                }
            }
            8 => {
                let back: bool = u.arbitrary()?;
                debug!("pop (back {})", back);
                if model.is_empty() {
                    assert_eq!(list.pop_front(), Err(Error::Empty));
                } else if back {
                    let at = model.len() - 1;
                    assert_eq!(list.pop_back(), model.pop().ok_or(Error::Empty));
                    shift_after_remove(&mut finger1, at);
                    shift_after_remove(&mut finger2, at);
                } else {
                    assert_eq!(list.pop_front(), Ok(model.remove(0)));
                    shift_after_remove(&mut finger1, 0);
                    shift_after_remove(&mut finger2, 0);
                }
            }
            _ => panic!("Invalid op!"),
        }
        check_valid(&list);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), model);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    fuzztest(data).ok();
});
