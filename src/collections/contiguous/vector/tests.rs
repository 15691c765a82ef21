#![cfg(test)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::alloc::Tracking;
use crate::collections::contiguous::Array;
use crate::util::alloc::{CloneBomb, CountedDrop, ZeroSizedType};
use crate::util::error::{IndexOrReserveError, IndexOutOfBounds};
use crate::util::panic::assert_panics;

#[test]
fn test_push_grows_by_policy() {
    let mut vec = Vector::from([1, 2, 3]);
    assert_eq!(vec.cap(), 3);

    vec.push(4);
    assert_eq!(vec, [1, 2, 3, 4]);
    assert_eq!(vec.len(), 4);
    assert_eq!(vec.cap(), 7, "Growing to hold 4 should give 4 + 2 + 1 slots.");

    let mut empty = Vector::new();
    empty.push("a");
    assert_eq!(empty.cap(), 2);
}

#[test]
fn test_reserved_pushes_dont_reallocate() {
    let tracking = Tracking::new();
    let mut vec = Vector::new_in(tracking.clone());
    vec.reserve(16);
    assert_eq!(vec.cap(), 16);
    assert_eq!(tracking.allocations(), 1);

    for i in 0..16 {
        vec.push(i);
    }

    assert_eq!(tracking.allocations(), 1, "Pushing within capacity shouldn't allocate.");
    assert_eq!(vec.cap(), 16);

    vec.reserve(8);
    assert_eq!(vec.cap(), 16, "Reserving less than the capacity is a no-op.");
}

#[test]
fn test_shrink_to_fit() {
    let mut vec = Vector::with_cap(10);
    vec.extend([1, 2, 3]);
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), vec.len());
    assert_eq!(vec, [1, 2, 3]);

    vec.clear();
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 0);
}

#[test]
fn test_zst_support() {
    let mut vec = Vector::new();
    for _ in 0..1000 {
        vec.push(ZeroSizedType);
    }

    assert_eq!(vec.len(), 1000);
    assert_eq!(vec.max_len(), usize::MAX);
    assert_eq!(vec.pop(), Some(ZeroSizedType));
    assert_eq!(vec.into_iter().count(), 999);
}

#[test]
fn test_at_out_of_range() {
    let mut vec = Vector::from([1, 2, 3]);

    assert_eq!(vec.at(2), Ok(&3));
    assert_eq!(vec.at(3), Err(IndexOutOfBounds { index: 3, len: 3 }));
    *vec.at_mut(0).expect("index 0 is in bounds") = 10;
    assert_eq!(vec, [10, 2, 3]);

    assert!(vec.at_mut(7).is_err());
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.cap(), 3);
}

#[test]
fn test_insert() {
    let mut vec = Vector::from([2, 4]);
    vec.insert(0, 1);
    vec.insert(2, 3);
    vec.insert(4, 5);
    assert_eq!(vec, [1, 2, 3, 4, 5]);

    let cap = vec.cap();
    assert_eq!(
        vec.try_insert(7, 0),
        Err(IndexOrReserveError::IndexOutOfBounds(IndexOutOfBounds { index: 7, len: 5 }))
    );
    assert_eq!(vec.len(), 5);
    assert_eq!(vec.cap(), cap);

    assert_panics!({ vec.insert(6, 0) });
}

#[test]
fn test_insert_n_and_iter() {
    let mut vec = Vector::from([1, 5]);
    vec.insert_n(1, 3, 0);
    assert_eq!(vec, [1, 0, 0, 0, 5]);

    assert_eq!(vec.insert_iter(1, [2, 3, 4]), 3);
    assert_eq!(vec, [1, 2, 3, 4, 0, 0, 0, 5]);

    assert_eq!(vec.insert_iter(8, std::iter::empty()), 0);
    vec.extend_from_slice(&[6, 7]);
    assert_eq!(vec, [1, 2, 3, 4, 0, 0, 0, 5, 6, 7]);
}

#[test]
fn test_insert_iter_rolls_back_on_alloc_failure() {
    let tracking = Tracking::new();
    let mut vec = Vector::with_cap_in(4, tracking.clone());
    vec.extend([1, 2]);

    tracking.set_budget(Some(0));
    // The filter hides the length, so the failure happens after two items were already placed.
    let result = vec.try_insert_iter(1, (3..6).filter(|_| true));

    assert!(matches!(result, Err(IndexOrReserveError::AllocError(_))));
    assert_eq!(vec, [1, 2]);
    assert_eq!(vec.cap(), 4);
}

#[test]
fn test_insert_iter_rolls_back_on_panic() {
    let drops = Rc::new(Cell::new(0));
    let mut vec = Vector::from_elem(CountedDrop::new(&drops), 2);
    drops.set(0);

    let mut produced = 0;
    let source = std::iter::from_fn(|| {
        produced += 1;
        if produced > 2 {
            panic!("source failed");
        }
        Some(CountedDrop::new(&drops))
    });

    assert_panics!({ vec.insert_iter(0, source) });
    assert_eq!(vec.len(), 2, "The Vector should hold only its original elements.");
    assert_eq!(drops.get(), 2, "The two inserted elements should have been dropped.");
}

#[test]
fn test_remove() {
    let mut vec = Vector::from(['a', 'b', 'c', 'd']);

    assert_eq!(vec.remove(1), 'b');
    assert_eq!(vec.remove(2), 'd');
    assert_eq!(vec, ['a', 'c']);

    assert_eq!(vec.try_remove(2), Err(IndexOutOfBounds { index: 2, len: 2 }));
    assert_eq!(vec.len(), 2);
    assert_panics!({ vec.remove(5) });
}

#[test]
#[allow(clippy::reversed_empty_ranges)]
fn test_remove_range() {
    let drops = Rc::new(Cell::new(0));
    let mut vec: Vector<_> = (0..6).map(|_| CountedDrop::new(&drops)).collect();

    vec.remove_range(1..4);
    assert_eq!(vec.len(), 3);
    assert_eq!(drops.get(), 3);

    vec.remove_range(2..=2);
    assert_eq!(vec.len(), 2);
    assert_eq!(drops.get(), 4);

    assert_eq!(vec.try_remove_range(1..3), Err(IndexOutOfBounds { index: 3, len: 2 }));
    assert_eq!(vec.try_remove_range(2..1), Err(IndexOutOfBounds { index: 2, len: 2 }));
    assert_eq!(vec.len(), 2);

    vec.remove_range(..);
    assert!(vec.is_empty());
    assert_eq!(drops.get(), 6);

    let mut vec = Vector::from([1, 2, 3, 4, 5]);
    vec.remove_range(3..);
    assert_eq!(vec, [1, 2, 3]);
    vec.remove_range(..1);
    assert_eq!(vec, [2, 3]);
}

#[test]
fn test_swap_remove_and_replace() {
    let mut vec = Vector::from([1, 2, 3, 4]);

    assert_eq!(vec.swap_remove(0), 1);
    assert_eq!(vec, [4, 2, 3]);
    assert_eq!(vec.replace(1, 20), 2);
    assert_eq!(vec, [4, 20, 3]);

    assert_panics!({ vec.swap_remove(3) });
    assert_panics!({ vec.replace(3, 0) });
}

#[test]
fn test_pop_and_truncate() {
    let drops = Rc::new(Cell::new(0));
    let mut vec = Vector::from_elem(CountedDrop::new(&drops), 5);
    drops.set(0);

    drop(vec.pop());
    assert_eq!(drops.get(), 1);

    vec.truncate(10);
    assert_eq!(vec.len(), 4);

    vec.truncate(1);
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.cap(), 5);
    assert_eq!(drops.get(), 4);

    drop(vec);
    assert_eq!(drops.get(), 5);
}

#[test]
fn test_resize() {
    let mut vec = Vector::from([1]);
    vec.resize(3, 9);
    assert_eq!(vec, [1, 9, 9]);
    assert_eq!(vec.cap(), 5);

    vec.resize(1, 0);
    assert_eq!(vec, [1]);
    assert_eq!(vec.cap(), 5, "Shrinking shouldn't change the capacity.");

    vec.resize_default(2);
    assert_eq!(vec, [1, 0]);

    let mut counter = 0;
    vec.resize_with(5, || {
        counter += 1;
        counter
    });
    assert_eq!(vec, [1, 0, 1, 2, 3]);
}

#[test]
fn test_push_with() {
    let mut vec = Vector::from([String::from("a")]);
    vec.push_with(|| String::from("b")).push('c');
    assert_eq!(vec, [String::from("a"), String::from("bc")]);

    assert_panics!({
        vec.push_with(|| panic!("no value"));
    });
    assert_eq!(vec.len(), 2);
}

#[test]
fn test_from_elem_rolls_back_on_panic() {
    let drops = Rc::new(Cell::new(0));
    let tracking = Tracking::new();
    let item = CloneBomb::new(2, &drops);

    assert_panics!({
        let _ = Vector::from_elem_in(item, 5, tracking.clone());
    });

    assert_eq!(drops.get(), 3, "Both clones and the original should have been dropped.");
    assert_eq!(tracking.live_blocks(), 0, "The block should have been deallocated.");
}

#[test]
fn test_from_elem_alloc_failure() {
    let tracking = Tracking::with_budget(0);
    let drops = Rc::new(Cell::new(0));

    let result = Vector::try_from_elem_in(CountedDrop::new(&drops), 4, tracking.clone());
    assert!(result.is_err_and(|e| e.is_alloc_error()));
    assert_eq!(drops.get(), 1, "Only the provided value should exist, and be dropped.");

    let empty = Vector::try_from_elem_in(0_u8, 0, tracking.clone());
    assert!(empty.is_ok(), "An empty Vector doesn't need memory.");
}

#[test]
fn test_failed_growth_leaves_vector_unchanged() {
    let tracking = Tracking::new();
    let mut vec = Vector::with_cap_in(2, tracking.clone());
    vec.extend([1, 2]);

    tracking.set_budget(Some(0));
    assert!(vec.try_push(3).is_err());
    assert!(vec.try_reserve(10).is_err());
    assert!(vec.try_resize_with(4, || 0).is_err());

    assert_eq!(vec, [1, 2]);
    assert_eq!(vec.cap(), 2);
}

#[test]
fn test_capacity_overflow() {
    let mut vec: Vector<u64> = Vector::new();
    assert!(vec.try_reserve(usize::MAX).is_err_and(|e| e.is_capacity_overflow()));
    assert_panics!({ vec.reserve(usize::MAX / 4) });
}

#[test]
fn test_retain_and_dedup() {
    let drops = Rc::new(Cell::new(0));
    let mut vec: Vector<_> = (0..10).map(|i| (i, CountedDrop::new(&drops))).collect();

    vec.retain(|(i, _)| i % 3 == 0);
    assert_eq!(vec.iter().map(|(i, _)| *i).collect::<Vector<_>>(), [0, 3, 6, 9]);
    assert_eq!(drops.get(), 6);

    let mut vec = Vector::from([1, 1, 1, 2, 2, 3, 1, 1]);
    vec.dedup();
    assert_eq!(vec, [1, 2, 3, 1]);

    let mut vec = Vector::from(["a", "A", "b", "B", "b"]);
    vec.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    assert_eq!(vec, ["a", "b"]);
}

#[test]
fn test_append_frees_other() {
    let tracking = Tracking::new();
    let mut vec = Vector::from_iter_in([1, 2], tracking.clone());
    let other = Vector::from_iter_in([3, 4, 5], tracking.clone());
    assert_eq!(tracking.live_blocks(), 2);

    vec.append(other);
    assert_eq!(vec, [1, 2, 3, 4, 5]);
    assert_eq!(tracking.live_blocks(), 1);

    drop(vec);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_into_iter_drops_remaining() {
    let drops = Rc::new(Cell::new(0));
    let tracking = Tracking::new();
    let mut vec = Vector::with_cap_in(8, tracking.clone());
    for _ in 0..5 {
        vec.push(CountedDrop::new(&drops));
    }

    let mut iter = vec.into_iter();
    assert_eq!(iter.len(), 5);
    drop(iter.next());
    drop(iter.next_back());
    assert_eq!(drops.get(), 2);

    drop(iter);
    assert_eq!(drops.get(), 5);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_borrowed_iteration() {
    let mut vec = Vector::from([1, 2, 3]);
    for value in &mut vec {
        *value *= 2;
    }

    let mut sum = 0;
    for value in &vec {
        sum += value;
    }
    assert_eq!(sum, 12);
}

#[test]
fn test_clone_is_independent() {
    let vec = Vector::from([String::from("a"), String::from("b")]);
    let mut copy = vec.clone();
    copy[0].push('!');

    assert_eq!(vec[0], "a");
    assert_eq!(copy[0], "a!");
    assert_eq!(copy.cap(), vec.cap());
}

#[test]
fn test_comparison() {
    let a = Vector::from([1, 2, 3]);
    let b = Vector::from([1, 2, 4]);
    let c = Vector::from([1, 2]);

    assert!(a < b);
    assert!(c < a);
    assert_ne!(a, b);
    assert_eq!(a, Vector::from_iter_in([1, 2, 3], Tracking::new()));
}

#[test]
fn test_array_conversion() {
    let mut vec = Vector::with_cap(10);
    vec.extend([1, 2, 3]);

    let arr = Array::from(vec);
    assert_eq!(arr.size(), 3);

    let vec = Vector::from(arr);
    assert_eq!(vec, [1, 2, 3]);
    assert_eq!(vec.cap(), 3);
}

#[test]
fn test_formatting() {
    let vec = Vector::from([1, 2]);
    assert_eq!(format!("{vec}"), "[1, 2]");
    assert_eq!(format!("{vec:?}"), "Vector { contents: [1, 2], len: 2, cap: 2 }");
}
