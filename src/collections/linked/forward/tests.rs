#![cfg(test)]

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;

use super::*;
use crate::alloc::Tracking;
use crate::util::alloc::{CloneBomb, CountedDrop};
use crate::util::panic::assert_panics;

fn list_of<const N: usize>(items: [i32; N]) -> ForwardList<i32> {
    items.into_iter().collect()
}

fn tracked_list<const N: usize>(items: [i32; N], tracking: &Tracking) -> ForwardList<i32, Tracking> {
    let mut list = ForwardList::new_in(tracking.clone());
    list.extend(items);
    list
}

#[test]
fn test_push_and_pop_front() {
    let mut list = ForwardList::new();
    assert_eq!(list.front(), None);

    list.push_front(2);
    list.push_front(1);
    list.verify_len();
    assert_eq!(list, [1, 2]);

    *list.front_mut().expect("list isn't empty") = 10;
    assert_eq!(list.pop_front(), Some(10));
    assert_eq!(list.pop_front(), Some(2));
    assert_eq!(list.pop_front(), None);
    assert!(list.is_empty());
}

#[test]
fn test_extend_appends() {
    let mut list = list_of([1, 2]);
    list.extend([3, 4]);
    list.verify_len();
    assert_eq!(list, [1, 2, 3, 4]);
}

#[test]
fn test_cursor_movement() {
    let mut list = list_of([1, 2]);
    let mut cursor = list.cursor_before_begin_mut();

    assert!(cursor.is_before_begin());
    assert_eq!(cursor.current(), None);
    assert_eq!(cursor.peek_next(), Some(&1));

    assert!(cursor.move_next());
    assert!(cursor.move_next());
    assert_eq!(cursor.current(), Some(&2));
    assert_eq!(cursor.peek_next(), None);

    assert!(!cursor.move_next(), "Moving past the last element stays there.");
    *cursor.current_mut().expect("cursor is on an element") = 20;
    assert_eq!(list, [1, 20]);
}

#[test]
fn test_cursor_insert_after() {
    let mut list = list_of([1, 5]);
    let mut cursor = list.cursor_before_begin_mut();

    cursor.insert_after(0);
    assert!(cursor.is_before_begin(), "Inserting leaves the cursor in place.");
    cursor.move_next();
    cursor.move_next();
    assert_eq!(cursor.insert_after_iter([2, 3, 4]), 3);
    assert_eq!(cursor.insert_after_iter([]), 0);
    assert_eq!(cursor.current(), Some(&1));

    while cursor.move_next() {}
    cursor.insert_after_n(2, 9);

    list.verify_len();
    assert_eq!(list, [0, 1, 2, 3, 4, 5, 9, 9]);
}

#[test]
fn test_insert_after_iter_alloc_failure() {
    let tracking = Tracking::new();
    let mut list = tracked_list([1, 2], &tracking);

    tracking.set_budget(Some(2));
    let mut cursor = list.cursor_before_begin_mut();
    cursor.move_next();
    assert!(cursor.try_insert_after_iter([7, 8, 9]).is_err_and(|e| e.is_alloc_error()));

    tracking.set_budget(None);
    list.verify_len();
    assert_eq!(list, [1, 2]);
    assert_eq!(tracking.live_blocks(), 2);
}

#[test]
fn test_insert_after_iter_panic() {
    let tracking = Tracking::new();
    let mut list = tracked_list([1, 2], &tracking);
    let drops = Rc::new(Cell::new(0));
    let bomb = CloneBomb::new(2, &drops);

    let mut bombs = ForwardList::new_in(tracking.clone());
    bombs.push_front(CloneBomb::new(0, &drops));
    assert_panics!({
        bombs.cursor_before_begin_mut().insert_after_n(4, bomb.clone());
    });
    assert_eq!(bombs.len(), 1);
    assert_eq!(drops.get(), 2, "The partial chain and the repeated value are dropped.");

    assert_panics!({
        list.cursor_before_begin_mut()
            .insert_after_iter((0..5).map(|i| if i == 3 { panic!("iterator exploded") } else { i }));
    });
    list.verify_len();
    assert_eq!(list, [1, 2]);

    drop(bombs);
    assert_eq!(tracking.live_blocks(), 2);
}

#[test]
fn test_cursor_remove_after() {
    let drops = Rc::new(Cell::new(0));
    let mut list = ForwardList::new();
    for i in 0..6 {
        list.push_front((i, CountedDrop::new(&drops)));
    }

    let mut cursor = list.cursor_before_begin_mut();
    assert_eq!(cursor.remove_after().map(|(i, _)| i), Some(5));
    cursor.move_next();
    assert_eq!(cursor.remove_after_n(2), 2);
    assert_eq!(drops.get(), 3);

    while cursor.move_next() {}
    assert!(cursor.remove_after().is_none());
    assert_eq!(cursor.remove_after_n(3), 0);

    list.verify_len();
    assert_eq!(list.iter().map(|(i, _)| *i).collect::<Vec<_>>(), [4, 1, 0]);
}

#[test]
fn test_reverse() {
    let mut list = list_of([1, 2, 3]);

    list.reverse();
    assert_eq!(list, [3, 2, 1]);
    list.reverse();
    assert_eq!(list, [1, 2, 3]);

    let mut single = list_of([1]);
    single.reverse();
    assert_eq!(single, [1]);

    let mut empty = ForwardList::<u8>::new();
    empty.reverse();
    assert!(empty.is_empty());
}

#[test]
fn test_unique() {
    let mut sorted = list_of([1, 1, 2, 3, 3, 3]);
    assert_eq!(sorted.unique(), 3);
    sorted.verify_len();
    assert_eq!(sorted, [1, 2, 3]);

    let mut unsorted = list_of([1, 2, 1]);
    assert_eq!(unsorted.unique(), 0);
    assert_eq!(unsorted, [1, 2, 1]);

    let mut close = list_of([1, 2, 4, 5, 9]);
    assert_eq!(close.unique_by(|kept, next| next - kept <= 1), 2);
    assert_eq!(close, [1, 4, 9]);

    assert_eq!(ForwardList::<i32>::new().unique(), 0);
}

#[test]
fn test_remove_and_remove_if() {
    let mut list = list_of([3, 1, 3, 2, 3]);

    assert_eq!(list.remove(&3), 3);
    assert_eq!(list, [1, 2]);
    assert_eq!(list.remove(&7), 0);

    assert_eq!(list.remove_if(|i| *i < 2), 1);
    list.verify_len();
    assert_eq!(list, [2]);
    assert!(list.contains(&2));
    assert!(!list.contains(&1));
}

#[test]
fn test_merge_is_stable() {
    let mut ours: ForwardList<_> = [(1, 'a'), (3, 'a'), (3, 'b'), (5, 'a')].into_iter().collect();
    let mut theirs: ForwardList<_> = [(0, 'x'), (3, 'x'), (6, 'x')].into_iter().collect();

    ours.merge_by(&mut theirs, |a, b| a.0.cmp(&b.0));

    ours.verify_len();
    theirs.verify_len();
    assert!(theirs.is_empty());
    assert_eq!(
        ours,
        [(0, 'x'), (1, 'a'), (3, 'a'), (3, 'b'), (3, 'x'), (5, 'a'), (6, 'x')]
    );
}

#[test]
fn test_merge_into_empty() {
    let mut empty = ForwardList::new();
    let mut other = list_of([1, 2]);

    empty.merge(&mut other);
    assert_eq!(empty, [1, 2]);
    assert!(other.is_empty());

    empty.merge(&mut other);
    assert_eq!(empty.len(), 2);
}

#[test]
fn test_merge_panic_leaves_both_lists_valid() {
    let tracking = Tracking::new();
    let mut ours = tracked_list([1, 3, 5], &tracking);
    let mut theirs = tracked_list([2, 4, 6], &tracking);

    let mut calls = 0;
    assert_panics!({
        ours.merge_by(&mut theirs, |a, b| {
            calls += 1;
            if calls == 3 {
                panic!("comparison exploded");
            }
            a.cmp(b)
        });
    });

    ours.verify_len();
    theirs.verify_len();
    assert_eq!(ours.len() + theirs.len(), 6);

    drop(ours);
    drop(theirs);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_iteration() {
    let mut list = list_of([1, 2, 3]);

    let mut iter = list.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.len(), 2);

    for item in list.iter_mut() {
        *item *= 2;
    }
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), [2, 4, 6]);

    let mut into_iter = list.into_iter();
    assert_eq!(into_iter.next(), Some(2));
    assert_eq!(into_iter.len(), 2);
    assert_eq!(into_iter.collect::<Vec<_>>(), [4, 6]);
}

#[test]
fn test_no_leaks() {
    let tracking = Tracking::new();
    let mut list = tracked_list([1, 2, 3, 4], &tracking);
    assert_eq!(tracking.live_blocks(), 4);

    list.pop_front();
    list.remove_if(|i| i % 2 == 0);
    assert_eq!(tracking.live_blocks(), 1);

    let copy = list.clone();
    assert_eq!(tracking.live_blocks(), 2);

    drop(list);
    drop(copy);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_alloc_failure() {
    let tracking = Tracking::with_budget(0);
    let mut list = ForwardList::new_in(tracking.clone());

    assert!(list.try_push_front(1).is_err());
    assert!(list.is_empty());
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_long_list_drops_iteratively() {
    let list: ForwardList<u32> = (0..1_000_000).collect();
    assert_eq!(list.len(), 1_000_000);
    drop(list);
}

#[test]
fn test_compare_and_hash() {
    use std::hash::{BuildHasher, RandomState};

    let list = list_of([1, 2, 3]);
    let copy = list.clone();
    let state = RandomState::new();

    assert_eq!(list, copy);
    assert_eq!(state.hash_one(&list), state.hash_one(&copy));
    assert_eq!(list.cmp(&list_of([1, 2])), Ordering::Greater);
    assert!(list < list_of([1, 3]));
}

#[test]
fn test_formatting() {
    let list = list_of([1, 2, 3]);
    assert_eq!(format!("{list}"), "(1) -> (2) -> (3)");
    assert_eq!(format!("{list:?}"), "ForwardList { contents: [1, 2, 3], len: 3 }");
    assert_eq!(format!("{}", ForwardList::<u8>::new()), "()");
}
