#![cfg(test)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::alloc::Tracking;
use crate::util::alloc::CountedDrop;
use crate::util::error::{IndexOrReserveError, IndexOutOfBounds};
use crate::util::panic::assert_panics;

fn list_of<const N: usize>(items: [i32; N]) -> DoublyLinkedList<i32> {
    items.into_iter().collect()
}

#[test]
fn test_push_and_pop_both_ends() {
    let mut list = DoublyLinkedList::new();
    list.push_back(2);
    list.push_front(1);
    list.push_back(3);
    list.verify_double_links();

    assert_eq!(list, [1, 2, 3]);
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.back(), Some(&3));

    *list.back_mut().expect("list isn't empty") = 30;
    assert_eq!(list.pop_back(), Some(30));
    assert_eq!(list.pop_front(), Some(1));
    assert_eq!(list.pop_front(), Some(2));
    assert_eq!(list.pop_front(), None);
    assert!(list.is_empty());
    assert_eq!(list.front(), None);
}

#[test]
fn test_indexed_access() {
    let mut list = list_of([10, 20, 30, 40, 50]);

    for (index, expected) in [10, 20, 30, 40, 50].into_iter().enumerate() {
        assert_eq!(list[index], expected);
    }

    list[3] += 1;
    assert_eq!(list.get(3), &41);
    assert_eq!(list.try_get(5), Err(IndexOutOfBounds { index: 5, len: 5 }));
    assert_eq!(list.replace(0, 0), 10);
    assert_eq!(list.try_replace(9, 0), Err(IndexOutOfBounds { index: 9, len: 5 }));
    assert_panics!({ list.get(5) });
}

#[test]
fn test_insert_and_remove() {
    let mut list = list_of([1, 3]);

    list.insert(0, 0);
    list.insert(2, 2);
    list.insert(4, 4);
    list.verify_double_links();
    assert_eq!(list, [0, 1, 2, 3, 4]);

    assert_eq!(
        list.try_insert(6, 6),
        Err(IndexOrReserveError::IndexOutOfBounds(IndexOutOfBounds { index: 6, len: 5 }))
    );
    assert_eq!(list.len(), 5);

    assert_eq!(list.remove(2), 2);
    assert_eq!(list.remove(3), 4);
    assert_eq!(list.remove(0), 0);
    assert_eq!(list.try_remove(2), Err(IndexOutOfBounds { index: 2, len: 2 }));
    list.verify_double_links();
    assert_eq!(list, [1, 3]);
}

#[test]
fn test_alloc_failure() {
    let tracking = Tracking::new();
    let mut list = DoublyLinkedList::new_in(tracking.clone());
    list.push_back(1);

    tracking.set_budget(Some(0));
    assert!(list.try_push_back(2).is_err_and(|e| e.is_alloc_error()));
    assert!(list.try_push_front(0).is_err());
    assert!(matches!(list.try_insert(1, 2), Err(IndexOrReserveError::AllocError(_))));
    assert_eq!(list, [1]);
    assert_eq!(tracking.live_blocks(), 1);

    drop(list);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_contains_and_index_of() {
    let list = list_of([5, 6, 7, 6]);

    assert!(list.contains(&7));
    assert!(!list.contains(&8));
    assert_eq!(list.index_of(&6), Some(1));
    assert_eq!(list.index_of(&8), None);
}

#[test]
fn test_reverse() {
    let mut list = list_of([1, 2, 3]);

    list.reverse();
    list.verify_double_links();
    assert_eq!(list, [3, 2, 1]);
    assert_eq!(list.front(), Some(&3));
    assert_eq!(list.back(), Some(&1));

    list.reverse();
    assert_eq!(list, [1, 2, 3]);

    let mut empty = DoublyLinkedList::<u8>::new();
    empty.reverse();
    assert!(empty.is_empty());
}

#[test]
fn test_remove_if_and_unique() {
    let drops = Rc::new(Cell::new(0));
    let mut counted = DoublyLinkedList::new();
    for i in 0..6 {
        counted.push_back((i, CountedDrop::new(&drops)));
    }

    assert_eq!(counted.remove_if(|(i, _)| i % 2 == 0), 3);
    assert_eq!(drops.get(), 3);
    assert_eq!(counted.iter().map(|(i, _)| *i).collect::<Vec<_>>(), [1, 3, 5]);
    counted.verify_double_links();

    let mut sorted = list_of([1, 1, 2, 3, 3, 3]);
    assert_eq!(sorted.unique(), 3);
    assert_eq!(sorted, [1, 2, 3]);
    sorted.verify_double_links();

    let mut unsorted = list_of([1, 2, 1]);
    assert_eq!(unsorted.unique(), 0);
    assert_eq!(unsorted, [1, 2, 1]);

    let mut close = list_of([1, 2, 4, 5, 9]);
    assert_eq!(close.unique_by(|kept, next| next - kept <= 1), 2);
    assert_eq!(close, [1, 4, 9]);
}

#[test]
fn test_append() {
    let mut list = list_of([1, 2]);
    list.append(list_of([3, 4]));
    list.append(DoublyLinkedList::new());
    list.verify_double_links();
    assert_eq!(list, [1, 2, 3, 4]);

    let mut empty = DoublyLinkedList::new();
    empty.append(list);
    assert_eq!(empty.len(), 4);
    assert_eq!(empty.back(), Some(&4));
}

#[test]
fn test_iteration_from_both_ends() {
    let mut list = list_of([1, 2, 3, 4]);

    let mut iter = list.iter();
    assert_eq!(iter.len(), 4);
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&4));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.collect::<Vec<_>>(), [&2, &3]);

    for item in list.iter_mut().rev() {
        *item *= 10;
    }
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [40, 30, 20, 10]);

    let mut into_iter = list.into_iter();
    assert_eq!(into_iter.next_back(), Some(40));
    assert_eq!(into_iter.collect::<Vec<_>>(), [10, 20, 30]);
}

#[test]
fn test_drop_counts() {
    let tracking = Tracking::new();
    let drops = Rc::new(Cell::new(0));
    let mut list = DoublyLinkedList::new_in(tracking.clone());
    for _ in 0..5 {
        list.push_back(CountedDrop::new(&drops));
    }

    let mut iter = list.into_iter();
    drop(iter.next());
    assert_eq!(drops.get(), 1);
    drop(iter);
    assert_eq!(drops.get(), 5);
    assert_eq!(tracking.live_blocks(), 0);
}

#[test]
fn test_long_list_drops_iteratively() {
    let list: DoublyLinkedList<u32> = (0..1_000_000).collect();
    assert_eq!(list.len(), 1_000_000);
    drop(list);
}

#[test]
fn test_cursor_ghosts() {
    let mut cursor = list_of([1, 2]).cursor_head();
    assert_eq!(cursor.state(), State::Head);
    assert_eq!(cursor.read(), None);
    assert_eq!(cursor.read_next(), Some(&1));

    cursor.move_prev();
    assert!(cursor.is_head(), "Moving before the head stays there.");

    cursor.move_next().move_next();
    assert_eq!(cursor.state(), State::Node(&2));
    assert_eq!(cursor.index(), Some(1));

    cursor.move_next();
    assert_eq!(cursor.state(), State::Tail);
    assert_eq!(cursor.state().node(), None);
    assert_eq!(cursor.index(), None);
    assert_eq!(cursor.read_prev(), Some(&2));

    cursor.move_prev();
    assert_eq!(cursor.index(), Some(1));
    assert_eq!(cursor.state().node(), Some(&2));

    let empty = DoublyLinkedList::<i32>::new().cursor_front();
    assert!(empty.state().is_empty());
}

#[test]
fn test_cursor_edits() {
    let mut cursor = list_of([1, 3, 5]).cursor_front();

    cursor.push_next(2);
    cursor.move_to(2);
    assert_eq!(cursor.read(), Some(&3));
    cursor.push_prev(20);
    assert_eq!(cursor.index(), Some(3), "Inserting before the cursor shifts its index.");

    assert_eq!(cursor.pop_prev(), Some(20));
    assert_eq!(cursor.index(), Some(2));
    assert_eq!(cursor.pop_next(), Some(5));

    if let State::Node(value) = cursor.state_mut() {
        *value = 30;
    }

    cursor.move_to(0);
    assert_eq!(cursor.pop_current(), Some(1));
    assert_eq!(cursor.index(), Some(0));
    assert_eq!(cursor.read(), Some(&2));

    assert!(cursor.try_move_to(5).is_err());
    assert_eq!(cursor.index(), Some(0));

    let list = cursor.list();
    list.verify_double_links();
    assert_eq!(list, [2, 30]);
}

#[test]
fn test_cursor_pop_current_to_empty() {
    let mut cursor = list_of([7]).cursor_back();
    assert_eq!(cursor.pop_current(), Some(7));
    assert!(cursor.is_tail());
    assert_eq!(cursor.pop_current(), None);
    assert_eq!(cursor.state(), State::Empty);

    cursor.push_next(8);
    assert_eq!(cursor.as_list(), &[8]);
}

#[test]
fn test_clone_and_compare() {
    let list = list_of([1, 2, 3]);
    let mut copy = list.clone();
    copy.push_back(4);

    assert_eq!(list.len(), 3);
    assert!(list < copy);
    assert!(list_of([2]) > copy);
    assert_ne!(list, copy);
    assert_eq!(list, list_of([1, 2, 3]));
}

#[test]
fn test_formatting() {
    let list = list_of([1, 2]);
    assert_eq!(format!("{list}"), "(1) <-> (2)");
    assert_eq!(format!("{list:?}"), "DoublyLinkedList { contents: [1, 2], len: 2 }");
    assert_eq!(format!("{}", DoublyLinkedList::<u8>::new()), "()");
}
