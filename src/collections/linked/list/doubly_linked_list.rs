use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};

use super::{Cursor, Iter, IterMut, Length, Link, NodePtr, ONE, Position};
use crate::alloc::{Global, MemorySource};
#[doc(inline)]
pub use crate::util::error::{CapacityOverflow, IndexOutOfBounds};
use crate::util::error::{IndexOrReserveError, TryReserveError};
use crate::util::fmt::write_chain;
use crate::util::option::OptionExtension;
use crate::util::result::{ReserveResultExtension, ResultExtension};

/// A list with links in both directions. See also: [`Cursor`] for bi-directional iteration and
/// traversal.
///
/// Every element lives in its own node, allocated from the list's [`MemorySource`]. Nodes never
/// move, so removing an element that a [`Cursor`] points to is `O(1)`: the node already knows both
/// of its neighbours.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DoublyLinkedList.
/// - `i`: The index of the item in question.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `get` | `O(min(i, n-i))` |
/// | `insert` | `O(min(i, n-i))` |
/// | `remove` | `O(min(i, n-i))` |
/// | `replace` | `O(min(i, n-i))` |
/// | `append` | `O(1)` |
/// | `contains` | `O(n)` |
/// | `reverse` | `O(n)` |
///
/// As a general note, modern computer architecture isn't kind to linked lists, (or more
/// importantly, favours contiguous collections) because all `O(i)` or `O(n)` operations will
/// consist primarily of cache misses. Vector should be preferred for most applications unless
/// DoublyLinkedList and the accompanying [`Cursor`] type's `O(1)` methods are being heavily
/// utilized.
pub struct DoublyLinkedList<T, M: MemorySource = Global> {
    pub(crate) state: ListState<T>,
    pub(crate) alloc: M,
    pub(crate) _phantom: PhantomData<T>,
}

#[derive(Default)]
pub(crate) enum ListState<T> {
    #[default]
    Empty,
    Full(ListContents<T>),
}

use ListState::*;

pub(crate) struct ListContents<T> {
    pub len: Length,
    pub head: NodePtr<T>,
    pub tail: NodePtr<T>,
}

impl<T> DoublyLinkedList<T> {
    /// Creates a new DoublyLinkedList with no elements.
    pub const fn new() -> DoublyLinkedList<T> {
        DoublyLinkedList::new_in(Global)
    }
}

impl<T, M: MemorySource> DoublyLinkedList<T, M> {
    /// Creates a new DoublyLinkedList with no elements, which will allocate its nodes from
    /// `alloc`.
    pub const fn new_in(alloc: M) -> DoublyLinkedList<T, M> {
        DoublyLinkedList {
            state: Empty,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Returns the length of the DoublyLinkedList.
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if the DoublyLinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, Empty)
    }

    /// Returns a reference to the list's memory source.
    pub const fn memory_source(&self) -> &M {
        &self.alloc
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub const fn front(&self) -> Option<&T> {
        match self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head.value()),
        }
    }

    /// Returns a mutable reference to the first element in the list, if it exists.
    pub const fn front_mut(&mut self) -> Option<&mut T> {
        match self.state {
            Empty => None,
            Full(ListContents { head, .. }) => Some(head.value_mut()),
        }
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub const fn back(&self) -> Option<&T> {
        match self.state {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(tail.value()),
        }
    }

    /// Returns a mutable reference to the last element in the list, if it exists.
    pub const fn back_mut(&mut self) -> Option<&mut T> {
        match self.state {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(tail.value_mut()),
        }
    }

    /// Add the provided element to the front of the DoublyLinkedList.
    pub fn push_front(&mut self, value: T) {
        self.try_push_front(value).handle()
    }

    /// Add the provided element to the front of the DoublyLinkedList.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_push_front(&mut self, value: T) -> Result<(), TryReserveError> {
        let node = NodePtr::try_new(&self.alloc, value)?;
        // SAFETY: The new node is linked in before the current head.
        unsafe { self.state.link(node, None, self.state.head()) };
        Ok(())
    }

    /// Add the provided element to the back of the DoublyLinkedList.
    pub fn push_back(&mut self, value: T) {
        self.try_push_back(value).handle()
    }

    /// Add the provided element to the back of the DoublyLinkedList.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), TryReserveError> {
        let node = NodePtr::try_new(&self.alloc, value)?;
        // SAFETY: The new node is linked in after the current tail.
        unsafe { self.state.link(node, self.state.tail(), None) };
        Ok(())
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.state.head()?;
        // SAFETY: head is in this list, and is owned by nothing else once it is unlinked.
        unsafe { Some(self.take(head)) }
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.state.tail()?;
        // SAFETY: tail is in this list, and is owned by nothing else once it is unlinked.
        unsafe { Some(self.take(tail)) }
    }

    /// Returns a reference to the element at the provided index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> &T {
        self.try_get(index).throw()
    }

    /// Returns a reference to the element at the provided index.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if there is no element at `index`.
    pub fn try_get(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.value())
    }

    /// Returns a mutable reference to the element at the provided index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        self.try_get_mut(index).throw()
    }

    /// Returns a mutable reference to the element at the provided index.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if there is no element at `index`.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        Ok(self.checked_seek(index)?.value_mut())
    }

    /// Inserts `value` so that it ends up at `index`, shifting every later element back.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::linked::DoublyLinkedList;
    /// let mut list: DoublyLinkedList<_> = [1, 3].into_iter().collect();
    /// list.insert(1, 2);
    /// list.insert(3, 4);
    /// assert_eq!(list, [1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).handle()
    }

    /// Inserts `value` so that it ends up at `index`, shifting every later element back.
    ///
    /// # Errors
    /// Returns an error, leaving the list unchanged, if `index > len` or if the node can't be
    /// allocated.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), IndexOrReserveError> {
        let len = self.len();
        if index > len {
            return Err(IndexOutOfBounds { index, len }.into());
        }

        let node = NodePtr::try_new(&self.alloc, value)?;
        let next = self.seek(index);
        let prev = match next {
            Some(next) => *next.prev(),
            None => self.state.tail(),
        };

        // SAFETY: prev and next are adjacent, with next being the node currently at index.
        unsafe { self.state.link(node, prev, next) };
        Ok(())
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if there is no element at `index`.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        let node = self.checked_seek(index)?;
        // SAFETY: node was just found in this list.
        Ok(unsafe { self.take(node) })
    }

    /// Replaces the element at `index` with `new_value`, returning the old element.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.try_replace(index, new_value).throw()
    }

    /// Replaces the element at `index` with `new_value`, returning the old element.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if there is no element at `index`.
    pub fn try_replace(&mut self, index: usize, new_value: T) -> Result<T, IndexOutOfBounds> {
        Ok(mem::replace(self.try_get_mut(index)?, new_value))
    }

    /// Moves every element of `other` onto the back of this list, without reallocating any of
    /// them. The nodes are adopted by this list, so `other` should share its memory source (be a
    /// clone of the same source).
    pub fn append(&mut self, mut other: DoublyLinkedList<T, M>) {
        let Full(theirs) = mem::take(&mut other.state) else {
            return;
        };

        match &mut self.state {
            Empty => self.state = Full(theirs),
            Full(ours) => {
                *ours.tail.next_mut() = Some(theirs.head);
                *theirs.head.prev_mut() = Some(ours.tail);
                ours.tail = theirs.tail;
                ours.len = ours.len.checked_add(theirs.len.get()).ok_or(CapacityOverflow).throw();
            },
        }
    }

    /// Drops every element in the list, one node at a time.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Reverses the order of the list in place, by swapping the links of every node.
    pub fn reverse(&mut self) {
        if let Full(contents) = &mut self.state {
            let mut curr = Some(contents.head);
            while let Some(node) = curr {
                curr = *node.next();
                mem::swap(node.prev_mut(), node.next_mut());
            }
            mem::swap(&mut contents.head, &mut contents.tail);
        }
    }

    /// Removes every element for which `pred` returns true, returning the number removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> usize {
        let mut removed = 0;
        let mut curr = self.state.head();

        while let Some(node) = curr {
            curr = *node.next();
            if pred(node.value()) {
                // SAFETY: node is in this list and isn't visited again.
                drop(unsafe { self.take(node) });
                removed += 1;
            }
        }

        removed
    }

    /// Collapses each run of consecutive elements for which `same(kept, next)` returns true into
    /// its first element. Returns the number of elements removed.
    pub fn unique_by<F: FnMut(&T, &T) -> bool>(&mut self, mut same: F) -> usize {
        let Some(mut kept) = self.state.head() else {
            return 0;
        };
        let mut removed = 0;

        while let Some(next) = *kept.next() {
            if same(kept.value(), next.value()) {
                // SAFETY: next is in this list and isn't visited again.
                drop(unsafe { self.take(next) });
                removed += 1;
            } else {
                kept = next;
            }
        }

        removed
    }

    /// Converts the list into a [`Cursor`] pointing to the 'ghost' element before the front of
    /// the list.
    pub fn cursor_head(self) -> Cursor<T, M> {
        Cursor {
            list: self,
            pos: Position::Head,
        }
    }

    /// Converts the list into a [`Cursor`] pointing to the 'ghost' element after the back of the
    /// list.
    pub fn cursor_tail(self) -> Cursor<T, M> {
        Cursor {
            list: self,
            pos: Position::Tail,
        }
    }

    /// Converts the list into a [`Cursor`] pointing to its first element, or to the 'ghost' head
    /// if the list is empty.
    pub fn cursor_front(self) -> Cursor<T, M> {
        let pos = match self.state.head() {
            Some(ptr) => Position::Node { ptr, index: 0 },
            None => Position::Head,
        };

        Cursor { list: self, pos }
    }

    /// Converts the list into a [`Cursor`] pointing to its last element, or to the 'ghost' tail
    /// if the list is empty.
    pub fn cursor_back(self) -> Cursor<T, M> {
        let pos = match &self.state {
            Full(contents) => Position::Node {
                ptr: contents.tail,
                index: contents.last_index(),
            },
            Empty => Position::Tail,
        };

        Cursor { list: self, pos }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }
}

impl<T: PartialEq, M: MemorySource> DoublyLinkedList<T, M> {
    /// Returns the index of the first element equal to `item`, if there is one.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|element| element == item)
    }

    /// Returns true if the list contains an element equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }

    /// Collapses each run of consecutive equal elements into one. Returns the number of elements
    /// removed.
    pub fn unique(&mut self) -> usize {
        self.unique_by(|a, b| a == b)
    }
}

impl<T, M: MemorySource> DoublyLinkedList<T, M> {
    /// Unlinks `node` and moves its value out, returning the node's memory to the list's source.
    ///
    /// # Safety
    /// `node` must be part of this list.
    pub(crate) unsafe fn take(&mut self, node: NodePtr<T>) -> T {
        // SAFETY: The caller guarantees that node is in this list. Once unlinked, the list no
        // longer owns it.
        unsafe {
            self.state.unlink(node);
            node.take_node(&self.alloc).value
        }
    }

    /// Returns the node at `index`, or None if `index` is out of bounds.
    pub(crate) fn seek(&self, index: usize) -> Link<T> {
        match &self.state {
            Full(contents) if index < contents.len.get() => Some(contents.seek(index)),
            _ => None,
        }
    }

    pub(crate) fn checked_seek(&self, index: usize) -> Result<NodePtr<T>, IndexOutOfBounds> {
        self.seek(index).ok_or(IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) fn verify_double_links(&self) {
        match self.state {
            Empty => {},
            Full(ListContents { head, tail, len }) => {
                assert!(head.prev().is_none());
                let mut curr = head;
                let mut count = 1;
                while let Some(next) = curr.next() {
                    // UNWRAP: This needs to panic if prev is None.
                    assert!(next.prev().unwrap() == curr);
                    curr = *next;
                    count += 1;
                }
                assert!(tail == curr);
                assert_eq!(count, len.get());
            },
        }
    }
}

impl<T> ListState<T> {
    pub const fn len(&self) -> usize {
        match self {
            Empty => 0,
            Full(ListContents { len, .. }) => len.get(),
        }
    }

    pub const fn head(&self) -> Link<T> {
        match self {
            Empty => None,
            Full(ListContents { head, .. }) => Some(*head),
        }
    }

    pub const fn tail(&self) -> Link<T> {
        match self {
            Empty => None,
            Full(ListContents { tail, .. }) => Some(*tail),
        }
    }

    /// Links the unlinked `node` in between `prev` and `next`. None for `prev` makes the node the
    /// new head, and None for `next` makes it the new tail.
    ///
    /// # Safety
    /// `prev` and `next` must be adjacent in this list (or the list's ends), and `node` must not be
    /// linked into any list.
    pub unsafe fn link(&mut self, node: NodePtr<T>, prev: Link<T>, next: Link<T>) {
        *node.prev_mut() = prev;
        *node.next_mut() = next;

        match &mut *self {
            Empty => {
                *self = Full(ListContents {
                    len: ONE,
                    head: node,
                    tail: node,
                })
            },
            Full(contents) => {
                contents.len = contents.len.checked_add(1).ok_or(CapacityOverflow).throw();

                match prev {
                    Some(prev) => *prev.next_mut() = Some(node),
                    None => contents.head = node,
                }
                match next {
                    Some(next) => *next.prev_mut() = Some(node),
                    None => contents.tail = node,
                }
            },
        }
    }

    /// Unlinks `node` from the list, joining its neighbours together. The node's own links are
    /// left untouched.
    ///
    /// # Safety
    /// `node` must be part of this list.
    pub unsafe fn unlink(&mut self, node: NodePtr<T>) {
        let Full(contents) = &mut *self else {
            return;
        };

        let prev = *node.prev();
        let next = *node.next();

        match contents.len.checked_sub(1) {
            Some(new_len) => {
                contents.len = new_len;

                match prev {
                    Some(prev) => *prev.next_mut() = next,
                    // SAFETY: The list had at least two nodes, so the head is followed by another.
                    None => contents.head = unsafe { next.assume_some() },
                }
                match next {
                    Some(next) => *next.prev_mut() = prev,
                    // SAFETY: The list had at least two nodes, so the tail is preceded by another.
                    None => contents.tail = unsafe { prev.assume_some() },
                }
            },
            None => *self = Empty,
        }
    }
}

impl<T> ListContents<T> {
    pub fn seek(&self, index: usize) -> NodePtr<T> {
        if index < self.len.get() / 2 {
            self.seek_fwd(index, self.head)
        } else {
            self.seek_bwd(self.last_index() - index, self.tail)
        }
    }

    pub fn seek_fwd(&self, count: usize, mut node: NodePtr<T>) -> NodePtr<T> {
        for _ in 0..count {
            // SAFETY: Callers never seek past the end of the list.
            node = unsafe { node.next().assume_some() };
        }
        node
    }

    pub fn seek_bwd(&self, count: usize, mut node: NodePtr<T>) -> NodePtr<T> {
        for _ in 0..count {
            // SAFETY: Callers never seek past the start of the list.
            node = unsafe { node.prev().assume_some() };
        }
        node
    }

    pub const fn last_index(&self) -> usize {
        self.len.get() - 1
    }
}

impl<T> Clone for ListContents<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListContents<T> {}

impl<T> Clone for ListState<T> {
    fn clone(&self) -> Self {
        match self {
            Empty => Empty,
            Full(contents) => Full(*contents),
        }
    }
}

impl<T, M: MemorySource> Index<usize> for DoublyLinkedList<T, M> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index)
    }
}

impl<T, M: MemorySource> IndexMut<usize> for DoublyLinkedList<T, M> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T, M: MemorySource> Extend<T> for DoublyLinkedList<T, M> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T, M: MemorySource + Default> FromIterator<T> for DoublyLinkedList<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = DoublyLinkedList::default();
        list.extend(iter);
        list
    }
}

impl<T, M: MemorySource + Default> Default for DoublyLinkedList<T, M> {
    fn default() -> Self {
        DoublyLinkedList::new_in(M::default())
    }
}

impl<T, M: MemorySource> Drop for DoublyLinkedList<T, M> {
    fn drop(&mut self) {
        self.clear();
    }
}

// SAFETY: The list owns its nodes uniquely, so it can be sent when its elements can be.
unsafe impl<T: Send, M: MemorySource + Send> Send for DoublyLinkedList<T, M> {}
// SAFETY: Shared access never mutates the list, so it can be shared when its elements can be.
unsafe impl<T: Sync, M: MemorySource + Sync> Sync for DoublyLinkedList<T, M> {}

impl<T: Clone, M: MemorySource> Clone for DoublyLinkedList<T, M> {
    fn clone(&self) -> Self {
        let mut list = DoublyLinkedList::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: PartialEq, M: MemorySource, N: MemorySource> PartialEq<DoublyLinkedList<T, N>>
    for DoublyLinkedList<T, M>
{
    fn eq(&self, other: &DoublyLinkedList<T, N>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, M: MemorySource> PartialEq<[T]> for DoublyLinkedList<T, M> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, M: MemorySource, const N: usize> PartialEq<[T; N]> for DoublyLinkedList<T, M> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

impl<T: Eq, M: MemorySource> Eq for DoublyLinkedList<T, M> {}

impl<T: PartialOrd, M: MemorySource> PartialOrd for DoublyLinkedList<T, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, M: MemorySource> Ord for DoublyLinkedList<T, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, M: MemorySource> Hash for DoublyLinkedList<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: Debug, M: MemorySource> Debug for DoublyLinkedList<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoublyLinkedList")
            .field("contents", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug, M: MemorySource> Display for DoublyLinkedList<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_chain(f, self.iter(), " <-> ")
    }
}
