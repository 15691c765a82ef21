use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;

use super::{CursorMut, Iter, IterMut, Link};
use crate::alloc::{Global, MemorySource};
use crate::util::error::TryReserveError;
use crate::util::fmt::write_chain;

/// A singly linked list. See also: [`CursorMut`] for editing at any position.
///
/// Each element lives in its own node, allocated from the list's [`MemorySource`]. Nodes only link
/// forwards, so every edit happens _after_ a known position, with the 'before-begin' position
/// standing in for the front.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the ForwardList.
/// - `m`: The number of items in the other list.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front` | `O(1)` |
/// | `push_front` | `O(1)` |
/// | `pop_front` | `O(1)` |
/// | `CursorMut::insert_after` | `O(1)` |
/// | `CursorMut::remove_after` | `O(1)` |
/// | `merge` | `O(n + m)` |
/// | `reverse` | `O(n)` |
/// | `remove_if` | `O(n)` |
/// | `unique` | `O(n)` |
pub struct ForwardList<T, M: MemorySource = Global> {
    pub(crate) head: Link<T>,
    pub(crate) len: usize,
    pub(crate) alloc: M,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> ForwardList<T> {
    /// Creates a new ForwardList with no elements.
    pub const fn new() -> ForwardList<T> {
        ForwardList::new_in(Global)
    }
}

impl<T, M: MemorySource> ForwardList<T, M> {
    /// Creates a new ForwardList with no elements, which will allocate its nodes from `alloc`.
    pub const fn new_in(alloc: M) -> ForwardList<T, M> {
        ForwardList {
            head: None,
            len: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn memory_source(&self) -> &M {
        &self.alloc
    }

    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| node.value())
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| node.value_mut())
    }

    /// Adds `value` to the front of the list.
    pub fn push_front(&mut self, value: T) {
        self.cursor_before_begin_mut().insert_after(value)
    }

    /// Adds `value` to the front of the list.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_push_front(&mut self, value: T) -> Result<(), TryReserveError> {
        self.cursor_before_begin_mut().try_insert_after(value)
    }

    /// Removes the first element of the list and returns it.
    pub fn pop_front(&mut self) -> Option<T> {
        self.cursor_before_begin_mut().remove_after()
    }

    /// Drops every element in the list, one node at a time.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Returns a [`CursorMut`] at the 'before-begin' position, in front of the first element.
    pub fn cursor_before_begin_mut(&mut self) -> CursorMut<'_, T, M> {
        CursorMut {
            list: self,
            node: None,
        }
    }

    /// Reverses the list in place by turning each link around.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::linked::ForwardList;
    /// let mut list: ForwardList<_> = [1, 2, 3].into_iter().collect();
    /// list.reverse();
    /// assert_eq!(list, [3, 2, 1]);
    /// ```
    pub fn reverse(&mut self) {
        let mut prev = None;
        let mut curr = self.head.take();

        while let Some(node) = curr {
            curr = mem::replace(node.next_mut(), prev);
            prev = Some(node);
        }

        self.head = prev;
    }

    /// Removes every element for which `pred` returns true, returning the number removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> usize {
        let mut cursor = self.cursor_before_begin_mut();
        let mut removed = 0;

        while let Some(next) = cursor.peek_next() {
            if pred(next) {
                drop(cursor.remove_after());
                removed += 1;
            } else {
                cursor.move_next();
            }
        }

        removed
    }

    /// Collapses each run of consecutive elements for which `same(kept, next)` returns true into
    /// its first element. Returns the number of elements removed.
    pub fn unique_by<F: FnMut(&T, &T) -> bool>(&mut self, mut same: F) -> usize {
        let mut cursor = self.cursor_before_begin_mut();
        let mut removed = 0;

        if !cursor.move_next() {
            return 0;
        }

        while let (Some(kept), Some(next)) = (cursor.current(), cursor.peek_next()) {
            if same(kept, next) {
                drop(cursor.remove_after());
                removed += 1;
            } else {
                cursor.move_next();
            }
        }

        removed
    }

    /// Merges `other` into this list, leaving `other` empty. If both lists are sorted according
    /// to `cmp`, the result is too.
    ///
    /// The merge is stable: elements of this list come before equal elements of `other`. Nodes
    /// are moved across rather than reallocated, so `other` should share this list's memory
    /// source.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::linked::ForwardList;
    /// let mut evens: ForwardList<_> = [0, 2, 4].into_iter().collect();
    /// let mut odds: ForwardList<_> = [1, 3, 5, 7].into_iter().collect();
    ///
    /// evens.merge(&mut odds);
    /// assert_eq!(evens, [0, 1, 2, 3, 4, 5, 7]);
    /// assert!(odds.is_empty());
    /// ```
    pub fn merge_by<F>(&mut self, other: &mut ForwardList<T, M>, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut cursor = self.cursor_before_begin_mut();

        while let Some(theirs) = other.head {
            match cursor.peek_next() {
                Some(ours) if cmp(theirs.value(), ours) != Ordering::Less => {
                    cursor.move_next();
                },
                Some(_) => {
                    other.head = *theirs.next();
                    other.len -= 1;
                    cursor.link_after(theirs);
                    cursor.move_next();
                },
                None => {
                    *cursor.slot_mut() = other.head.take();
                    cursor.list.len += mem::take(&mut other.len);
                },
            }
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    #[cfg(test)]
    pub(crate) fn verify_len(&self) {
        let mut count = 0;
        let mut curr = self.head;
        while let Some(node) = curr {
            curr = *node.next();
            count += 1;
        }
        assert_eq!(count, self.len);
    }
}

impl<T: PartialEq, M: MemorySource> ForwardList<T, M> {
    /// Removes every element equal to `value`, returning the number removed.
    pub fn remove(&mut self, value: &T) -> usize {
        self.remove_if(|element| element == value)
    }

    /// Returns true if the list contains an element equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|element| element == item)
    }

    /// Collapses each run of consecutive equal elements into one. Returns the number of elements
    /// removed.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::linked::ForwardList;
    /// let mut list: ForwardList<_> = [1, 1, 2, 3, 3, 3].into_iter().collect();
    /// assert_eq!(list.unique(), 3);
    /// assert_eq!(list, [1, 2, 3]);
    /// ```
    pub fn unique(&mut self) -> usize {
        self.unique_by(|a, b| a == b)
    }
}

impl<T: Ord, M: MemorySource> ForwardList<T, M> {
    /// Merges the sorted list `other` into this sorted list. See [`ForwardList::merge_by`].
    pub fn merge(&mut self, other: &mut ForwardList<T, M>) {
        self.merge_by(other, T::cmp)
    }
}

impl<T, M: MemorySource> Extend<T> for ForwardList<T, M> {
    /// Appends every item of `iter` to the back of the list.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut cursor = self.cursor_before_begin_mut();
        while cursor.move_next() {}

        for item in iter {
            cursor.insert_after(item);
            cursor.move_next();
        }
    }
}

impl<T, M: MemorySource + Default> FromIterator<T> for ForwardList<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = ForwardList::default();
        list.extend(iter);
        list
    }
}

impl<T, M: MemorySource + Default> Default for ForwardList<T, M> {
    fn default() -> Self {
        ForwardList::new_in(M::default())
    }
}

impl<T, M: MemorySource> Drop for ForwardList<T, M> {
    fn drop(&mut self) {
        self.clear();
    }
}

// SAFETY: The list owns its nodes uniquely, so it can be sent when its elements can be.
unsafe impl<T: Send, M: MemorySource + Send> Send for ForwardList<T, M> {}
// SAFETY: Shared access never mutates the list, so it can be shared when its elements can be.
unsafe impl<T: Sync, M: MemorySource + Sync> Sync for ForwardList<T, M> {}

impl<T: Clone, M: MemorySource> Clone for ForwardList<T, M> {
    fn clone(&self) -> Self {
        let mut list = ForwardList::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: PartialEq, M: MemorySource, N: MemorySource> PartialEq<ForwardList<T, N>>
    for ForwardList<T, M>
{
    fn eq(&self, other: &ForwardList<T, N>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, M: MemorySource> PartialEq<[T]> for ForwardList<T, M> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, M: MemorySource, const N: usize> PartialEq<[T; N]> for ForwardList<T, M> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == other.as_slice()
    }
}

impl<T: Eq, M: MemorySource> Eq for ForwardList<T, M> {}

impl<T: PartialOrd, M: MemorySource> PartialOrd for ForwardList<T, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, M: MemorySource> Ord for ForwardList<T, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, M: MemorySource> Hash for ForwardList<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: Debug, M: MemorySource> Debug for ForwardList<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardList")
            .field("contents", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug, M: MemorySource> Display for ForwardList<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_chain(f, self.iter(), " -> ")
    }
}
