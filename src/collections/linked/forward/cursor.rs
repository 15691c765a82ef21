use std::fmt::{self, Debug, Formatter};
use std::iter;
use std::mem;

use super::{ForwardList, Link, NodePtr};
use crate::alloc::{Global, MemorySource};
use crate::util::error::TryReserveError;
use crate::util::result::ReserveResultExtension;

/// A mutable cursor over a [`ForwardList`], created with
/// [`ForwardList::cursor_before_begin_mut`].
///
/// A singly linked list can only be edited after a known node, so the Cursor starts at the
/// 'before-begin' position, which sits in front of the first element. Every position, including
/// before-begin, owns the link to the element after it, which is what all of the `*_after` methods
/// operate on. That makes inserting or removing at the front no different from anywhere else.
///
/// # Examples
/// ```
/// # use alloc_collections::collections::linked::ForwardList;
/// let mut list: ForwardList<_> = [1, 4].into_iter().collect();
/// let mut cursor = list.cursor_before_begin_mut();
///
/// cursor.insert_after(0);
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.current(), Some(&1));
/// cursor.insert_after_iter([2, 3]);
/// assert_eq!(cursor.peek_next(), Some(&2));
///
/// assert_eq!(list, [0, 1, 2, 3, 4]);
/// ```
pub struct CursorMut<'a, T, M: MemorySource = Global> {
    pub(crate) list: &'a mut ForwardList<T, M>,
    // None is the before-begin position.
    pub(crate) node: Link<T>,
}

impl<T, M: MemorySource> CursorMut<'_, T, M> {
    pub const fn is_before_begin(&self) -> bool {
        self.node.is_none()
    }

    /// Moves the Cursor onto the next element. Returns false, leaving the Cursor in place, if it
    /// is already on the last element.
    pub fn move_next(&mut self) -> bool {
        match *self.slot() {
            Some(next) => {
                self.node = Some(next);
                true
            },
            None => false,
        }
    }

    /// Returns a reference to the element that the Cursor points to, or None before-begin.
    pub fn current(&self) -> Option<&T> {
        self.node.map(|node| node.value())
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.node.map(|node| node.value_mut())
    }

    /// Returns a reference to the element after the Cursor.
    pub fn peek_next(&self) -> Option<&T> {
        self.slot().map(|node| node.value())
    }

    /// Inserts `value` after the Cursor, which stays where it is.
    pub fn insert_after(&mut self, value: T) {
        self.try_insert_after(value).handle()
    }

    /// Inserts `value` after the Cursor, which stays where it is.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_insert_after(&mut self, value: T) -> Result<(), TryReserveError> {
        let node = NodePtr::try_new(&self.list.alloc, value)?;
        self.link_after(node);
        Ok(())
    }

    /// Inserts `count` clones of `value` after the Cursor.
    pub fn insert_after_n(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        self.insert_after_iter(iter::repeat_n(value, count));
    }

    /// Inserts every item of `iter` after the Cursor, in order. Returns the number of elements
    /// inserted.
    pub fn insert_after_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> usize {
        self.try_insert_after_iter(iter).handle()
    }

    /// Inserts every item of `iter` after the Cursor, in order. Returns the number of elements
    /// inserted.
    ///
    /// The new nodes are linked up separately and only spliced into the list once all of them
    /// exist, so the list is untouched if any allocation fails (or `iter` panics).
    ///
    /// # Errors
    /// Returns an error if any node can't be allocated. Items already taken from `iter` are
    /// dropped.
    pub fn try_insert_after_iter<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
    ) -> Result<usize, TryReserveError> {
        let mut chain = ForwardList::new_in(self.list.alloc.clone());
        let last = {
            let mut cursor = chain.cursor_before_begin_mut();
            for value in iter {
                cursor.try_insert_after(value)?;
                cursor.move_next();
            }
            cursor.node
        };

        let Some(last) = last else {
            return Ok(0);
        };

        let count = mem::take(&mut chain.len);
        *last.next_mut() = *self.slot();
        *self.slot_mut() = chain.head.take();
        self.list.len += count;
        Ok(count)
    }

    /// Removes the element after the Cursor and returns it.
    pub fn remove_after(&mut self) -> Option<T> {
        let next = (*self.slot())?;
        *self.slot_mut() = *next.next();
        self.list.len -= 1;

        // SAFETY: next has just been unlinked from the list, which owned it.
        Some(unsafe { next.take_node(&self.list.alloc) }.value)
    }

    /// Removes up to `count` elements after the Cursor, returning the number removed.
    pub fn remove_after_n(&mut self, count: usize) -> usize {
        let mut removed = 0;
        while removed < count && self.remove_after().is_some() {
            removed += 1;
        }
        removed
    }

    /// Links an unlinked `node` in directly after the Cursor.
    pub(crate) fn link_after(&mut self, node: NodePtr<T>) {
        *node.next_mut() = *self.slot();
        *self.slot_mut() = Some(node);
        self.list.len += 1;
    }

    /// The link owned by the Cursor's position: the list's head before-begin, otherwise the
    /// current node's next.
    pub(crate) fn slot(&self) -> &Link<T> {
        match self.node {
            Some(node) => node.next(),
            None => &self.list.head,
        }
    }

    pub(crate) fn slot_mut(&mut self) -> &mut Link<T> {
        match self.node {
            Some(node) => node.next_mut(),
            None => &mut self.list.head,
        }
    }
}

impl<T: Debug, M: MemorySource> Debug for CursorMut<'_, T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("list", &self.list)
            .field("current", &self.current())
            .finish()
    }
}
