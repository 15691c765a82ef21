use std::fmt::{self, Debug, Formatter};

use derive_more::IsVariant;

use super::{DoublyLinkedList, Link, NodePtr, State};
use crate::alloc::{Global, MemorySource};
use crate::util::error::{IndexOutOfBounds, TryReserveError};
use crate::util::result::{ReserveResultExtension, ResultExtension};

/// A type for bi-directional traversal and mutation of [`DoublyLinkedList`]s. See
/// [`DoublyLinkedList::cursor_front`] and [`DoublyLinkedList::cursor_back`] to create one.
///
/// A Cursor owns its list. Besides the list's nodes, it can point to one of two 'ghost'
/// positions: the head, before the first element, and the tail, after the last. Moving past
/// either end of the list stops at the matching ghost.
///
/// # Examples
/// ```
/// # use alloc_collections::collections::linked::{DoublyLinkedList, list::State};
/// let list: DoublyLinkedList<_> = [1, 2, 3].into_iter().collect();
/// let mut cursor = list.cursor_front();
///
/// cursor.move_next();
/// assert_eq!(cursor.state(), State::Node(&2));
/// assert_eq!(cursor.pop_current(), Some(2));
/// assert_eq!(cursor.read(), Some(&3));
///
/// cursor.move_next();
/// assert!(cursor.is_tail());
/// cursor.push_prev(4);
/// assert_eq!(cursor.list(), [1, 3, 4]);
/// ```
pub struct Cursor<T, M: MemorySource = Global> {
    pub(crate) list: DoublyLinkedList<T, M>,
    pub(crate) pos: Position<T>,
}

#[derive(IsVariant)]
pub(crate) enum Position<T> {
    Head,
    Tail,
    Node {
        ptr: NodePtr<T>,
        index: usize,
    },
}

use Position::*;

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T, M: MemorySource> Cursor<T, M> {
    /// Consumes the Cursor, returning the list it was traversing.
    pub fn list(self) -> DoublyLinkedList<T, M> {
        self.list
    }

    /// Returns a reference to the list being traversed.
    pub const fn as_list(&self) -> &DoublyLinkedList<T, M> {
        &self.list
    }

    pub const fn len(&self) -> usize {
        self.list.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the index of the element that the Cursor points to, or None if it is at a ghost
    /// position.
    pub const fn index(&self) -> Option<usize> {
        match self.pos {
            Node { index, .. } => Some(index),
            Head | Tail => None,
        }
    }

    pub const fn state(&self) -> State<&T> {
        if self.list.is_empty() {
            return State::Empty;
        }

        match self.pos {
            Head => State::Head,
            Tail => State::Tail,
            Node { ptr, .. } => State::Node(ptr.value()),
        }
    }

    pub const fn state_mut(&mut self) -> State<&mut T> {
        if self.list.is_empty() {
            return State::Empty;
        }

        match self.pos {
            Head => State::Head,
            Tail => State::Tail,
            Node { ptr, .. } => State::Node(ptr.value_mut()),
        }
    }

    pub const fn is_head(&self) -> bool {
        self.pos.is_head()
    }

    pub const fn is_tail(&self) -> bool {
        self.pos.is_tail()
    }

    /// Returns a reference to the element that the Cursor points to.
    pub const fn read(&self) -> Option<&T> {
        match self.pos {
            Node { ptr, .. } => Some(ptr.value()),
            Head | Tail => None,
        }
    }

    /// Returns a mutable reference to the element that the Cursor points to.
    pub const fn read_mut(&mut self) -> Option<&mut T> {
        match self.pos {
            Node { ptr, .. } => Some(ptr.value_mut()),
            Head | Tail => None,
        }
    }

    /// Returns a reference to the element after the Cursor. From the head, this is the front of
    /// the list.
    pub fn read_next(&self) -> Option<&T> {
        self.next_node().map(|node| node.value())
    }

    /// Returns a reference to the element before the Cursor. From the tail, this is the back of
    /// the list.
    pub fn read_prev(&self) -> Option<&T> {
        self.prev_node().map(|node| node.value())
    }

    /// Moves the Cursor to the next element, or to the tail if there isn't one.
    pub fn move_next(&mut self) -> &mut Self {
        self.pos = match (self.pos, self.next_node()) {
            (Tail, _) => Tail,
            (_, None) => Tail,
            (Head, Some(ptr)) => Node { ptr, index: 0 },
            (Node { index, .. }, Some(ptr)) => Node {
                ptr,
                index: index + 1,
            },
        };
        self
    }

    /// Moves the Cursor to the previous element, or to the head if there isn't one.
    pub fn move_prev(&mut self) -> &mut Self {
        self.pos = match (self.pos, self.prev_node()) {
            (Head, _) => Head,
            (_, None) => Head,
            (Tail, Some(ptr)) => Node {
                ptr,
                index: self.list.len() - 1,
            },
            (Node { index, .. }, Some(ptr)) => Node {
                ptr,
                index: index - 1,
            },
        };
        self
    }

    /// Moves the Cursor to the element at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn move_to(&mut self, index: usize) -> &mut Self {
        self.try_move_to(index).throw()
    }

    /// Moves the Cursor to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`], leaving the Cursor in place, if there is no element at
    /// `index`.
    pub fn try_move_to(&mut self, index: usize) -> Result<&mut Self, IndexOutOfBounds> {
        self.pos = Node {
            ptr: self.list.checked_seek(index)?,
            index,
        };
        Ok(self)
    }

    /// Inserts `value` directly after the Cursor. At the tail, there is no 'after', so the value is
    /// pushed onto the back of the list instead.
    pub fn push_next(&mut self, value: T) {
        self.try_push_next(value).handle()
    }

    /// Inserts `value` directly after the Cursor.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_push_next(&mut self, value: T) -> Result<(), TryReserveError> {
        let node = NodePtr::try_new(&self.list.alloc, value)?;
        let (prev, next) = match self.pos {
            Head => (None, self.list.state.head()),
            Tail => (self.list.state.tail(), None),
            Node { ptr, .. } => (Some(ptr), *ptr.next()),
        };

        // SAFETY: prev and next are adjacent in the list.
        unsafe { self.list.state.link(node, prev, next) };
        Ok(())
    }

    /// Inserts `value` directly before the Cursor. At the head, there is no 'before', so the value
    /// is pushed onto the front of the list instead.
    pub fn push_prev(&mut self, value: T) {
        self.try_push_prev(value).handle()
    }

    /// Inserts `value` directly before the Cursor.
    ///
    /// # Errors
    /// Returns an error if the node can't be allocated, in which case the value is dropped.
    pub fn try_push_prev(&mut self, value: T) -> Result<(), TryReserveError> {
        let node = NodePtr::try_new(&self.list.alloc, value)?;
        let (prev, next) = match self.pos {
            Head => (None, self.list.state.head()),
            Tail => (self.list.state.tail(), None),
            Node { ptr, .. } => (*ptr.prev(), Some(ptr)),
        };

        // SAFETY: prev and next are adjacent in the list.
        unsafe { self.list.state.link(node, prev, next) };

        if let Node { ptr, index } = self.pos {
            self.pos = Node {
                ptr,
                index: index + 1,
            };
        }
        Ok(())
    }

    /// Removes the element after the Cursor and returns it.
    pub fn pop_next(&mut self) -> Option<T> {
        let node = self.next_node()?;
        // SAFETY: node is in the list, and isn't the Cursor's position.
        Some(unsafe { self.list.take(node) })
    }

    /// Removes the element before the Cursor and returns it.
    pub fn pop_prev(&mut self) -> Option<T> {
        let node = self.prev_node()?;

        if let Node { ptr, index } = self.pos {
            self.pos = Node {
                ptr,
                index: index - 1,
            };
        }

        // SAFETY: node is in the list, and isn't the Cursor's position.
        Some(unsafe { self.list.take(node) })
    }

    /// Removes the element that the Cursor points to and returns it, moving the Cursor onto the
    /// following element (or the tail). Returns None at either ghost position.
    ///
    /// Removal is `O(1)`, because the node links to both of its neighbours.
    pub fn pop_current(&mut self) -> Option<T> {
        let Node { ptr, index } = self.pos else {
            return None;
        };

        self.pos = match *ptr.next() {
            Some(next) => Node { ptr: next, index },
            None => Tail,
        };

        // SAFETY: ptr is in the list, and the Cursor has moved off of it.
        Some(unsafe { self.list.take(ptr) })
    }

    fn next_node(&self) -> Link<T> {
        match self.pos {
            Head => self.list.state.head(),
            Tail => None,
            Node { ptr, .. } => *ptr.next(),
        }
    }

    fn prev_node(&self) -> Link<T> {
        match self.pos {
            Head => None,
            Tail => self.list.state.tail(),
            Node { ptr, .. } => *ptr.prev(),
        }
    }
}

impl<T: Debug, M: MemorySource> Debug for Cursor<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("list", &self.list)
            .field("state", &self.state())
            .finish()
    }
}
