use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{DoublyLinkedList, Link, ListState, NodePtr};
use crate::alloc::{Global, MemorySource};

impl<T, M: MemorySource> IntoIterator for DoublyLinkedList<T, M> {
    type Item = T;

    type IntoIter = IntoIter<T, M>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

/// A type for owned iteration over a [`DoublyLinkedList`], from either end. Produces values of
/// type `T`.
pub struct IntoIter<T, M: MemorySource = Global> {
    // Popping from the list frees each node as it is yielded, and dropping the iterator drops
    // whatever is left.
    pub(crate) list: DoublyLinkedList<T, M>,
}

impl<T, M: MemorySource> Iterator for IntoIter<T, M> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<T, M: MemorySource> DoubleEndedIterator for IntoIter<T, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, M: MemorySource> FusedIterator for IntoIter<T, M> {}

impl<T, M: MemorySource> ExactSizeIterator for IntoIter<T, M> {
    fn len(&self) -> usize {
        self.list.len()
    }
}

/// The unvisited stretch of a list: the nodes at either end of it and how many nodes it holds.
/// The two ends meet in the middle, so the count is what stops them from passing each other.
pub(crate) struct Span<T> {
    front: Link<T>,
    back: Link<T>,
    remaining: usize,
}

impl<T> Span<T> {
    fn of(state: &ListState<T>) -> Span<T> {
        Span {
            front: state.head(),
            back: state.tail(),
            remaining: state.len(),
        }
    }

    fn take_front(&mut self) -> Option<NodePtr<T>> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.front?;
        self.front = *node.next();
        self.remaining -= 1;
        Some(node)
    }

    fn take_back(&mut self) -> Option<NodePtr<T>> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.back?;
        self.back = *node.prev();
        self.remaining -= 1;
        Some(node)
    }
}

impl<T> Clone for Span<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Span<T> {}

impl<'a, T, M: MemorySource> IntoIterator for &'a mut DoublyLinkedList<T, M> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            span: Span::of(&self.state),
            _phantom: PhantomData,
        }
    }
}

/// A type for mutable iteration over a [`DoublyLinkedList`], from either end. Produces values of
/// type `&mut T`.
pub struct IterMut<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.take_front().map(|node| node.value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.remaining, Some(self.span.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.take_back().map(|node| node.value_mut())
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<'a, T, M: MemorySource> IntoIterator for &'a DoublyLinkedList<T, M> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            span: Span::of(&self.state),
            _phantom: PhantomData,
        }
    }
}

/// A type for borrowed iteration over a [`DoublyLinkedList`], from either end. Produces values of
/// type `&T`.
pub struct Iter<'a, T> {
    pub(crate) span: Span<T>,
    pub(crate) _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.span.take_front().map(|node| node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.span.remaining, Some(self.span.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.span.take_back().map(|node| node.value())
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            span: self.span,
            _phantom: PhantomData,
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// SAFETY: Iter only hands out shared references to the elements.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
// SAFETY: As above.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

// SAFETY: IterMut hands out unique references to the elements, like &mut T.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: Shared access to IterMut doesn't expose the elements at all.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}
