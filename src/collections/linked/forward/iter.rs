use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{ForwardList, Link};
use crate::alloc::{Global, MemorySource};

impl<T, M: MemorySource> IntoIterator for ForwardList<T, M> {
    type Item = T;

    type IntoIter = IntoIter<T, M>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

/// A type for owned iteration over a [`ForwardList`]. Produces values of type `T`.
pub struct IntoIter<T, M: MemorySource = Global> {
    pub(crate) list: ForwardList<T, M>,
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

impl<T, M: MemorySource> FusedIterator for IntoIter<T, M> {}

impl<T, M: MemorySource> ExactSizeIterator for IntoIter<T, M> {
    fn len(&self) -> usize {
        self.list.len()
    }
}

impl<'a, T, M: MemorySource> IntoIterator for &'a mut ForwardList<T, M> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            next: self.head,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

/// A type for mutable iteration over a [`ForwardList`]. Produces values of type `&mut T`.
pub struct IterMut<'a, T> {
    pub(crate) next: Link<T>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = *node.next();
        self.len -= 1;
        Some(node.value_mut())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<'a, T, M: MemorySource> IntoIterator for &'a ForwardList<T, M> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            next: self.head,
            len: self.len,
            _phantom: PhantomData,
        }
    }
}

/// A type for borrowed iteration over a [`ForwardList`]. Produces values of type `&T`.
pub struct Iter<'a, T> {
    pub(crate) next: Link<T>,
    pub(crate) len: usize,
    pub(crate) _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = *node.next();
        self.len -= 1;
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            next: self.next,
            len: self.len,
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
