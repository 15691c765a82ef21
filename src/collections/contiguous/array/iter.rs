use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::ptr::{self, NonNull};
use std::slice;

use super::Array;
use crate::alloc::{Global, MemorySource};
#[allow(unused)]
use crate::collections::contiguous::Vector;

impl<T, M: MemorySource> IntoIterator for Array<T, M> {
    type Item = T;

    type IntoIter = IntoIter<T, M>;

    fn into_iter(self) -> Self::IntoIter {
        let (ptr, size, alloc) = self.into_raw();
        IntoIter {
            buf: ptr,
            cap: size,
            start: 0,
            end: size,
            alloc,
        }
    }
}

/// An owned type for owned iteration over an [`Array`] or [`Vector`]. See [`Array::into_iter`] and
/// [`Vector::into_iter`].
///
/// The block is returned to its memory source once the iterator is dropped, along with any values
/// that weren't yielded.
pub struct IntoIter<T, M: MemorySource = Global> {
    pub(crate) buf: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) alloc: M,
}

impl<T, M: MemorySource> IntoIter<T, M> {
    /// Returns the values that have not been yielded yet as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Values in start..end are initialized and haven't been moved out.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, M: MemorySource> Drop for IntoIter<T, M> {
    fn drop(&mut self) {
        // SAFETY: Values in start..end are initialized and are never used again. The block was
        // allocated by alloc for cap values of T (or MaybeUninit<T>, which has the same layout).
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.as_ptr().add(self.start),
                self.end - self.start,
            ));
            self.alloc.deallocate(self.buf, self.cap);
        }
    }
}

impl<T, M: MemorySource> Iterator for IntoIter<T, M> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            // SAFETY: start is in bounds and initialized. It is incremented straight away, so
            // the value is effectively moved out of the block.
            let value = unsafe { self.buf.add(self.start).read() };
            self.start += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, M: MemorySource> DoubleEndedIterator for IntoIter<T, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            self.end -= 1;
            // SAFETY: The newly decremented end is in bounds and initialized, and is no longer
            // considered part of the remaining values.
            let value = unsafe { self.buf.add(self.end).read() };
            Some(value)
        } else {
            None
        }
    }
}

impl<T, M: MemorySource> FusedIterator for IntoIter<T, M> {}

impl<T, M: MemorySource> ExactSizeIterator for IntoIter<T, M> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T: Debug, M: MemorySource> Debug for IntoIter<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

// Just use the iter and iter_mut definitions provided by Deref<Target=[T]>.
