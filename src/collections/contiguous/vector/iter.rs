use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use super::Vector;
use crate::alloc::MemorySource;
#[doc(inline)]
pub use crate::collections::contiguous::array::IntoIter;

impl<T, M: MemorySource> IntoIterator for Vector<T, M> {
    type Item = T;

    type IntoIter = IntoIter<T, M>;

    fn into_iter(self) -> Self::IntoIter {
        let vec = ManuallyDrop::new(self);
        // SAFETY: vec is never dropped, so the Array is moved out exactly once. Its values are
        // handed to the iterator, which drops the first len and deallocates the block.
        let (buf, cap, alloc) = unsafe { ptr::read(&vec.arr) }.into_raw();

        IntoIter {
            buf: buf.cast(),
            cap,
            start: 0,
            end: vec.len,
            alloc,
        }
    }
}

impl<'a, T, M: MemorySource> IntoIterator for &'a Vector<T, M> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, M: MemorySource> IntoIterator for &'a mut Vector<T, M> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
