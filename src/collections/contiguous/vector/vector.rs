use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::iter;
use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ops::{Bound, Deref, DerefMut, RangeBounds};
use std::ptr::{self, NonNull};
use std::slice;

use log::debug;

use crate::alloc::{Global, MemorySource};
use crate::collections::contiguous::Array;
use crate::collections::contiguous::growth;
use crate::util::error::{CapacityOverflow, IndexOrReserveError, IndexOutOfBounds, TryReserveError};
use crate::util::result::{ReserveResultExtension, ResultExtension};

/// A variable size contiguous collection, based on [`Array<T>`].
///
/// Slots `[0, len)` of the backing block are always initialized and slots `[len, cap)` are raw
/// storage. When the Vector needs more room than it has, it grows according to
/// [`next_cap`](growth::next_cap) and relocates every element into a new block.
///
/// # Invalidation
/// Any method that may reallocate moves every element, so references and iterators into the
/// Vector don't survive it. All such methods take `&mut self`, which means the borrow checker
/// rejects code that would hold on to one.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being added, or in the second Vector.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` / `at` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_unchecked` | `O(1)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `insert_iter` | `O(n-i+m)` |
/// | `remove` | `O(n-i)` |
/// | `remove_range` | `O(n-i)` |
/// | `swap_remove` | `O(1)` |
/// | `replace` | `O(1)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `resize` | `O(m)`, `O(n+m)` |
/// | `append` | `O(n+m)` |
/// | `retain` / `dedup` | `O(n)` |
///
/// \* If the Vector doesn't have enough capacity for the new element, `push` will take `O(n)`.
///
/// \** If the Vector has enough capacity already, `reserve` is `O(1)`.
pub struct Vector<T, M: MemorySource = Global> {
    pub(crate) arr: Array<MaybeUninit<T>, M>,
    pub(crate) len: usize,
}

/// Truncates a Vector back to `len` when dropped, unless `len` has been moved forward first.
/// Used to undo a partially completed bulk insertion.
struct Truncate<'a, T, M: MemorySource> {
    vec: &'a mut Vector<T, M>,
    len: usize,
}

impl<T, M: MemorySource> Drop for Truncate<'_, T, M> {
    fn drop(&mut self) {
        self.vec.truncate(self.len);
    }
}

impl<T> Vector<T> {
    /// Creates a new Vector with length and capacity 0. Memory will be allocated when the capacity
    /// changes.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> Vector<T> {
        Vector::new_in(Global)
    }

    /// Creates a new Vector with capacity exactly equal to the provided value, allowing values to
    /// be added without reallocation.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> Vector<T> {
        Vector::with_cap_in(cap, Global)
    }
}

impl<T: Clone> Vector<T> {
    /// Creates a Vector holding `count` clones of `value`, with capacity exactly `count`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let vec = Vector::from_elem("a", 3);
    /// assert_eq!(vec, ["a", "a", "a"]);
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn from_elem(value: T, count: usize) -> Vector<T> {
        Vector::from_elem_in(value, count, Global)
    }
}

impl<T, M: MemorySource> Vector<T, M> {
    /// Creates a new, empty Vector which will take its storage from `alloc`. Nothing is allocated
    /// until the first element is added.
    pub const fn new_in(alloc: M) -> Vector<T, M> {
        Vector {
            arr: Array::new_in(alloc),
            len: 0,
        }
    }

    /// Creates a new Vector in `alloc` with capacity exactly `cap`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn with_cap_in(cap: usize, alloc: M) -> Vector<T, M> {
        Vector::try_with_cap_in(cap, alloc).handle()
    }

    /// Creates a new Vector in `alloc` with capacity exactly `cap`.
    ///
    /// # Errors
    /// Returns an error if the block can't be allocated.
    pub fn try_with_cap_in(cap: usize, alloc: M) -> Result<Vector<T, M>, TryReserveError> {
        Ok(Vector {
            arr: Array::try_new_uninit_in(cap, alloc)?,
            len: 0,
        })
    }

    /// Creates a Vector in `alloc` from the items of an iterator. The lower bound of the
    /// iterator's size hint is used as the initial capacity.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: M) -> Vector<T, M> {
        let iter = iter.into_iter();
        let mut vec = Vector::with_cap_in(iter.size_hint().0, alloc);

        for item in iter {
            vec.push(item);
        }

        vec
    }

    /// Returns the length of the Vector.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let vec = Vector::from([1_u8, 2, 3]);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::new();
    /// assert!(vec.is_empty());
    /// vec.push(1);
    /// assert!(!vec.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector. Unlike [`Vec`], the capacity is guaranteed to be
    /// exactly the value provided to any of the various capacity manipulation functions.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub const fn cap(&self) -> usize {
        self.arr.size()
    }

    /// Returns the largest length the Vector could theoretically reach with its memory source.
    pub fn max_len(&self) -> usize {
        self.arr.memory_source().max_size::<T>()
    }

    /// Returns a reference to the Vector's memory source.
    pub const fn memory_source(&self) -> &M {
        self.arr.memory_source()
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let vec = Vector::from([1, 2, 3]);
    /// assert_eq!(vec.at(1), Ok(&2));
    /// assert!(vec.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(&self[index])
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(&mut self[index])
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3]);
    /// vec.push(4);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// assert_eq!(vec.cap(), 7);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_push(value).handle()
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Errors
    /// Returns an error, without modifying the Vector, if the capacity can't be increased.
    pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
        self.grow_for(self.len.checked_add(1).ok_or(CapacityOverflow)?)?;
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
        Ok(())
    }

    /// Constructs a new element directly in the slot at the end of the Vector, using the value
    /// returned by `f`. Capacity is increased before `f` is called, so a panic in `f` leaves the
    /// length unchanged.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<String> = Vector::new();
    /// let value = vec.push_with(|| "hello".repeat(2));
    /// assert_eq!(value, "hellohello");
    /// ```
    pub fn push_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        let required = self.len.checked_add(1).ok_or(CapacityOverflow).throw();
        self.grow_for(required).handle();
        let index = self.len;
        // SAFETY: The capacity was just increased to fit at least one more value.
        unsafe { self.push_unchecked(f()) }
        &mut self[index]
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or [`with_cap`](Vector::with_cap) to
    /// do so. Using this method on a Vector without enough capacity is undefined behavior.
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the slot at len is within the capacity,
        // and all slots at or beyond len are uninitialized.
        unsafe { self.arr.alloc.construct(self.as_non_null().add(self.len), value) }
        self.len += 1;
    }

    /// Removes the last element from the Vector and returns it, or returns None if the Vector is
    /// empty.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2]);
    /// assert_eq!(vec.pop(), Some(2));
    /// assert_eq!(vec.pop(), Some(1));
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before getting.
            self.len -= 1;

            // SAFETY: The value at the old last index is initialized and is no longer considered
            // part of the Vector, so moving it out leaves nothing to double drop.
            Some(unsafe { self.as_non_null().add(self.len).read() })
        }
    }

    /// Inserts `value` at `index`, shifting every element after it one slot to the right.
    /// `index` may equal the length, in which case this behaves like [`push`](Vector::push).
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 3]);
    /// vec.insert(1, 2);
    /// vec.insert(3, 4);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).handle()
    }

    /// Inserts `value` at `index`, shifting every element after it one slot to the right.
    ///
    /// # Errors
    /// Returns an error, leaving the Vector unchanged, if `index > len` or the capacity can't be
    /// increased.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), IndexOrReserveError> {
        self.check_position(index)?;
        self.grow_for(self.len.checked_add(1).ok_or(CapacityOverflow)?)?;

        // SAFETY: index <= len < cap, so both the source and destination ranges lie within the
        // block. ptr::copy handles the overlap. After the shift, the slot at index is logically
        // uninitialized and ready to be written.
        unsafe {
            let gap = self.as_non_null().add(index);
            ptr::copy(gap.as_ptr(), gap.add(1).as_ptr(), self.len - index);
            self.arr.alloc.construct(gap, value);
        }

        self.len += 1;
        Ok(())
    }

    /// Inserts every item produced by `iter` at `index`, preserving their order, and returns the
    /// number of items inserted.
    ///
    /// If the iterator panics part way through, the Vector is restored to its previous contents.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 5]);
    /// assert_eq!(vec.insert_iter(1, 2..5), 3);
    /// assert_eq!(vec, [1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> usize {
        self.try_insert_iter(index, iter).handle()
    }

    /// Inserts every item produced by `iter` at `index`, preserving their order, and returns the
    /// number of items inserted.
    ///
    /// # Errors
    /// Returns an error if `index > len` or if the capacity can't be increased, in which case the
    /// Vector holds exactly the elements it held before the call.
    pub fn try_insert_iter<I: IntoIterator<Item = T>>(
        &mut self,
        index: usize,
        iter: I,
    ) -> Result<usize, IndexOrReserveError> {
        self.check_position(index)?;

        let iter = iter.into_iter();
        let old_len = self.len;
        self.grow_for(old_len.checked_add(iter.size_hint().0).ok_or(CapacityOverflow)?)?;

        // Items are appended first and rotated into place afterwards, so that a failure part way
        // through only has to truncate.
        let mut guard = Truncate { vec: self, len: old_len };
        for item in iter {
            guard.vec.try_push(item)?;
        }

        let added = guard.vec.len - old_len;
        guard.vec[index..].rotate_right(added);
        guard.len = guard.vec.len;

        Ok(added)
    }

    /// Removes and returns the element at `index`, shifting every element after it one slot to
    /// the left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3]);
    /// assert_eq!(vec.remove(0), 1);
    /// assert_eq!(vec, [2, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).throw()
    }

    /// Removes and returns the element at `index`, shifting every element after it one slot to
    /// the left.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn try_remove(&mut self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.check_index(index)?;

        // SAFETY: index < len, so the value is initialized. It is moved out before the tail is
        // shifted over its slot, and len is reduced to match.
        unsafe {
            let hole = self.as_non_null().add(index);
            let value = hole.read();
            ptr::copy(hole.add(1).as_ptr(), hole.as_ptr(), self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Removes the elements in `range`, shifting the elements after it to the left. The bounds
    /// of the range are resolved once, against the length before the removal.
    ///
    /// # Panics
    /// Panics if the range is out of bounds or its start is after its end.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3, 4, 5]);
    /// vec.remove_range(1..3);
    /// assert_eq!(vec, [1, 4, 5]);
    /// vec.remove_range(..);
    /// assert!(vec.is_empty());
    /// ```
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) {
        self.try_remove_range(range).throw()
    }

    /// Removes the elements in `range`, shifting the elements after it to the left.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if the range reaches beyond the length or its start is after
    /// its end. The Vector is unchanged in this case.
    pub fn try_remove_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<(), IndexOutOfBounds> {
        let (start, end) = self.resolve_range(range)?;
        let old_len = self.len;

        // If dropping an element panics, the tail is leaked rather than dropped twice.
        self.len = start;

        // SAFETY: start <= end <= old_len, so the dropped range is initialized and the tail is
        // within the block. ptr::copy handles the overlap.
        unsafe {
            let base = self.as_non_null().as_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), end - start));
            ptr::copy(base.add(end), base.add(start), old_len - end);
        }

        self.len = old_len - (end - start);
        Ok(())
    }

    /// Removes the element at `index` and returns it, replacing it with the last element of the
    /// Vector. This doesn't preserve ordering, but is `O(1)`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.check_index(index).throw();

        let last = self.len - 1;
        self.swap(index, last);
        // SAFETY: The Vector contains at least one element, because index < len.
        unsafe { self.pop().unwrap_unchecked() }
    }

    /// Replaces the element at `index` with `new_value`, returning the old value.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.check_index(index).throw();
        mem::replace(&mut self[index], new_value)
    }

    /// Shortens the Vector to `len`, dropping the elements after it. The capacity is unchanged.
    /// Has no effect if `len` is greater than or equal to the current length.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let old_len = self.len;
        self.len = len;

        // SAFETY: Slots [len, old_len) are initialized and are no longer part of the Vector.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.as_non_null().add(len).as_ptr(),
                old_len - len,
            ));
        }
    }

    /// Drops every element of the Vector, keeping its capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensures that the Vector has a capacity of at least `cap`. If it doesn't already, it is
    /// reallocated to hold exactly `cap` elements.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2]);
    /// vec.reserve(10);
    /// assert_eq!(vec.cap(), 10);
    /// vec.reserve(4);
    /// assert_eq!(vec.cap(), 10);
    /// ```
    pub fn reserve(&mut self, cap: usize) {
        self.try_reserve(cap).handle()
    }

    /// Ensures that the Vector has a capacity of at least `cap`.
    ///
    /// # Errors
    /// Returns an error, without modifying the Vector, if the new block can't be allocated.
    pub fn try_reserve(&mut self, cap: usize) -> Result<(), TryReserveError> {
        if cap <= self.cap() {
            return Ok(());
        }

        debug!("Reserving capacity for {} elements (was {})", cap, self.cap());
        self.arr.try_realloc(cap)
    }

    /// Shrinks the capacity of the Vector to match its length.
    ///
    /// # Panics
    /// Panics if the new block can't be allocated.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::with_cap(10);
    /// vec.push(1);
    /// vec.shrink_to_fit();
    /// assert_eq!(vec.cap(), 1);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.try_shrink_to_fit().handle()
    }

    /// Shrinks the capacity of the Vector to match its length.
    ///
    /// # Errors
    /// Returns an error, without modifying the Vector, if the new block can't be allocated.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), TryReserveError> {
        if self.cap() == self.len {
            return Ok(());
        }

        debug!("Shrinking capacity from {} to {} elements", self.cap(), self.len);
        self.arr.try_realloc(self.len)
    }

    /// Resizes the Vector to `new_len`. Extra elements are dropped when shrinking, and new
    /// elements are produced by calling `f` when growing.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) {
        self.try_resize_with(new_len, f).handle()
    }

    /// Resizes the Vector to `new_len`, calling `f` to produce any new elements.
    ///
    /// # Errors
    /// Returns an error, without modifying the Vector, if the capacity can't be increased.
    pub fn try_resize_with<F: FnMut() -> T>(&mut self, new_len: usize, f: F) -> Result<(), TryReserveError> {
        self.try_resize_from(new_len, iter::repeat_with(f))
    }

    /// Appends every element of `other` to the end of this Vector, leaving the storage of
    /// `other` to be deallocated.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2]);
    /// vec.append(Vector::from([3, 4]));
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    pub fn append<N: MemorySource>(&mut self, mut other: Vector<T, N>) {
        let required = self.len.checked_add(other.len).ok_or(CapacityOverflow).throw();
        self.grow_for(required).handle();

        // SAFETY: self has room for other.len values after its own, and the two blocks are
        // distinct allocations. Ownership of the values moves to self, so other forgets them.
        unsafe {
            ptr::copy_nonoverlapping(
                other.as_non_null().as_ptr().cast_const(),
                self.as_non_null().add(self.len).as_ptr(),
                other.len,
            );
        }

        self.len += other.len;
        other.len = 0;
    }

    /// Retains only the elements for which `f` returns true, preserving their order.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3, 4, 5, 6]);
    /// vec.retain(|x| x % 2 == 0);
    /// assert_eq!(vec, [2, 4, 6]);
    /// ```
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
        self.compact(|current, _| !f(current));
    }

    /// Removes consecutive elements for which `same_bucket` returns true. The first argument is
    /// the element being considered and the second is the last element that was kept.
    pub fn dedup_by<F: FnMut(&mut T, &mut T) -> bool>(&mut self, mut same_bucket: F) {
        self.compact(|current, kept| kept.is_some_and(|kept| same_bucket(current, kept)));
    }

    /// Shared implementation of [`retain`](Vector::retain) and [`dedup_by`](Vector::dedup_by).
    /// Walks the Vector once, dropping every element that `discard` selects and moving the rest
    /// down to close the gaps.
    fn compact<F>(&mut self, mut discard: F)
    where
        F: FnMut(&mut T, Option<&mut T>) -> bool,
    {
        let len = self.len;
        let base = self.as_non_null();

        // If discard panics, the remaining elements are leaked instead of being left in an
        // inconsistent state.
        self.len = 0;

        let mut kept = 0;
        for read in 0..len {
            // SAFETY: read < len and kept <= read, so every pointer is in bounds. Slots [0, kept)
            // hold the retained values and slots [read, len) are still untouched.
            unsafe {
                let current = base.add(read);
                let last_kept = if kept == 0 {
                    None
                } else {
                    Some(&mut *base.add(kept - 1).as_ptr())
                };

                if discard(&mut *current.as_ptr(), last_kept) {
                    ptr::drop_in_place(current.as_ptr());
                } else {
                    if read != kept {
                        ptr::copy_nonoverlapping(current.as_ptr(), base.add(kept).as_ptr(), 1);
                    }
                    kept += 1;
                }
            }
        }

        self.len = kept;
    }

    /// Ensures that the Vector can hold `required` elements, growing it according to the growth
    /// policy if it can't already.
    pub(crate) fn grow_for(&mut self, required: usize) -> Result<(), TryReserveError> {
        if required <= self.cap() {
            return Ok(());
        }

        // If the policy would grow past the maximum length, use the maximum instead, as long as
        // that still fits the requirement.
        let new_cap = growth::next_cap(self.cap(), required)
            .unwrap_or(required)
            .min(self.max_len())
            .max(required);

        self.arr.try_realloc(new_cap)
    }

    /// Resizes the Vector to `new_len`, taking any new elements from `source`.
    fn try_resize_from<I: Iterator<Item = T>>(&mut self, new_len: usize, source: I) -> Result<(), TryReserveError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        self.grow_for(new_len)?;
        for item in source.take(new_len - self.len) {
            // SAFETY: The capacity was just increased to at least new_len.
            unsafe { self.push_unchecked(item) }
        }

        Ok(())
    }

    pub(crate) const fn as_non_null(&self) -> NonNull<T> {
        self.arr.ptr.cast()
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index >= self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    /// Like [`check_index`](Vector::check_index), but also accepts the position one past the end.
    pub(crate) fn check_position(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index > self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }

    fn resolve_range<R: RangeBounds<usize>>(&self, range: R) -> Result<(usize, usize), IndexOutOfBounds> {
        let out_of_bounds = |index| IndexOutOfBounds { index, len: self.len };

        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1).ok_or(out_of_bounds(start))?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1).ok_or(out_of_bounds(end))?,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };

        if end > self.len {
            Err(out_of_bounds(end))
        } else if start > end {
            Err(out_of_bounds(start))
        } else {
            Ok((start, end))
        }
    }
}

impl<T: Clone, M: MemorySource> Vector<T, M> {
    /// Creates a Vector in `alloc` holding `count` clones of `value`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn from_elem_in(value: T, count: usize, alloc: M) -> Vector<T, M> {
        Vector::try_from_elem_in(value, count, alloc).handle()
    }

    /// Creates a Vector in `alloc` holding `count` clones of `value`, with capacity exactly
    /// `count`. If cloning panics, the clones made so far are dropped and the block is freed
    /// before the panic continues.
    ///
    /// # Errors
    /// Returns an error if the block can't be allocated, in which case no clones are made.
    pub fn try_from_elem_in(value: T, count: usize, alloc: M) -> Result<Vector<T, M>, TryReserveError> {
        let mut vec = Vector::try_with_cap_in(count, alloc)?;

        for item in iter::repeat_n(value, count) {
            // SAFETY: vec has been created with capacity for count values.
            unsafe { vec.push_unchecked(item) }
        }

        Ok(vec)
    }

    /// Resizes the Vector to `new_len`, filling any new slots with clones of `value`.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1]);
    /// vec.resize(3, 0);
    /// assert_eq!(vec, [1, 0, 0]);
    /// vec.resize(1, 0);
    /// assert_eq!(vec, [1]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        let additional = new_len.saturating_sub(self.len);
        self.try_resize_from(new_len, iter::repeat_n(value, additional)).handle()
    }

    /// Inserts `count` clones of `value` at `index`.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the memory layout of the Vector would have a size that
    /// exceeds [`isize::MAX`].
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) {
        self.insert_iter(index, iter::repeat_n(value, count));
    }

    /// Appends clones of every element in `other`.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.insert_iter(self.len, other.iter().cloned());
    }
}

impl<T: Default, M: MemorySource> Vector<T, M> {
    /// Resizes the Vector to `new_len`, filling any new slots with default values.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn resize_default(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default)
    }
}

impl<T: PartialEq, M: MemorySource> Vector<T, M> {
    /// Removes consecutive equal elements, keeping the first of each run.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 1, 2, 3, 3, 3, 1]);
    /// vec.dedup();
    /// assert_eq!(vec, [1, 2, 3, 1]);
    /// ```
    pub fn dedup(&mut self) {
        self.dedup_by(|a, b| a == b)
    }
}

impl<T, M: MemorySource> Extend<T> for Vector<T, M> {
    fn extend<A: IntoIterator<Item = T>>(&mut self, iter: A) {
        let iter = iter.into_iter();
        let required = self.len.saturating_add(iter.size_hint().0);
        self.grow_for(required).handle();

        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, M: MemorySource> Extend<&'a T> for Vector<T, M> {
    fn extend<A: IntoIterator<Item = &'a T>>(&mut self, iter: A) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T, M: MemorySource + Default> FromIterator<T> for Vector<T, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector::from_iter_in(iter, M::default())
    }
}

impl<T, M: MemorySource + Default> Default for Vector<T, M> {
    fn default() -> Self {
        Vector::new_in(M::default())
    }
}

impl<T, M: MemorySource> Drop for Vector<T, M> {
    fn drop(&mut self) {
        // SAFETY: All values less than len are initialized and safe to drop.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.as_non_null().as_ptr(),
                self.len,
            ));
        }

        // Implicitly drop self.arr, containing only MaybeUninit values without a no-op drop.
        // Doing so also deallocates the owned memory.
    }
}

impl<T, M: MemorySource> Deref for Vector<T, M> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Vector is valid as a slice for len values, which are all initialized. The pointer
        // is nonnull, properly aligned and the range entirely contained within this Vector.
        unsafe { slice::from_raw_parts(self.as_non_null().as_ptr(), self.len) }
    }
}

impl<T, M: MemorySource> DerefMut for Vector<T, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, and the &mut self guarantees that the slice is unique.
        unsafe { slice::from_raw_parts_mut(self.as_non_null().as_ptr(), self.len) }
    }
}

impl<T, M: MemorySource> AsRef<[T]> for Vector<T, M> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, M: MemorySource> AsMut<[T]> for Vector<T, M> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, M: MemorySource> Borrow<[T]> for Vector<T, M> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, M: MemorySource> BorrowMut<[T]> for Vector<T, M> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: Vectors, when used safely rely on unique pointers and are therefore safe for Send when T
// and the memory source are Send.
unsafe impl<T: Send, M: MemorySource + Send> Send for Vector<T, M> {}
// SAFETY: Vector's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that Vector<T> can safely implement Sync when T: Sync.
unsafe impl<T: Sync, M: MemorySource + Sync> Sync for Vector<T, M> {}

impl<T: Clone, M: MemorySource> Clone for Vector<T, M> {
    fn clone(&self) -> Self {
        let mut vec = Vector::with_cap_in(self.cap(), self.memory_source().clone());

        for value in self.iter() {
            // SAFETY: vec has the same capacity as self, which holds at least len values.
            unsafe { vec.push_unchecked(value.clone()) }
        }

        vec
    }
}

impl<T, M: MemorySource> From<Vector<T, M>> for Array<T, M> {
    fn from(mut value: Vector<T, M>) -> Self {
        // Dealloc all uninit values > len.
        value.shrink_to_fit();

        let vec = ManuallyDrop::new(value);
        // SAFETY: vec is never dropped, so the Array is moved out exactly once. After shrinking,
        // every one of its slots is initialized.
        unsafe { ptr::read(&vec.arr).assume_init() }
    }
}

impl<T, M: MemorySource> From<Array<T, M>> for Vector<T, M> {
    fn from(value: Array<T, M>) -> Self {
        let len = value.size();
        Vector {
            arr: value.forget_init(),
            len,
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(value: [T; N]) -> Self {
        Vector::from(Array::from_iter_sized(value))
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(value: &[T]) -> Self {
        Vector::from(Array::from_iter_sized(value.iter().cloned()))
    }
}

impl<T: PartialEq, M: MemorySource, N: MemorySource> PartialEq<Vector<T, N>> for Vector<T, M> {
    fn eq(&self, other: &Vector<T, N>) -> bool {
        **self == **other
    }
}

impl<T: PartialEq, M: MemorySource> PartialEq<[T]> for Vector<T, M> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq, M: MemorySource, const N: usize> PartialEq<[T; N]> for Vector<T, M> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == *other
    }
}

impl<T: Eq, M: MemorySource> Eq for Vector<T, M> {}

impl<T: PartialOrd, M: MemorySource> PartialOrd for Vector<T, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord, M: MemorySource> Ord for Vector<T, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: Hash, M: MemorySource> Hash for Vector<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, M: MemorySource> Debug for Vector<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug, M: MemorySource> Display for Vector<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
