use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use log::trace;

use crate::alloc::{Global, MemorySource};
use crate::util::error::TryReserveError;
use crate::util::result::ReserveResultExtension;

/// An implementation of an array that is sized at runtime. Similar to a [`Box<[T]>`](Box<T>), but
/// with its storage taken from a [`MemorySource`].
///
/// Once created, an Array can't change size (except through the `MaybeUninit` methods used by
/// [`Vector`](super::super::Vector)), so all of its elements are always initialized.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Array.
///
/// | Method | Complexity |
/// |-|-|
/// | `get` | `O(1)` |
/// | `size` | `O(1)` |
/// | `repeat_*` | `O(n)` |
/// | `realloc` | `O(n)` |
/// | `contains` | `O(n)` |
pub struct Array<T, M: MemorySource = Global> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) size: usize,
    pub(crate) alloc: M,
    pub(crate) _phantom: PhantomData<T>,
}

/// Owns a block while it is being filled. If construction is abandoned (because producing a value
/// panicked), the values constructed so far are dropped and the block is returned to its source.
struct PartialInit<'a, T, M: MemorySource> {
    ptr: NonNull<T>,
    cap: usize,
    init: usize,
    alloc: &'a M,
}

impl<T, M: MemorySource> Drop for PartialInit<'_, T, M> {
    fn drop(&mut self) {
        // SAFETY: Exactly the first init values have been constructed and the block was
        // allocated by alloc for cap values.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.init));
            self.alloc.deallocate(self.ptr, self.cap);
        }
    }
}

impl<T> Array<T> {
    /// Creates a new Array with size 0.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// let arr: Array<u8> = Array::new();
    /// assert_eq!(arr.size(), 0);
    /// assert_eq!(&*arr, &[]);
    /// ```
    pub fn new() -> Array<T> {
        Array::new_in(Global)
    }

    /// Creates a new Array by calling `f` `count` times.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// let mut next = 0;
    /// let arr = Array::repeat_with(|| { next += 2; next }, 3);
    /// assert_eq!(&*arr, &[2, 4, 6]);
    /// ```
    pub fn repeat_with<F: FnMut() -> T>(f: F, count: usize) -> Array<T> {
        Array::try_repeat_with_in(f, count, Global).handle()
    }

    /// Creates an Array from an [`ExactSizeIterator`], allocating exactly once.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`], or if the iterator yields fewer items
    /// than it reports.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// let arr = Array::from_iter_sized([1, 2, 3]);
    /// assert_eq!(&*arr, [1, 2, 3]);
    /// ```
    pub fn from_iter_sized<I>(iter: I) -> Array<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Array::from_iter_sized_in(iter, Global)
    }
}

impl<T: Clone> Array<T> {
    /// Creates a new `Array<T>` with `count` copies of `item`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// let arr = Array::repeat_item(5, 3);
    /// assert_eq!(arr.size(), 3);
    /// assert_eq!(&*arr, &[5, 5, 5]);
    /// ```
    pub fn repeat_item(item: T, count: usize) -> Array<T> {
        Array::repeat_item_in(item, count, Global)
    }
}

impl<T: Default> Array<T> {
    /// Creates a new `Array<T>` by repeating the default value of `T` `count` times.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn repeat_default(count: usize) -> Array<T> {
        Array::repeat_with(T::default, count)
    }
}

impl<T, M: MemorySource> Array<T, M> {
    /// Creates a new, empty Array which will use `alloc` as its memory source.
    pub const fn new_in(alloc: M) -> Array<T, M> {
        Array {
            ptr: NonNull::dangling(),
            size: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a new Array in `alloc` by calling `f` `count` times, constructing each value
    /// directly into its slot.
    ///
    /// If `f` panics, every value constructed so far is dropped and the block is deallocated
    /// before the panic continues, so no partially built Array is ever observable.
    ///
    /// # Errors
    /// Returns an error if the block can't be allocated, in which case `f` is never called.
    pub fn try_repeat_with_in<F: FnMut() -> T>(
        mut f: F,
        count: usize,
        alloc: M,
    ) -> Result<Array<T, M>, TryReserveError> {
        let ptr = alloc.allocate::<T>(count)?;

        let mut guard = PartialInit {
            ptr,
            cap: count,
            init: 0,
            alloc: &alloc,
        };

        while guard.init < count {
            // SAFETY: init < count, so the slot is within the allocated block and uninitialized.
            unsafe { guard.alloc.construct(ptr.add(guard.init), f()) };
            guard.init += 1;
        }

        // All values are initialized, so the guard's cleanup is no longer wanted.
        mem::forget(guard);

        Ok(Array {
            ptr,
            size: count,
            alloc,
            _phantom: PhantomData,
        })
    }

    /// Creates an Array in `alloc` from an [`ExactSizeIterator`].
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`], or if the iterator yields fewer items
    /// than it reports.
    pub fn from_iter_sized_in<I>(iter: I, alloc: M) -> Array<T, M>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut iter = iter.into_iter();
        let size = iter.len();

        Array::try_repeat_with_in(
            || iter.next().expect("ExactSizeIterator yielded fewer items than its length!"),
            size,
            alloc,
        ).handle()
    }

    /// Returns the size of the Array.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// let arr = Array::from_iter_sized([1, 2, 3]);
    /// assert_eq!(arr.size(), 3);
    /// ```
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns a reference to the Array's memory source.
    pub const fn memory_source(&self) -> &M {
        &self.alloc
    }

    /// Interprets self as an `Array<MaybeUninit<T>>`. Although it may not seem very useful by
    /// itself, this method acts as a counterpart to [`Array::assume_init`] and allows
    /// [`Array::realloc`] to be called on a previously initialized Array.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::contiguous::Array;
    /// # use std::mem::MaybeUninit;
    /// let arr = Array::from_iter_sized([1_u8, 2, 3]);
    /// let mut new_arr = arr.forget_init();
    ///
    /// new_arr.realloc(4);
    /// new_arr[3] = MaybeUninit::new(4);
    ///
    /// // SAFETY: All values in new_arr are now initialized.
    /// let arr = unsafe { new_arr.assume_init() };
    ///
    /// assert_eq!(&*arr, &[1, 2, 3, 4]);
    /// ```
    pub fn forget_init(self) -> Array<MaybeUninit<T>, M> {
        let (ptr, size, alloc) = self.into_raw();
        // SAFETY: MaybeUninit<T> has the same layout as T, and every T is a valid MaybeUninit<T>.
        unsafe { Array::from_raw(ptr.cast(), size, alloc) }
    }

    /// Decomposes the Array into its pointer, size and memory source without dropping anything.
    pub(crate) fn into_raw(self) -> (NonNull<T>, usize, M) {
        let this = ManuallyDrop::new(self);
        // SAFETY: this is never dropped, so the memory source is moved out exactly once.
        let alloc = unsafe { ptr::read(&this.alloc) };
        (this.ptr, this.size, alloc)
    }

    /// Reassembles an Array from the parts produced by [`Array::into_raw`].
    ///
    /// # Safety
    /// `ptr` must be a block allocated by `alloc` for `size` values of `T`, all of which are
    /// initialized.
    pub(crate) const unsafe fn from_raw(ptr: NonNull<T>, size: usize, alloc: M) -> Array<T, M> {
        Array {
            ptr,
            size,
            alloc,
            _phantom: PhantomData,
        }
    }
}

impl<T: Clone, M: MemorySource> Array<T, M> {
    /// Creates a new Array in `alloc` with `count` clones of `item`. The last slot receives `item`
    /// itself.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn repeat_item_in(item: T, count: usize, alloc: M) -> Array<T, M> {
        Array::from_iter_sized_in(std::iter::repeat_n(item, count), alloc)
    }
}

impl<T, M: MemorySource> Array<MaybeUninit<T>, M> {
    /// Creates a new Array of [`MaybeUninit<T>`] with the provided `size`. All values are
    /// uninitialized.
    ///
    /// # Errors
    /// Returns an error if the block can't be allocated.
    pub fn try_new_uninit_in(size: usize, alloc: M) -> Result<Array<MaybeUninit<T>, M>, TryReserveError> {
        let ptr = alloc.allocate::<MaybeUninit<T>>(size)?;

        // SAFETY: Uninitialized values are valid MaybeUninits.
        Ok(unsafe { Array::from_raw(ptr, size, alloc) })
    }

    /// Creates a new Array of [`MaybeUninit<T>`] with the provided `size`.
    ///
    /// # Panics
    /// Panics if memory layout size exceeds [`isize::MAX`].
    pub fn new_uninit_in(size: usize, alloc: M) -> Array<MaybeUninit<T>, M> {
        Array::try_new_uninit_in(size, alloc).handle()
    }

    /// Assume that all values of an `Array<MaybeUninit<T>>` are initialized.
    ///
    /// # Safety
    /// It is up to the caller to guarantee that the Array is properly initialized. Failing to do so
    /// is undefined behavior.
    pub unsafe fn assume_init(self) -> Array<T, M> {
        let (ptr, size, alloc) = self.into_raw();
        // SAFETY: The caller guarantees that every value is initialized.
        unsafe { Array::from_raw(ptr.cast(), size, alloc) }
    }

    /// Moves the Array to a new block of `new_size` slots, carrying over the first
    /// `min(size, new_size)` slots bitwise. New slots are uninitialized and slots beyond
    /// `new_size` are discarded without being dropped.
    ///
    /// On failure, the Array is left exactly as it was.
    ///
    /// # Errors
    /// Returns an error if the new block can't be allocated.
    pub fn try_realloc(&mut self, new_size: usize) -> Result<(), TryReserveError> {
        if new_size == self.size {
            return Ok(());
        }

        let new_ptr = self.alloc.allocate::<MaybeUninit<T>>(new_size)?;

        trace!(
            "Relocating {} of {} slots into a new block of {}",
            self.size.min(new_size),
            self.size,
            new_size,
        );

        // SAFETY: Both blocks are valid for min(size, new_size) values, properly aligned and are
        // distinct allocations (or dangling for ZSTs, which copy nothing). The old block is
        // deallocated with the size it was allocated for.
        unsafe {
            ptr::copy_nonoverlapping(
                self.ptr.as_ptr().cast_const(),
                new_ptr.as_ptr(),
                self.size.min(new_size),
            );
            self.alloc.deallocate(self.ptr, self.size);
        }

        self.ptr = new_ptr;
        self.size = new_size;
        Ok(())
    }

    /// Reallocate the Array to have size equal to `new_size`, with new locations uninitialized.
    ///
    /// # Panics
    /// Panics if the memory layout of the new allocation would have a size that exceeds
    /// [`isize::MAX`]. (`new_size * size_of::<T>() > isize::MAX`)
    pub fn realloc(&mut self, new_size: usize) {
        self.try_realloc(new_size).handle()
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M: MemorySource> Drop for Array<T, M> {
    fn drop(&mut self) {
        // SAFETY: All size values are initialized and are never used again. The block was
        // allocated by alloc for size values.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.size));
            self.alloc.deallocate(self.ptr, self.size);
        }
    }
}

impl<T, M: MemorySource> Deref for Array<T, M> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: The held block uses Layout::array(size) and is therefore valid and properly
        // aligned for (size * mem::size_of::<T>()) bytes. Data is properly initialized and has a
        // length no greater than isize::MAX. Array's safe API doesn't provide access to raw
        // pointers, so the borrow checker prevents mutation throughout the borrow.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

impl<T, M: MemorySource> DerefMut for Array<T, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, and the mutable borrow of self prevents any other access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl<T, M: MemorySource> AsRef<[T]> for Array<T, M> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, M: MemorySource> AsMut<[T]> for Array<T, M> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, M: MemorySource> Borrow<[T]> for Array<T, M> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, M: MemorySource> BorrowMut<[T]> for Array<T, M> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

// SAFETY: Arrays, when used safely rely on unique pointers and are therefore safe for Send when T
// and the memory source are Send.
unsafe impl<T: Send, M: MemorySource + Send> Send for Array<T, M> {}
// SAFETY: Array's safe API obeys all rules of the borrow checker, so no interior mutability occurs.
// This means that Array<T> can safely implement Sync when T: Sync.
unsafe impl<T: Sync, M: MemorySource + Sync> Sync for Array<T, M> {}

impl<T: Clone, M: MemorySource> Clone for Array<T, M> {
    fn clone(&self) -> Self {
        Array::from_iter_sized_in(self.iter().cloned(), self.alloc.clone())
    }
}

impl<T: PartialEq, M: MemorySource, N: MemorySource> PartialEq<Array<T, N>> for Array<T, M> {
    fn eq(&self, other: &Array<T, N>) -> bool {
        **self == **other
    }
}

impl<T: Eq, M: MemorySource> Eq for Array<T, M> {}

impl<T: PartialOrd, M: MemorySource> PartialOrd for Array<T, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord, M: MemorySource> Ord for Array<T, M> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: Hash, M: MemorySource> Hash for Array<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, M: MemorySource> Debug for Array<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("contents", &&**self)
            .field("size", &self.size)
            .finish()
    }
}

impl<T: Debug, M: MemorySource> Display for Array<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
