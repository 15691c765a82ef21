use std::alloc::Layout;
use std::mem;
use std::ptr::{self, NonNull};

use crate::util::error::{AllocError, CapacityOverflow, TryReserveError};
use crate::util::result::ReserveResultExtension;

/// The largest number of bytes that a single allocation may span.
pub(crate) const MAX_BYTES: usize = isize::MAX as usize;

/// A source of raw, uninitialized memory, along with the verbs to place values into it and remove
/// them again.
///
/// Implementors only provide byte-level [`allocate_bytes`](MemorySource::allocate_bytes) and
/// [`deallocate_bytes`](MemorySource::deallocate_bytes). The typed methods are built on top of
/// them and handle zero-sized requests without ever reaching the implementation.
///
/// Every [`construct`](MemorySource::construct) must be paired with exactly one
/// [`destroy`](MemorySource::destroy) (or a move out of the slot) before the owning block is
/// deallocated.
///
/// # Safety
/// Blocks returned by `allocate_bytes` must be valid for reads and writes of `layout.size()`
/// bytes, aligned to `layout.align()`, and must stay valid until they are passed to
/// `deallocate_bytes` on this source or any clone of it. Clones must be interchangeable: memory
/// allocated by one can be deallocated by another.
pub unsafe trait MemorySource: Clone {
    /// Allocates a block for the provided non-zero-sized `layout`.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the request can't be satisfied.
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Returns a block to this source.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate_bytes` on this source (or a clone of it) with the
    /// same `layout`, and must not have been deallocated already.
    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout);

    /// Allocates an uninitialized block capable of holding `n` values of type `T`. A request for
    /// zero bytes returns a dangling, well-aligned pointer without allocating.
    ///
    /// # Errors
    /// Returns [`CapacityOverflow`] if the block would exceed [`isize::MAX`] bytes, or an
    /// [`AllocError`] if the underlying source refuses the request.
    fn allocate<T>(&self, n: usize) -> Result<NonNull<T>, TryReserveError> {
        let layout = Layout::array::<T>(n).map_err(|_| CapacityOverflow)?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        Ok(self.allocate_bytes(layout)?.cast())
    }

    /// Deallocates a block previously returned by [`allocate`](MemorySource::allocate). Values
    /// still held in the block are not dropped.
    ///
    /// # Safety
    /// `block` must have been allocated by this source (or a clone) for exactly `n` values of
    /// `T`, and not deallocated since.
    unsafe fn deallocate<T>(&self, block: NonNull<T>, n: usize) {
        if let Ok(layout) = Layout::array::<T>(n)
            && layout.size() != 0
        {
            // SAFETY: The layout is identical to the one used to allocate the block and is
            // non-zero, so the block was really allocated by allocate_bytes.
            unsafe { self.deallocate_bytes(block.cast(), layout) }
        }
    }

    /// Moves `value` into the uninitialized `slot`.
    ///
    /// # Safety
    /// `slot` must be valid for writes and properly aligned. Any value previously in the slot is
    /// overwritten without being dropped.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: The caller guarantees that slot is valid for writes.
        unsafe { slot.write(value) }
    }

    /// Drops the value in `slot` in place, leaving the slot uninitialized.
    ///
    /// # Safety
    /// `slot` must contain an initialized value that isn't used again.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: The caller guarantees that slot is initialized and ready to drop.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }

    /// Returns the largest number of `T` that a single block can hold.
    fn max_size<T>(&self) -> usize {
        match mem::size_of::<T>() {
            0 => usize::MAX,
            size => MAX_BYTES / size,
        }
    }

    /// Allocates a single slot and constructs `value` in it, as used for linked nodes.
    ///
    /// # Errors
    /// See [`allocate`](MemorySource::allocate). `value` is dropped on failure.
    fn try_create<T>(&self, value: T) -> Result<NonNull<T>, TryReserveError> {
        let slot = self.allocate::<T>(1)?;
        // SAFETY: slot has just been allocated for one T.
        unsafe { self.construct(slot, value) };
        Ok(slot)
    }

    /// Allocates a single slot and constructs `value` in it.
    ///
    /// # Panics
    /// Panics on capacity overflow, which can't happen for a single sized value. Allocation
    /// failure is reported through [`std::alloc::handle_alloc_error`].
    fn create<T>(&self, value: T) -> NonNull<T> {
        self.try_create(value).handle()
    }

    /// Moves the value out of a slot created by [`create`](MemorySource::create) and deallocates
    /// the slot.
    ///
    /// # Safety
    /// `slot` must have come from `create`/`try_create` on this source (or a clone) and must not be
    /// used again.
    unsafe fn reclaim<T>(&self, slot: NonNull<T>) -> T {
        // SAFETY: The slot is initialized and is never read again after this.
        let value = unsafe { slot.read() };
        // SAFETY: The slot was allocated for exactly one T by this source.
        unsafe { self.deallocate(slot, 1) };
        value
    }
}
