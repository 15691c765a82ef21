use std::alloc::{self, Layout};
use std::ptr::NonNull;

use super::MemorySource;
use crate::util::error::AllocError;

/// The global allocator, as registered with `#[global_allocator]` (or the system allocator).
///
/// This is the default memory source for every container in this crate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

// SAFETY: Global forwards directly to std::alloc, which upholds the trait's guarantees, and all
// instances share the same allocator.
unsafe impl MemorySource for Global {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }

        // SAFETY: Zero-sized layouts have been guarded against.
        NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(AllocError { layout })
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: ptr was allocated in the global allocator with this layout, as required by
            // the caller.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

/// A dangling pointer that is still correctly aligned for `layout`.
pub(crate) const fn dangling_for(layout: Layout) -> NonNull<u8> {
    // SAFETY: Alignments are always non-zero powers of two.
    unsafe { NonNull::new_unchecked(std::ptr::without_provenance_mut(layout.align())) }
}
