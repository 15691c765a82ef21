use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

use log::debug;

use super::{Global, MemorySource};
use crate::util::error::AllocError;

/// A memory source that counts the allocations made through it and can be told to refuse
/// requests once a budget of allocations has been spent.
///
/// Clones share their counters, so a container and the handle kept by a test observe the same
/// state. This makes Tracking useful for checking that containers free everything they allocate
/// and that they roll back cleanly when an allocation fails.
///
/// # Examples
/// ```
/// # use alloc_collections::alloc::Tracking;
/// # use alloc_collections::collections::contiguous::Vector;
/// let tracking = Tracking::new();
/// let mut vec = Vector::new_in(tracking.clone());
/// vec.push(1_u32);
/// assert_eq!(tracking.live_blocks(), 1);
///
/// tracking.set_budget(Some(0));
/// assert!(vec.try_reserve(100).is_err());
/// assert_eq!(&*vec, &[1]);
///
/// drop(vec);
/// assert_eq!(tracking.live_blocks(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tracking<M: MemorySource = Global> {
    inner: M,
    stats: Rc<Stats>,
}

#[derive(Debug, Default)]
struct Stats {
    live_blocks: Cell<usize>,
    live_bytes: Cell<usize>,
    allocations: Cell<usize>,
    budget: Cell<Option<usize>>,
}

impl Tracking {
    /// Creates a new Tracking source over the [`Global`] allocator, with no budget.
    pub fn new() -> Tracking {
        Tracking::wrap(Global)
    }

    /// Creates a new Tracking source over the [`Global`] allocator which will allow `budget`
    /// successful allocations before refusing any more.
    pub fn with_budget(budget: usize) -> Tracking {
        let tracking = Tracking::new();
        tracking.set_budget(Some(budget));
        tracking
    }
}

impl<M: MemorySource> Tracking<M> {
    /// Wraps the provided memory source.
    pub fn wrap(inner: M) -> Tracking<M> {
        Tracking {
            inner,
            stats: Rc::default(),
        }
    }

    /// Returns the number of blocks that have been allocated and not yet deallocated.
    pub fn live_blocks(&self) -> usize {
        self.stats.live_blocks.get()
    }

    /// Returns the number of bytes that are currently allocated.
    pub fn live_bytes(&self) -> usize {
        self.stats.live_bytes.get()
    }

    /// Returns the total number of successful allocations made through this source.
    pub fn allocations(&self) -> usize {
        self.stats.allocations.get()
    }

    /// Returns the number of allocations that may still succeed, or None if unlimited.
    pub fn budget(&self) -> Option<usize> {
        self.stats.budget.get()
    }

    /// Sets the number of allocations that may still succeed. None removes the limit.
    pub fn set_budget(&self, budget: Option<usize>) {
        self.stats.budget.set(budget);
    }
}

// SAFETY: All requests are forwarded to the inner source, which upholds the trait's guarantees.
// Clones share both the inner source (by clone) and the counters.
unsafe impl<M: MemorySource> MemorySource for Tracking<M> {
    fn allocate_bytes(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        match self.stats.budget.get() {
            Some(0) => {
                debug!("Tracking source refused an allocation of {} bytes", layout.size());
                return Err(AllocError { layout });
            },
            Some(left) => self.stats.budget.set(Some(left - 1)),
            None => {},
        }

        let ptr = self.inner.allocate_bytes(layout)?;

        self.stats.live_blocks.set(self.stats.live_blocks.get() + 1);
        self.stats.live_bytes.set(self.stats.live_bytes.get() + layout.size());
        self.stats.allocations.set(self.stats.allocations.get() + 1);

        Ok(ptr)
    }

    unsafe fn deallocate_bytes(&self, ptr: NonNull<u8>, layout: Layout) {
        self.stats.live_blocks.set(self.stats.live_blocks.get() - 1);
        self.stats.live_bytes.set(self.stats.live_bytes.get() - layout.size());

        // SAFETY: The caller's guarantees are passed on unchanged.
        unsafe { self.inner.deallocate_bytes(ptr, layout) }
    }
}
