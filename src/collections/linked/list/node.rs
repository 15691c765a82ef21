use std::ptr::NonNull;

use crate::alloc::MemorySource;
use crate::util::error::TryReserveError;

pub(crate) type Link<T> = Option<NodePtr<T>>;

/// A pointer to a node owned by a [`DoublyLinkedList`](super::DoublyLinkedList). The accessors
/// hand out references with an unbounded lifetime, so callers tie them to a borrow of the list.
#[derive(Debug)]
pub(crate) struct NodePtr<T>(pub NonNull<Node<T>>);

pub(crate) struct Node<T> {
    pub value: T,
    pub prev: Link<T>,
    pub next: Link<T>,
}

impl<T> NodePtr<T> {
    /// Allocates a new, unlinked node holding `value` from `alloc`.
    pub fn try_new<M: MemorySource>(alloc: &M, value: T) -> Result<NodePtr<T>, TryReserveError> {
        alloc
            .try_create(Node {
                value,
                prev: None,
                next: None,
            })
            .map(NodePtr)
    }

    /// Moves the node out of its allocation and returns the allocation to `alloc`.
    ///
    /// # Safety
    /// The node must have been allocated from `alloc` (or a clone of it), must already be unlinked
    /// from its list and must not be used again.
    pub unsafe fn take_node<M: MemorySource>(self, alloc: &M) -> Node<T> {
        // SAFETY: The caller guarantees that this is the last use of the node.
        unsafe { alloc.reclaim(self.0) }
    }

    pub const fn value<'a>(&self) -> &'a T {
        // SAFETY: NodePtrs only ever point to live nodes owned by a list.
        unsafe { &(*self.0.as_ptr()).value }
    }

    #[allow(clippy::mut_from_ref)]
    pub const fn value_mut<'a>(&self) -> &'a mut T {
        // SAFETY: As above. Lists only call this while they are mutably borrowed.
        unsafe { &mut (*self.0.as_ptr()).value }
    }

    pub const fn prev<'a>(&self) -> &'a Link<T> {
        // SAFETY: As above.
        unsafe { &(*self.0.as_ptr()).prev }
    }

    #[allow(clippy::mut_from_ref)]
    pub const fn prev_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: As above.
        unsafe { &mut (*self.0.as_ptr()).prev }
    }

    pub const fn next<'a>(&self) -> &'a Link<T> {
        // SAFETY: As above.
        unsafe { &(*self.0.as_ptr()).next }
    }

    #[allow(clippy::mut_from_ref)]
    pub const fn next_mut<'a>(&self) -> &'a mut Link<T> {
        // SAFETY: As above.
        unsafe { &mut (*self.0.as_ptr()).next }
    }
}

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for NodePtr<T> {}
