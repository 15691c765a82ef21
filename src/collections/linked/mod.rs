//! Linked collection types: [`ForwardList`], a singly linked list edited through a
//! [`CursorMut`](forward::CursorMut) that starts before its first element, and
//! [`DoublyLinkedList`], which pairs with an owning [`Cursor`] for bi-directional traversal.
//!
//! Both lists allocate each node individually from a [`MemorySource`](crate::alloc::MemorySource)
//! and tear themselves down one node at a time, so even very long lists are dropped without deep
//! recursion.

pub mod forward;
pub mod list;

#[doc(inline)]
pub use forward::ForwardList;
#[doc(inline)]
pub use list::{Cursor, DoublyLinkedList};
