//! Memory sources: where containers get their storage from.
//!
//! A [`MemorySource`] separates acquiring storage from the lifetime of the values placed in it.
//! Containers allocate raw blocks, [`construct`](MemorySource::construct) values into slots,
//! [`destroy`](MemorySource::destroy) them again and finally deallocate the block, which lets
//! growth move values between blocks without touching them otherwise.
//!
//! [`Global`] forwards to the global allocator, while [`Tracking`] wraps another source to count
//! live allocations and optionally refuse requests once a budget has been spent.

mod global;
mod memory_source;
mod tracking;

pub use global::*;
pub use memory_source::*;
pub use tracking::*;

#[doc(inline)]
pub use crate::util::error::{AllocError, CapacityOverflow, TryReserveError};
