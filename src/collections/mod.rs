//! Various general-purpose collection types.
//!
//! # Purpose
//! Each container owns its storage outright and takes it from a
//! [`MemorySource`](crate::alloc::MemorySource), so the same allocation discipline (allocate,
//! construct, destroy, deallocate) runs through all of them.
//!
//! # Method
//! Applicable types here implement [`Deref<Target = [T]>`](std::ops::Deref) (and DerefMut), which
//! saves writing some of the more repetitive functionality.
//!
//! Iterator categories follow the standard traits: forward iteration is [`Iterator`],
//! bidirectional iteration is [`DoubleEndedIterator`] and random access is provided by slices.

#[cfg(feature = "contiguous")]
pub mod contiguous;
#[cfg(feature = "hash")]
pub mod hash;
#[cfg(feature = "linked")]
pub mod linked;
