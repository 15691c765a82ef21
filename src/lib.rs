//! This crate is a small standard-template-library style collection of containers, written over
//! raw memory rather than on top of [`Vec`] or [`Box`].
//!
//! # Purpose
//! The containers here manage object lifetimes by hand: storage is acquired from a
//! [`MemorySource`](alloc::MemorySource), values are constructed into it and destroyed out of it
//! explicitly, and growth relocates values without re-running any constructors. The two
//! containers with the most going on are [`Vector`](collections::contiguous::Vector), a growable
//! contiguous sequence, and [`HashMap`](collections::hash::HashMap), a separately chained hash
//! table with load-factor driven rehashing.
//!
//! # Method
//! Every container is generic over its memory source, defaulting to [`Global`](alloc::Global).
//! Swapping in [`Tracking`](alloc::Tracking) makes allocations observable, which is how the test
//! suite checks for leaks and injects allocation failures.
//!
//! # Error Handling
//! For a collections library, it is more ergonomic for most methods to panic, because users don't
//! want to handle a capacity overflow every time they push into a Vector. So the common methods
//! panic (with the message of a strongly typed error), while `try_*` variants and lookups like
//! [`Vector::at`](collections::contiguous::Vector::at) and
//! [`HashMap::at`](collections::hash::HashMap::at) return a [`Result`] instead.
//!
//! Errors are structs (often ZSTs) that implement [`Error`](std::error::Error), with enums over
//! them where an operation can fail in more than one way.
//!
//! Allocation failure from a panicking method is routed to [`std::alloc::handle_alloc_error`], as
//! the standard collections do.
//!
//! # Invalidation
//! Any operation that can reallocate or rehash takes `&mut self`. The borrow checker therefore
//! rejects code that holds an element reference or iterator across a reallocation, which is the
//! invalidation rule these containers document.
//!
//! # Logging
//! Reallocations and rehashes are reported through the [`log`] facade at `trace` level. Nothing is
//! printed unless the application installs a logger.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;

#[doc(inline)]
pub use util::error;
