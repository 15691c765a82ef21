//! Error types shared between the containers. Each condition is its own type, so that a method's
//! signature says exactly what can go wrong.

use std::alloc::Layout;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

/// An index or position was outside of the valid range for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The offending index.
    pub index: usize,
    /// The length of the collection at the time of the access.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// A lookup in a map didn't find the requested key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFound;

impl Display for KeyNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Key not found in map!")
    }
}

impl Error for KeyNotFound {}

/// The requested capacity can't be represented in a layout no larger than [`isize::MAX`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// A [`MemorySource`](crate::alloc::MemorySource) was unable to satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    /// The layout that couldn't be allocated.
    pub layout: Layout,
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Memory source failed to allocate {} bytes with alignment {}!",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl Error for AllocError {}

/// The ways that acquiring storage can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum TryReserveError {
    /// See [`CapacityOverflow`].
    CapacityOverflow(CapacityOverflow),
    /// See [`AllocError`].
    AllocError(AllocError),
}

/// The ways that a positional insertion can fail: either the position is invalid or the storage
/// required for the new elements couldn't be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, TryInto, IsVariant)]
pub enum IndexOrReserveError {
    /// See [`IndexOutOfBounds`].
    IndexOutOfBounds(IndexOutOfBounds),
    /// See [`CapacityOverflow`].
    CapacityOverflow(CapacityOverflow),
    /// See [`AllocError`].
    AllocError(AllocError),
}

impl From<TryReserveError> for IndexOrReserveError {
    fn from(value: TryReserveError) -> Self {
        match value {
            TryReserveError::CapacityOverflow(e) => IndexOrReserveError::CapacityOverflow(e),
            TryReserveError::AllocError(e) => IndexOrReserveError::AllocError(e),
        }
    }
}

/// A load factor was rejected because it wasn't a finite number greater than zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidLoadFactor(pub f32);

impl Display for InvalidLoadFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid load factor {}, expected a finite value greater than 0!", self.0)
    }
}

impl Error for InvalidLoadFactor {}
