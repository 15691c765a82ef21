//! The growth policy shared by the growable contiguous collections.
//!
//! When a Vector must hold more elements than its capacity allows, the new capacity is
//! `required + required / 2 + 1`: one and a half times the required size, plus one so that the
//! capacity strictly increases even when `required` is 0 or 1. Growing geometrically amortizes
//! the cost of relocation to `O(1)` per push, while the factor of 1.5 (rather than 2) keeps the
//! unused tail of the allocation moderate.
//!
//! Every reallocation moves all elements to a new block, which invalidates any previously obtained
//! pointers into the collection.

use crate::util::error::CapacityOverflow;

/// Computes the capacity to grow to when a collection with capacity `current` needs to hold
/// `required` elements. If `required` already fits, `current` is returned unchanged.
///
/// # Errors
/// Returns [`CapacityOverflow`] if the computation overflows a [`usize`].
///
/// # Examples
/// ```
/// # use alloc_collections::collections::contiguous::growth::next_cap;
/// assert_eq!(next_cap(3, 4), Ok(7));
/// assert_eq!(next_cap(0, 0), Ok(0));
/// assert_eq!(next_cap(0, 1), Ok(2));
/// assert_eq!(next_cap(10, 4), Ok(10));
/// ```
pub const fn next_cap(current: usize, required: usize) -> Result<usize, CapacityOverflow> {
    if required <= current {
        return Ok(current);
    }

    match required.checked_add(required / 2) {
        Some(cap) => match cap.checked_add(1) {
            Some(cap) => Ok(cap),
            None => Err(CapacityOverflow),
        },
        None => Err(CapacityOverflow),
    }
}
