//! A module containing [`HashMap`] and associtated types.
//!
//! The other included types are [`Occupied`], a handle to an entry returned by insertion, and the
//! types for iteration, providing owned and borrowed iteration over entries, keys or values in a
//! map, as well as over a single bucket.
//!
//! As a note, there is no way to get mutable access to the keys of a map, because mutating the
//! keys of a HashMap in place would cause a logic error.
//!
//! [`HashMap`] is also re-exported under the parent module.

mod hash_map;
mod iter;
mod node;
mod tests;

pub use hash_map::*;
pub use iter::*;
