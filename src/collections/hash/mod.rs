//! Hash-based collections and the policy they share for placing keys into buckets.
//!
//! [`HashMap`] is re-exported here from the [`map`] module.

pub mod map;
pub mod policy;

#[doc(inline)]
pub use map::HashMap;
#[doc(inline)]
pub use policy::LoadFactor;
