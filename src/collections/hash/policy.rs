//! The hash policy: how a key is placed into one of a fixed number of buckets, and how full the
//! buckets may get before they are rebuilt.
//!
//! Key equality is taken from [`Eq`] and hashing from a [`BuildHasher`], so the policy itself only
//! has to reduce a hash to a bucket index and validate the load factor threshold.

use std::fmt::{self, Display, Formatter};
use std::hash::{BuildHasher, Hash};

use crate::util::error::InvalidLoadFactor;

/// Returns the index of the bucket that `key` belongs in, out of `bucket_count` buckets. For a
/// fixed hasher and bucket count, equal keys always map to the same bucket.
///
/// # Panics
/// Panics if `bucket_count` is 0.
///
/// # Examples
/// ```
/// # use alloc_collections::collections::hash::policy::bucket_index;
/// # use std::hash::RandomState;
/// let hasher = RandomState::new();
/// let index = bucket_index(&hasher, "key", 7);
/// assert!(index < 7);
/// assert_eq!(index, bucket_index(&hasher, "key", 7));
/// ```
pub fn bucket_index<B, Q>(hasher: &B, key: &Q, bucket_count: usize) -> usize
where
    B: BuildHasher,
    Q: Hash + ?Sized,
{
    assert!(bucket_count != 0, "Unable to calculate a bucket index with no buckets!");
    // The remainder is less than bucket_count, so it always fits in a usize.
    (hasher.hash_one(key) % bucket_count as u64) as usize
}

/// The maximum ratio of entries to buckets that a hash collection allows before it rehashes into
/// more buckets. Always finite and greater than 0.
///
/// # Examples
/// ```
/// # use alloc_collections::collections::hash::LoadFactor;
/// let lf = LoadFactor::new(0.75).unwrap();
/// assert_eq!(lf, LoadFactor::DEFAULT);
/// assert!(lf.exceeded_by(2, 2));
/// assert!(!lf.exceeded_by(3, 4));
/// assert_eq!(lf.min_buckets(3), 4);
///
/// assert!(LoadFactor::new(0.0).is_err());
/// assert!(LoadFactor::new(f32::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LoadFactor(f32);

impl LoadFactor {
    /// The load factor used unless another is requested, `0.75`.
    pub const DEFAULT: LoadFactor = LoadFactor(0.75);

    /// Creates a new LoadFactor.
    ///
    /// # Errors
    /// Returns [`InvalidLoadFactor`] if `value` isn't finite or isn't greater than 0.
    pub fn new(value: f32) -> Result<LoadFactor, InvalidLoadFactor> {
        if value.is_finite() && value > 0.0 {
            Ok(LoadFactor(value))
        } else {
            Err(InvalidLoadFactor(value))
        }
    }

    /// Returns the threshold as a float.
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Returns true if `len` entries spread over `bucket_count` buckets would exceed this load
    /// factor.
    pub fn exceeded_by(self, len: usize, bucket_count: usize) -> bool {
        len as f64 > self.0 as f64 * bucket_count as f64
    }

    /// Returns the smallest bucket count (at least 1) that can hold `len` entries without
    /// exceeding this load factor.
    pub fn min_buckets(self, len: usize) -> usize {
        // Float to int casts saturate, so an enormous result becomes usize::MAX.
        ((len as f64 / self.0 as f64).ceil() as usize).max(1)
    }
}

impl Default for LoadFactor {
    fn default() -> Self {
        LoadFactor::DEFAULT
    }
}

impl TryFrom<f32> for LoadFactor {
    type Error = InvalidLoadFactor;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        LoadFactor::new(value)
    }
}

impl Display for LoadFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
