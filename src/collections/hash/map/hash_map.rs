use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{BuildHasher, Hash, RandomState};
use std::marker::PhantomData;
use std::mem;
use std::ops::Index;
use std::ptr::NonNull;

use log::{debug, trace};

use super::node::{Chain, Link, Node, RawIter, chain_len};
use super::{BucketIter, Drain, IntoKeys, IntoValues, Iter, IterMut, Keys, Values, ValuesMut};
use crate::alloc::{Global, MemorySource};
use crate::collections::contiguous::Array;
use crate::collections::hash::policy::{self, LoadFactor};
use crate::collections::contiguous::Vector;
use crate::util::error::{CapacityOverflow, IndexOutOfBounds, KeyNotFound, TryReserveError};
use crate::util::fmt::DebugRaw;
use crate::util::result::{ReserveResultExtension, ResultExtension};

const DEFAULT_BUCKETS: usize = 8;

/// A map of keys to values which relies on the keys implementing [`Hash`], using separate
/// chaining: every bucket holds a singly linked chain of the entries whose keys hash to it.
///
/// Entries are allocated individually from the map's [`MemorySource`] and never move while they
/// are in the map. Before an insertion would push the ratio of entries to buckets past the
/// [`LoadFactor`] (0.75 by default), the map rehashes into more buckets, which relinks the existing
/// entries without copying them.
///
/// It is a logic error for keys in a HashMap to be manipulated in a way that changes their hash.
/// Because of this, HashMap's API prevents mutable access to its keys.
///
/// # Invalidation
/// Rehashing changes which bucket every entry is in, so it invalidates all iterators and entry
/// handles. Every method that can rehash takes `&mut self`, so the borrow checker prevents any from
/// being held across one.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of entries in the HashMap.
/// - `b`: The number of buckets.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `insert` | `O(1)`**, `O(n+b)` |
/// | `get` / `at` | `O(1)`* |
/// | `remove` | `O(1)`* |
/// | `contains_key` | `O(1)`* |
/// | `rehash` | `O(n+b)` |
/// | `reserve` | `O(n+b)`***, `O(1)` |
/// | `clear` | `O(n+b)` |
///
/// \* In the event of a hash collision, these functions walk the colliding bucket's chain. The
/// load factor keeps the expected length of a chain constant.
///
/// \** If the insertion would exceed the load factor, `insert` rehashes first. \* applies as well.
///
/// \*** If the HashMap has enough buckets for the requested entries already, `reserve` is `O(1)`.
pub struct HashMap<K: Hash + Eq, V, B: BuildHasher = RandomState, M: MemorySource = Global> {
    pub(crate) buckets: Array<Link<K, V>, M>,
    pub(crate) len: usize,
    pub(crate) load_factor: LoadFactor,
    pub(crate) hasher: B,
    pub(crate) _phantom: PhantomData<(K, V)>,
}

/// A handle to an entry in a [`HashMap`], as returned by [`HashMap::insert`]. Holds the map
/// borrowed, and can be turned into an iterator that starts at the entry.
pub struct Occupied<'a, K, V> {
    buckets: &'a [Link<K, V>],
    index: usize,
    node: NonNull<Node<K, V>>,
    _phantom: PhantomData<(&'a K, &'a mut V)>,
}

impl<K: Hash + Eq, V> HashMap<K, V> {
    /// Creates a new, empty HashMap with 8 buckets, the default load factor and a randomly seeded
    /// hasher.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let map: HashMap<u8, u8> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.bucket_count(), 8);
    /// ```
    pub fn new() -> HashMap<K, V> {
        HashMap::with_buckets(DEFAULT_BUCKETS)
    }

    /// Creates a new, empty HashMap with the provided number of buckets (at least 1).
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn with_buckets(bucket_count: usize) -> HashMap<K, V> {
        HashMap::with_buckets_and_hasher(bucket_count, RandomState::new())
    }
}

impl<K: Hash + Eq, V, B: BuildHasher> HashMap<K, V, B> {
    /// Creates a new, empty HashMap with 8 buckets and the provided `hasher`.
    pub fn with_hasher(hasher: B) -> HashMap<K, V, B> {
        HashMap::with_buckets_and_hasher(DEFAULT_BUCKETS, hasher)
    }

    /// Creates a new, empty HashMap with the provided number of buckets (at least 1) and
    /// `hasher`.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn with_buckets_and_hasher(bucket_count: usize, hasher: B) -> HashMap<K, V, B> {
        HashMap::with_config_in(bucket_count, LoadFactor::DEFAULT, hasher, Global)
    }
}

impl<K: Hash + Eq, V, B: BuildHasher, M: MemorySource> HashMap<K, V, B, M> {
    /// Creates a new, empty HashMap with every part of its configuration provided. Entries and
    /// the bucket array are allocated from `alloc`.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::{HashMap, LoadFactor};
    /// # use alloc_collections::alloc::Tracking;
    /// # use std::hash::RandomState;
    /// let lf = LoadFactor::new(1.0).unwrap();
    /// let mut map = HashMap::with_config_in(0, lf, RandomState::new(), Tracking::new());
    /// assert_eq!(map.bucket_count(), 1);
    ///
    /// map.insert("a", 1);
    /// assert_eq!(map.bucket_count(), 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.bucket_count(), 2);
    /// ```
    pub fn with_config_in(
        bucket_count: usize,
        load_factor: LoadFactor,
        hasher: B,
        alloc: M,
    ) -> HashMap<K, V, B, M> {
        HashMap::try_with_config_in(bucket_count, load_factor, hasher, alloc).handle()
    }

    /// Creates a new, empty HashMap with every part of its configuration provided.
    ///
    /// # Errors
    /// Returns an error if the bucket array can't be allocated.
    pub fn try_with_config_in(
        bucket_count: usize,
        load_factor: LoadFactor,
        hasher: B,
        alloc: M,
    ) -> Result<HashMap<K, V, B, M>, TryReserveError> {
        Ok(HashMap {
            buckets: Array::try_repeat_with_in(|| None, bucket_count.max(1), alloc)?,
            len: 0,
            load_factor,
            hasher,
            _phantom: PhantomData,
        })
    }

    /// Returns the number of entries in the HashMap.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the HashMap contains no entries.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets, which is always at least 1.
    pub const fn bucket_count(&self) -> usize {
        self.buckets.size()
    }

    /// Returns the number of entries in the bucket at `index`.
    ///
    /// # Panics
    /// Panics if `index >= bucket_count`.
    pub fn bucket_len(&self, index: usize) -> usize {
        chain_len(self.bucket_head(index))
    }

    /// Returns an iterator over the entries in the bucket at `index`, in chain order.
    ///
    /// # Panics
    /// Panics if `index >= bucket_count`.
    pub fn bucket_iter(&self, index: usize) -> BucketIter<'_, K, V> {
        BucketIter {
            link: self.bucket_head(index),
            _phantom: PhantomData,
        }
    }

    /// Returns the index of the bucket that `key` belongs in with the current bucket count.
    pub fn bucket<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        policy::bucket_index(&self.hasher, key, self.bucket_count())
    }

    /// Returns the current ratio of entries to buckets.
    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.bucket_count() as f32
    }

    /// Returns the load factor that insertions aren't allowed to exceed.
    pub const fn max_load_factor(&self) -> LoadFactor {
        self.load_factor
    }

    /// Changes the maximum load factor, rehashing straight away if the map is already more full
    /// than the new value allows.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn set_max_load_factor(&mut self, load_factor: LoadFactor) {
        debug!("Changing the maximum load factor from {} to {}", self.load_factor, load_factor);
        self.load_factor = load_factor;

        if load_factor.exceeded_by(self.len, self.bucket_count()) {
            self.rehash(load_factor.min_buckets(self.len));
        }
    }

    /// Returns a reference to the map's hasher.
    pub const fn hasher(&self) -> &B {
        &self.hasher
    }

    /// Returns a reference to the map's memory source.
    pub const fn memory_source(&self) -> &M {
        self.buckets.memory_source()
    }

    /// Inserts the provided `key`-`value` pair into the HashMap, rehashing first if the new entry
    /// would exceed the load factor. If the key is already present, its value is overwritten and
    /// the key isn't changed.
    ///
    /// Returns a handle to the entry, and true if a new entry was created.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map = HashMap::new();
    /// assert!(map.insert("a", 1).1);
    ///
    /// let (entry, inserted) = map.insert("a", 2);
    /// assert!(!inserted);
    /// assert_eq!(entry.get(), &2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Occupied<'_, K, V>, bool) {
        self.try_insert(key, value).handle()
    }

    /// Inserts the provided `key`-`value` pair into the HashMap.
    ///
    /// # Errors
    /// Returns an error if the entry or a larger bucket array can't be allocated. The map still
    /// contains exactly the entries it did before, although a completed rehash is kept.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Occupied<'_, K, V>, bool), TryReserveError> {
        if let Some((index, mut node)) = self.find(&key) {
            // SAFETY: The node was just found in the map, which is mutably borrowed.
            unsafe { node.as_mut().value = value };
            return Ok((self.occupied(index, node), false));
        }

        let required = self.len.checked_add(1).ok_or(CapacityOverflow)?;
        if self.load_factor.exceeded_by(required, self.bucket_count()) {
            let target = self
                .bucket_count()
                .saturating_mul(2)
                .max(self.load_factor.min_buckets(required));
            self.try_rehash(target)?;
        }

        let index = self.bucket(&key);
        let node = self.memory_source().try_create(Node {
            key,
            value,
            next: None,
        })?;

        // SAFETY: The slot is either the bucket itself or the next link of a live node in its
        // chain, and the node is linked in exactly once.
        unsafe { self.chain_tail(index).write(Some(node)) };
        self.len += 1;

        Ok((self.occupied(index, node), true))
    }

    /// Returns a reference to the value associated with `key`.
    ///
    /// # Errors
    /// Returns [`KeyNotFound`] if the map doesn't contain the key.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert!(map.at(&2).is_err());
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with `key`.
    ///
    /// # Errors
    /// Returns [`KeyNotFound`] if the map doesn't contain the key.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(KeyNotFound)
    }

    /// Returns the entry for the provided `key` as a key-value pair or None if there is no entry.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, node) = self.find(key)?;
        // SAFETY: The node is live for as long as self is borrowed.
        let node = unsafe { node.as_ref() };
        Some((&node.key, &node.value))
    }

    /// Returns a reference to the value associated with the provided `key` or None if the map
    /// contains no values for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value associated with the provided `key` or None if the
    /// map contains no values for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, mut node) = self.find(key)?;
        // SAFETY: The node is live and self is mutably borrowed for the reference's lifetime.
        Some(unsafe { &mut node.as_mut().value })
    }

    /// Returns true if there is a value associated with the provided `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a mutable reference to the value associated with `key`, inserting the value
    /// returned by `f` first if there isn't one.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, f: F) -> &mut V {
        if let Some((_, mut node)) = self.find(&key) {
            // SAFETY: The node is live and self is mutably borrowed for the reference's lifetime.
            return unsafe { &mut node.as_mut().value };
        }

        self.insert(key, f()).0.into_mut()
    }

    /// Returns a mutable reference to the value associated with `key`, inserting the default value
    /// first if there isn't one. This is the insert-on-miss form of indexing, whereas
    /// [`Index`](HashMap::index) panics on a missing key.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map: HashMap<&str, u32> = HashMap::new();
    /// *map.get_or_insert_default("a") += 1;
    /// *map.get_or_insert_default("a") += 1;
    /// assert_eq!(map[&"a"], 2);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Removes the entry associated with `key`, returning it if it exists.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket(key);
        let mut slot = NonNull::from(&mut self.buckets[index]);

        loop {
            // SAFETY: slot is either the bucket or the next link of a live node in its chain.
            let node = unsafe { *slot.as_ref() }?;
            // SAFETY: Every node in the chain is live.
            let next = unsafe { node.as_ref().next };

            // SAFETY: As above.
            if unsafe { node.as_ref() }.key.borrow() == key {
                // SAFETY: Unlinking the node leaves it unreachable from the map, which gives up
                // ownership to reclaim.
                let Node { key, value, .. } = unsafe {
                    slot.write(next);
                    self.memory_source().reclaim(node)
                };
                self.len -= 1;
                return Some((key, value));
            }

            // SAFETY: node is live and owned by the map, which is mutably borrowed.
            slot = unsafe { NonNull::from(&mut (*node.as_ptr()).next) };
        }
    }

    /// Removes the entry associated with `key`, returning the value if it exists.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Retains only the entries for which `f` returns true.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map: HashMap<u32, u32> = (0..10).map(|i| (i, i * 10)).collect();
    /// map.retain(|k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 5);
    /// assert_eq!(map.get(&3), None);
    /// ```
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, mut f: F) {
        for index in 0..self.bucket_count() {
            let mut slot = NonNull::from(&mut self.buckets[index]);

            // SAFETY: slot is always the bucket or the next link of a live node in its chain.
            while let Some(mut node) = unsafe { *slot.as_ref() } {
                // SAFETY: The node is live and the map is mutably borrowed.
                let entry = unsafe { node.as_mut() };

                if f(&entry.key, &mut entry.value) {
                    slot = NonNull::from(&mut entry.next);
                } else {
                    // SAFETY: The node is unlinked before being reclaimed, so it is never reached
                    // again.
                    unsafe {
                        slot.write(entry.next);
                        drop(self.memory_source().reclaim(node));
                    }
                    self.len -= 1;
                }
            }
        }
    }

    /// Drops every entry in the map, keeping the bucket array.
    pub fn clear(&mut self) {
        let mut chain = self.detach_all();
        while let Some(node) = chain.pop() {
            // SAFETY: The node has been unlinked from the map and is never reachable again.
            drop(unsafe { self.memory_source().reclaim(node) });
        }
    }

    /// Rebuilds the map with `bucket_count` buckets (at least 1), moving every entry into the
    /// bucket its hash selects. Entries are relinked rather than copied, so their addresses don't
    /// change.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn rehash(&mut self, bucket_count: usize) {
        self.try_rehash(bucket_count).handle()
    }

    /// Rebuilds the map with `bucket_count` buckets (at least 1).
    ///
    /// The new bucket array is allocated and filled completely before it replaces the current one,
    /// so a failed allocation leaves the map untouched. If the hasher panics part way through, the
    /// map is left empty and its entries are leaked.
    ///
    /// # Errors
    /// Returns an error if the new bucket array can't be allocated.
    pub fn try_rehash(&mut self, bucket_count: usize) -> Result<(), TryReserveError> {
        let bucket_count = bucket_count.max(1);
        let mut new_buckets: Array<Link<K, V>, M> =
            Array::try_repeat_with_in(|| None, bucket_count, self.memory_source().clone())?;

        trace!(
            "Rehashing {} entries from {} into {} buckets",
            self.len,
            self.bucket_count(),
            bucket_count,
        );

        let guard = Abandon(self);
        for head in guard.0.buckets.iter() {
            let mut link = *head;
            while let Some(mut node) = link {
                // SAFETY: Every node in the old chains is live. Its old next link is read before it
                // is replaced.
                unsafe {
                    link = node.as_ref().next;
                    let index = policy::bucket_index(&guard.0.hasher, &node.as_ref().key, bucket_count);
                    node.as_mut().next = new_buckets[index];
                    new_buckets[index] = Some(node);
                }
            }
        }
        let map = guard.disarm();

        // The old array only held links, so replacing it just deallocates it.
        map.buckets = new_buckets;
        Ok(())
    }

    /// Ensures that the map can hold `count` entries in total without exceeding its load factor,
    /// rehashing if it can't.
    ///
    /// # Panics
    /// Panics if the bucket array's layout size exceeds [`isize::MAX`].
    pub fn reserve(&mut self, count: usize) {
        self.try_reserve(count).handle()
    }

    /// Ensures that the map can hold `count` entries in total without exceeding its load factor.
    ///
    /// # Errors
    /// Returns an error, leaving the map untouched, if the bucket array can't be allocated.
    pub fn try_reserve(&mut self, count: usize) -> Result<(), TryReserveError> {
        let target = self.load_factor.min_buckets(count);
        if target <= self.bucket_count() {
            return Ok(());
        }

        debug!("Reserving {} buckets for {} entries", target, count);
        self.try_rehash(target)
    }

    /// Returns an iterator over all key-value pairs in the HashMap, as references.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, RawIter::new(&self.buckets, self.len))
    }

    /// Returns an iterator over all key-value pairs in the HashMap, with mutable references to the
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            buckets: &self.buckets,
            raw: RawIter::new(&self.buckets, self.len),
            _phantom: PhantomData,
        }
    }

    /// Returns and iterator over all keys in the HashMap, as references.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Returns and iterator over all values in the HashMap, as references.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Returns and iterator over all values in the HashMap, as mutable references.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// Consumes self and returns an iterator over all contained keys.
    pub fn into_keys(self) -> IntoKeys<K, V, M> {
        IntoKeys(self.into_iter())
    }

    /// Consumes self and returns an iterator over all contained values.
    pub fn into_values(self) -> IntoValues<K, V, M> {
        IntoValues(self.into_iter())
    }

    /// Removes every entry from the map, returning them in an iterator. The bucket array is kept.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map: HashMap<u8, u8> = [(1, 2), (3, 4)].into_iter().collect();
    /// let mut drained: Vec<_> = map.drain().collect();
    /// drained.sort();
    /// assert_eq!(drained, [(1, 2), (3, 4)]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V, M> {
        let chain = self.detach_all();
        Drain {
            chain,
            alloc: self.buckets.memory_source(),
        }
    }

    /// Unlinks every entry from the buckets and joins them into one chain, in iteration order.
    /// The map is left empty.
    pub(crate) fn detach_all(&mut self) -> Chain<K, V> {
        let mut chain = Chain {
            head: None,
            len: mem::replace(&mut self.len, 0),
        };
        let mut last: Link<K, V> = None;

        for slot in self.buckets.iter_mut() {
            let Some(first) = slot.take() else {
                continue;
            };

            match last {
                // SAFETY: last is the final node of the chain built so far, which is live.
                Some(mut last) => unsafe { last.as_mut().next = Some(first) },
                None => chain.head = Some(first),
            }

            let mut end = first;
            // SAFETY: Every node in the bucket's chain is live.
            while let Some(next) = unsafe { end.as_ref().next } {
                end = next;
            }
            last = Some(end);
        }

        chain
    }

    /// Finds the node holding `key`, along with the index of its bucket.
    fn find<Q>(&self, key: &Q) -> Option<(usize, NonNull<Node<K, V>>)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket(key);
        let mut link = self.buckets[index];

        while let Some(node) = link {
            // SAFETY: Every node reachable from the bucket array is live.
            let node_ref = unsafe { node.as_ref() };
            if node_ref.key.borrow() == key {
                return Some((index, node));
            }
            link = node_ref.next;
        }

        None
    }

    /// Returns a pointer to the empty link at the end of the chain in the bucket at `index`.
    fn chain_tail(&mut self, index: usize) -> NonNull<Link<K, V>> {
        let mut slot = NonNull::from(&mut self.buckets[index]);

        // SAFETY: slot is always the bucket or the next link of a live node in its chain.
        while let Some(node) = unsafe { *slot.as_ref() } {
            // SAFETY: As above, and the map is mutably borrowed.
            slot = unsafe { NonNull::from(&mut (*node.as_ptr()).next) };
        }

        slot
    }

    fn bucket_head(&self, index: usize) -> Link<K, V> {
        self.buckets
            .get(index)
            .copied()
            .ok_or(IndexOutOfBounds {
                index,
                len: self.bucket_count(),
            })
            .throw()
    }

    fn occupied(&mut self, index: usize, node: NonNull<Node<K, V>>) -> Occupied<'_, K, V> {
        Occupied {
            buckets: &self.buckets,
            index,
            node,
            _phantom: PhantomData,
        }
    }
}

/// Empties a map whose bucket array is being rebuilt, unless it is disarmed. Only triggers if
/// hashing panics during a rehash, in which case the map's entries are leaked rather than being
/// left reachable from two bucket arrays.
struct Abandon<'a, K: Hash + Eq, V, B: BuildHasher, M: MemorySource>(&'a mut HashMap<K, V, B, M>);

impl<'a, K: Hash + Eq, V, B: BuildHasher, M: MemorySource> Abandon<'a, K, V, B, M> {
    fn disarm(self) -> &'a mut HashMap<K, V, B, M> {
        let this = mem::ManuallyDrop::new(self);
        // SAFETY: this is never dropped, so the reference is moved out exactly once.
        unsafe { std::ptr::read(&this.0) }
    }
}

impl<K: Hash + Eq, V, B: BuildHasher, M: MemorySource> Drop for Abandon<'_, K, V, B, M> {
    fn drop(&mut self) {
        self.0.buckets.fill(None);
        self.0.len = 0;
    }
}

impl<'a, K, V> Occupied<'a, K, V> {
    /// Returns a reference to the entry's key.
    pub fn key(&self) -> &K {
        // SAFETY: The map is borrowed for 'a, so the node is live.
        unsafe { &self.node.as_ref().key }
    }

    /// Returns a reference to the entry's value.
    pub fn get(&self) -> &V {
        // SAFETY: The map is borrowed for 'a, so the node is live.
        unsafe { &self.node.as_ref().value }
    }

    /// Returns a mutable reference to the entry's value.
    pub fn get_mut(&mut self) -> &mut V {
        // SAFETY: The map is mutably borrowed for 'a and self is borrowed uniquely.
        unsafe { &mut self.node.as_mut().value }
    }

    /// Converts the handle into a mutable reference to the value, with the map's lifetime.
    pub fn into_mut(mut self) -> &'a mut V {
        // SAFETY: The map is mutably borrowed for 'a and self is consumed.
        unsafe { &mut self.node.as_mut().value }
    }

    /// Returns the index of the bucket that holds the entry.
    pub const fn bucket(&self) -> usize {
        self.index
    }

    /// Converts the handle into an iterator that yields this entry first, followed by every entry
    /// after it in the map's iteration order.
    ///
    /// # Examples
    /// ```
    /// # use alloc_collections::collections::hash::HashMap;
    /// let mut map = HashMap::new();
    /// let (entry, _) = map.insert(1, "a");
    /// let from_entry: Vec<_> = entry.iter().collect();
    /// assert_eq!(from_entry, [(&1, &"a")]);
    /// ```
    pub fn iter(self) -> Iter<'a, K, V> {
        // SAFETY: node is in the chain of buckets[index], and the map is borrowed for 'a.
        Iter::new(self.buckets, unsafe { RawIter::at(self.buckets, self.index, self.node) })
    }
}

impl<K: Debug, V: Debug> Debug for Occupied<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Occupied")
            .field("key", self.key())
            .field("value", self.get())
            .field("bucket", &self.index)
            .finish()
    }
}

impl<K: Hash + Eq, V, B: BuildHasher, M: MemorySource> Drop for HashMap<K, V, B, M> {
    fn drop(&mut self) {
        self.clear();

        // Implicitly drop self.buckets, which only holds (now empty) links.
    }
}

// SAFETY: The map owns its nodes uniquely, so it can be sent when everything it owns can be.
unsafe impl<K, V, B, M> Send for HashMap<K, V, B, M>
where
    K: Hash + Eq + Send,
    V: Send,
    B: BuildHasher + Send,
    M: MemorySource + Send,
{}

// SAFETY: Shared access never mutates the map, so it can be shared when its contents can be.
unsafe impl<K, V, B, M> Sync for HashMap<K, V, B, M>
where
    K: Hash + Eq + Sync,
    V: Sync,
    B: BuildHasher + Sync,
    M: MemorySource + Sync,
{}

impl<K, V, B, M> Clone for HashMap<K, V, B, M>
where
    K: Hash + Eq + Clone,
    V: Clone,
    B: BuildHasher + Clone,
    M: MemorySource,
{
    fn clone(&self) -> Self {
        let mut map = HashMap::with_config_in(
            self.bucket_count(),
            self.load_factor,
            self.hasher.clone(),
            self.memory_source().clone(),
        );

        // Chains are copied bucket by bucket, preserving their order, so no hashing is needed.
        for index in 0..self.bucket_count() {
            for (key, value) in self.bucket_iter(index) {
                let node = map.memory_source().create(Node {
                    key: key.clone(),
                    value: value.clone(),
                    next: None,
                });
                // SAFETY: The tail slot is in a chain owned by the new map.
                unsafe { map.chain_tail(index).write(Some(node)) };
                map.len += 1;
            }
        }

        map
    }
}

impl<K, V, B, C, M, N> PartialEq<HashMap<K, V, C, N>> for HashMap<K, V, B, M>
where
    K: Hash + Eq,
    V: PartialEq,
    B: BuildHasher,
    C: BuildHasher,
    M: MemorySource,
    N: MemorySource,
{
    fn eq(&self, other: &HashMap<K, V, C, N>) -> bool {
        self.len == other.len
            && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq, B: BuildHasher, M: MemorySource> Eq for HashMap<K, V, B, M> {}

impl<K, V, B, M, Q> Index<&Q> for HashMap<K, V, B, M>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    B: BuildHasher,
    M: MemorySource,
{
    type Output = V;

    /// Returns a reference to the value associated with `key`.
    ///
    /// # Panics
    /// Panics with [`KeyNotFound`] if the map doesn't contain `key`. Use
    /// [`get_or_insert_default`](HashMap::get_or_insert_default) to insert on a miss instead.
    fn index(&self, key: &Q) -> &V {
        self.at(key).throw()
    }
}

impl<K, V, B, M> Default for HashMap<K, V, B, M>
where
    K: Hash + Eq,
    B: BuildHasher + Default,
    M: MemorySource + Default,
{
    fn default() -> Self {
        HashMap::with_config_in(DEFAULT_BUCKETS, LoadFactor::DEFAULT, B::default(), M::default())
    }
}

impl<K, V, B, M> Extend<(K, V)> for HashMap<K, V, B, M>
where
    K: Hash + Eq,
    B: BuildHasher,
    M: MemorySource,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(self.len.saturating_add(iter.size_hint().0));

        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, B, M> FromIterator<(K, V)> for HashMap<K, V, B, M>
where
    K: Hash + Eq,
    B: BuildHasher + Default,
    M: MemorySource + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HashMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, B, M> Debug for HashMap<K, V, B, M>
where
    K: Hash + Eq + Debug,
    V: Debug,
    B: BuildHasher + Debug,
    M: MemorySource,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let buckets = DebugBuckets(self);

        f.debug_struct("HashMap")
            .field("buckets", &buckets)
            .field("len", &self.len)
            .field("load_factor", &self.load_factor)
            .field("hasher", &self.hasher)
            .finish()
    }
}

/// Renders every bucket of a map as its chain, `(k: v) -> (k: v)`, or `-` if it is empty.
struct DebugBuckets<'a, K: Hash + Eq, V, B: BuildHasher, M: MemorySource>(&'a HashMap<K, V, B, M>);

impl<K, V, B, M> Debug for DebugBuckets<'_, K, V, B, M>
where
    K: Hash + Eq + Debug,
    V: Debug,
    B: BuildHasher,
    M: MemorySource,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let map = self.0;

        f.debug_list()
            .entries((0..map.bucket_count()).map(|index| {
                let chain = map
                    .bucket_iter(index)
                    .map(|(k, v)| format!("({k:?}: {v:?})"))
                    .collect::<Vector<String>>();

                DebugRaw(if chain.is_empty() {
                    "-".into()
                } else {
                    chain.join(" -> ")
                })
            }))
            .finish()
    }
}

impl<K, V, B, M> Display for HashMap<K, V, B, M>
where
    K: Hash + Eq + Debug,
    V: Debug,
    B: BuildHasher,
    M: MemorySource,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#")?;
        f.debug_map().entries(self.iter()).finish()
    }
}
