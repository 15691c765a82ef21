use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::HashMap;
use super::node::{Chain, Link, Node, RawIter};
use crate::alloc::{Global, MemorySource};

impl<K: Hash + Eq, V, B: BuildHasher, M: MemorySource> IntoIterator for HashMap<K, V, B, M> {
    type Item = (K, V);

    type IntoIter = IntoIter<K, V, M>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter {
            chain: self.detach_all(),
            alloc: self.memory_source().clone(),
        }
    }
}

/// A type for owned iteration over a [`HashMap`]. Produces values of type `(K, V)`.
///
/// Entries are unlinked from the map's buckets up front, so the map's own storage is released as
/// soon as it is consumed.
pub struct IntoIter<K, V, M: MemorySource = Global> {
    pub(crate) chain: Chain<K, V>,
    pub(crate) alloc: M,
}

impl<K, V, M: MemorySource> Iterator for IntoIter<K, V, M> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.pop()?;
        // SAFETY: The node has just been unlinked from the chain and is never reachable again.
        let Node { key, value, .. } = unsafe { self.alloc.reclaim(node) };
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<K, V, M: MemorySource> Drop for IntoIter<K, V, M> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

impl<K, V, M: MemorySource> FusedIterator for IntoIter<K, V, M> {}

impl<K, V, M: MemorySource> ExactSizeIterator for IntoIter<K, V, M> {}

/// A draining iterator over the entries of a [`HashMap`]. Produces values of type `(K, V)`.
///
/// The map is emptied (keeping its buckets) when the Drain is created. Any entries that haven't
/// been yielded when the Drain is dropped are dropped with it.
///
/// See [`HashMap::drain`].
pub struct Drain<'a, K, V, M: MemorySource = Global> {
    pub(crate) chain: Chain<K, V>,
    pub(crate) alloc: &'a M,
}

impl<K, V, M: MemorySource> Iterator for Drain<'_, K, V, M> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.pop()?;
        // SAFETY: The node has just been unlinked from the chain and is never reachable again.
        let Node { key, value, .. } = unsafe { self.alloc.reclaim(node) };
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<K, V, M: MemorySource> Drop for Drain<'_, K, V, M> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

impl<K, V, M: MemorySource> FusedIterator for Drain<'_, K, V, M> {}

impl<K, V, M: MemorySource> ExactSizeIterator for Drain<'_, K, V, M> {}

impl<'a, K: Hash + Eq, V, B: BuildHasher, M: MemorySource> IntoIterator for &'a HashMap<K, V, B, M> {
    type Item = (&'a K, &'a V);

    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A type for borrowed iteration over a [`HashMap`]. Produces values of type `(&K, &V)`, in
/// bucket order and then chain order.
///
/// See [`HashMap::iter`] and [`Occupied::iter`](super::Occupied::iter).
pub struct Iter<'a, K, V> {
    pub(crate) buckets: &'a [Link<K, V>],
    pub(crate) raw: RawIter<K, V>,
    pub(crate) _phantom: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Link<K, V>], raw: RawIter<K, V>) -> Iter<'a, K, V> {
        Iter {
            buckets,
            raw,
            _phantom: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.raw.next(self.buckets)?;
        // SAFETY: The map is borrowed for 'a, so its nodes are live and not mutated.
        let node = unsafe { node.as_ref() };
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.raw.remaining, Some(self.raw.remaining))
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter::new(self.buckets, self.raw)
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K: Hash + Eq, V, B: BuildHasher, M: MemorySource> IntoIterator for &'a mut HashMap<K, V, B, M> {
    type Item = (&'a K, &'a mut V);

    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for mutable iteration over a [`HashMap`]. Produces values of type `(&K, &mut V)`.
///
/// See [`HashMap::iter_mut`].
pub struct IterMut<'a, K, V> {
    pub(crate) buckets: &'a [Link<K, V>],
    pub(crate) raw: RawIter<K, V>,
    pub(crate) _phantom: PhantomData<(&'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.raw.next(self.buckets)?;
        // SAFETY: The map is mutably borrowed for 'a and each node is yielded at most once, so the
        // references are unique.
        let node = unsafe { node.as_mut() };
        Some((&node.key, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.raw.remaining, Some(self.raw.remaining))
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// A type for borrowed iteration over a single bucket's chain. Produces values of type
/// `(&K, &V)`.
///
/// See [`HashMap::bucket_iter`].
pub struct BucketIter<'a, K, V> {
    pub(crate) link: Link<K, V>,
    pub(crate) _phantom: PhantomData<(&'a K, &'a V)>,
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: The map is borrowed for 'a, so its nodes are live and not mutated.
        let node = unsafe { self.link?.as_ref() };
        self.link = node.next;
        Some((&node.key, &node.value))
    }
}

impl<K, V> FusedIterator for BucketIter<'_, K, V> {}

/// A type for owned iteration over the keys of a [`HashMap`]. Produces values of type `K`.
///
/// See [`HashMap::into_keys`].
pub struct IntoKeys<K, V, M: MemorySource = Global>(pub(crate) IntoIter<K, V, M>);

impl<K, V, M: MemorySource> Iterator for IntoKeys<K, V, M> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, M: MemorySource> FusedIterator for IntoKeys<K, V, M> {}

impl<K, V, M: MemorySource> ExactSizeIterator for IntoKeys<K, V, M> {}

/// A type for borrowed iteration over the keys of a [`HashMap`]. Produces values of type `&K`.
///
/// See [`HashMap::keys`].
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// A type for owned iteration over the values of a [`HashMap`]. Produces values of type `V`.
///
/// See [`HashMap::into_values`].
pub struct IntoValues<K, V, M: MemorySource = Global>(pub(crate) IntoIter<K, V, M>);

impl<K, V, M: MemorySource> Iterator for IntoValues<K, V, M> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, M: MemorySource> FusedIterator for IntoValues<K, V, M> {}

impl<K, V, M: MemorySource> ExactSizeIterator for IntoValues<K, V, M> {}

/// A type for borrowed iteration over the values of a [`HashMap`]. Produces values of type `&V`.
///
/// See [`HashMap::values`].
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A type for mutable iteration over the values of a [`HashMap`]. Produces values of type
/// `&mut V`.
///
/// See [`HashMap::values_mut`].
pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|e| e.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
