use std::ptr::NonNull;

/// A link in a bucket's chain. Every link owns the node it points to.
pub(crate) type Link<K, V> = Option<NonNull<Node<K, V>>>;

/// A single entry of a [`HashMap`](super::HashMap), allocated on its own so that its address
/// stays fixed for as long as it is in the map.
pub(crate) struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub next: Link<K, V>,
}

/// The position of an iterator over a bucket array: a bucket index and the next node to yield.
///
/// The position is kept settled, meaning that `node` is only None once every bucket from `bucket`
/// onwards is exhausted.
pub(crate) struct RawIter<K, V> {
    pub bucket: usize,
    pub node: Link<K, V>,
    pub remaining: usize,
}

impl<K, V> Clone for RawIter<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for RawIter<K, V> {}

impl<K, V> RawIter<K, V> {
    /// Creates a position at the first entry of `buckets`, which hold `len` entries in total.
    pub fn new(buckets: &[Link<K, V>], len: usize) -> RawIter<K, V> {
        let mut raw = RawIter {
            bucket: 0,
            node: buckets.first().copied().flatten(),
            remaining: len,
        };
        raw.settle(buckets);
        raw
    }

    /// Creates a position at `node`, which is in the bucket at `index`. The number of remaining
    /// entries is counted by walking the rest of the buckets.
    ///
    /// # Safety
    /// `node` must be a live node in the chain of `buckets[index]`.
    pub unsafe fn at(buckets: &[Link<K, V>], index: usize, node: NonNull<Node<K, V>>) -> RawIter<K, V> {
        let mut remaining = 0;
        let mut link = Some(node);
        while let Some(current) = link {
            remaining += 1;
            // SAFETY: The caller guarantees that node is in a chain of live nodes.
            link = unsafe { current.as_ref().next };
        }

        remaining += buckets[index + 1..].iter().map(|&head| chain_len(head)).sum::<usize>();

        RawIter {
            bucket: index,
            node: Some(node),
            remaining,
        }
    }

    /// Moves past empty buckets until a node is found or the buckets run out.
    fn settle(&mut self, buckets: &[Link<K, V>]) {
        while self.node.is_none() && self.bucket + 1 < buckets.len() {
            self.bucket += 1;
            self.node = buckets[self.bucket];
        }
    }

    /// Returns the current node and advances to the next one, skipping empty buckets.
    pub fn next(&mut self, buckets: &[Link<K, V>]) -> Option<NonNull<Node<K, V>>> {
        let node = self.node?;
        // SAFETY: Every node reachable from the bucket array is live while the array is borrowed.
        self.node = unsafe { node.as_ref().next };
        self.remaining -= 1;
        self.settle(buckets);
        Some(node)
    }
}

/// Counts the nodes in the chain starting at `head`.
pub(crate) fn chain_len<K, V>(mut head: Link<K, V>) -> usize {
    let mut len = 0;
    while let Some(node) = head {
        len += 1;
        // SAFETY: Chains only ever link live nodes.
        head = unsafe { node.as_ref().next };
    }
    len
}

/// Every node of a map, unlinked from its buckets and joined into one chain in iteration order.
pub(crate) struct Chain<K, V> {
    pub head: Link<K, V>,
    pub len: usize,
}

impl<K, V> Chain<K, V> {
    /// Unlinks the first node of the chain and returns it.
    pub fn pop(&mut self) -> Option<NonNull<Node<K, V>>> {
        let node = self.head?;
        // SAFETY: The chain owns all of its nodes, which are live.
        self.head = unsafe { node.as_ref().next };
        self.len -= 1;
        Some(node)
    }
}
