//! Concurrent visited set over dense node ids.
//!
//! One bit per node in a `Vec<AtomicU64>`. `try_insert` is a single
//! `fetch_or`: the call that flips the bit from 0 to 1 is the only one that
//! sees `true`. This is the sole deduplication point for parallel expansion,
//! so every node is claimed exactly once per traversal.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::graph::NodeId;

const BITS: usize = u64::BITS as usize;

pub struct ConcurrentVisitedSet {
    words: Vec<AtomicU64>,
    capacity: usize,
    /// Number of successful inserts since the last clear.
    len: AtomicUsize,
}

impl ConcurrentVisitedSet {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut set = Self {
            words: Vec::new(),
            capacity: 0,
            len: AtomicUsize::new(0),
        };
        set.reset(capacity);
        set
    }

    /// Empty the set and make room for ids in `[0, capacity)`.
    ///
    /// Takes `&mut self`: no `try_insert` can be in flight.
    pub fn reset(&mut self, capacity: usize) {
        let words = capacity.div_ceil(BITS);
        if words > self.words.len() {
            self.words.resize_with(words, || AtomicU64::new(0));
        }
        self.capacity = capacity;
        self.clear();
    }

    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word.get_mut() = 0;
        }
        *self.len.get_mut() = 0;
    }

    /// Atomically insert `id`. Returns `true` iff this call inserted it.
    ///
    /// Ids outside the capacity are never inserted.
    #[inline]
    pub fn try_insert(&self, id: NodeId) -> bool {
        let id = id as usize;
        if id >= self.capacity {
            return false;
        }
        let mask = 1u64 << (id % BITS);
        // AcqRel: the winner's later writes are ordered after the claim.
        let prev = self.words[id / BITS].fetch_or(mask, Ordering::AcqRel);
        let inserted = prev & mask == 0;
        if inserted {
            self.len.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    pub fn contains(&self, id: NodeId) -> bool {
        let id = id as usize;
        if id >= self.capacity {
            return false;
        }
        self.words[id / BITS].load(Ordering::Acquire) & (1u64 << (id % BITS)) != 0
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
