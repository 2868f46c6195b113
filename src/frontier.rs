//! Bounded append buffers and the double-buffered frontier.
//!
//! `AppendBuffer` is a fixed-capacity array of `AtomicU32` slots plus an
//! atomic length. Writers reserve a contiguous run of slots with one
//! `fetch_add` and fill it, so concurrent appends never lose or tear
//! entries and the storage never reallocates mid-level. Readers only look
//! at the buffer after the level's join, which orders all slot stores
//! before the loads.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::error::{BfsError, Result};
use crate::graph::NodeId;

pub struct AppendBuffer {
    slots: Vec<AtomicU32>,
    len: AtomicUsize,
}

impl AppendBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || AtomicU32::new(0));
        Self {
            slots,
            len: AtomicUsize::new(0),
        }
    }

    /// Grow capacity to at least `capacity`. Never shrinks.
    pub fn reserve_exact(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize_with(capacity, || AtomicU32::new(0));
        }
    }

    pub fn clear(&mut self) {
        *self.len.get_mut() = 0;
    }

    #[inline]
    pub fn push(&self, id: NodeId) -> Result<()> {
        self.extend_from_slice(&[id])
    }

    /// Append `ids` as one contiguous run. Safe under concurrent callers.
    pub fn extend_from_slice(&self, ids: &[NodeId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let start = self.len.fetch_add(ids.len(), Ordering::Relaxed);
        let end = start + ids.len();
        if end > self.slots.len() {
            return Err(BfsError::FrontierOverflow {
                capacity: self.slots.len(),
            });
        }
        for (slot, &id) in self.slots[start..end].iter().zip(ids) {
            slot.store(id, Ordering::Relaxed);
        }
        Ok(())
    }

    /// Number of committed entries, clamped to capacity after an overflow.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire).min(self.slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The committed slots. Only meaningful once writers have joined.
    pub fn slots(&self) -> &[AtomicU32] {
        &self.slots[..self.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots().iter().map(|s| s.load(Ordering::Relaxed))
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }
}

/// `current` is read during a level, `next` is written. `swap` exchanges
/// the roles without copying.
pub struct FrontierBuffers {
    current: AppendBuffer,
    next: AppendBuffer,
}

impl FrontierBuffers {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: AppendBuffer::with_capacity(capacity),
            next: AppendBuffer::with_capacity(capacity),
        }
    }

    /// Clear both buffers and size them for `capacity` node ids.
    pub fn reset(&mut self, capacity: usize) {
        self.current.reserve_exact(capacity);
        self.next.reserve_exact(capacity);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.next.clear();
    }

    pub fn current(&self) -> &AppendBuffer {
        &self.current
    }

    pub fn next(&self) -> &AppendBuffer {
        &self.next
    }

    /// Split borrow for a level: read `current`, append into `next`.
    pub fn split(&self) -> (&AppendBuffer, &AppendBuffer) {
        (&self.current, &self.next)
    }

    /// `next` becomes `current`; the new `next` is emptied.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }
}
