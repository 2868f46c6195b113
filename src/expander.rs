//! One level of parallel expansion.
//!
//! Every source node in `current` is expanded independently. A target is
//! claimed through `ConcurrentVisitedSet::try_insert`; only the winning
//! claim appends it to `next` and `result`. A source's discoveries are
//! gathered locally first and appended as one run, so they keep the order
//! of that source's edge list. Chunking is a scheduling knob only.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::error::Result;
use crate::frontier::AppendBuffer;
use crate::graph::{FlatGraph, NodeId};
use crate::visited::ConcurrentVisitedSet;

/// Counts for one expanded level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub frontier_len: usize,
    pub edges_scanned: usize,
    pub discovered: usize,
}

impl LevelStats {
    fn merge(self, other: LevelStats) -> LevelStats {
        LevelStats {
            frontier_len: self.frontier_len + other.frontier_len,
            edges_scanned: self.edges_scanned + other.edges_scanned,
            discovered: self.discovered + other.discovered,
        }
    }
}

/// Shared, read-mostly inputs and append-only outputs for one level.
pub struct LevelExpander<'a> {
    pub graph: &'a FlatGraph,
    pub visited: &'a ConcurrentVisitedSet,
    pub next: &'a AppendBuffer,
    pub result: &'a AppendBuffer,
}

impl<'a> LevelExpander<'a> {
    pub fn new(
        graph: &'a FlatGraph,
        visited: &'a ConcurrentVisitedSet,
        next: &'a AppendBuffer,
        result: &'a AppendBuffer,
    ) -> Self {
        Self { graph, visited, next, result }
    }

    /// Expand `current` on the calling thread.
    pub fn expand_sequential(&self, current: &[AtomicU32]) -> Result<LevelStats> {
        let mut scratch = Vec::new();
        self.expand_chunk(current, &mut scratch)
    }

    /// Expand `current` in parallel, `chunk_size` source nodes per task, on
    /// whatever rayon pool the caller is installed in. Returns once every
    /// chunk has been applied.
    pub fn expand_parallel(&self, current: &[AtomicU32], chunk_size: usize) -> Result<LevelStats> {
        current
            .par_chunks(chunk_size.max(1))
            .map_init(Vec::new, |scratch, chunk| self.expand_chunk(chunk, scratch))
            .try_reduce(LevelStats::default, |a, b| Ok(a.merge(b)))
    }

    fn expand_chunk(&self, chunk: &[AtomicU32], scratch: &mut Vec<NodeId>) -> Result<LevelStats> {
        let mut stats = LevelStats {
            frontier_len: chunk.len(),
            ..LevelStats::default()
        };
        for slot in chunk {
            let (scanned, discovered) = self.expand_node(slot.load(Ordering::Relaxed), scratch)?;
            stats.edges_scanned += scanned;
            stats.discovered += discovered;
        }
        Ok(stats)
    }

    /// Returns `(edges_scanned, discovered)` for one source node.
    fn expand_node(&self, source: NodeId, scratch: &mut Vec<NodeId>) -> Result<(usize, usize)> {
        let edges = self.graph.edges_of(source);
        scratch.clear();
        scratch.extend(
            edges
                .iter()
                .map(|e| e.target)
                .filter(|&target| self.visited.try_insert(target)),
        );
        self.next.extend_from_slice(scratch)?;
        self.result.extend_from_slice(scratch)?;
        Ok((edges.len(), scratch.len()))
    }
}
