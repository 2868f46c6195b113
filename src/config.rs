//! Traversal configuration.

use serde::{Deserialize, Serialize};

/// Source nodes per parallel task.
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// Frontiers smaller than this are expanded on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Tuning knobs for `BfsDriver`. None of them change which nodes are
/// visited or their level; `max_depth` only truncates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Worker threads (None = share the global rayon pool, 1 = calling thread only)
    pub threads: Option<usize>,
    /// Source nodes grouped into one parallel task (default: 32)
    pub chunk_size: usize,
    /// Minimum frontier length for parallel expansion (default: 64)
    pub parallel_threshold: usize,
    /// Stop after this many levels have been expanded (None = unbounded)
    pub max_depth: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            threads: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            max_depth: None,
        }
    }
}

impl TraversalConfig {
    /// Single-threaded configuration, useful as a reference run.
    pub fn sequential() -> Self {
        Self {
            threads: Some(1),
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Chunk size with the zero case mapped to 1 (`par_chunks` panics on 0).
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
