//! Memory detection for large traversals.
//!
//! A traversal allocates scratch proportional to the node count. Graphs
//! past `MEMORY_CHECK_MIN_NODES` get their scratch estimate compared with
//! the available RAM once per driver; smaller ones never probe the system.

use sysinfo::{MemoryRefreshKind, RefreshKind, System};

// ── Constants ───────────────────────────────────────────────────────

/// Scratch bytes per node for one traversal: two frontier slots, one
/// result slot (4 bytes each) and one visited bit, rounded up.
const SCRATCH_BYTES_PER_NODE: u64 = 13;

/// Graphs below this node count skip the memory probe.
pub const MEMORY_CHECK_MIN_NODES: usize = 1 << 20;

// ── SystemResources ─────────────────────────────────────────────────

/// Snapshot of detected memory.
#[derive(Debug, Clone)]
pub struct SystemResources {
    /// Available (re-usable) RAM in bytes. 0 when unknown.
    pub available_memory_bytes: u64,
}

impl SystemResources {
    /// Refresh memory counters only; CPU and process tables are not loaded.
    pub fn detect() -> Self {
        let refresh = RefreshKind::new().with_memory(MemoryRefreshKind::new().with_ram());
        let sys = System::new_with_specifics(refresh);
        Self {
            available_memory_bytes: sys.available_memory(),
        }
    }
}

// ── TuningProfile ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TuningProfile {
    /// Available memory at detection time (0 = unknown).
    pub available_memory_bytes: u64,
}

impl TuningProfile {
    pub fn from_resources(res: &SystemResources) -> Self {
        Self {
            available_memory_bytes: res.available_memory_bytes,
        }
    }

    /// Estimated scratch memory for a traversal over `node_count` nodes.
    pub fn scratch_bytes(node_count: usize) -> u64 {
        (node_count as u64).saturating_mul(SCRATCH_BYTES_PER_NODE)
    }

    /// Whether a traversal over `node_count` nodes fits in available memory.
    /// Unknown memory is treated as fitting.
    pub fn fits(&self, node_count: usize) -> bool {
        self.available_memory_bytes == 0
            || Self::scratch_bytes(node_count) <= self.available_memory_bytes
    }
}

// ── ResourceManager ─────────────────────────────────────────────────

/// Stateless utility: detect system resources and compute tuning profile.
pub struct ResourceManager;

impl ResourceManager {
    pub fn auto_tune() -> TuningProfile {
        TuningProfile::from_resources(&SystemResources::detect())
    }

    /// Whether a graph of `node_count` nodes is large enough to probe memory.
    pub fn needs_memory_check(node_count: usize) -> bool {
        node_count >= MEMORY_CHECK_MIN_NODES
    }
}

// ── Tests ───────────────────────────────────────────────────────────
