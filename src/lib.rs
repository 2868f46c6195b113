//! flatbfs: level-synchronous parallel breadth-first traversal
//!
//! The graph is stored flattened: one contiguous edge array with an
//! offset/count range per node. Traversal proceeds frontier by frontier;
//! each frontier is expanded data-parallel on a rayon pool, with an atomic
//! visited bitset as the single deduplication point.
//!
//! ```
//! use flatbfs::{build_graph, traverse, EdgeRecord, NodeRecord};
//!
//! let nodes = vec![
//!     NodeRecord { id: 0, edge_start: 0, edge_count: 1 },
//!     NodeRecord { id: 1, edge_start: 1, edge_count: 0 },
//! ];
//! let edges = vec![EdgeRecord { target: 1, payload: 0 }];
//! let graph = build_graph(nodes, edges).unwrap();
//! assert_eq!(traverse(&graph, 0).unwrap(), vec![0, 1]);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod expander;
pub mod frontier;
pub mod graph;
pub mod resource;
pub mod visited;

pub use config::TraversalConfig;
pub use driver::{BfsDriver, CancelToken, DriverState, TraversalStats};
pub use error::{BfsError, Result};
pub use expander::{LevelExpander, LevelStats};
pub use frontier::{AppendBuffer, FrontierBuffers};
pub use graph::{EdgeRecord, FlatGraph, NodeId, NodeRecord};
pub use visited::ConcurrentVisitedSet;

/// Validate node/edge arrays into a `FlatGraph`.
pub fn build_graph(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Result<FlatGraph> {
    FlatGraph::new(nodes, edges)
}

/// BFS from `root` with the default configuration. Returns nodes in
/// discovery order, root first.
///
/// Runs on the global rayon pool with fresh scratch buffers per call; reuse
/// a `BfsDriver` for repeated traversals.
pub fn traverse(graph: &FlatGraph, root: i64) -> Result<Vec<NodeId>> {
    traverse_with(graph, root, TraversalConfig::default())
}

pub fn traverse_with(graph: &FlatGraph, root: i64, config: TraversalConfig) -> Result<Vec<NodeId>> {
    if !graph.contains(root) {
        return Err(BfsError::InvalidRoot {
            root,
            node_count: graph.node_count(),
        });
    }
    BfsDriver::new(config)?.run(graph, root)
}
