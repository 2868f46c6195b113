//! Flattened, read-only adjacency layout.
//!
//! All edges live in one contiguous array. Each node stores an
//! `(edge_start, edge_count)` range into it, so looking up a node's
//! outgoing edges is two loads and a slice, with no per-node allocation.
//! Built once, never mutated; safe to share across traversals and threads.

use serde::{Deserialize, Serialize};

use crate::error::{BfsError, Result};

/// Dense node identifier in `[0, node_count)`.
pub type NodeId = u32;

/// Node record: a range into the shared edge array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Must equal the record's position in the node array.
    pub id: NodeId,
    pub edge_start: u32,
    pub edge_count: u32,
}

/// Edge record. `payload` is opaque caller data (e.g. a sector tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub target: NodeId,
    #[serde(default)]
    pub payload: u32,
}

#[derive(Debug, Clone)]
pub struct FlatGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl FlatGraph {
    /// Validate and take ownership of node and edge arrays.
    ///
    /// Fails with `InvalidGraph` when:
    /// - a node's id differs from its array position (covers duplicates and gaps)
    /// - `edge_start + edge_count` runs past the edge array
    /// - an edge targets a node id outside `[0, node_count)`
    pub fn new(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Result<Self> {
        if nodes.len() > NodeId::MAX as usize {
            return Err(BfsError::InvalidGraph(format!(
                "{} nodes exceeds the id space",
                nodes.len()
            )));
        }

        for (pos, node) in nodes.iter().enumerate() {
            if node.id as usize != pos {
                return Err(BfsError::InvalidGraph(format!(
                    "node at position {} has id {}",
                    pos, node.id
                )));
            }
            // u64 so a hostile start+count cannot wrap.
            let end = node.edge_start as u64 + node.edge_count as u64;
            if end > edges.len() as u64 {
                return Err(BfsError::InvalidGraph(format!(
                    "node {} edge range {}..{} exceeds {} edges",
                    node.id,
                    node.edge_start,
                    end,
                    edges.len()
                )));
            }
        }

        if let Some((idx, edge)) = edges
            .iter()
            .enumerate()
            .find(|(_, e)| e.target as usize >= nodes.len())
        {
            return Err(BfsError::InvalidGraph(format!(
                "edge {} targets node {} but graph has {} nodes",
                idx,
                edge.target,
                nodes.len()
            )));
        }

        Ok(Self { nodes, edges })
    }

    /// Build from per-node adjacency lists. Each edge's payload is its source id.
    pub fn from_adjacency(adjacency: &[Vec<NodeId>]) -> Result<Self> {
        let total: usize = adjacency.iter().map(Vec::len).sum();
        if total > u32::MAX as usize {
            return Err(BfsError::InvalidGraph(format!(
                "{} edges exceeds the offset space",
                total
            )));
        }

        let mut nodes = Vec::with_capacity(adjacency.len());
        let mut edges = Vec::with_capacity(total);
        for (src, targets) in adjacency.iter().enumerate() {
            nodes.push(NodeRecord {
                id: src as NodeId,
                edge_start: edges.len() as u32,
                edge_count: targets.len() as u32,
            });
            edges.extend(targets.iter().map(|&target| EdgeRecord {
                target,
                payload: src as u32,
            }));
        }
        Self::new(nodes, edges)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of `id`, in insertion order. O(1).
    ///
    /// Panics if `id` is out of range; traversal only passes validated ids.
    #[inline]
    pub fn edges_of(&self, id: NodeId) -> &[EdgeRecord] {
        let node = &self.nodes[id as usize];
        let start = node.edge_start as usize;
        &self.edges[start..start + node.edge_count as usize]
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.nodes[id as usize].edge_count as usize
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges_of(id).iter().map(|e| e.target)
    }

    pub fn contains(&self, id: i64) -> bool {
        id >= 0 && (id as u64) < self.nodes.len() as u64
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }
}
