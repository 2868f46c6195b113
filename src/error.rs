//! Error types for graph construction and traversal

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BfsError>;

#[derive(Error, Debug)]
pub enum BfsError {
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Invalid root {root}: graph has {node_count} nodes")]
    InvalidRoot { root: i64, node_count: usize },

    #[error("Frontier overflow (capacity {capacity})")]
    FrontierOverflow { capacity: usize },

    #[error("Traversal cancelled before level {level}")]
    Cancelled { level: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl BfsError {
    /// Stable error code for callers that map errors across an API boundary
    pub fn code(&self) -> &'static str {
        match self {
            BfsError::InvalidGraph(_) => "INVALID_GRAPH",
            BfsError::InvalidRoot { .. } => "INVALID_ROOT",
            BfsError::FrontierOverflow { .. } => "FRONTIER_OVERFLOW",
            BfsError::Cancelled { .. } => "CANCELLED",
            BfsError::ThreadPool(_) => "INTERNAL_ERROR",
        }
    }
}
