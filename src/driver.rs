//! BfsDriver: the level loop.
//!
//! `Idle -> Seeded -> Expanding -> (LevelComplete -> Expanding)* -> Done`
//!
//! Each `Expanding` step runs one full parallel pass over the current
//! frontier and joins before returning, so every discovery of level N
//! happens-before any expansion of level N+1. Cancellation and depth
//! limits are checked only at level boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::TraversalConfig;
use crate::error::{BfsError, Result};
use crate::expander::LevelExpander;
use crate::frontier::{AppendBuffer, FrontierBuffers};
use crate::graph::{FlatGraph, NodeId};
use crate::resource::{ResourceManager, TuningProfile};
use crate::visited::ConcurrentVisitedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Seeded,
    Expanding,
    LevelComplete,
    Done,
}

/// Cooperative cancellation flag, observed between levels.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Re-arm the token. Seeding never clears it, so a cancel issued before
    /// `run` still aborts that run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Where level expansion runs.
enum Workers {
    /// Calling thread only.
    Sequential,
    /// The process-wide rayon pool.
    Global,
    /// A pool owned by this driver.
    Pool(rayon::ThreadPool),
}

/// Summary of the most recent traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalStats {
    /// Levels expanded (the root level counts once it has been expanded).
    pub levels: usize,
    pub nodes_visited: usize,
    pub edges_scanned: usize,
    pub elapsed: Duration,
}

pub struct BfsDriver {
    config: TraversalConfig,
    /// Probed on the first seed of a large graph.
    profile: Option<TuningProfile>,
    workers: Workers,
    state: DriverState,
    /// `(node_count, edge_count)` of the seeded graph.
    seeded_shape: Option<(usize, usize)>,
    frontier: FrontierBuffers,
    visited: ConcurrentVisitedSet,
    result: AppendBuffer,
    /// `result[level_offsets[k]..level_offsets[k + 1]]` is level k.
    level_offsets: Vec<usize>,
    cancel: CancelToken,
    stats: TraversalStats,
    started: Option<Instant>,
}

impl BfsDriver {
    pub fn new(config: TraversalConfig) -> Result<Self> {
        let workers = match config.threads {
            None => Workers::Global,
            // Sequential path: no thread pool for a single worker
            Some(threads) if threads <= 1 => Workers::Sequential,
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("flatbfs-worker-{i}"))
                    .build()
                    .map_err(|e| BfsError::ThreadPool(format!("rayon pool: {e}")))?;
                Workers::Pool(pool)
            }
        };

        Ok(Self {
            config,
            profile: None,
            workers,
            state: DriverState::Idle,
            seeded_shape: None,
            frontier: FrontierBuffers::with_capacity(0),
            visited: ConcurrentVisitedSet::with_capacity(0),
            result: AppendBuffer::with_capacity(0),
            level_offsets: Vec::new(),
            cancel: CancelToken::new(),
            stats: TraversalStats::default(),
            started: None,
        })
    }

    /// Replace the cancellation token. Cancelling it aborts the next
    /// level boundary of the current or a future traversal.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn worker_threads(&self) -> usize {
        match &self.workers {
            Workers::Sequential => 1,
            Workers::Global => rayon::current_num_threads(),
            Workers::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Reset all per-traversal state and claim `root`.
    ///
    /// Valid from any state. Fails with `InvalidRoot` when `root` is outside
    /// `[0, node_count)`; the driver is then left `Idle`.
    pub fn seed(&mut self, graph: &FlatGraph, root: i64) -> Result<()> {
        if !graph.contains(root) {
            self.state = DriverState::Idle;
            self.seeded_shape = None;
            return Err(BfsError::InvalidRoot {
                root,
                node_count: graph.node_count(),
            });
        }
        let root = root as NodeId;
        let n = graph.node_count();

        if ResourceManager::needs_memory_check(n) {
            let profile = self.profile.get_or_insert_with(ResourceManager::auto_tune);
            if !profile.fits(n) {
                tracing::warn!(
                    "traversal scratch (~{} bytes for {} nodes) exceeds available memory",
                    TuningProfile::scratch_bytes(n),
                    n
                );
            }
        }

        self.frontier.reset(n);
        self.visited.reset(n);
        self.result.reserve_exact(n);
        self.result.clear();
        self.level_offsets.clear();

        self.visited.try_insert(root);
        self.frontier.current().push(root)?;
        self.result.push(root)?;
        self.level_offsets.extend([0, 1]);

        self.stats = TraversalStats::default();
        self.started = Some(Instant::now());
        self.seeded_shape = Some((n, graph.edge_count()));
        self.state = DriverState::Seeded;
        Ok(())
    }

    /// Advance one state transition and return the new state.
    ///
    /// `graph` must be the graph passed to `seed`; a graph of a different
    /// shape fails with `InvalidGraph` and leaves the state unchanged.
    pub fn step(&mut self, graph: &FlatGraph) -> Result<DriverState> {
        if let Some((nodes, edges)) = self.seeded_shape {
            if (graph.node_count(), graph.edge_count()) != (nodes, edges) {
                return Err(BfsError::InvalidGraph(format!(
                    "stepped with a graph of {} nodes / {} edges, seeded with {} / {}",
                    graph.node_count(),
                    graph.edge_count(),
                    nodes,
                    edges
                )));
            }
        }
        self.state = match self.state {
            DriverState::Idle | DriverState::Done => self.state,
            DriverState::Seeded => self.begin_level()?,
            DriverState::Expanding => {
                self.expand(graph)?;
                DriverState::LevelComplete
            }
            DriverState::LevelComplete => {
                self.frontier.swap();
                self.level_offsets.push(self.result.len());
                if self.frontier.current().is_empty() {
                    self.finish()
                } else {
                    self.begin_level()?
                }
            }
        };
        Ok(self.state)
    }

    /// Seed and step until `Done`. Returns the visitation order.
    pub fn run(&mut self, graph: &FlatGraph, root: i64) -> Result<Vec<NodeId>> {
        self.seed(graph, root)?;
        while self.step(graph)? != DriverState::Done {}
        Ok(self.result.to_vec())
    }

    /// Visitation order so far. Root first.
    pub fn result(&self) -> Vec<NodeId> {
        self.result.to_vec()
    }

    /// Nodes grouped by level, in result order.
    pub fn levels(&self) -> Vec<Vec<NodeId>> {
        let result = self.result.to_vec();
        self.level_offsets
            .windows(2)
            .map(|w| result[w[0]..w[1]].to_vec())
            .filter(|level| !level.is_empty())
            .collect()
    }

    pub fn stats(&self) -> &TraversalStats {
        &self.stats
    }

    /// Level checkpoint: honour cancellation and depth before expanding.
    fn begin_level(&mut self) -> Result<DriverState> {
        let level = self.stats.levels;
        if self.cancel.is_cancelled() {
            self.state = DriverState::Idle;
            return Err(BfsError::Cancelled { level });
        }
        if self.config.max_depth.is_some_and(|max| level >= max) {
            return Ok(self.finish());
        }
        Ok(DriverState::Expanding)
    }

    fn expand(&mut self, graph: &FlatGraph) -> Result<()> {
        let (current, next) = self.frontier.split();
        let expander = LevelExpander::new(graph, &self.visited, next, &self.result);
        let slots = current.slots();
        let chunk_size = self.config.effective_chunk_size();
        let parallel = slots.len() >= self.config.parallel_threshold;

        let level_stats = match &self.workers {
            Workers::Pool(pool) if parallel => {
                pool.install(|| expander.expand_parallel(slots, chunk_size))?
            }
            Workers::Global if parallel => expander.expand_parallel(slots, chunk_size)?,
            _ => expander.expand_sequential(slots)?,
        };

        tracing::debug!(
            level = self.stats.levels,
            frontier = level_stats.frontier_len,
            edges = level_stats.edges_scanned,
            discovered = level_stats.discovered,
            "level expanded"
        );

        self.stats.levels += 1;
        self.stats.edges_scanned += level_stats.edges_scanned;
        Ok(())
    }

    fn finish(&mut self) -> DriverState {
        self.stats.nodes_visited = self.result.len();
        self.stats.elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        tracing::info!(
            nodes = self.stats.nodes_visited,
            levels = self.stats.levels,
            edges = self.stats.edges_scanned,
            elapsed_us = self.stats.elapsed.as_micros() as u64,
            "traversal complete"
        );
        DriverState::Done
    }
}
