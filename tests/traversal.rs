//! Integration test: traversal properties.
//!
//! Checks coverage, level order and worker-count independence against a
//! plain sequential BFS over the same adjacency lists.

use std::collections::{HashMap, HashSet, VecDeque};

use flatbfs::{
    build_graph, traverse, traverse_with, BfsDriver, BfsError, EdgeRecord, FlatGraph, NodeId,
    NodeRecord, TraversalConfig,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn demo_adjacency() -> Vec<Vec<NodeId>> {
    vec![
        vec![1, 3, 4],
        vec![0, 2, 5],
        vec![1, 3, 4],
        vec![0, 2, 5],
        vec![0, 2],
        vec![1, 3],
    ]
}

/// Sequential reference BFS: node -> level.
fn reference_levels(adjacency: &[Vec<NodeId>], root: NodeId) -> HashMap<NodeId, usize> {
    let mut levels = HashMap::new();
    let mut queue = VecDeque::new();
    levels.insert(root, 0);
    queue.push_back(root);
    while let Some(u) = queue.pop_front() {
        let next = levels[&u] + 1;
        for &v in &adjacency[u as usize] {
            if !levels.contains_key(&v) {
                levels.insert(v, next);
                queue.push_back(v);
            }
        }
    }
    levels
}

/// Assert `order` visits exactly the reachable set, once each, with
/// non-decreasing levels.
fn assert_valid_bfs_order(adjacency: &[Vec<NodeId>], root: NodeId, order: &[NodeId]) {
    let expected = reference_levels(adjacency, root);
    assert_eq!(order.first(), Some(&root), "root must be first");
    assert_eq!(order.len(), expected.len(), "visited count mismatch");

    let unique: HashSet<NodeId> = order.iter().copied().collect();
    assert_eq!(unique.len(), order.len(), "duplicate in result");

    let mut prev = 0;
    for id in order {
        let level = *expected
            .get(id)
            .unwrap_or_else(|| panic!("node {} is not reachable from {}", id, root));
        assert!(level >= prev, "node {} at level {} follows level {}", id, level, prev);
        prev = level;
    }
}

fn random_adjacency() -> impl Strategy<Value = Vec<Vec<NodeId>>> {
    (1usize..200).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n as NodeId, 0..6), n)
    })
}

// ---------------------------------------------------------------------------
// Tests: fixed graphs
// ---------------------------------------------------------------------------

#[test]
fn demo_graph_levels() {
    let adjacency = demo_adjacency();
    let graph = FlatGraph::from_adjacency(&adjacency).unwrap();

    let mut driver = BfsDriver::new(TraversalConfig::default().with_threads(4)).unwrap();
    let order = driver.run(&graph, 0).unwrap();
    assert_valid_bfs_order(&adjacency, 0, &order);

    let levels: Vec<HashSet<NodeId>> = driver
        .levels()
        .into_iter()
        .map(|l| l.into_iter().collect())
        .collect();
    assert_eq!(
        levels,
        vec![
            HashSet::from([0]),
            HashSet::from([1, 3, 4]),
            HashSet::from([2, 5]),
        ]
    );
}

#[test]
fn demo_graph_from_raw_records() {
    // Demo layout written out by hand, with sector payloads.
    let targets = [1, 3, 4, 0, 2, 5, 1, 3, 4, 0, 2, 5, 0, 2, 1, 3];
    let sectors = [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 5, 5];
    let edges: Vec<EdgeRecord> = targets
        .iter()
        .zip(sectors)
        .map(|(&target, payload)| EdgeRecord { target, payload })
        .collect();
    let ranges = [(0, 3), (3, 3), (6, 3), (9, 3), (12, 2), (14, 2)];
    let nodes: Vec<NodeRecord> = ranges
        .iter()
        .enumerate()
        .map(|(id, &(edge_start, edge_count))| NodeRecord {
            id: id as NodeId,
            edge_start,
            edge_count,
        })
        .collect();

    let graph = build_graph(nodes, edges).unwrap();
    assert_eq!(graph.edges_of(4)[1], EdgeRecord { target: 2, payload: 4 });

    let order = traverse(&graph, 0).unwrap();
    assert_valid_bfs_order(&demo_adjacency(), 0, &order);
}

#[test]
fn disconnected_nodes_not_visited() {
    // 0 -> 1 -> 2 ; 3 <-> 4 unreachable from 0
    let adjacency = vec![vec![1], vec![2], vec![], vec![4], vec![3]];
    let graph = FlatGraph::from_adjacency(&adjacency).unwrap();

    let order = traverse_with(&graph, 0, TraversalConfig::sequential()).unwrap();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn self_loops_and_cycles_visit_once() {
    let adjacency = vec![vec![0, 1], vec![1, 2], vec![0, 2]];
    let graph = FlatGraph::from_adjacency(&adjacency).unwrap();
    let order = traverse_with(&graph, 0, TraversalConfig::sequential()).unwrap();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn isolated_root_yields_only_root() {
    let graph = FlatGraph::from_adjacency(&[vec![], vec![0]]).unwrap();
    assert_eq!(traverse(&graph, 0).unwrap(), vec![0]);
}

#[test]
fn invalid_root_rejected() {
    let graph = FlatGraph::from_adjacency(&demo_adjacency()).unwrap();
    for root in [-1, 6, i64::MAX] {
        match traverse(&graph, root) {
            Err(BfsError::InvalidRoot { root: r, node_count }) => {
                assert_eq!(r, root);
                assert_eq!(node_count, 6);
            }
            other => panic!("expected InvalidRoot for {}, got {:?}", root, other),
        }
    }
    // Graph is still usable.
    assert_eq!(traverse(&graph, 0).unwrap().len(), 6);
}

#[test]
fn invalid_graph_rejected() {
    let nodes = vec![NodeRecord { id: 0, edge_start: 2, edge_count: 2 }];
    let edges = vec![EdgeRecord { target: 0, payload: 0 }; 3];
    let err = build_graph(nodes, edges).unwrap_err();
    assert!(matches!(err, BfsError::InvalidGraph(_)), "got {:?}", err);
    assert_eq!(err.code(), "INVALID_GRAPH");
}

#[test]
fn wide_graph_parallel_path() {
    // Star into a wide second level so the frontier crosses the threshold.
    let n = 1000 + 999 * 9u32;
    let mut adjacency: Vec<Vec<NodeId>> = vec![Vec::new(); n as usize];
    adjacency[0] = (1..1000).collect();
    for i in 1..1000u32 {
        adjacency[i as usize] = (0..9).map(|k| 1000 + (i - 1) * 9 + k).collect();
    }
    let graph = FlatGraph::from_adjacency(&adjacency).unwrap();

    let config = TraversalConfig::default()
        .with_threads(8)
        .with_chunk_size(16)
        .with_parallel_threshold(1);
    let mut driver = BfsDriver::new(config).unwrap();
    let order = driver.run(&graph, 0).unwrap();

    assert_valid_bfs_order(&adjacency, 0, &order);
    assert_eq!(order.len(), n as usize);
    assert_eq!(driver.stats().levels, 3);
}

#[test]
fn repeated_runs_cover_same_set() {
    let n = 3000u32;
    let adjacency: Vec<Vec<NodeId>> = (0..n)
        .map(|i| vec![(i * 31 + 7) % n, (i * 17 + 3) % n, (i / 2) % n])
        .collect();
    let graph = FlatGraph::from_adjacency(&adjacency).unwrap();

    let config = TraversalConfig::default().with_threads(4).with_parallel_threshold(1);
    let mut driver = BfsDriver::new(config).unwrap();
    let first: HashSet<NodeId> = driver.run(&graph, 0).unwrap().into_iter().collect();
    let second: HashSet<NodeId> = driver.run(&graph, 0).unwrap().into_iter().collect();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_traversal_is_valid_bfs(adjacency in random_adjacency(), root_seed in any::<usize>()) {
        let root = (root_seed % adjacency.len()) as NodeId;
        let graph = FlatGraph::from_adjacency(&adjacency).unwrap();
        let config = TraversalConfig::default()
            .with_threads(4)
            .with_chunk_size(3)
            .with_parallel_threshold(1);
        let order = traverse_with(&graph, root as i64, config).unwrap();
        assert_valid_bfs_order(&adjacency, root, &order);
    }

    #[test]
    fn prop_one_vs_many_workers_same_levels(adjacency in random_adjacency()) {
        let graph = FlatGraph::from_adjacency(&adjacency).unwrap();

        let mut single = BfsDriver::new(TraversalConfig::sequential()).unwrap();
        let mut many = BfsDriver::new(
            TraversalConfig::default()
                .with_threads(6)
                .with_chunk_size(2)
                .with_parallel_threshold(1),
        )
        .unwrap();
        single.run(&graph, 0).unwrap();
        many.run(&graph, 0).unwrap();

        let as_sets = |levels: Vec<Vec<NodeId>>| -> Vec<HashSet<NodeId>> {
            levels.into_iter().map(|l| l.into_iter().collect()).collect()
        };
        prop_assert_eq!(as_sets(single.levels()), as_sets(many.levels()));
    }
}
