//! flatbfs demo runner.
//!
//! Loads a graph from JSON (or builds the built-in 6-node demo graph),
//! traverses it from a root and prints the visitation order.
//!
//! Run: cargo run --release --bin flatbfs -- --graph graph.json --root 0

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use flatbfs::{build_graph, BfsDriver, EdgeRecord, FlatGraph, NodeRecord, TraversalConfig};

#[derive(Deserialize)]
struct GraphFile {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

struct Args {
    graph: Option<PathBuf>,
    root: i64,
    config: TraversalConfig,
}

fn print_usage() {
    println!(
        "Usage: flatbfs [--graph <file.json>] [--root <id>] [--threads <n>] [--max-depth <n>]"
    );
    println!();
    println!("Options:");
    println!("  --graph       JSON file with \"nodes\" and \"edges\" arrays (default: demo graph)");
    println!("  --root        Root node id (default: 0)");
    println!("  --threads     Worker threads (default: auto)");
    println!("  --max-depth   Stop after this many levels");
    println!();
    println!("Flags:");
    println!("  -V, --version  Print version information");
    println!("  -h, --help     Print this help message");
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let graph = flag_value(args, "--graph").map(PathBuf::from);
    let root = match flag_value(args, "--root") {
        Some(v) => v.parse().with_context(|| format!("invalid --root '{v}'"))?,
        None => 0,
    };

    let mut config = TraversalConfig::default();
    if let Some(v) = flag_value(args, "--threads") {
        config.threads = Some(v.parse().with_context(|| format!("invalid --threads '{v}'"))?);
    }
    if let Some(v) = flag_value(args, "--max-depth") {
        config.max_depth = Some(v.parse().with_context(|| format!("invalid --max-depth '{v}'"))?);
    }

    Ok(Args { graph, root, config })
}

/// The 6-node graph: 0->{1,3,4} 1->{0,2,5} 2->{1,3,4} 3->{0,2,5} 4->{0,2} 5->{1,3}
fn demo_graph() -> anyhow::Result<FlatGraph> {
    let graph = FlatGraph::from_adjacency(&[
        vec![1, 3, 4],
        vec![0, 2, 5],
        vec![1, 3, 4],
        vec![0, 2, 5],
        vec![0, 2],
        vec![1, 3],
    ])?;
    Ok(graph)
}

fn load_graph(path: &PathBuf) -> anyhow::Result<FlatGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file: GraphFile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    let graph = build_graph(file.nodes, file.edges)?;
    Ok(graph)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("flatbfs {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(&args[1..])?;
    let graph = match &args.graph {
        Some(path) => load_graph(path)?,
        None => demo_graph()?,
    };
    if graph.node_count() == 0 {
        bail!("graph has no nodes");
    }

    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        root = args.root,
        "graph loaded"
    );

    let mut driver = BfsDriver::new(args.config)?;
    let order = driver.run(&graph, args.root)?;
    for id in order {
        println!("Visited: {id}");
    }
    Ok(())
}
