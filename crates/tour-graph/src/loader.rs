//! CSV topology loader.
//!
//! # CSV format
//!
//! Two tables: one row per node, one row per undirected edge.
//!
//! ```csv
//! id,x,y
//! 1,400,300
//! 2,600,400
//! 3,200,400
//! ```
//!
//! ```csv
//! a,b
//! 1,2
//! 2,3
//! ```
//!
//! Edges referencing undeclared nodes fail with
//! [`GraphError::UnknownNode`]; repeated node ids fail with
//! [`GraphError::DuplicateNode`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tour_core::{NodeId, Position};

use crate::{GraphError, GraphResult, NavGraph, NavGraphBuilder};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id: u32,
    x:  f32,
    y:  f32,
}

#[derive(Deserialize)]
struct EdgeRecord {
    a: u32,
    b: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NavGraph`] from a node CSV file and an edge CSV file.
pub fn load_graph_csv(nodes_path: &Path, edges_path: &Path) -> GraphResult<NavGraph> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    load_graph_readers(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or for topologies embedded
/// in the binary.
pub fn load_graph_readers<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<NavGraph> {
    let mut builder = NavGraphBuilder::new();

    let mut node_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        builder.add_node(NodeId(row.id), Position::new(row.x, row.y))?;
    }

    let mut edge_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        builder.add_edge(NodeId(row.a), NodeId(row.b))?;
    }

    Ok(builder.build())
}
