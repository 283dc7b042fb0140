//! The built-in campus map.
//!
//! 21 buildings and waypoints laid out on an 800 × 600 canvas, joined by 29
//! walkways.  Node 1 is the main entrance where the routing agent waits.

use tour_core::{NodeId, Position};
use tour_graph::{GraphResult, NavGraph, NavGraphBuilder};

/// Where the routing agent starts.
pub const ENTRANCE: NodeId = NodeId(1);

const NODES: [(u32, f32, f32); 21] = [
    (1, 400.0, 300.0),  (2, 600.0, 400.0),  (3, 200.0, 400.0),  (4, 400.0, 500.0),
    (5, 400.0, 400.0),  (6, 700.0, 500.0),  (7, 600.0, 300.0),  (8, 600.0, 200.0),
    (9, 700.0, 100.0),  (10, 500.0, 200.0), (11, 300.0, 300.0), (12, 100.0, 500.0),
    (13, 300.0, 200.0), (14, 100.0, 300.0), (15, 200.0, 100.0), (16, 300.0, 100.0),
    (17, 500.0, 400.0), (18, 400.0, 200.0), (19, 400.0, 100.0), (20, 500.0, 500.0),
    (21, 300.0, 50.0),
];

const EDGES: [(u32, u32); 29] = [
    (1, 2),   (1, 5),   (1, 4),   (1, 7),   (2, 4),   (2, 6),   (3, 4),   (3, 11),
    (3, 12),  (4, 5),   (5, 11),  (5, 17),  (5, 18),  (6, 7),   (7, 8),   (7, 10),
    (8, 9),   (10, 17), (10, 18), (11, 13), (11, 14), (12, 14), (13, 15), (14, 16),
    (15, 16), (16, 19), (19, 21), (19, 20), (20, 17),
];

/// Build the campus navigation graph.
pub fn build_campus() -> GraphResult<NavGraph> {
    let mut b = NavGraphBuilder::new();
    for (id, x, y) in NODES {
        b.add_node(NodeId(id), Position::new(x, y))?;
    }
    for (a, c) in EDGES {
        b.add_edge(NodeId(a), NodeId(c))?;
    }
    Ok(b.build())
}
