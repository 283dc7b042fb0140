//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The assignment engine calls routing through the [`Router`] trait, so an
//! application can swap in another algorithm without touching dispatch
//! logic.  The default [`DijkstraRouter`] treats every edge as cost 1.
//!
//! # Determinism
//!
//! Among equal-length paths the router always returns the same one: the heap
//! is keyed on `(cost, dense index)` and dense index order equals label
//! order, so each node's predecessor is the lowest-labelled node that reaches
//! it at minimal distance.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tour_core::NodeId;

use crate::graph::NavGraph;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the nodes to visit in order, starting at
/// the source and ending at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
}

impl Route {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so whole simulations can be moved
/// onto worker threads for replication batches.
pub trait Router: Send + Sync {
    /// Compute a minimum-hop route from `from` to `to`.
    ///
    /// `from == to` yields the single-node route `[from]`.  Fails with
    /// [`GraphError::UnknownNode`] if either endpoint is absent and
    /// [`GraphError::NoPath`] if they are disconnected.
    fn route(&self, graph: &NavGraph, from: NodeId, to: NodeId) -> GraphResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the CSR graph with uniform edge cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &NavGraph, from: NodeId, to: NodeId) -> GraphResult<Route> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Marks a node with no predecessor.
const NO_PREV: usize = usize::MAX;

fn dijkstra(graph: &NavGraph, from: NodeId, to: NodeId) -> GraphResult<Route> {
    let source = graph.index_of(from)?;
    let target = graph.index_of(to)?;

    if source == target {
        return Ok(Route { nodes: vec![from] });
    }

    let n = graph.node_count();
    // dist[v] = best known hop count to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev[v] = dense index that reached v; NO_PREV for unreached nodes.
    let mut prev = vec![NO_PREV; n];

    dist[source] = 0;

    // Min-heap: (cost, index). Reverse makes BinaryHeap (max) behave as min-heap.
    // The secondary key settles equal-cost nodes in ascending label order.
    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
    heap.push(Reverse((0, source)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == target {
            return Ok(reconstruct(graph, &prev, target));
        }

        // Skip stale heap entries.
        if cost > dist[node] {
            continue;
        }

        for neighbor in graph.neighbor_indices(node) {
            let new_cost = cost.saturating_add(1);
            // Strict `<`: the first (lowest-labelled) predecessor wins ties.
            if new_cost < dist[neighbor] {
                dist[neighbor] = new_cost;
                prev[neighbor] = node;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(GraphError::NoPath { from, to })
}

fn reconstruct(graph: &NavGraph, prev: &[usize], target: usize) -> Route {
    let mut nodes = Vec::new();
    let mut cur = target;
    loop {
        nodes.push(graph.id_at(cur));
        let p = prev[cur];
        if p == NO_PREV {
            break;
        }
        cur = p;
    }
    nodes.reverse();
    Route { nodes }
}
