//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Nodes carry external [`NodeId`] labels but are stored densely, sorted by
//! label, so dense index order and label order agree.  Adjacency uses
//! **Compressed Sparse Row (CSR)** format: the neighbours of the node at
//! dense index `i` occupy
//!
//! ```text
//! adj[ adj_start[i] .. adj_start[i+1] ]
//! ```
//!
//! Every undirected edge is stored once in each direction and each
//! neighbour slice is sorted, so traversal order is deterministic.
//!
//! The graph is immutable after [`NavGraphBuilder::build`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tour_core::{NodeId, Position};

use crate::{DijkstraRouter, GraphError, GraphResult, Route, Router};

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Undirected, uniform-cost navigation graph.
///
/// Do not construct directly; use [`NavGraphBuilder`].
#[derive(Clone, Debug)]
pub struct NavGraph {
    /// Node label for each dense index, ascending.
    ids: Vec<NodeId>,

    /// Presentation coordinates, indexed by dense index.
    positions: Vec<Position>,

    /// Label → dense index.
    index: BTreeMap<NodeId, u32>,

    /// CSR row pointer.  Length = `node_count + 1`.
    adj_start: Vec<u32>,

    /// Neighbour dense indices, grouped per node and sorted.
    adj: Vec<u32>,
}

impl NavGraph {
    /// A graph with no nodes.  Every routing query against it fails with
    /// [`GraphError::UnknownNode`].
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Dense index of `id`.
    pub fn index_of(&self, id: NodeId) -> GraphResult<usize> {
        self.index
            .get(&id)
            .map(|&i| i as usize)
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Label of the node at dense index `index`.
    ///
    /// # Panics
    /// Panics if `index >= node_count()`.
    #[inline]
    pub fn id_at(&self, index: usize) -> NodeId {
        self.ids[index]
    }

    pub fn position(&self, id: NodeId) -> GraphResult<Position> {
        self.index_of(id).map(|i| self.positions[i])
    }

    /// All node labels in ascending order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.ids
    }

    /// `(label, position)` for every node, ascending by label.
    pub fn nodes_with_positions(&self) -> impl Iterator<Item = (NodeId, Position)> + '_ {
        self.ids.iter().copied().zip(self.positions.iter().copied())
    }

    /// Every undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.node_count()).flat_map(move |i| {
            self.neighbor_indices(i)
                .filter(move |&j| j > i)
                .map(move |j| (self.ids[i], self.ids[j]))
        })
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Dense neighbour indices of the node at dense index `index`, ascending.
    ///
    /// This is a contiguous slice scan: no heap allocation.
    #[inline]
    pub fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.adj_start[index] as usize;
        let end   = self.adj_start[index + 1] as usize;
        self.adj[start..end].iter().map(|&j| j as usize)
    }

    /// Neighbour labels of `id`, ascending.
    pub fn neighbors(&self, id: NodeId) -> GraphResult<Vec<NodeId>> {
        let i = self.index_of(id)?;
        Ok(self.neighbor_indices(i).map(|j| self.ids[j]).collect())
    }

    pub fn degree(&self, id: NodeId) -> GraphResult<usize> {
        let i = self.index_of(id)?;
        Ok((self.adj_start[i + 1] - self.adj_start[i]) as usize)
    }

    /// `true` if an edge joins `a` and `b`.  Unknown nodes have no edges.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&i), Some(&j)) => {
                let start = self.adj_start[i as usize] as usize;
                let end   = self.adj_start[i as usize + 1] as usize;
                self.adj[start..end].binary_search(&j).is_ok()
            }
            _ => false,
        }
    }

    /// Every node reachable from `source`, including `source` itself.
    pub fn reachable_from(&self, source: NodeId) -> GraphResult<BTreeSet<NodeId>> {
        let start = self.index_of(source)?;
        let mut seen = vec![false; self.node_count()];
        let mut frontier = VecDeque::from([start]);
        seen[start] = true;

        while let Some(i) = frontier.pop_front() {
            for j in self.neighbor_indices(i) {
                if !seen[j] {
                    seen[j] = true;
                    frontier.push_back(j);
                }
            }
        }

        Ok(seen
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(i, _)| self.ids[i])
            .collect())
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Minimum-hop path from `source` to `destination` using the default
    /// [`DijkstraRouter`].
    pub fn shortest_path(&self, source: NodeId, destination: NodeId) -> GraphResult<Route> {
        DijkstraRouter.route(self, source, destination)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes must be added before the edges that reference them.
///
/// # Example
///
/// ```
/// use tour_core::{NodeId, Position};
/// use tour_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// b.add_node(NodeId(1), Position::new(400.0, 300.0)).unwrap();
/// b.add_node(NodeId(2), Position::new(600.0, 400.0)).unwrap();
/// b.add_edge(NodeId(1), NodeId(2)).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    nodes: BTreeMap<NodeId, Position>,
    /// Normalised `(min, max)` pairs; duplicates collapse.
    edges: BTreeSet<(NodeId, NodeId)>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.  Fails if `id` was already added.
    pub fn add_node(&mut self, id: NodeId, pos: Position) -> GraphResult<()> {
        if self.nodes.insert(id, pos).is_some() {
            return Err(GraphError::DuplicateNode(id));
        }
        Ok(())
    }

    /// Add an undirected edge between two existing nodes.
    ///
    /// Adding the same pair twice (in either order) has no further effect.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.edges.insert((a.min(b), a.max(b)));
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let node_count = self.nodes.len();

        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        let positions: Vec<Position> = self.nodes.values().copied().collect();
        let index: BTreeMap<NodeId, u32> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();

        // Expand each undirected edge into both directions on dense indices.
        let mut directed: Vec<(u32, u32)> = Vec::with_capacity(self.edges.len() * 2);
        for (a, b) in &self.edges {
            let (i, j) = (index[a], index[b]);
            directed.push((i, j));
            directed.push((j, i));
        }
        directed.sort_unstable();

        // CSR row pointer.
        let mut adj_start = vec![0u32; node_count + 1];
        for &(from, _) in &directed {
            adj_start[from as usize + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, directed.len());

        let adj: Vec<u32> = directed.into_iter().map(|(_, to)| to).collect();

        NavGraph { ids, positions, index, adj_start, adj }
    }
}
