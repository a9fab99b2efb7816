//! Graph - immutable vertex count + edge set.
//!
//! The edge set is the authoritative structure. Adjacency is derived once per
//! instance into a petgraph `UnGraph` whose node indices coincide with vertex
//! indices, so neighbor and connectivity queries go through petgraph.
//! Editing a graph means building a new one.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use super::edge::Edge;
use crate::error::{Result, ValidationError};

/// An undirected simple graph on vertices `0..vertex_count`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    vertex_count: usize,

    /// Ordered so iteration, hashing and serialization are deterministic.
    edges: BTreeSet<Edge>,

    /// Derived adjacency; node `i` is vertex `i`.
    adjacency: UnGraph<(), ()>,
}

/// Wire shape of a [`Graph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphData {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph, rejecting edges with an endpoint outside
    /// `[0, vertex_count)`. Duplicate edges collapse.
    pub fn new(vertex_count: usize, edges: impl IntoIterator<Item = Edge>) -> Result<Self> {
        let edges: BTreeSet<Edge> = edges.into_iter().collect();
        if let Some(edge) = edges.iter().find(|e| e.v() >= vertex_count) {
            return Err(ValidationError::VertexOutOfRange {
                vertex: edge.v(),
                vertex_count,
            });
        }
        Ok(Self::from_valid(vertex_count, edges))
    }

    /// A graph with `vertex_count` isolated vertices.
    pub fn empty(vertex_count: usize) -> Self {
        Self::from_valid(vertex_count, BTreeSet::new())
    }

    /// Build from an edge set already known to be in range.
    pub(crate) fn from_valid(vertex_count: usize, edges: BTreeSet<Edge>) -> Self {
        let mut adjacency = UnGraph::with_capacity(vertex_count, edges.len());
        for _ in 0..vertex_count {
            adjacency.add_node(());
        }
        for edge in &edges {
            adjacency.add_edge(NodeIndex::new(edge.u()), NodeIndex::new(edge.v()), ());
        }

        Self {
            vertex_count,
            edges,
            adjacency,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge set, in canonical order.
    #[inline]
    pub fn edges(&self) -> &BTreeSet<Edge> {
        &self.edges
    }

    /// Whether the graph contains `edge`.
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Neighbors of `vertex`. Empty for out-of-range vertices.
    pub fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        let index = (vertex < self.vertex_count).then(|| NodeIndex::new(vertex));
        index
            .into_iter()
            .flat_map(move |index| self.adjacency.neighbors(index))
            .map(|n| n.index())
    }

    /// Number of edges incident to `vertex`.
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors(vertex).count()
    }

    /// Edge density in `[0, 1]`: `|E| / (n(n-1)/2)`.
    ///
    /// Defined as `0.0` for fewer than two vertices, where no edge is possible.
    pub fn density(&self) -> f32 {
        if self.vertex_count < 2 {
            return 0.0;
        }
        let n = self.vertex_count as f64;
        (self.edges.len() as f64 / (n * (n - 1.0) / 2.0)) as f32
    }

    /// Number of connected components, counting isolated vertices.
    pub fn component_count(&self) -> usize {
        connected_components(&self.adjacency)
    }

    /// Whether the graph is a single tree spanning every vertex.
    pub fn is_tree(&self) -> bool {
        self.vertex_count > 0
            && self.edges.len() == self.vertex_count - 1
            && self.component_count() == 1
    }

    /// A copy with `edge` added.
    pub fn with_edge(&self, edge: Edge) -> Result<Self> {
        if edge.v() >= self.vertex_count {
            return Err(ValidationError::VertexOutOfRange {
                vertex: edge.v(),
                vertex_count: self.vertex_count,
            });
        }
        let mut edges = self.edges.clone();
        edges.insert(edge);
        Ok(Self::from_valid(self.vertex_count, edges))
    }

    /// A copy with `edge` removed. Removing an absent edge is a no-op.
    pub fn without_edge(&self, edge: &Edge) -> Self {
        let mut edges = self.edges.clone();
        edges.remove(edge);
        Self::from_valid(self.vertex_count, edges)
    }

    /// Hash of the structure (vertex count and edge set).
    ///
    /// Equal graphs hash equally within a build, which is what seeds the
    /// layout's initial scatter.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.vertex_count == other.vertex_count && self.edges == other.edges
    }
}

impl Eq for Graph {}

impl Hash for Graph {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertex_count.hash(state);
        self.edges.hash(state);
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertex_count", &self.vertex_count)
            .field("edges", &self.edges)
            .finish()
    }
}

impl TryFrom<GraphData> for Graph {
    type Error = ValidationError;

    fn try_from(data: GraphData) -> Result<Self> {
        Self::new(data.vertex_count, data.edges)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        Self {
            vertex_count: graph.vertex_count,
            edges: graph.edges.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize) -> Edge {
        Edge::new(a, b).unwrap()
    }

    fn path(n: usize) -> Graph {
        Graph::new(n, (1..n).map(|v| edge(v - 1, v))).unwrap()
    }

    #[test]
    fn test_density() {
        let graph = Graph::new(4, [edge(0, 1), edge(1, 2), edge(2, 3)]).unwrap();
        assert_eq!(graph.density(), 0.5);

        let complete = Graph::new(3, [edge(0, 1), edge(0, 2), edge(1, 2)]).unwrap();
        assert_eq!(complete.density(), 1.0);
    }

    #[test]
    fn test_density_small_graphs() {
        assert_eq!(Graph::empty(0).density(), 0.0);
        assert_eq!(Graph::empty(1).density(), 0.0);
        assert_eq!(Graph::empty(2).density(), 0.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let result = Graph::new(3, [edge(0, 1), edge(1, 3)]);
        assert_eq!(
            result,
            Err(ValidationError::VertexOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let graph = Graph::new(3, [edge(0, 1), edge(1, 0), edge(0, 1)]).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_neighbors_consistent_with_edges() {
        let graph = Graph::new(5, [edge(0, 1), edge(0, 2), edge(3, 2)]).unwrap();

        for v in 0..graph.vertex_count() {
            let mut neighbors: Vec<_> = graph.neighbors(v).collect();
            neighbors.sort_unstable();
            let mut expected: Vec<_> = (0..graph.vertex_count())
                .filter(|&u| u != v && graph.contains_edge(&Edge::canonical(u, v)))
                .collect();
            expected.sort_unstable();
            assert_eq!(neighbors, expected, "vertex {v}");
        }

        // Isolated vertex is still covered
        assert_eq!(graph.degree(4), 0);
        // Out of range yields nothing
        assert_eq!(graph.neighbors(99).count(), 0);
    }

    #[test]
    fn test_with_and_without_edge() {
        let graph = path(3);
        let added = graph.with_edge(edge(0, 2)).unwrap();
        assert_eq!(added.edge_count(), 3);
        assert_eq!(added.degree(0), 2);
        // Original untouched
        assert_eq!(graph.edge_count(), 2);

        let removed = added.without_edge(&edge(0, 1));
        assert_eq!(removed.edge_count(), 2);
        assert!(!removed.contains_edge(&edge(0, 1)));
        assert_eq!(removed.neighbors(0).collect::<Vec<_>>(), vec![2]);

        assert!(graph.with_edge(edge(1, 3)).is_err());
    }

    #[test]
    fn test_components_and_tree() {
        assert!(path(5).is_tree());
        assert_eq!(path(5).component_count(), 1);

        let forest = Graph::new(4, [edge(0, 1), edge(2, 3)]).unwrap();
        assert_eq!(forest.component_count(), 2);
        assert!(!forest.is_tree());

        let cycle = path(4).with_edge(edge(0, 3)).unwrap();
        assert!(!cycle.is_tree());

        assert!(Graph::empty(1).is_tree());
        assert!(!Graph::empty(0).is_tree());
    }

    #[test]
    fn test_structural_hash() {
        let a = Graph::new(4, [edge(0, 1), edge(2, 3)]).unwrap();
        let b = Graph::new(4, [edge(3, 2), edge(1, 0)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());

        let c = Graph::new(5, [edge(0, 1), edge(2, 3)]).unwrap();
        assert_ne!(a.structural_hash(), c.structural_hash());
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let graph = Graph::new(3, [edge(0, 2)]).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"vertex_count":3,"edges":[[0,2]]}"#);

        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.degree(2), 1);

        let bad = r#"{"vertex_count":2,"edges":[[0,5]]}"#;
        assert!(serde_json::from_str::<Graph>(bad).is_err());
    }
}
