//! Graph construction from environment states.
//!
//! A [`Graph`] is built once from a [`State`] and never mutated afterwards.
//! Nodes always occupy the index space `[0, node_count)`; edge listings and
//! the LinEnv encoding use lexicographic pair order.

mod decode;
mod scores;
mod state;

pub use decode::{lexicographic_pairs, nodes_for_edge_count, pair_count};
pub use state::{State, ADJACENCY_MATRIX_KEY, CURRENT_NODE_KEY};

use nalgebra::DMatrix;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::errors::GraphError;

/// Immutable simple undirected graph decoded from an environment state.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: UnGraph<(), ()>,
    node_count: usize,
}

impl Graph {
    /// Build a graph from any accepted state.
    ///
    /// # Errors
    /// - `InvalidEdgeEncoding` for bad flags, self-loops, parallel edges or
    ///   asymmetric matrices
    /// - `InconsistentEdgeCount` for a LinEnv vector whose flag count is not
    ///   triangular
    /// - `InvalidInputKind` for a non-square adjacency matrix
    pub fn build(state: impl Into<State>) -> Result<Self, GraphError> {
        let state = state.into();
        let kind = state.kind();
        let graph = match state {
            State::Graph(graph) => {
                decode::validate_simple(&graph)?;
                graph
            }
            State::LinEnv(values) => decode::decode_linenv(&values)?,
            State::LocEnv { adjacency_matrix, .. } => decode::decode_adjacency(&adjacency_matrix)?,
        };
        let node_count = graph.node_count();
        debug!(kind, node_count, edge_count = graph.edge_count(), "built graph");
        Ok(Self { graph, node_count })
    }

    /// Decode a LinEnv vector.
    pub fn from_linenv(state: &[f64]) -> Result<Self, GraphError> {
        Self::build(State::LinEnv(state.to_vec()))
    }

    /// Decode a bare adjacency matrix (the LocEnv cursor is not needed).
    pub fn from_adjacency_matrix(matrix: &[Vec<f64>]) -> Result<Self, GraphError> {
        let graph = decode::decode_adjacency(matrix)?;
        let node_count = graph.node_count();
        Ok(Self { graph, node_count })
    }

    /// Build from an explicit edge list over `[0, num_nodes)`.
    ///
    /// # Errors
    /// - `InvalidEdgeEncoding` for out-of-range endpoints, self-loops or
    ///   duplicate pairs
    pub fn from_edges(num_nodes: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = UnGraph::<(), ()>::with_capacity(num_nodes, edges.len());
        let nodes: Vec<NodeIndex> = (0..num_nodes).map(|_| graph.add_node(())).collect();
        for &(a, b) in edges {
            if a >= num_nodes || b >= num_nodes {
                return Err(GraphError::InvalidEdgeEncoding(format!(
                    "edge ({}, {}) references a node outside [0, {})",
                    a, b, num_nodes
                )));
            }
            graph.add_edge(nodes[a], nodes[b], ());
        }
        Self::build(graph)
    }

    /// Number of nodes, fixed at construction.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Borrow the underlying petgraph graph.
    pub fn as_petgraph(&self) -> &UnGraph<(), ()> {
        &self.graph
    }

    /// Edges as `(i, j)` with `i < j`, in lexicographic order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.node_count
            && b < self.node_count
            && self
                .graph
                .find_edge(NodeIndex::new(a), NodeIndex::new(b))
                .is_some()
    }

    /// Degree of every node, indexed by node.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count];
        for edge in self.graph.edge_references() {
            degrees[edge.source().index()] += 1;
            degrees[edge.target().index()] += 1;
        }
        degrees
    }

    /// Dense symmetric 0/1 adjacency matrix.
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.node_count;
        let mut matrix = DMatrix::<f64>::zeros(n, n);
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            matrix[(a, b)] = 1.0;
            matrix[(b, a)] = 1.0;
        }
        matrix
    }

    /// Edge flags in lexicographic pair order; the inverse of LinEnv decoding.
    pub fn edge_bits(&self) -> Vec<u8> {
        lexicographic_pairs(self.node_count)
            .map(|(i, j)| u8::from(self.has_edge(i, j)))
            .collect()
    }

    /// Full LinEnv vector: edge flags followed by a zeroed timestep block.
    pub fn to_linenv_state(&self) -> Vec<f64> {
        let mut state: Vec<f64> = self.edge_bits().into_iter().map(f64::from).collect();
        state.resize(state.len() * 2, 0.0);
        state
    }
}

impl TryFrom<UnGraph<(), ()>> for Graph {
    type Error = GraphError;

    fn try_from(graph: UnGraph<(), ()>) -> Result<Self, Self::Error> {
        Self::build(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn random_edges(n: usize, density: f64, rng: &mut ChaCha8Rng) -> Vec<(usize, usize)> {
        lexicographic_pairs(n)
            .filter(|_| rng.random_bool(density))
            .collect()
    }

    #[test]
    fn test_round_trip_random_graphs() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 1..=20 {
            for density in [0.0, 0.2, 0.5, 0.9, 1.0] {
                let edges = random_edges(n, density, &mut rng);
                let original = Graph::from_edges(n, &edges).unwrap();
                let decoded = Graph::from_linenv(&original.to_linenv_state()).unwrap();
                assert_eq!(decoded.node_count(), n);
                assert_eq!(decoded.edges(), edges);
            }
        }
    }

    #[test]
    fn test_zero_vectors_decode_to_edgeless_graphs() {
        for n in 1..=50 {
            let e = pair_count(n);
            let graph = Graph::from_linenv(&vec![0.0; 2 * e]).unwrap();
            assert_eq!(graph.node_count(), n);
            assert_eq!(graph.edge_count(), 0);
        }
    }

    #[test]
    fn test_non_triangular_half_rejected() {
        let result = Graph::from_linenv(&[0.0; 8]);
        assert_eq!(result.unwrap_err(), GraphError::InconsistentEdgeCount { edges: 4 });
    }

    #[test]
    fn test_flag_two_rejected() {
        let result = Graph::from_linenv(&[0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(GraphError::InvalidEdgeEncoding(_))));
    }

    #[test]
    fn test_build_from_json_states() {
        let lin = State::try_from(json!([1, 1, 0, 0, 0, 0])).unwrap();
        let graph = Graph::build(lin).unwrap();
        assert_eq!(graph.edges(), vec![(0, 1), (0, 2)]);

        let loc = State::try_from(json!({
            "adjacency_matrix": [[0, 1, 0], [1, 0, 1], [0, 1, 0]],
            "current_node": 0
        }))
        .unwrap();
        let graph = Graph::build(loc).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_linenv_and_locenv_agree() {
        let from_bits = Graph::from_linenv(&[1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let matrix = from_bits.adjacency_matrix();
        let rows: Vec<Vec<f64>> = (0..matrix.nrows())
            .map(|i| matrix.row(i).iter().copied().collect())
            .collect();
        let from_matrix = Graph::from_adjacency_matrix(&rows).unwrap();
        assert_eq!(from_bits.edges(), from_matrix.edges());
        assert_eq!(from_bits.edge_bits(), from_matrix.edge_bits());
    }

    #[test]
    fn test_prebuilt_graph_adopted() {
        let mut raw = UnGraph::<(), ()>::new_undirected();
        let a = raw.add_node(());
        let b = raw.add_node(());
        let _c = raw.add_node(());
        raw.add_edge(a, b, ());
        let graph = Graph::try_from(raw).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges(), vec![(0, 1)]);
    }

    #[test]
    fn test_prebuilt_graph_with_self_loop_rejected() {
        let mut raw = UnGraph::<(), ()>::new_undirected();
        let a = raw.add_node(());
        raw.add_edge(a, a, ());
        assert!(matches!(Graph::build(raw), Err(GraphError::InvalidEdgeEncoding(_))));
    }

    #[test]
    fn test_from_edges_out_of_range() {
        let result = Graph::from_edges(2, &[(0, 2)]);
        assert!(matches!(result, Err(GraphError::InvalidEdgeEncoding(_))));
    }

    #[test]
    fn test_degrees_and_adjacency() {
        let graph = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3), (2, 3)]).unwrap();
        assert_eq!(graph.degrees(), vec![3, 1, 2, 2]);
        let adj = graph.adjacency_matrix();
        assert_eq!(adj, adj.transpose());
        assert_eq!(adj.sum(), 8.0);
        assert!(graph.has_edge(3, 2));
        assert!(!graph.has_edge(1, 2));
        assert!(!graph.has_edge(0, 9));
    }
}
