// State decoding: LinEnv bit vectors and LocEnv adjacency matrices
//
// Both encodings describe a simple undirected graph on the index space
// [0, n). The LinEnv encoding packs the strict upper triangle of the
// adjacency matrix row by row:
//
//   n = 4, pairs in lexicographic order:
//   (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
//     b0    b1    b2    b3    b4    b5
//
// followed by an equally long timestep block that the decoder drops.
// Environments index actions by this exact order, so it must never change.

use std::collections::HashSet;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::errors::GraphError;

// ============================================================================
// TRIANGULAR NUMBERS
// ============================================================================

/// `n(n-1)/2`, the number of unordered pairs over `n` nodes.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Recover `n` from `E = n(n-1)/2`.
///
/// The closed form `(1 + sqrt(1 + 8E)) / 2` is evaluated in floating point
/// and rounded, then re-checked with integer arithmetic so that a value that
/// is merely close to an integer is never accepted.
///
/// # Errors
/// - `InconsistentEdgeCount` if no integer `n` satisfies the formula
pub fn nodes_for_edge_count(edges: usize) -> Result<usize, GraphError> {
    let n = ((1.0 + (1.0 + 8.0 * edges as f64).sqrt()) / 2.0).round() as usize;
    let exact = n
        .checked_mul(n.saturating_sub(1))
        .map(|twice| twice / 2 == edges)
        .unwrap_or(false);
    if exact {
        Ok(n)
    } else {
        Err(GraphError::InconsistentEdgeCount { edges })
    }
}

/// Iterate `(i, j)` with `0 <= i < j < n`, `i` outer and `j` inner, ascending.
pub fn lexicographic_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

// ============================================================================
// LINENV
// ============================================================================

/// Decode a LinEnv state vector.
///
/// Only the first `floor(len / 2)` entries are read; the rest is timestep
/// data. An empty vector decodes to the single-node graph since `E = 0`
/// gives `n = 1`.
///
/// # Errors
/// - `InvalidEdgeEncoding` if a flag is anything other than exactly 0 or 1
/// - `InconsistentEdgeCount` if the flag count is not triangular
pub fn decode_linenv(state: &[f64]) -> Result<UnGraph<(), ()>, GraphError> {
    let edge_slots = state.len() / 2;
    let bits = &state[..edge_slots];
    debug!(edge_slots, "decoding linenv state");

    if let Some((pos, value)) = bits
        .iter()
        .enumerate()
        .find(|(_, v)| **v != 0.0 && **v != 1.0)
    {
        return Err(GraphError::InvalidEdgeEncoding(format!(
            "edge flag {} is {}, expected 0 or 1",
            pos, value
        )));
    }

    let num_nodes = nodes_for_edge_count(edge_slots)?;
    debug!(num_nodes, "recovered node count");

    let mut graph = UnGraph::<(), ()>::with_capacity(num_nodes, edge_slots);
    let nodes: Vec<NodeIndex> = (0..num_nodes).map(|_| graph.add_node(())).collect();
    for ((i, j), &bit) in lexicographic_pairs(num_nodes).zip(bits) {
        if bit == 1.0 {
            graph.add_edge(nodes[i], nodes[j], ());
        }
    }
    Ok(graph)
}

// ============================================================================
// LOCENV
// ============================================================================

/// Decode a square 0/1 adjacency matrix.
///
/// Squareness is a shape property and is checked at the JSON boundary; it is
/// re-checked here for callers building `State::LocEnv` by hand.
///
/// # Errors
/// - `InvalidInputKind` if the matrix is not square
/// - `InvalidEdgeEncoding` on a value other than 0/1, a set diagonal cell,
///   or an asymmetric pair
pub fn decode_adjacency(matrix: &[Vec<f64>]) -> Result<UnGraph<(), ()>, GraphError> {
    let n = matrix.len();
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(GraphError::InvalidInputKind(format!(
            "adjacency matrix is not square: row {} has {} entries, expected {}",
            i,
            row.len(),
            n
        )));
    }

    let mut graph = UnGraph::<(), ()>::with_capacity(n, 0);
    let nodes: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();

    for i in 0..n {
        for j in 0..n {
            let value = matrix[i][j];
            if value != 0.0 && value != 1.0 {
                return Err(GraphError::InvalidEdgeEncoding(format!(
                    "adjacency[{}][{}] is {}, expected 0 or 1",
                    i, j, value
                )));
            }
        }
        if matrix[i][i] != 0.0 {
            return Err(GraphError::InvalidEdgeEncoding(format!(
                "adjacency[{}][{}] is set, self-loops are not allowed",
                i, i
            )));
        }
    }

    for (i, j) in lexicographic_pairs(n) {
        if matrix[i][j] != matrix[j][i] {
            return Err(GraphError::InvalidEdgeEncoding(format!(
                "adjacency matrix is not symmetric at ({}, {})",
                i, j
            )));
        }
        if matrix[i][j] == 1.0 {
            graph.add_edge(nodes[i], nodes[j], ());
        }
    }

    debug!(num_nodes = n, num_edges = graph.edge_count(), "decoded locenv state");
    Ok(graph)
}

// ============================================================================
// PRE-BUILT GRAPHS
// ============================================================================

/// Check that an adopted graph has no self-loops and no parallel edges.
///
/// # Errors
/// - `InvalidEdgeEncoding` naming the first offending edge
pub fn validate_simple(graph: &UnGraph<(), ()>) -> Result<(), GraphError> {
    let mut seen = HashSet::with_capacity(graph.edge_count());
    for edge in graph.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a == b {
            return Err(GraphError::InvalidEdgeEncoding(format!(
                "self-loop at node {}",
                a
            )));
        }
        if !seen.insert((a.min(b), a.max(b))) {
            return Err(GraphError::InvalidEdgeEncoding(format!(
                "duplicate edge ({}, {})",
                a.min(b),
                a.max(b)
            )));
        }
    }
    Ok(())
}
