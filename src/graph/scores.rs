// Graph scores and structural predicates
//
// WAGNER SCORE:
// The conjecture Wagner refuted with cross-entropy search states that every
// connected graph on n nodes satisfies
//
//   λ₁(G) + μ(G) ≥ 1 + sqrt(n - 1)
//
// where λ₁ is the largest adjacency eigenvalue and μ the matching number.
// The score is the slack on the wrong side of that inequality:
//
//   score = 1 + sqrt(n - 1) - (λ₁ + μ)
//
// so a positive score on a connected graph is a counterexample.

use nalgebra::SymmetricEigen;
use petgraph::algo::{connected_components, maximum_matching};

use super::Graph;
use crate::errors::GraphError;

impl Graph {
    /// `1 + sqrt(n - 1) - (spectral_radius + matching_number)`.
    ///
    /// # Errors
    /// - `DomainError` on the empty graph, where `sqrt(-1)` is undefined
    pub fn wagner_score(&self) -> Result<f64, GraphError> {
        if self.node_count == 0 {
            return Err(GraphError::DomainError(
                "wagner score needs at least one node".to_string(),
            ));
        }
        let bound = 1.0 + ((self.node_count - 1) as f64).sqrt();
        let radius = self.spectral_radius();
        let weight = self.matching_number() as f64;
        Ok(bound - (radius + weight))
    }

    /// Largest eigenvalue of the adjacency matrix.
    ///
    /// The matrix is symmetric, so a symmetric eigensolver is used and the
    /// spectrum is real by construction; no imaginary rounding noise can
    /// appear. Returns 0.0 for the empty graph.
    pub fn spectral_radius(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        SymmetricEigen::new(self.adjacency_matrix())
            .eigenvalues
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Size of a maximum-cardinality matching.
    ///
    /// Edges carry no weight, so this equals the size of a maximum weight
    /// matching with unit weights.
    pub fn matching_number(&self) -> usize {
        maximum_matching(&self.graph).len()
    }

    /// True iff the graph has at least one node and a single component.
    ///
    /// The empty graph is not connected; a lone node is.
    pub fn is_connected(&self) -> bool {
        self.node_count > 0 && connected_components(&self.graph) == 1
    }

    /// True iff exactly one node has degree `n - 1` and all others degree 1.
    ///
    /// Graphs with at most one node are never stars. With two nodes both
    /// endpoints have degree `n - 1 = 1`, so `K2` is not a star either.
    pub fn is_star(&self) -> bool {
        let n = self.node_count;
        if n <= 1 {
            return false;
        }
        let degrees = self.degrees();
        let centers = degrees.iter().filter(|&&d| d == n - 1).count();
        let leaves = degrees.iter().filter(|&&d| d == 1).count();
        centers == 1 && leaves == n - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn complete_graph(n: usize) -> Graph {
        let edges: Vec<_> = crate::graph::lexicographic_pairs(n).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    fn path_graph(n: usize) -> Graph {
        let edges: Vec<_> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    fn star_graph(leaves: usize) -> Graph {
        let edges: Vec<_> = (1..=leaves).map(|i| (0, i)).collect();
        Graph::from_edges(leaves + 1, &edges).unwrap()
    }

    // =========================================================================
    // WAGNER SCORE
    // =========================================================================

    #[test]
    fn test_wagner_k4() {
        let k4 = complete_graph(4);
        assert!(approx_eq(k4.spectral_radius(), 3.0));
        assert_eq!(k4.matching_number(), 2);
        let expected = 1.0 + 3f64.sqrt() - 5.0;
        assert!(approx_eq(k4.wagner_score().unwrap(), expected));
        assert!(approx_eq(k4.wagner_score().unwrap(), -2.267_949_192));
    }

    #[test]
    fn test_wagner_empty_graph_is_domain_error() {
        let empty = Graph::from_edges(0, &[]).unwrap();
        assert!(matches!(empty.wagner_score(), Err(GraphError::DomainError(_))));
    }

    #[test]
    fn test_wagner_single_node() {
        let lone = Graph::from_edges(1, &[]).unwrap();
        assert!(approx_eq(lone.wagner_score().unwrap(), 1.0));
    }

    #[test]
    fn test_wagner_star() {
        // K_{1,k}: radius sqrt(k), matching 1, n = k + 1
        let star = star_graph(8);
        assert!(approx_eq(star.spectral_radius(), 8f64.sqrt()));
        assert_eq!(star.matching_number(), 1);
        assert!(approx_eq(star.wagner_score().unwrap(), 1.0 + 8f64.sqrt() - (8f64.sqrt() + 1.0)));
    }

    #[test]
    fn test_spectral_radius_path() {
        // P_n: 2 cos(pi / (n + 1))
        let p5 = path_graph(5);
        let expected = 2.0 * (std::f64::consts::PI / 6.0).cos();
        assert!(approx_eq(p5.spectral_radius(), expected));
    }

    #[test]
    fn test_matching_odd_cycle_and_path() {
        let c5 = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)]).unwrap();
        assert_eq!(c5.matching_number(), 2);
        assert_eq!(path_graph(6).matching_number(), 3);
        assert_eq!(Graph::from_edges(3, &[]).unwrap().matching_number(), 0);
    }

    // =========================================================================
    // CONNECTIVITY
    // =========================================================================

    #[test]
    fn test_path_is_connected() {
        for n in 1..=10 {
            assert!(path_graph(n).is_connected(), "P{} should be connected", n);
        }
    }

    #[test]
    fn test_split_components_not_connected() {
        let split = Graph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        assert!(!split.is_connected());
        let edgeless = Graph::from_edges(2, &[]).unwrap();
        assert!(!edgeless.is_connected());
    }

    #[test]
    fn test_connectivity_boundaries() {
        assert!(!Graph::from_edges(0, &[]).unwrap().is_connected());
        assert!(Graph::from_edges(1, &[]).unwrap().is_connected());
    }

    // =========================================================================
    // STAR
    // =========================================================================

    #[test]
    fn test_star_recognised() {
        for k in 2..=10 {
            assert!(star_graph(k).is_star(), "K1,{} should be a star", k);
        }
    }

    #[test]
    fn test_star_with_leaf_edge_rejected() {
        let edges = vec![(0, 1), (0, 2), (0, 3), (1, 2)];
        let graph = Graph::from_edges(4, &edges).unwrap();
        assert!(!graph.is_star());
    }

    #[test]
    fn test_star_boundaries() {
        assert!(!Graph::from_edges(0, &[]).unwrap().is_star());
        assert!(!Graph::from_edges(1, &[]).unwrap().is_star());
        assert!(!Graph::from_edges(2, &[(0, 1)]).unwrap().is_star());
        assert!(!Graph::from_edges(3, &[]).unwrap().is_star());
        assert!(!path_graph(4).is_star());
        // P3 is K1,2
        assert!(path_graph(3).is_star());
    }
}
