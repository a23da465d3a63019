//! wagnergraph - graph states for Wagner-conjecture RL environments
//!
//! Decodes environment states (LinEnv edge bit vectors, LocEnv adjacency
//! mappings, or ready-made graphs) into immutable [`Graph`]s, scores them
//! against Wagner's conjecture, checks simple structure (connectivity, star
//! shape) and renders them as SVG.
//!
//! ```
//! use wagnergraph::Graph;
//!
//! // K4: all six lexicographic edge flags set, plus the timestep block
//! let mut state = vec![1.0; 6];
//! state.extend([0.0; 6]);
//! let graph = Graph::from_linenv(&state)?;
//! assert_eq!(graph.node_count(), 4);
//! assert!((graph.wagner_score()? - (1.0 + 3f64.sqrt() - 5.0)).abs() < 1e-6);
//! # Ok::<(), wagnergraph::GraphError>(())
//! ```

pub mod config;
pub mod errors;
pub mod graph;
pub mod render;
pub mod tuning;

pub use errors::{GraphError, TuningError};
pub use graph::{Graph, State};
pub use render::{RenderOptions, SvgCanvas};
