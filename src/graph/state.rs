//! Environment state shapes accepted by [`Graph::build`](super::Graph::build).
//!
//! The JSON boundary does exactly one shape check per case:
//!
//! ```text
//! [0, 1, 1, 0, 0, 0]                               -> State::LinEnv
//! {"adjacency_matrix": [[..]], "current_node": 2}  -> State::LocEnv
//! anything else                                    -> InvalidInputKind
//! ```

use petgraph::graph::UnGraph;
use serde_json::Value;

use crate::errors::GraphError;

/// Key holding the square 0/1 matrix in a LocEnv state.
pub const ADJACENCY_MATRIX_KEY: &str = "adjacency_matrix";
/// Key holding the environment cursor in a LocEnv state. Never read by the decoder.
pub const CURRENT_NODE_KEY: &str = "current_node";

/// One of the three accepted inputs.
#[derive(Debug, Clone)]
pub enum State {
    /// Already a graph; adopted unchanged.
    Graph(UnGraph<(), ()>),
    /// Flat vector of length `2·E`: `E` edge flags in lexicographic pair
    /// order followed by `E` timestep entries.
    LinEnv(Vec<f64>),
    /// Adjacency matrix plus the environment's current node.
    LocEnv {
        adjacency_matrix: Vec<Vec<f64>>,
        current_node: Value,
    },
}

impl State {
    /// Short name used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            State::Graph(_) => "graph",
            State::LinEnv(_) => "linenv",
            State::LocEnv { .. } => "locenv",
        }
    }
}

impl From<UnGraph<(), ()>> for State {
    fn from(graph: UnGraph<(), ()>) -> Self {
        State::Graph(graph)
    }
}

impl From<Vec<f64>> for State {
    fn from(values: Vec<f64>) -> Self {
        State::LinEnv(values)
    }
}

impl TryFrom<Value> for State {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Ok(State::LinEnv(numeric_row(&items, "state vector")?)),
            Value::Object(mut map) => {
                if !map.contains_key(ADJACENCY_MATRIX_KEY) || !map.contains_key(CURRENT_NODE_KEY) {
                    return Err(GraphError::InvalidInputKind(format!(
                        "mapping must contain both '{}' and '{}'",
                        ADJACENCY_MATRIX_KEY, CURRENT_NODE_KEY
                    )));
                }
                let current_node = map.remove(CURRENT_NODE_KEY).unwrap_or(Value::Null);
                let matrix = match map.remove(ADJACENCY_MATRIX_KEY) {
                    Some(Value::Array(rows)) => rows,
                    _ => {
                        return Err(GraphError::InvalidInputKind(format!(
                            "'{}' must be an array of rows",
                            ADJACENCY_MATRIX_KEY
                        )))
                    }
                };
                let adjacency_matrix = square_matrix(&matrix)?;
                Ok(State::LocEnv {
                    adjacency_matrix,
                    current_node,
                })
            }
            other => Err(GraphError::InvalidInputKind(format!(
                "expected a numeric array or a state mapping, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn numeric_row(items: &[Value], what: &str) -> Result<Vec<f64>, GraphError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64().ok_or_else(|| {
                GraphError::InvalidInputKind(format!(
                    "{} must be one-dimensional and numeric, element {} is {}",
                    what,
                    i,
                    json_kind(item)
                ))
            })
        })
        .collect()
}

fn square_matrix(rows: &[Value]) -> Result<Vec<Vec<f64>>, GraphError> {
    let n = rows.len();
    let mut matrix = Vec::with_capacity(n);
    for (i, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| {
            GraphError::InvalidInputKind(format!("adjacency row {} is {}, expected an array", i, json_kind(row)))
        })?;
        if cells.len() != n {
            return Err(GraphError::InvalidInputKind(format!(
                "adjacency matrix is not square: row {} has {} entries, expected {}",
                i,
                cells.len(),
                n
            )));
        }
        matrix.push(numeric_row(cells, "adjacency row")?);
    }
    Ok(matrix)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
