//! Encode command - print the LinEnv vector of any state

use anyhow::{Context, Result};
use std::path::Path;

use wagnergraph::Graph;

pub fn run(file: &Path) -> Result<()> {
    let state = super::load_state(file)?;
    let graph = Graph::build(state).with_context(|| format!("Failed to decode {}", file.display()))?;
    let vector: Vec<u8> = graph.to_linenv_state().into_iter().map(|v| v as u8).collect();
    println!("{}", serde_json::to_string(&vector)?);
    Ok(())
}
