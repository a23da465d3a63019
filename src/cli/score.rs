//! Score command - decode states and report scores and predicates

use anyhow::{Context, Result};
use console::style;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use wagnergraph::{Graph, GraphError};

/// One line of `score` output.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
    /// None when the score is undefined (empty graph)
    pub wagner_score: Option<f64>,
    pub connected: bool,
    pub star: bool,
}

fn score_file(path: &Path) -> Result<ScoreReport> {
    let state = super::load_state(path)?;
    let graph = Graph::build(state).with_context(|| format!("Failed to decode {}", path.display()))?;
    let wagner_score = match graph.wagner_score() {
        Ok(score) => Some(score),
        Err(GraphError::DomainError(_)) => None,
        Err(e) => return Err(e).with_context(|| format!("Failed to score {}", path.display())),
    };
    Ok(ScoreReport {
        path: path.to_path_buf(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        wagner_score,
        connected: graph.is_connected(),
        star: graph.is_star(),
    })
}

pub fn run(files: &[PathBuf], format: &str) -> Result<()> {
    // Decoding errors are fatal for the whole batch
    let reports: Vec<ScoreReport> = files
        .par_iter()
        .map(|path| score_file(path))
        .collect::<Result<_>>()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        let score = match report.wagner_score {
            Some(s) if s > 0.0 && report.connected => style(format!("{:.6}", s)).green().bold(),
            Some(s) => style(format!("{:.6}", s)).cyan(),
            None => style("undefined".to_string()).dim(),
        };
        println!("{}", style(report.path.display()).bold());
        println!("  nodes:     {}", report.node_count);
        println!("  edges:     {}", report.edge_count);
        println!("  wagner1:   {}", score);
        println!("  connected: {}", report.connected);
        println!("  star:      {}", report.star);
        if report.connected && report.wagner_score.is_some_and(|s| s > 0.0) {
            println!("  {}", style("counterexample to the Wagner bound").green());
        }
    }
    Ok(())
}
