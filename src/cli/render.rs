//! Render command - draw a state to an SVG file

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use wagnergraph::{Graph, RenderOptions};

pub fn run(file: &Path, output: &Path, title: Option<&str>, options: &RenderOptions) -> Result<()> {
    let state = super::load_state(file)?;
    let graph = Graph::build(state).with_context(|| format!("Failed to decode {}", file.display()))?;
    let canvas = graph
        .render(title, options)
        .with_context(|| format!("Cannot render {}", file.display()))?;
    canvas
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("{} {}", style("Wrote").green(), output.display());
    Ok(())
}
