//! Tune command - sample hyperparameter sets and record their rewards

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use wagnergraph::tuning::{SaveBestParams, SpaceKind, Study};

pub fn sample(space: SpaceKind, count: usize, seed: u64) -> Result<()> {
    let mut study = Study::new(space.build(), seed);
    let trials = (0..count).map(|_| study.ask()).collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&trials)?);
    Ok(())
}

/// Replay the trials `sample` would print for the same space and seed,
/// telling each one its reported value in order.
pub fn report(values: &Path, space: SpaceKind, seed: u64, checkpoint: SaveBestParams) -> Result<()> {
    let content = super::read_input(values)?;
    let values: Vec<f64> = serde_json::from_str(&content)
        .with_context(|| format!("{} must be a JSON array of numbers", values.display()))?;
    if values.is_empty() {
        anyhow::bail!("No objective values to record");
    }

    let output_dir = checkpoint.output_dir().to_path_buf();
    let mut study = Study::new(space.build(), seed);
    study.add_callback(checkpoint);
    for value in values {
        let trial = study.ask()?;
        let number = trial.number;
        study
            .tell(trial, value)
            .with_context(|| format!("Failed to record trial {}", number))?;
    }
    info!(trials = study.trials().len(), dir = %output_dir.display(), "recorded trials");

    println!("{}", serde_json::to_string_pretty(study.best_trial()?)?);
    Ok(())
}
