//! Periodic best-parameter dumps.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::study::{CompletedTrial, Study, StudyCallback};
use crate::errors::TuningError;

/// File name for the dump written after `trial_number`.
pub fn checkpoint_file_name(trial_number: usize) -> String {
    format!("best_params_after_{}_trials.json", trial_number)
}

/// Writes the best parameters found so far every `save_freq` trials.
///
/// Fires when `trial.number % save_freq == 0`, so the first trial (number 0)
/// always produces a dump.
#[derive(Debug, Clone)]
pub struct SaveBestParams {
    save_freq: usize,
    output_dir: PathBuf,
}

impl SaveBestParams {
    /// # Errors
    /// - `InvalidParameter` if `save_freq` is 0
    pub fn new(save_freq: usize, output_dir: impl Into<PathBuf>) -> Result<Self, TuningError> {
        if save_freq == 0 {
            return Err(TuningError::InvalidParameter(
                "save_freq must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            save_freq,
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the dump for `trial_number` is written to.
    pub fn path_for(&self, trial_number: usize) -> PathBuf {
        self.output_dir.join(checkpoint_file_name(trial_number))
    }
}

impl StudyCallback for SaveBestParams {
    fn after_trial(&mut self, study: &Study, trial: &CompletedTrial) -> Result<(), TuningError> {
        if trial.number % self.save_freq != 0 {
            return Ok(());
        }
        let best = study.best_params()?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(trial.number);
        fs::write(&path, serde_json::to_string(best)?)?;
        info!(path = %path.display(), trial = trial.number, "saved best params");
        Ok(())
    }
}
