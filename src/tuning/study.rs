//! Ask/tell study record.
//!
//! The study samples parameter sets and remembers reported objective values;
//! it never trains or evaluates anything itself. Callers run the loop:
//!
//! ```no_run
//! # use wagnergraph::tuning::{SearchSpace, Study};
//! # fn train_and_evaluate(_: &wagnergraph::tuning::ParamSet) -> f64 { 0.0 }
//! let mut study = Study::new(SearchSpace::ppo_default(), 42);
//! for _ in 0..100 {
//!     let trial = study.ask()?;
//!     let reward = train_and_evaluate(&trial.params);
//!     study.tell(trial, reward)?;
//! }
//! println!("{:?}", study.best_params()?);
//! # Ok::<(), wagnergraph::errors::TuningError>(())
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::space::{ParamSet, SearchSpace};
use crate::errors::{TuningError, TuningResult};

/// A sampled, not yet evaluated, parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Zero-based, in ask order
    pub number: usize,
    pub params: ParamSet,
}

/// A trial with its reported objective value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTrial {
    pub number: usize,
    pub params: ParamSet,
    pub value: f64,
}

/// Hook run after every completed trial.
pub trait StudyCallback {
    fn after_trial(&mut self, study: &Study, trial: &CompletedTrial) -> Result<(), TuningError>;
}

/// Maximising ask/tell study over a fixed search space.
pub struct Study {
    space: SearchSpace,
    rng: ChaCha8Rng,
    next_number: usize,
    completed: Vec<CompletedTrial>,
    best: Option<usize>,
    callbacks: Vec<Box<dyn StudyCallback>>,
}

impl Study {
    pub fn new(space: SearchSpace, seed: u64) -> Self {
        Self {
            space,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_number: 0,
            completed: Vec::new(),
            best: None,
            callbacks: Vec::new(),
        }
    }

    pub fn add_callback(&mut self, callback: impl StudyCallback + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Sample the next trial.
    ///
    /// # Errors
    /// - `InvalidParameter` if the search space cannot be sampled
    pub fn ask(&mut self) -> TuningResult<Trial> {
        let params = self.space.sample(&mut self.rng)?;
        let number = self.next_number;
        self.next_number += 1;
        debug!(trial = number, "sampled trial");
        Ok(Trial { number, params })
    }

    /// Record the objective value of a trial and run callbacks.
    ///
    /// # Errors
    /// - `InvalidParameter` if `value` is NaN or infinite
    /// - any error returned by a callback; the trial stays recorded
    pub fn tell(&mut self, trial: Trial, value: f64) -> TuningResult<()> {
        if !value.is_finite() {
            return Err(TuningError::InvalidParameter(format!(
                "trial {} reported a non-finite value {}",
                trial.number, value
            )));
        }

        let completed = CompletedTrial {
            number: trial.number,
            params: trial.params,
            value,
        };
        self.completed.push(completed);
        let index = self.completed.len() - 1;

        let improved = match self.best {
            Some(best) => value > self.completed[best].value,
            None => true,
        };
        if improved {
            self.best = Some(index);
            info!(trial = trial.number, value, "new best trial");
        }

        // Callbacks need &Study while being borrowed mutably themselves
        let mut callbacks = std::mem::take(&mut self.callbacks);
        let study: &Study = self;
        let last = &study.completed[index];
        let result = callbacks
            .iter_mut()
            .try_for_each(|cb| cb.after_trial(study, last));
        self.callbacks = callbacks;
        result
    }

    pub fn trials(&self) -> &[CompletedTrial] {
        &self.completed
    }

    pub fn best_trial(&self) -> TuningResult<&CompletedTrial> {
        self.best
            .map(|i| &self.completed[i])
            .ok_or(TuningError::NoCompletedTrials)
    }

    pub fn best_params(&self) -> TuningResult<&ParamSet> {
        Ok(&self.best_trial()?.params)
    }

    pub fn best_value(&self) -> TuningResult<f64> {
        Ok(self.best_trial()?.value)
    }
}
