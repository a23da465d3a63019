//! Hyperparameter search helpers for PPO agents trained on graph environments
//!
//! Training and evaluation live outside this crate. This module supplies the
//! pieces that do not depend on any ML library:
//!
//! - [`SearchSpace`] presets matching the two PPO samplers used in practice
//! - an ask/tell [`Study`] that records objective values and the best trial
//! - [`SaveBestParams`], which writes `best_params_after_<n>_trials.json`
//!   every `save_freq` trials

mod checkpoint;
mod space;
mod study;

pub use checkpoint::{checkpoint_file_name, SaveBestParams};
pub use space::{Distribution, ParamSet, ParamValue, SearchSpace, SpaceKind};
pub use study::{CompletedTrial, Study, StudyCallback, Trial};
