//! Search spaces for PPO hyperparameters.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{TuningError, TuningResult};

/// A single sampled hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{}", v),
        }
    }
}

/// Parameter name to sampled value, ordered by name for stable JSON output.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// How one hyperparameter is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Categorical(Vec<ParamValue>),
    /// Uniform on `[low, high]`, or log-uniform when `log` is set.
    Float { low: f64, high: f64, log: bool },
    /// Uniform on `{low, low + step, ..}` up to `high`.
    Int { low: i64, high: i64, step: i64 },
}

impl Distribution {
    pub fn float(low: f64, high: f64) -> Self {
        Distribution::Float { low, high, log: false }
    }

    pub fn log_float(low: f64, high: f64) -> Self {
        Distribution::Float { low, high, log: true }
    }

    pub fn int(low: i64, high: i64) -> Self {
        Distribution::Int { low, high, step: 1 }
    }

    pub fn ints(values: &[i64]) -> Self {
        Distribution::Categorical(values.iter().copied().map(ParamValue::Int).collect())
    }

    pub fn floats(values: &[f64]) -> Self {
        Distribution::Categorical(values.iter().copied().map(ParamValue::Float).collect())
    }

    pub fn strs(values: &[&str]) -> Self {
        Distribution::Categorical(values.iter().map(|s| ParamValue::Str(s.to_string())).collect())
    }

    /// Reject bounds that cannot be sampled.
    pub fn validate(&self) -> TuningResult<()> {
        match self {
            Distribution::Categorical(choices) if choices.is_empty() => Err(
                TuningError::InvalidParameter("categorical distribution has no choices".to_string()),
            ),
            Distribution::Float { low, high, .. } if !(high - low).is_finite() || low > high => {
                Err(TuningError::InvalidParameter(format!(
                    "float bounds must be finite with a finite span and low <= high, got [{}, {}]",
                    low, high
                )))
            }
            Distribution::Float { low, log: true, .. } if *low <= 0.0 => Err(TuningError::InvalidParameter(
                format!("log-uniform lower bound must be positive, got {}", low),
            )),
            Distribution::Int { step, .. } if *step <= 0 => Err(TuningError::InvalidParameter(format!(
                "int step must be positive, got {}",
                step
            ))),
            Distribution::Int { low, high, .. } if low > high => Err(TuningError::InvalidParameter(format!(
                "int bounds must have low <= high, got [{}, {}]",
                low, high
            ))),
            _ => Ok(()),
        }
    }

    /// Draw one value.
    ///
    /// # Errors
    /// - `InvalidParameter` if the distribution fails [`validate`](Self::validate)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TuningResult<ParamValue> {
        self.validate()?;
        let value = match self {
            Distribution::Categorical(choices) => choices
                .choose(rng)
                .cloned()
                .ok_or_else(|| {
                    TuningError::InvalidParameter("categorical distribution has no choices".to_string())
                })?,
            Distribution::Float { low, high, log: false } => ParamValue::Float(if low == high {
                *low
            } else {
                rng.random_range(*low..=*high)
            }),
            Distribution::Float { low, high, log: true } => {
                let (ln_low, ln_high) = (low.ln(), high.ln());
                let exponent = if ln_low == ln_high {
                    ln_low
                } else {
                    rng.random_range(ln_low..=ln_high)
                };
                ParamValue::Float(exponent.exp().clamp(*low, *high))
            }
            Distribution::Int { low, high, step } => {
                // Spans wider than i64 (e.g. i64::MIN..=i64::MAX) are computed in i128
                let (low, step) = (i128::from(*low), i128::from(*step));
                let slots = (i128::from(*high) - low) / step;
                let offset = step * rng.random_range(0..=slots);
                let value = i64::try_from(low + offset).map_err(|_| {
                    TuningError::InvalidParameter(format!("int sample {} out of range", low + offset))
                })?;
                ParamValue::Int(value)
            }
        };
        Ok(value)
    }
}

/// Named distributions in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SearchSpace {
    params: Vec<(String, Distribution)>,
    clamp_batch_to_steps: bool,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    ///
    /// # Errors
    /// - `InvalidParameter` for unsampleable bounds or a duplicate name
    pub fn with(mut self, name: &str, distribution: Distribution) -> TuningResult<Self> {
        distribution.validate()?;
        if self.params.iter().any(|(n, _)| n == name) {
            return Err(TuningError::InvalidParameter(format!("duplicate parameter '{}'", name)));
        }
        self.params.push((name.to_string(), distribution));
        Ok(self)
    }

    /// After sampling, lower `batch_size` to `n_steps` when it is larger.
    pub fn clamp_batch_to_steps(mut self) -> Self {
        self.clamp_batch_to_steps = true;
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Draw one value per parameter.
    ///
    /// # Errors
    /// - `InvalidParameter` if any distribution cannot be sampled
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TuningResult<ParamSet> {
        let mut params: ParamSet = self
            .params
            .iter()
            .map(|(name, dist)| Ok((name.clone(), dist.sample(rng)?)))
            .collect::<TuningResult<_>>()?;

        if self.clamp_batch_to_steps {
            let batch = params.get("batch_size").and_then(ParamValue::as_i64);
            let steps = params.get("n_steps").and_then(ParamValue::as_i64);
            if let (Some(batch), Some(steps)) = (batch, steps) {
                if batch > steps {
                    params.insert("batch_size".to_string(), ParamValue::Int(steps));
                }
            }
        }
        Ok(params)
    }

    /// PPO space with mostly continuous ranges.
    pub fn ppo_default() -> Self {
        Self::from_static(
            vec![
                ("learning_rate", Distribution::float(5e-6, 0.003)),
                ("n_steps", Distribution::Int { low: 32, high: 5000, step: 16 }),
                (
                    "batch_size",
                    Distribution::ints(&[4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096]),
                ),
                ("n_epochs", Distribution::int(3, 30)),
                ("gamma", Distribution::float(0.8, 0.9997)),
                ("gae_lambda", Distribution::float(0.9, 1.0)),
                ("clip_range", Distribution::floats(&[0.1, 0.2, 0.3])),
                (
                    "normalize_advantage",
                    Distribution::Categorical(vec![ParamValue::Bool(true), ParamValue::Bool(false)]),
                ),
                ("ent_coef", Distribution::float(0.0, 0.01)),
                (
                    "vf_coef",
                    Distribution::Categorical(vec![ParamValue::Float(0.5), ParamValue::Int(1)]),
                ),
                ("max_grad_norm", Distribution::float(0.35, 0.7)),
                ("target_kl", Distribution::float(0.003, 0.03)),
            ],
            false,
        )
    }

    /// PPO space following the rl-baselines3-zoo sampler.
    pub fn ppo_zoo() -> Self {
        Self::from_static(
            vec![
                ("batch_size", Distribution::ints(&[8, 16, 32, 64, 128, 256, 512])),
                (
                    "n_steps",
                    Distribution::ints(&[8, 16, 32, 64, 128, 256, 512, 1024, 2048]),
                ),
                (
                    "gamma",
                    Distribution::floats(&[0.9, 0.95, 0.98, 0.99, 0.995, 0.999, 0.9999]),
                ),
                ("learning_rate", Distribution::log_float(1e-5, 1.0)),
                ("lr_schedule", Distribution::strs(&["linear", "constant"])),
                ("ent_coef", Distribution::log_float(1e-8, 0.1)),
                ("clip_range", Distribution::floats(&[0.1, 0.2, 0.3, 0.4])),
                ("n_epochs", Distribution::ints(&[1, 5, 10, 20])),
                (
                    "gae_lambda",
                    Distribution::floats(&[0.8, 0.9, 0.92, 0.95, 0.98, 0.99, 1.0]),
                ),
                (
                    "max_grad_norm",
                    Distribution::Categorical(
                        [0.3, 0.5, 0.6, 0.7, 0.8, 0.9]
                            .into_iter()
                            .map(ParamValue::Float)
                            .chain([1, 2, 5].into_iter().map(ParamValue::Int))
                            .collect(),
                    ),
                ),
                ("vf_coef", Distribution::float(0.0, 1.0)),
                ("net_arch", Distribution::strs(&["small", "medium"])),
                ("activation_fn", Distribution::strs(&["tanh", "relu"])),
            ],
            true,
        )
    }

    // Preset tables are checked by test_presets_are_valid.
    fn from_static(params: Vec<(&str, Distribution)>, clamp_batch_to_steps: bool) -> Self {
        Self {
            params: params
                .into_iter()
                .map(|(name, dist)| (name.to_string(), dist))
                .collect(),
            clamp_batch_to_steps,
        }
    }
}

/// Named presets selectable from config and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceKind {
    #[default]
    Default,
    Zoo,
}

impl SpaceKind {
    pub fn build(self) -> SearchSpace {
        match self {
            SpaceKind::Default => SearchSpace::ppo_default(),
            SpaceKind::Zoo => SearchSpace::ppo_zoo(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(SpaceKind::Default),
            "zoo" => Some(SpaceKind::Zoo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_presets_are_valid() {
        for space in [SearchSpace::ppo_default(), SearchSpace::ppo_zoo()] {
            for (name, dist) in &space.params {
                assert!(dist.validate().is_ok(), "{} has invalid bounds", name);
            }
        }
        assert_eq!(SearchSpace::ppo_default().len(), 12);
        assert_eq!(SearchSpace::ppo_zoo().len(), 13);
    }

    #[test]
    fn test_default_space_ranges() {
        let space = SearchSpace::ppo_default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let p = space.sample(&mut rng).unwrap();
            let lr = p["learning_rate"].as_f64().unwrap();
            assert!((5e-6..=0.003).contains(&lr));
            let n_steps = p["n_steps"].as_i64().unwrap();
            assert!((32..=5000).contains(&n_steps));
            assert_eq!((n_steps - 32) % 16, 0);
            let n_epochs = p["n_epochs"].as_i64().unwrap();
            assert!((3..=30).contains(&n_epochs));
            assert!(matches!(p["normalize_advantage"], ParamValue::Bool(_)));
        }
    }

    #[test]
    fn test_zoo_space_clamps_batch() {
        let space = SearchSpace::ppo_zoo();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let p = space.sample(&mut rng).unwrap();
            let batch = p["batch_size"].as_i64().unwrap();
            let steps = p["n_steps"].as_i64().unwrap();
            assert!(batch <= steps);
            let lr = p["learning_rate"].as_f64().unwrap();
            assert!((1e-5..=1.0).contains(&lr));
            let ent = p["ent_coef"].as_f64().unwrap();
            assert!((1e-8..=0.1).contains(&ent));
        }
    }

    #[test]
    fn test_sampling_is_seeded() {
        let space = SearchSpace::ppo_zoo();
        let a = space.sample(&mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = space.sample(&mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_distributions() {
        assert!(Distribution::Categorical(vec![]).validate().is_err());
        assert!(Distribution::float(1.0, 0.0).validate().is_err());
        assert!(Distribution::log_float(0.0, 1.0).validate().is_err());
        assert!(Distribution::Int { low: 0, high: 10, step: 0 }.validate().is_err());
        assert!(Distribution::int(5, 1).validate().is_err());
        assert!(Distribution::float(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_full_width_int_range_samples() {
        let dist = Distribution::Int { low: i64::MIN, high: i64::MAX, step: 1 };
        assert!(dist.validate().is_ok());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            assert!(matches!(dist.sample(&mut rng), Ok(ParamValue::Int(_))));
        }

        let stepped = Distribution::Int { low: i64::MIN, high: i64::MAX, step: i64::MAX };
        for _ in 0..100 {
            let v = stepped.sample(&mut rng).unwrap().as_i64().unwrap();
            assert!([i64::MIN, -1, i64::MAX - 1].contains(&v), "unexpected {}", v);
        }
    }

    #[test]
    fn test_unsampleable_distributions_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            Distribution::Categorical(vec![]).sample(&mut rng),
            Err(TuningError::InvalidParameter(_))
        ));
        assert!(Distribution::float(-f64::MAX, f64::MAX).validate().is_err());
        assert!(Distribution::float(-f64::MAX, f64::MAX).sample(&mut rng).is_err());
    }

    #[test]
    fn test_integer_choices_serialize_as_integers() {
        let zoo = SearchSpace::ppo_zoo();
        let (_, max_grad_norm) = zoo.params.iter().find(|(n, _)| n == "max_grad_norm").unwrap();
        let Distribution::Categorical(choices) = max_grad_norm else {
            panic!("max_grad_norm should be categorical");
        };
        let json = serde_json::to_string(choices).unwrap();
        assert_eq!(json, "[0.3,0.5,0.6,0.7,0.8,0.9,1,2,5]");

        let default = SearchSpace::ppo_default();
        let (_, vf_coef) = default.params.iter().find(|(n, _)| n == "vf_coef").unwrap();
        assert_eq!(
            *vf_coef,
            Distribution::Categorical(vec![ParamValue::Float(0.5), ParamValue::Int(1)])
        );
    }

    #[test]
    fn test_sampled_sets_reload_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for space in [SearchSpace::ppo_default(), SearchSpace::ppo_zoo()] {
            for _ in 0..500 {
                let params = space.sample(&mut rng).unwrap();
                let json = serde_json::to_string(&params).unwrap();
                let reloaded: ParamSet = serde_json::from_str(&json).unwrap();
                assert_eq!(reloaded, params, "{}", json);
            }
        }
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let space = SearchSpace::new().with("gamma", Distribution::float(0.9, 0.99)).unwrap();
        assert!(space.with("gamma", Distribution::float(0.9, 0.99)).is_err());
    }

    #[test]
    fn test_param_value_json() {
        let mut params = ParamSet::new();
        params.insert("batch_size".into(), ParamValue::Int(64));
        params.insert("gamma".into(), ParamValue::Float(0.99));
        params.insert("lr_schedule".into(), ParamValue::Str("linear".into()));
        params.insert("normalize_advantage".into(), ParamValue::Bool(true));
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"batch_size":64,"gamma":0.99,"lr_schedule":"linear","normalize_advantage":true}"#
        );
    }

    #[test]
    fn test_space_kind_parse() {
        assert_eq!(SpaceKind::parse("ZOO"), Some(SpaceKind::Zoo));
        assert_eq!(SpaceKind::parse("default"), Some(SpaceKind::Default));
        assert_eq!(SpaceKind::parse("grid"), None);
    }
}
