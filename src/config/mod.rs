//! Configuration for wagnergraph
//!
//! Loaded from the first of:
//! - the path passed with `--config`
//! - `wagnergraph.toml` in the working directory
//! - `~/.config/wagnergraph/config.toml`
//!
//! falling back to defaults. `WAGNERGRAPH_SEED` overrides every seed.
//!
//! # Configuration Format
//!
//! ```toml
//! [render]
//! width = 640
//! height = 480
//! iterations = 50
//! seed = 42
//!
//! [tuning]
//! space = "zoo"        # or "default"
//! save_freq = 10
//! output_dir = "runs/"
//! seed = 7
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::render::RenderOptions;
use crate::tuning::SpaceKind;

/// File looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "wagnergraph.toml";
/// Environment variable overriding render and tuning seeds.
pub const SEED_ENV: &str = "WAGNERGRAPH_SEED";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub tuning: TuningConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TuningConfig {
    pub space: SpaceKind,
    /// Dump best params every this many trials
    pub save_freq: usize,
    pub output_dir: PathBuf,
    pub seed: u64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            space: SpaceKind::Default,
            save_freq: 10,
            output_dir: PathBuf::from("."),
            seed: 0,
        }
    }
}

impl Config {
    /// Load config, honouring an explicit path first.
    ///
    /// An explicit path that is missing or malformed is an error; a malformed
    /// discovered file is skipped with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::discover(),
        };
        config.apply_env(std::env::var(SEED_ENV).ok().as_deref())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// User-level config path, if the platform has a config directory.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wagnergraph").join("config.toml"))
    }

    fn discover() -> Self {
        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::user_config_path()];
        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config");
                    return config;
                }
                Err(e) => warn!(path = %path.display(), "ignoring config: {:#}", e),
            }
        }
        Self::default()
    }

    fn apply_env(&mut self, seed: Option<&str>) -> Result<()> {
        if let Some(raw) = seed {
            let seed: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be an unsigned integer, got '{}'", SEED_ENV, raw))?;
            self.render.seed = seed;
            self.tuning.seed = seed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.render, RenderOptions::default());
        assert_eq!(config.tuning.save_freq, 10);
        assert_eq!(config.tuning.space, SpaceKind::Default);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [render]
            width = 800

            [tuning]
            space = "zoo"
            "#,
        )
        .unwrap();
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, RenderOptions::default().height);
        assert_eq!(config.tuning.space, SpaceKind::Zoo);
        assert_eq!(config.tuning.save_freq, 10);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(Config::from_toml("[render]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[tuning]\nsave_freq = 25\noutput_dir = \"runs\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.tuning.save_freq, 25);
        assert_eq!(config.tuning.output_dir, PathBuf::from("runs"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_seed_override() {
        let mut config = Config::default();
        config.apply_env(Some(" 99 ")).unwrap();
        assert_eq!(config.render.seed, 99);
        assert_eq!(config.tuning.seed, 99);
        assert!(config.apply_env(Some("abc")).is_err());
        config.apply_env(None).unwrap();
        assert_eq!(config.render.seed, 99);
    }
}
