//! CLI command definitions and handlers

mod encode;
mod render;
mod score;
mod tune;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use wagnergraph::config::Config;
use wagnergraph::tuning::{SaveBestParams, SpaceKind};
use wagnergraph::State;

/// Parse and validate a positive count
fn parse_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("count must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// wagnergraph - score and render graph states from Wagner-conjecture environments
#[derive(Parser, Debug)]
#[command(name = "wagnergraph")]
#[command(
    version,
    about = "Decode RL graph states, score them against Wagner's conjecture, and render them",
    after_help = "\
State files are JSON, either a LinEnv vector or a LocEnv mapping:
  [1, 0, 1, 0, 0, 0]
  {\"adjacency_matrix\": [[0, 1], [1, 0]], \"current_node\": 0}

Examples:
  wagnergraph score state.json                 Score one state
  wagnergraph score runs/*.json --format json  Score many states as JSON
  wagnergraph render state.json -o graph.svg   Draw a state
  wagnergraph tune sample --space zoo -n 5     Sample PPO hyperparameters
  wagnergraph tune report rewards.json         Record rewards, dump best params"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: ./wagnergraph.toml, then the user config dir)
    #[arg(long, global = true, env = "WAGNERGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print node/edge counts, Wagner score, connectivity and star shape
    Score {
        /// State files ('-' reads stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Draw a state as an SVG figure titled with its Wagner score
    Render {
        /// State file ('-' reads stdin)
        file: PathBuf,

        /// Output SVG path
        #[arg(long, short = 'o', default_value = "graph.svg")]
        output: PathBuf,

        /// Title line shown above the score
        #[arg(long)]
        title: Option<String>,

        /// Layout seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Canvas width in pixels (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels (overrides config)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Print the LinEnv vector of a state (edge flags, then a zero timestep block)
    Encode {
        /// State file ('-' reads stdin)
        file: PathBuf,
    },

    /// Hyperparameter search helpers
    Tune {
        #[command(subcommand)]
        action: TuneAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TuneAction {
    /// Print sampled PPO hyperparameter sets as JSON
    Sample {
        /// Search space: default, zoo (overrides config)
        #[arg(long, value_parser = ["default", "zoo"])]
        space: Option<String>,

        /// Number of parameter sets
        #[arg(long, short = 'n', default_value = "1", value_parser = parse_count)]
        count: usize,

        /// Sampler seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record objective values for the trials `sample` printed, dumping the
    /// best params every `save_freq` trials
    Report {
        /// JSON array of objective values in trial order ('-' reads stdin)
        values: PathBuf,

        /// Search space: default, zoo (overrides config)
        #[arg(long, value_parser = ["default", "zoo"])]
        space: Option<String>,

        /// Sampler seed used for `sample` (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Dump best params every this many trials (overrides config)
        #[arg(long, value_parser = parse_count)]
        save_freq: Option<usize>,

        /// Directory for best_params_after_<n>_trials.json (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Score { files, format } => score::run(&files, &format),
        Commands::Render {
            file,
            output,
            title,
            seed,
            width,
            height,
        } => {
            let mut options = config.render;
            if let Some(seed) = seed {
                options.seed = seed;
            }
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }
            render::run(&file, &output, title.as_deref(), &options)
        }
        Commands::Encode { file } => encode::run(&file),
        Commands::Tune { action } => match action {
            TuneAction::Sample { space, count, seed } => {
                let space = resolve_space(space.as_deref(), config.tuning.space)?;
                tune::sample(space, count, seed.unwrap_or(config.tuning.seed))
            }
            TuneAction::Report {
                values,
                space,
                seed,
                save_freq,
                output_dir,
            } => {
                let space = resolve_space(space.as_deref(), config.tuning.space)?;
                let checkpoint = SaveBestParams::new(
                    save_freq.unwrap_or(config.tuning.save_freq),
                    output_dir.unwrap_or(config.tuning.output_dir),
                )?;
                tune::report(&values, space, seed.unwrap_or(config.tuning.seed), checkpoint)
            }
        },
    }
}

fn resolve_space(name: Option<&str>, configured: SpaceKind) -> Result<SpaceKind> {
    match name {
        Some(name) => SpaceKind::parse(name).with_context(|| format!("Unknown search space '{}'", name)),
        None => Ok(configured),
    }
}

/// Read a file, or stdin for `-`.
pub(crate) fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Read a JSON state from a file, or stdin for `-`.
pub(crate) fn load_state(path: &Path) -> Result<State> {
    let content = read_input(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    State::try_from(value).with_context(|| format!("Unsupported state in {}", path.display()))
}
