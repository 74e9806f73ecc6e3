//! Configuration for the `sweep` binary.
//!
//! Values are layered: built-in defaults, then an optional JSON config file,
//! then environment variables, then command-line flags. The seed follows the
//! same order: `--seed`, then the seed variable in the driver's environment,
//! then the file's `seed`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use sweep_core::contract::default_seed_env_var;
use sweep_core::seed::parse_seed;
use sweep_core::{Dimension, NamingScheme, SweepRequest};
use thiserror::Error;

use crate::adapters::StderrMode;

pub const DEFAULT_REPETITIONS: usize = 10;
pub const DEFAULT_CATEGORIES: &[&str] = &["correct"];
pub const DEFAULT_MODES: &[&str] = &["undef", "def"];
pub const DEFAULT_FLAGS: &[&str] = &["jump", "pop"];
pub const DEFAULT_EXECUTABLE: &str = "./test";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid --dimension '{0}': expected NAME=VALUE[,VALUE...]")]
    InvalidDimension(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    TimestampOnly,
    WithRepetition,
}

impl From<NamingArg> for NamingScheme {
    fn from(value: NamingArg) -> Self {
        match value {
            NamingArg::TimestampOnly => Self::TimestampOnly,
            NamingArg::WithRepetition => Self::WithRepetition,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sweep",
    about = "Run a test executable across a parameter cross-product",
    long_about = "Invokes the test executable once per (repetition, category, mode, flag)\n\
                  combination and stores each run's stdout in its own artifact file."
)]
pub struct SweepArgs {
    /// JSON config file; flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of passes over the cross-product
    #[arg(long, env = "SWEEP_REPETITIONS")]
    pub repetitions: Option<usize>,

    /// Test categories (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Receiver modes (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub modes: Option<Vec<String>>,

    /// Flags (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub flags: Option<Vec<String>>,

    /// Extra trailing dimension, repeatable
    #[arg(long = "dimension", value_name = "NAME=V1,V2")]
    pub dimensions: Vec<String>,

    /// Test executable to invoke
    #[arg(long, env = "SWEEP_EXECUTABLE")]
    pub executable: Option<PathBuf>,

    /// Directory receiving one artifact per run
    #[arg(long, env = "SWEEP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Pin the sweep seed instead of drawing a fresh one
    #[arg(long)]
    pub seed: Option<u64>,

    /// Environment variable carrying the seed to each run
    #[arg(long)]
    pub seed_env_var: Option<String>,

    /// Artifact naming scheme
    #[arg(value_enum, long)]
    pub naming: Option<NamingArg>,

    /// Where child stderr goes
    #[arg(value_enum, long)]
    pub stderr: Option<StderrMode>,

    /// Write a run manifest (.csv for CSV, anything else for JSON)
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Draw a progress bar on stderr
    #[arg(long)]
    pub progress: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Shape of the JSON config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub repetitions: Option<usize>,
    pub categories: Option<Vec<String>>,
    pub modes: Option<Vec<String>>,
    pub flags: Option<Vec<String>>,
    #[serde(default)]
    pub extra_dimensions: Vec<Dimension>,
    pub executable: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub seed_env_var: Option<String>,
    pub naming: Option<NamingScheme>,
    pub stderr: Option<StderrMode>,
    pub manifest: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub request: SweepRequest,
    pub executable: PathBuf,
    pub output_dir: PathBuf,
    pub stderr: StderrMode,
    pub manifest: Option<PathBuf>,
    pub show_progress: bool,
}

impl SweepArgs {
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.resolve_with(file, |var| std::env::var(var).ok())
    }

    /// `env` looks up a variable in the driver's environment.
    pub fn resolve_with(
        self,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let mut dimensions = vec![
            Dimension::new(
                "category",
                self.categories
                    .or(file.categories)
                    .unwrap_or_else(|| owned(DEFAULT_CATEGORIES)),
            ),
            Dimension::new(
                "mode",
                self.modes
                    .or(file.modes)
                    .unwrap_or_else(|| owned(DEFAULT_MODES)),
            ),
            Dimension::new(
                "flag",
                self.flags
                    .or(file.flags)
                    .unwrap_or_else(|| owned(DEFAULT_FLAGS)),
            ),
        ];
        dimensions.extend(file.extra_dimensions);
        for raw in &self.dimensions {
            dimensions.push(parse_dimension(raw)?);
        }

        let seed_env_var = self
            .seed_env_var
            .or(file.seed_env_var)
            .unwrap_or_else(default_seed_env_var);
        let env_seed = env(seed_env_var.trim()).and_then(|raw| parse_seed(&raw));

        let request = SweepRequest {
            repetitions: self
                .repetitions
                .or(file.repetitions)
                .unwrap_or(DEFAULT_REPETITIONS),
            dimensions,
            seed: self.seed.or(env_seed).or(file.seed),
            seed_env_var,
            naming: self
                .naming
                .map(NamingScheme::from)
                .or(file.naming)
                .unwrap_or_default(),
        };

        Ok(ResolvedConfig {
            request,
            executable: self
                .executable
                .or(file.executable)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
            output_dir: self
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            stderr: self.stderr.or(file.stderr).unwrap_or_default(),
            manifest: self.manifest.or(file.manifest),
            show_progress: self.progress,
        })
    }
}

/// Parses `NAME=V1,V2,...`.
pub fn parse_dimension(raw: &str) -> Result<Dimension, ConfigError> {
    let Some((name, values)) = raw.split_once('=') else {
        return Err(ConfigError::InvalidDimension(raw.to_string()));
    };
    let name = name.trim();
    if name.is_empty() || values.is_empty() {
        return Err(ConfigError::InvalidDimension(raw.to_string()));
    }
    Ok(Dimension::new(name, values.split(',')))
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
