use std::path::PathBuf;

use sweep_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that stop a sweep. Individual run failures never surface here;
/// they are recorded in the [`crate::SweepSummary`] instead.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("invalid sweep request: {0}")]
    InvalidRequest(#[from] ValidationError),

    #[error("cannot create output directory '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl DriverError {
    /// Process exit code used by the `sweep` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::OutputDirectory { .. } | Self::Manifest { .. } => 1,
            Self::InvalidRequest(_) | Self::Config(_) => 2,
        }
    }
}
