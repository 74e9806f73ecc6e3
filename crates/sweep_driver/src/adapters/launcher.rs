use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the child's standard error goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StderrMode {
    /// Pass through to the driver's own stderr.
    #[default]
    Inherit,
    /// Interleave into the artifact alongside stdout.
    Artifact,
    Discard,
}

/// One invocation of the test executable.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub executable: &'a Path,
    pub args: Vec<&'a str>,
    pub seed_env_var: &'a str,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    Success,
    /// `code` is `None` when the child was terminated by a signal.
    Failure { code: Option<i32> },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to launch '{}': {source}", executable.display())]
    Spawn {
        executable: std::path::PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to attach artifact to child stderr: {0}")]
    Capture(#[source] io::Error),
}

pub trait RunLauncher {
    /// Runs the invocation to completion with its stdout bound to `stdout`.
    fn launch(&self, invocation: &Invocation<'_>, stdout: File) -> Result<RunExit, LaunchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher {
    stderr: StderrMode,
}

impl ProcessLauncher {
    pub fn new(stderr: StderrMode) -> Self {
        Self { stderr }
    }
}

impl RunLauncher for ProcessLauncher {
    fn launch(&self, invocation: &Invocation<'_>, stdout: File) -> Result<RunExit, LaunchError> {
        let stderr = match self.stderr {
            StderrMode::Inherit => Stdio::inherit(),
            StderrMode::Artifact => Stdio::from(stdout.try_clone().map_err(LaunchError::Capture)?),
            StderrMode::Discard => Stdio::null(),
        };

        let status = Command::new(invocation.executable)
            .args(&invocation.args)
            .env(invocation.seed_env_var, invocation.seed.to_string())
            .stdout(Stdio::from(stdout))
            .stderr(stderr)
            .status()
            .map_err(|source| LaunchError::Spawn {
                executable: invocation.executable.to_path_buf(),
                source,
            })?;

        if status.success() {
            Ok(RunExit::Success)
        } else {
            Ok(RunExit::Failure {
                code: status.code(),
            })
        }
    }
}
