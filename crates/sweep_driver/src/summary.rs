//! Per-run outcome records and sweep-level counts.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use sweep_core::RunDescriptor;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    NonZeroExit { exit_code: Option<i32> },
    LaunchFailed { error: String },
    ArtifactFailed { error: String },
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::NonZeroExit { .. } => "non_zero_exit",
            Self::LaunchFailed { .. } => "launch_failed",
            Self::ArtifactFailed { .. } => "artifact_failed",
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Succeeded => Some(0),
            Self::NonZeroExit { exit_code } => *exit_code,
            Self::LaunchFailed { .. } | Self::ArtifactFailed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::LaunchFailed { error } | Self::ArtifactFailed { error } => Some(error),
            Self::Succeeded | Self::NonZeroExit { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    #[serde(flatten)]
    pub descriptor: RunDescriptor,
    pub artifact: Option<PathBuf>,
    #[serde(flatten)]
    pub status: RunStatus,
    pub duration_ms: u64,
}

impl RunRecord {
    pub fn new(
        descriptor: RunDescriptor,
        artifact: Option<PathBuf>,
        status: RunStatus,
        elapsed: Duration,
    ) -> Self {
        Self {
            descriptor,
            artifact,
            status,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub seed: u64,
    pub seed_env_var: String,
    pub fingerprint: String,
    pub started_at: String,
    pub output_dir: PathBuf,
    pub total_runs: usize,
    pub succeeded: usize,
    pub non_zero_exit: usize,
    pub launch_failed: usize,
    pub artifact_failed: usize,
    pub records: Vec<RunRecord>,
}

impl SweepSummary {
    pub fn new(
        seed: u64,
        seed_env_var: impl Into<String>,
        fingerprint: impl Into<String>,
        started_at: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        total_runs: usize,
    ) -> Self {
        Self {
            seed,
            seed_env_var: seed_env_var.into(),
            fingerprint: fingerprint.into(),
            started_at: started_at.into(),
            output_dir: output_dir.into(),
            total_runs,
            succeeded: 0,
            non_zero_exit: 0,
            launch_failed: 0,
            artifact_failed: 0,
            records: Vec::with_capacity(total_runs),
        }
    }

    pub fn push(&mut self, record: RunRecord) {
        match record.status {
            RunStatus::Succeeded => self.succeeded += 1,
            RunStatus::NonZeroExit { .. } => self.non_zero_exit += 1,
            RunStatus::LaunchFailed { .. } => self.launch_failed += 1,
            RunStatus::ArtifactFailed { .. } => self.artifact_failed += 1,
        }
        self.records.push(record);
    }

    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.non_zero_exit + self.launch_failed + self.artifact_failed
    }

    /// One-line human summary printed after a sweep.
    pub fn headline(&self) -> String {
        format!(
            "attempted {} of {} runs: {} succeeded, {} non-zero exit, {} launch failed, {} artifact failed ({}={})",
            self.attempted(),
            self.total_runs,
            self.succeeded,
            self.non_zero_exit,
            self.launch_failed,
            self.artifact_failed,
            self.seed_env_var,
            self.seed,
        )
    }
}
