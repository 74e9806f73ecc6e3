//! Sequential sweep execution.
//!
//! Runs one child process per combination of the plan, strictly one after
//! another. A run that fails to launch, exits non-zero, or cannot get an
//! artifact is recorded and the sweep moves on; only an unusable output
//! directory aborts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use sweep_core::contract::request_fingerprint;
use sweep_core::naming::artifact_file_name;
use sweep_core::{
    normalize_request, resolve_seed, NormalizedSweep, RunDescriptor, SeedSource, SweepPlan,
    SweepRequest, SystemSeedSource,
};
use tracing::{debug, info, warn};

use crate::adapters::{
    ArtifactStore, Clock, FsArtifactStore, Invocation, LaunchError, ProcessLauncher, RunExit,
    RunLauncher, SystemClock,
};
use crate::error::{DriverError, Result};
use crate::summary::{RunRecord, RunStatus, SweepSummary};

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub executable: PathBuf,
    pub show_progress: bool,
}

impl DriverOptions {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            show_progress: false,
        }
    }
}

/// Runs the classic `<category> <mode> <flag>` sweep with the system seed
/// source, process launcher and local filesystem store.
pub fn run_sweep(
    repetitions: usize,
    categories: Vec<String>,
    modes: Vec<String>,
    flags: Vec<String>,
    executable: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<SweepSummary> {
    let sweep = normalize_request(SweepRequest::standard(repetitions, categories, modes, flags))?;
    execute_sweep(
        &sweep,
        &DriverOptions::new(executable.as_ref()),
        &SystemSeedSource,
        &ProcessLauncher::default(),
        &FsArtifactStore::new(output_dir.as_ref()),
        &SystemClock,
    )
}

pub fn execute_sweep(
    sweep: &NormalizedSweep,
    options: &DriverOptions,
    seed_source: &impl SeedSource,
    launcher: &impl RunLauncher,
    store: &impl ArtifactStore,
    clock: &impl Clock,
) -> Result<SweepSummary> {
    store
        .prepare()
        .map_err(|source| DriverError::OutputDirectory {
            path: store.root().to_path_buf(),
            source,
        })?;

    let seed = resolve_seed(sweep, seed_source);
    let plan = SweepPlan::new(sweep);
    let mut summary = SweepSummary::new(
        seed,
        &sweep.seed_env_var,
        request_fingerprint(sweep),
        chrono::Utc::now().to_rfc3339(),
        store.root(),
        plan.len(),
    );
    info!(
        seed,
        total_runs = plan.len(),
        executable = %options.executable.display(),
        output_dir = %store.root().display(),
        "sweep started"
    );

    let progress = options.show_progress.then(|| progress_bar(plan.len()));
    let started_at = Instant::now();
    for descriptor in plan.descriptors() {
        let line = progress_line(&descriptor, plan.len());
        match &progress {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }

        let record = execute_run(descriptor, sweep, seed, options, launcher, store, clock);
        summary.push(record);

        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = &progress {
        bar.finish_with_message("Completed");
    }
    info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded,
        failed = summary.failed(),
        non_zero_exit = summary.non_zero_exit,
        launch_failed = summary.launch_failed,
        artifact_failed = summary.artifact_failed,
        duration_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        "sweep finished"
    );
    Ok(summary)
}

fn execute_run(
    descriptor: RunDescriptor,
    sweep: &NormalizedSweep,
    seed: u64,
    options: &DriverOptions,
    launcher: &impl RunLauncher,
    store: &impl ArtifactStore,
    clock: &impl Clock,
) -> RunRecord {
    let started_at = Instant::now();
    let name = artifact_file_name(&descriptor, &clock.timestamp(), sweep.naming);

    let artifact = match store.create(&name) {
        Ok(artifact) => artifact,
        Err(error) => {
            warn!(run = descriptor.index, artifact = %name, %error, "artifact creation failed");
            let status = RunStatus::ArtifactFailed {
                error: error.to_string(),
            };
            return RunRecord::new(descriptor, None, status, started_at.elapsed());
        }
    };
    let path = artifact.path;

    // Kept to flush the artifact once the child has exited.
    let handle = match artifact.file.try_clone() {
        Ok(handle) => handle,
        Err(error) => {
            warn!(run = descriptor.index, artifact = %path.display(), %error, "artifact handle unavailable");
            let status = RunStatus::ArtifactFailed {
                error: error.to_string(),
            };
            return RunRecord::new(descriptor, Some(path), status, started_at.elapsed());
        }
    };

    let invocation = Invocation {
        executable: &options.executable,
        args: descriptor.args(),
        seed_env_var: &sweep.seed_env_var,
        seed,
    };
    debug!(run = descriptor.index, artifact = %path.display(), "launching run");

    let mut status = match launcher.launch(&invocation, artifact.file) {
        Ok(RunExit::Success) => RunStatus::Succeeded,
        Ok(RunExit::Failure { code }) => {
            warn!(run = descriptor.index, exit_code = ?code, "run exited with failure");
            RunStatus::NonZeroExit { exit_code: code }
        }
        Err(error @ LaunchError::Spawn { .. }) => {
            warn!(run = descriptor.index, %error, "run could not be launched");
            RunStatus::LaunchFailed {
                error: error.to_string(),
            }
        }
        Err(error @ LaunchError::Capture(_)) => {
            warn!(run = descriptor.index, %error, "run output could not be captured");
            RunStatus::ArtifactFailed {
                error: error.to_string(),
            }
        }
    };

    if let Err(error) = handle.sync_all() {
        warn!(run = descriptor.index, artifact = %path.display(), %error, "artifact flush failed");
        if !matches!(status, RunStatus::LaunchFailed { .. }) {
            status = RunStatus::ArtifactFailed {
                error: error.to_string(),
            };
        }
    }

    RunRecord::new(descriptor, Some(path), status, started_at.elapsed())
}

fn progress_line(descriptor: &RunDescriptor, total: usize) -> String {
    format!("[{}/{}] {}", descriptor.index + 1, total, descriptor.label())
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fs::{self, File};
    use std::io::{self, Write};

    use sweep_core::{FixedSeedSource, NamingScheme};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct RecordedCall {
        args: Vec<String>,
        seed_env_var: String,
        seed: u64,
    }

    /// Writes its arguments into the artifact; fails for selected flags.
    #[derive(Default)]
    struct ScriptedLauncher {
        calls: RefCell<Vec<RecordedCall>>,
        fail_exit_for: Option<&'static str>,
        fail_launch_for: Option<&'static str>,
    }

    impl RunLauncher for ScriptedLauncher {
        fn launch(
            &self,
            invocation: &Invocation<'_>,
            mut stdout: File,
        ) -> std::result::Result<RunExit, LaunchError> {
            self.calls.borrow_mut().push(RecordedCall {
                args: invocation.args.iter().map(|a| a.to_string()).collect(),
                seed_env_var: invocation.seed_env_var.to_string(),
                seed: invocation.seed,
            });
            if self.fail_launch_for.is_some_and(|flag| invocation.args.contains(&flag)) {
                return Err(LaunchError::Spawn {
                    executable: invocation.executable.to_path_buf(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
            writeln!(stdout, "{} seed={}", invocation.args.join(" "), invocation.seed).unwrap();
            if self.fail_exit_for.is_some_and(|flag| invocation.args.contains(&flag)) {
                return Ok(RunExit::Failure { code: Some(1) });
            }
            Ok(RunExit::Success)
        }
    }

    /// Every run lands in the same second.
    struct FrozenClock;

    impl Clock for FrozenClock {
        fn timestamp(&self) -> String {
            "1016093015".to_string()
        }
    }

    struct TickingClock(Cell<u32>);

    impl Clock for TickingClock {
        fn timestamp(&self) -> String {
            let tick = self.0.get();
            self.0.set(tick + 1);
            format!("10160930{tick:02}")
        }
    }

    fn example_sweep(naming: NamingScheme) -> NormalizedSweep {
        let mut request = SweepRequest::standard(2, ["correct"], ["undef", "def"], ["jump", "pop"]);
        request.naming = naming;
        normalize_request(request).unwrap()
    }

    fn artifact_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn runs_every_combination_in_order_with_one_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("output"));
        let launcher = ScriptedLauncher::default();

        let summary = execute_sweep(
            &example_sweep(NamingScheme::WithRepetition),
            &DriverOptions::new("./test"),
            &FixedSeedSource(1234),
            &launcher,
            &store,
            &TickingClock(Cell::new(0)),
        )
        .unwrap();

        let calls = launcher.calls.borrow();
        let args: Vec<String> = calls.iter().map(|c| c.args.join(" ")).collect();
        assert_eq!(
            args,
            vec![
                "correct undef jump",
                "correct undef pop",
                "correct def jump",
                "correct def pop",
                "correct undef jump",
                "correct undef pop",
                "correct def jump",
                "correct def pop",
            ]
        );
        assert!(calls.iter().all(|c| c.seed == 1234 && c.seed_env_var == "SWEEP_SEED"));

        assert_eq!(summary.total_runs, 8);
        assert_eq!(summary.succeeded, 8);
        assert_eq!(summary.seed, 1234);
        assert_eq!(
            artifact_names(store.root()),
            vec![
                "correct_def_jump1016093002_r1",
                "correct_def_jump1016093006_r2",
                "correct_def_pop1016093003_r1",
                "correct_def_pop1016093007_r2",
                "correct_undef_jump1016093000_r1",
                "correct_undef_jump1016093004_r2",
                "correct_undef_pop1016093001_r1",
                "correct_undef_pop1016093005_r2",
            ]
        );
        let first = fs::read_to_string(store.root().join("correct_undef_jump1016093000_r1")).unwrap();
        assert_eq!(first, "correct undef jump seed=1234\n");
    }

    #[test]
    fn same_second_runs_still_get_distinct_artifacts() {
        for naming in [NamingScheme::TimestampOnly, NamingScheme::WithRepetition] {
            let dir = tempfile::tempdir().unwrap();
            let store = FsArtifactStore::new(dir.path());

            let summary = execute_sweep(
                &example_sweep(naming),
                &DriverOptions::new("./test"),
                &FixedSeedSource(1),
                &ScriptedLauncher::default(),
                &store,
                &FrozenClock,
            )
            .unwrap();

            let names = artifact_names(dir.path());
            assert_eq!(names.len(), 8, "naming {naming:?} lost artifacts: {names:?}");
            let recorded: std::collections::HashSet<_> = summary
                .records
                .iter()
                .map(|r| r.artifact.clone().unwrap())
                .collect();
            assert_eq!(recorded.len(), 8);
        }
    }

    #[test]
    fn timestamp_only_naming_keeps_historical_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        execute_sweep(
            &example_sweep(NamingScheme::TimestampOnly),
            &DriverOptions::new("./test"),
            &FixedSeedSource(1),
            &ScriptedLauncher::default(),
            &store,
            &FrozenClock,
        )
        .unwrap();

        let names = artifact_names(dir.path());
        assert!(names.contains(&"correct_undef_jump1016093015".to_string()));
        assert!(names.contains(&"correct_undef_jump1016093015.1".to_string()));
    }

    #[test]
    fn failures_do_not_stop_the_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let launcher = ScriptedLauncher {
            fail_exit_for: Some("pop"),
            fail_launch_for: Some("def"),
            ..ScriptedLauncher::default()
        };

        let summary = execute_sweep(
            &example_sweep(NamingScheme::WithRepetition),
            &DriverOptions::new("./test"),
            &FixedSeedSource(9),
            &launcher,
            &store,
            &TickingClock(Cell::new(0)),
        )
        .unwrap();

        assert_eq!(launcher.calls.borrow().len(), 8);
        assert_eq!(summary.attempted(), 8);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.non_zero_exit, 2);
        assert_eq!(summary.launch_failed, 4);

        let failed_exit = summary
            .records
            .iter()
            .find(|r| matches!(r.status, RunStatus::NonZeroExit { .. }))
            .unwrap();
        let contents = fs::read_to_string(failed_exit.artifact.as_ref().unwrap()).unwrap();
        assert_eq!(contents, "correct undef pop seed=9\n");

        let launch_failed = summary
            .records
            .iter()
            .find(|r| matches!(r.status, RunStatus::LaunchFailed { .. }))
            .unwrap();
        let contents = fs::read_to_string(launch_failed.artifact.as_ref().unwrap()).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn artifact_failures_are_recorded_per_run() {
        struct UnwritableStore(PathBuf);

        impl ArtifactStore for UnwritableStore {
            fn root(&self) -> &Path {
                &self.0
            }

            fn prepare(&self) -> io::Result<()> {
                Ok(())
            }

            fn create(&self, _name: &str) -> io::Result<crate::adapters::Artifact> {
                Err(io::Error::other("disk full"))
            }
        }

        let launcher = ScriptedLauncher::default();
        let summary = execute_sweep(
            &example_sweep(NamingScheme::WithRepetition),
            &DriverOptions::new("./test"),
            &FixedSeedSource(1),
            &launcher,
            &UnwritableStore(PathBuf::from("unused")),
            &FrozenClock,
        )
        .unwrap();

        assert_eq!(summary.artifact_failed, 8);
        assert!(launcher.calls.borrow().is_empty());
        assert_eq!(summary.records[0].status.error(), Some("disk full"));
    }

    #[test]
    fn unusable_output_directory_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("output");
        fs::write(&blocker, b"file in the way").unwrap();
        let launcher = ScriptedLauncher::default();

        let error = execute_sweep(
            &example_sweep(NamingScheme::WithRepetition),
            &DriverOptions::new("./test"),
            &FixedSeedSource(1),
            &launcher,
            &FsArtifactStore::new(&blocker),
            &FrozenClock,
        )
        .unwrap_err();

        assert!(matches!(error, DriverError::OutputDirectory { .. }));
        assert_eq!(error.exit_code(), 1);
        assert!(launcher.calls.borrow().is_empty());
    }

    #[test]
    fn request_seed_pins_every_run() {
        let mut request = SweepRequest::standard(1, ["a", "b"], ["m"], ["f"]);
        request.seed = Some(77);
        request.seed_env_var = "CUSTOM_SEED".to_string();
        let sweep = normalize_request(request).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let launcher = ScriptedLauncher::default();

        execute_sweep(
            &sweep,
            &DriverOptions::new("./test"),
            &FixedSeedSource(1),
            &launcher,
            &FsArtifactStore::new(dir.path()),
            &FrozenClock,
        )
        .unwrap();

        let calls = launcher.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.seed == 77 && c.seed_env_var == "CUSTOM_SEED"));
    }

    #[test]
    fn progress_line_names_the_run() {
        let sweep = example_sweep(NamingScheme::WithRepetition);
        let descriptor = SweepPlan::new(&sweep).descriptor(5).unwrap();
        assert_eq!(
            progress_line(&descriptor, 8),
            "[6/8] repetition=2 category=correct mode=undef flag=pop"
        );
    }
}
