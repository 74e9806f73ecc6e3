use std::process::ExitCode;

use clap::Parser;
use sweep_core::{normalize_request, EnvSeedSource, SystemSeedSource};
use sweep_driver::adapters::{FsArtifactStore, ProcessLauncher, SystemClock};
use sweep_driver::config::SweepArgs;
use sweep_driver::logging::init_logging;
use sweep_driver::{execute_sweep, export_manifest, DriverError, DriverOptions, SweepSummary};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = SweepArgs::parse();
    init_logging(&args.log_level);

    match run(args) {
        Ok(summary) => {
            println!("{}", summary.headline());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "sweep aborted");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: SweepArgs) -> Result<SweepSummary, DriverError> {
    let config = args.resolve()?;
    let sweep = normalize_request(config.request)?;

    let seed_source = EnvSeedSource::new(&sweep.seed_env_var, SystemSeedSource);
    let options = DriverOptions {
        executable: config.executable,
        show_progress: config.show_progress,
    };
    let summary = execute_sweep(
        &sweep,
        &options,
        &seed_source,
        &ProcessLauncher::new(config.stderr),
        &FsArtifactStore::new(config.output_dir),
        &SystemClock,
    )?;

    if let Some(path) = &config.manifest {
        export_manifest(&summary, path)?;
        info!(manifest = %path.display(), "manifest written");
    }
    Ok(summary)
}
