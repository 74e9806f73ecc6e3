//! Sequential test-sweep driver.
//!
//! Invokes an external test executable once per combination of a
//! [`sweep_core::SweepPlan`], binds each run's standard output to its own
//! artifact file, and reports a [`SweepSummary`] once every combination has
//! been attempted.
//!
//! # Quick Start
//!
//! ```no_run
//! use sweep_driver::run_sweep;
//!
//! let summary = run_sweep(
//!     2,
//!     vec!["correct".into()],
//!     vec!["undef".into(), "def".into()],
//!     vec!["jump".into(), "pop".into()],
//!     "./test",
//!     "output",
//! )
//! .unwrap();
//! assert_eq!(summary.total_runs, 8);
//! ```
//!
//! # Architecture
//!
//! - [`adapters`]: process launcher, artifact store and clock seams
//! - [`runner`]: the sweep loop
//! - [`summary`]: per-run records and outcome counts
//! - [`export`]: manifest export to JSON/CSV
//! - [`config`]: CLI and config-file layering for the `sweep` binary

pub mod adapters;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod runner;
pub mod summary;

pub use error::DriverError;
pub use export::{export_manifest, export_to_csv, export_to_json};
pub use runner::{execute_sweep, run_sweep, DriverOptions};
pub use summary::{RunRecord, RunStatus, SweepSummary};
