//! Shared sweep domain primitives.
//!
//! This crate owns the deterministic parts of a parameter sweep: the request
//! contract and its validation, cross-product enumeration, artifact naming,
//! and seed sources. It intentionally excludes process launching and
//! filesystem concerns, which live in `sweep_driver`.

pub mod contract;
pub mod naming;
pub mod plan;
pub mod seed;

pub use contract::{
    normalize_request, Dimension, NamingScheme, NormalizedSweep, SweepRequest, ValidationError,
};
pub use plan::{DimensionValue, RunDescriptor, SweepPlan};
pub use seed::{resolve_seed, EnvSeedSource, FixedSeedSource, SeedSource, SystemSeedSource};
