//! Seams between the sweep loop and the outside world.

pub mod artifact_store;
pub mod clock;
pub mod launcher;

pub use artifact_store::{Artifact, ArtifactStore, FsArtifactStore};
pub use clock::{Clock, SystemClock};
pub use launcher::{Invocation, LaunchError, ProcessLauncher, RunExit, RunLauncher, StderrMode};
