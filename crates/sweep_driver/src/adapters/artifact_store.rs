use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use sweep_core::naming::collision_suffixed;

const MAX_COLLISION_ATTEMPTS: usize = 10_000;

/// A freshly created, empty artifact file.
#[derive(Debug)]
pub struct Artifact {
    pub path: PathBuf,
    pub file: File,
}

pub trait ArtifactStore {
    fn root(&self) -> &Path;

    /// Makes the destination available. Must be idempotent and must never
    /// remove existing artifacts.
    fn prepare(&self) -> io::Result<()>;

    /// Creates a new artifact, never reusing an existing name.
    fn create(&self, name: &str) -> io::Result<Artifact>;
}

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    fn create(&self, name: &str) -> io::Result<Artifact> {
        for attempt in 0..MAX_COLLISION_ATTEMPTS {
            let candidate = if attempt == 0 {
                name.to_string()
            } else {
                collision_suffixed(name, attempt)
            };
            let path = self.root.join(candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok(Artifact { path, file }),
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(error) => return Err(error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free artifact name for '{name}' after {MAX_COLLISION_ATTEMPTS} attempts"),
        ))
    }
}
