use std::fs::File;
use std::path::Path;

use crate::error::{DriverError, Result};

pub(crate) fn ensure_not_empty<T>(path: &Path, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(DriverError::Manifest {
            path: path.to_path_buf(),
            message: "No runs to export".to_string(),
        });
    }

    Ok(())
}

pub(crate) fn create_output_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|error| DriverError::Manifest {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}
