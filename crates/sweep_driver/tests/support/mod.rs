#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

static SERIAL: Mutex<()> = Mutex::new(());

/// Serializes tests that write and then exec scripts; a concurrent fork can
/// otherwise hold the script open for writing and fail the exec with ETXTBSY.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writes an executable shell script standing in for the test binary.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
    path
}

/// Echoes its arguments and the seed it was handed.
#[cfg(unix)]
pub fn echo_script(dir: &Path) -> PathBuf {
    write_script(dir, "echo_test", r#"echo "$1 $2 $3 seed=$SWEEP_SEED""#)
}

pub fn read_artifacts(dir: &Path) -> Vec<(String, String)> {
    let mut artifacts: Vec<(String, String)> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read_to_string(entry.path()).unwrap(),
            )
        })
        .collect();
    artifacts.sort();
    artifacts
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
