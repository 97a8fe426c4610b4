//! Lock snapshots.
//!
//! A lock file freezes the resolved values of a configuration to
//! `{lock_dir}/{slug}.lock.yml`. Because the lock path is the last candidate
//! path, a snapshot overrides every regular config file on the next read
//! until it is removed.
//!
//! There is no mutual exclusion: processes locking and unlocking the same
//! slug concurrently race, and the last writer wins. Writes are not atomic.

use super::resolved::ResolvedConfig;
use crate::error::{ConfigError, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

/// Serialize `values` as YAML to `path`, replacing any existing snapshot.
pub fn write_snapshot(path: &Path, values: &Map<String, Value>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }

    let yaml = serde_yaml::to_string(values)?;
    std::fs::write(path, yaml).map_err(|e| ConfigError::io(path, e))?;

    info!(path = %path.display(), keys = values.len(), "Wrote lock snapshot");
    Ok(())
}

/// Delete the snapshot at `path`.
///
/// Fails with [`ConfigError::LockFileMissing`] if there is nothing to delete.
pub fn remove_snapshot(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed lock snapshot");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::LockFileMissing {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(e) => Err(ConfigError::io(path, e)),
    }
}

impl ResolvedConfig {
    /// Dump the current values into the lock file.
    pub fn lock(&self) -> Result<()> {
        write_snapshot(self.lock_path(), self.as_map())
    }

    /// Delete the lock file. Errors if it does not exist.
    pub fn unlock(&self) -> Result<()> {
        remove_snapshot(self.lock_path())
    }

    /// Whether a lock snapshot currently exists on disk.
    pub fn is_locked(&self) -> bool {
        self.lock_path().is_file()
    }
}
