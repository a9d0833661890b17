//! Disk-backed key-value store, one JSON file per origin.
//!
//! Layout:
//!
//! ```text
//! <store_dir>/
//!   └── <origin>.json   {"user": "{\"player_id\":...}", ...}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::ports::{FileSystem, KeyValueStore, PortError};

/// Origin-scoped key-value store persisted through the `FileSystem` port.
///
/// A store file that exists but is not a JSON object of strings is treated
/// as unavailable: reads and writes fail rather than discarding other keys.
pub struct FileStorage {
    fs: Box<dyn FileSystem>,
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Opens the store for `origin` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `origin` is empty or contains characters outside
    /// `[A-Za-z0-9._-]`.
    pub fn for_origin(fs: Box<dyn FileSystem>, dir: &Path, origin: &str) -> Result<Self, String> {
        validate_origin(origin)?;
        Ok(Self { fs, path: dir.join(format!("{origin}.json")), lock: Mutex::new(()) })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn load(&self) -> Result<BTreeMap<String, String>, PortError> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let contents = self.fs.read_to_string(&self.path)?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("store file {} is corrupt: {e}", self.path.display()).into())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        let contents = serde_json::to_string_pretty(&entries)?;
        // Replace the file in one step so an interrupted write never leaves
        // a truncated store behind.
        let staging = self.staging_path();
        self.fs.write(&staging, &contents)?;
        self.fs.rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), key, "store updated");
        Ok(())
    }
}

fn validate_origin(origin: &str) -> Result<(), String> {
    if origin.is_empty() {
        return Err("origin must not be empty".to_string());
    }
    if let Some(bad) =
        origin.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(format!("origin '{origin}' contains unsupported character '{bad}'"));
    }
    Ok(())
}
