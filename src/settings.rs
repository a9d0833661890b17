//! Runtime settings resolved from the environment and command-line flags.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::identity::StoragePolicy;
use crate::presence::PRESENCE_KEY;

/// Default directory holding per-origin store files.
pub const DEFAULT_STORE_DIR: &str = ".greenid";
/// Default origin the store is scoped to.
pub const DEFAULT_ORIGIN: &str = "localhost";
/// Default storage key for the identity record.
pub const DEFAULT_KEY: &str = "user";
/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `<origin>.json` store files (`GREENID_STORE`).
    pub store_dir: PathBuf,
    /// Origin the store is scoped to (`GREENID_ORIGIN`).
    pub origin: String,
    /// Storage key of the identity record (`GREENID_KEY`).
    pub key: String,
    /// Behavior when storage is unavailable (`GREENID_STORAGE_POLICY`).
    pub policy: StoragePolicy,
    /// Log filter directive (`GREENID_LOG`).
    pub log_level: String,
    /// When set, port interactions are recorded here (`GREENID_RECORD`).
    pub record_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            origin: DEFAULT_ORIGIN.to_string(),
            key: DEFAULT_KEY.to_string(),
            policy: StoragePolicy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            record_dir: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage policy is unknown or the key is empty or reserved.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();
        let policy = match lookup("GREENID_STORAGE_POLICY") {
            Some(raw) => raw.parse::<StoragePolicy>()?,
            None => defaults.policy,
        };
        let settings = Self {
            store_dir: lookup("GREENID_STORE").map_or(defaults.store_dir, PathBuf::from),
            origin: lookup("GREENID_ORIGIN").unwrap_or(defaults.origin),
            key: lookup("GREENID_KEY").unwrap_or(defaults.key),
            policy,
            log_level: lookup("GREENID_LOG").unwrap_or(defaults.log_level),
            record_dir: lookup("GREENID_RECORD").map(PathBuf::from),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Applies command-line flags on top of environment settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting key is empty or reserved.
    pub fn apply_overrides(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(dir) = &cli.store_dir {
            self.store_dir.clone_from(dir);
        }
        if let Some(origin) = &cli.origin {
            self.origin.clone_from(origin);
        }
        if let Some(key) = &cli.key {
            self.key.clone_from(key);
        }
        if cli.strict {
            self.policy = StoragePolicy::FailFast;
        }
        if let Some(level) = &cli.log_level {
            self.log_level.clone_from(level);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err("storage key must not be empty".to_string());
        }
        if self.key == PRESENCE_KEY {
            return Err(format!("storage key '{PRESENCE_KEY}' is reserved for the presence roster"));
        }
        Ok(())
    }
}
