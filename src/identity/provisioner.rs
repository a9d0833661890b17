//! Resolve-or-create provisioning of the player identity.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use super::{generate, inspect, Identity, StoredIdentity};
use crate::ports::{Entropy, KeyValueStore};

/// What to do when the persistent store cannot be read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoragePolicy {
    /// Continue with an identity that lives only for this run.
    #[default]
    InMemory,
    /// Abort startup with the storage error.
    FailFast,
}

impl FromStr for StoragePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-memory" | "memory" => Ok(Self::InMemory),
            "fail-fast" | "strict" => Ok(Self::FailFast),
            other => Err(format!("unknown storage policy '{other}' (expected in-memory or fail-fast)")),
        }
    }
}

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A valid record was already stored.
    Stored,
    /// A new record was generated and persisted.
    Generated,
    /// A new record was generated but storage was unavailable.
    Ephemeral,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stored => "stored",
            Self::Generated => "generated",
            Self::Ephemeral => "ephemeral",
        })
    }
}

/// A resolved identity plus the payload handed to the UI application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The identity record.
    pub identity: Identity,
    /// Serialized form, byte-for-byte what is (or would be) stored.
    pub payload: String,
    /// How the identity was obtained.
    pub source: Source,
}

/// Resolves the player identity against an injected store and entropy source.
pub struct Provisioner<'a> {
    store: &'a dyn KeyValueStore,
    entropy: &'a dyn Entropy,
    key: String,
    policy: StoragePolicy,
}

impl<'a> Provisioner<'a> {
    /// Creates a provisioner reading and writing `key` in `store`.
    #[must_use]
    pub fn new(
        store: &'a dyn KeyValueStore,
        entropy: &'a dyn Entropy,
        key: impl Into<String>,
        policy: StoragePolicy,
    ) -> Self {
        Self { store, entropy, key: key.into(), policy }
    }

    /// Returns the stored identity, creating and persisting one if needed.
    ///
    /// Performs one read and at most one write. A valid stored record is
    /// returned untouched with its stored payload.
    ///
    /// # Errors
    ///
    /// Returns an error only under [`StoragePolicy::FailFast`] when the
    /// store cannot be read or written.
    pub fn resolve(&self) -> Result<Resolution, String> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => return self.degrade(&format!("read of '{}' failed: {e}", self.key), None),
        };

        let rejection = match inspect(raw.as_deref()) {
            StoredIdentity::Valid(identity) => {
                debug!(key = %self.key, player_id = %identity.player_id, "using stored identity");
                let payload = raw.unwrap_or_default();
                return Ok(Resolution { identity, payload, source: Source::Stored });
            }
            StoredIdentity::Invalid(rejection) => rejection,
        };

        info!(key = %self.key, reason = %rejection, "provisioning new player identity");
        let identity = generate(self.entropy);
        let payload = identity.encode()?;
        if let Err(e) = self.store.set(&self.key, &payload) {
            return self.degrade(&format!("write of '{}' failed: {e}", self.key), Some(identity));
        }
        Ok(Resolution { identity, payload, source: Source::Generated })
    }

    /// Reads and classifies the stored value without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn inspect_only(&self) -> Result<(Option<String>, StoredIdentity), String> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(|e| format!("Failed to read '{}': {e}", self.key))?;
        let status = inspect(raw.as_deref());
        Ok((raw, status))
    }

    fn degrade(&self, cause: &str, generated: Option<Identity>) -> Result<Resolution, String> {
        match self.policy {
            StoragePolicy::FailFast => Err(format!("Storage unavailable: {cause}")),
            StoragePolicy::InMemory => {
                warn!(cause, "storage unavailable, identity will not persist past this run");
                let identity = generated.unwrap_or_else(|| generate(self.entropy));
                let payload = identity.encode()?;
                Ok(Resolution { identity, payload, source: Source::Ephemeral })
            }
        }
    }
}
