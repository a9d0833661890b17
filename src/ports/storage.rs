//! Key-value storage port modelling origin-scoped local storage.

use super::PortError;

/// A persistent string-to-string store scoped to a single origin.
///
/// Absence of a key is a normal result (`Ok(None)`), never an error. Errors
/// are reserved for the store itself being unavailable.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PortError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PortError>;
}
