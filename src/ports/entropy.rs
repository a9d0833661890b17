//! Entropy port for identifier and guest-number generation.

use super::PortError;

/// Supplies random values.
///
/// Two grades are exposed: a cryptographically strong source that may be
/// unavailable, and a general-purpose generator that always answers.
pub trait Entropy: Send + Sync {
    /// Fills `words` from the cryptographically strong source.
    ///
    /// # Errors
    ///
    /// Returns an error if the strong source is unavailable.
    fn fill_strong(&self, words: &mut [u32]) -> Result<(), PortError>;

    /// Returns the next value from the general-purpose generator.
    fn next_weak(&self) -> u32;
}
