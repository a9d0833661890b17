//! Live entropy adapter backed by the operating system RNG.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};

use crate::ports::{Entropy, PortError};

/// Strong words come from `OsRng`; weak values from a seeded `SmallRng`.
///
/// The weak generator is seeded without touching the OS RNG so it keeps
/// working when the strong source does not.
pub struct OsEntropy {
    weak: Mutex<SmallRng>,
}

impl OsEntropy {
    /// Creates an adapter whose weak generator is seeded from the clock and pid.
    #[must_use]
    pub fn new() -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::with_seed(nanos.unsigned_abs() ^ u64::from(std::process::id()))
    }

    /// Creates an adapter with a fixed weak-generator seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { weak: Mutex::new(SmallRng::seed_from_u64(seed)) }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl Entropy for OsEntropy {
    fn fill_strong(&self, words: &mut [u32]) -> Result<(), PortError> {
        let mut bytes = vec![0u8; words.len() * 4];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| format!("os rng failed: {e}"))?;
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(chunk);
            *word = u32::from_le_bytes(buf);
        }
        Ok(())
    }

    fn next_weak(&self) -> u32 {
        self.weak.lock().unwrap_or_else(PoisonError::into_inner).gen::<u32>()
    }
}
