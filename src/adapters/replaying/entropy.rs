//! Replaying adapter for the `Entropy` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{Entropy, PortError};

/// Replays recorded entropy draws from a cassette.
pub struct ReplayingEntropy {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingEntropy {
    /// Creates a new replaying entropy source from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Entropy for ReplayingEntropy {
    fn fill_strong(&self, words: &mut [u32]) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "entropy", "fill_strong");
        let recorded: Vec<u32> = replay_result(&output, "entropy::fill_strong")?;
        if recorded.len() != words.len() {
            return Err(format!(
                "entropy::fill_strong: recorded {} words, {} requested",
                recorded.len(),
                words.len()
            )
            .into());
        }
        words.copy_from_slice(&recorded);
        Ok(())
    }

    fn next_weak(&self) -> u32 {
        let output = next_output(&self.replayer, "entropy", "next_weak");
        output
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .expect("entropy::next_weak: expected u32 output")
    }
}
