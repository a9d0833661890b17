//! Recording adapter for the `Entropy` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{Entropy, PortError};

/// Records entropy draws while delegating to an inner implementation.
pub struct RecordingEntropy {
    inner: Box<dyn Entropy>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingEntropy {
    /// Creates a new recording entropy source wrapping the given implementation.
    pub fn new(inner: Box<dyn Entropy>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FillInput {
    count: usize,
}

impl Entropy for RecordingEntropy {
    fn fill_strong(&self, words: &mut [u32]) -> Result<(), PortError> {
        let result = self.inner.fill_strong(words).map(|()| words.to_vec());
        record_result(
            &self.recorder,
            "entropy",
            "fill_strong",
            &FillInput { count: words.len() },
            &result,
        );
        result.map(|_| ())
    }

    fn next_weak(&self) -> u32 {
        let value = self.inner.next_weak();
        record_interaction(&self.recorder, "entropy", "next_weak", &(), &value);
        value
    }
}
