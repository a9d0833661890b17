//! Cassette configuration for composable per-port replay.

use std::path::PathBuf;

use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a cassette path are served
/// by panicking adapters during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the storage port cassette file.
    pub storage: Option<PathBuf>,
    /// Path to the entropy port cassette file.
    pub entropy: Option<PathBuf>,
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the storage port.
    pub storage: Option<CassetteReplayer>,
    /// Replayer for the entropy port.
    pub entropy: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Config pointing at the files a `RecordingSession` writes into `dir`.
    #[must_use]
    pub fn from_session_dir(dir: &std::path::Path) -> Self {
        Self {
            storage: Some(dir.join("storage.cassette.yaml")),
            entropy: Some(dir.join("entropy.cassette.yaml")),
            clock: Some(dir.join("clock.cassette.yaml")),
        }
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            storage: self.storage.as_deref().map(CassetteReplayer::from_file).transpose()?,
            entropy: self.entropy.as_deref().map(CassetteReplayer::from_file).transpose()?,
            clock: self.clock.as_deref().map(CassetteReplayer::from_file).transpose()?,
        })
    }
}
