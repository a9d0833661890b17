//! Service context bundling the port trait objects the provisioner needs.

use std::path::Path;

use tracing::debug;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::entropy::OsEntropy;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::storage::FileStorage;
use crate::adapters::recording::{RecordingClock, RecordingEntropy, RecordingStorage};
use crate::adapters::replaying::{ReplayingClock, ReplayingEntropy, ReplayingStorage};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::{Clock, Entropy, KeyValueStore, PortError};
use crate::settings::Settings;

/// Bundles the storage, entropy and clock ports.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Origin-scoped persistent key-value store.
    pub storage: Box<dyn KeyValueStore>,
    /// Random source for identifiers and guest numbers.
    pub entropy: Box<dyn Entropy>,
    /// Time source for player presence.
    pub clock: Box<dyn Clock>,
}

impl ServiceContext {
    /// Creates a live context: disk-backed storage, the OS RNG and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is not a valid store name.
    pub fn live(settings: &Settings) -> Result<Self, String> {
        let storage =
            FileStorage::for_origin(Box::new(LiveFileSystem), &settings.store_dir, &settings.origin)?;
        debug!(path = %storage.path().display(), origin = %settings.origin, "opened origin store");
        Ok(Self {
            storage: Box::new(storage),
            entropy: Box::new(OsEntropy::new()),
            clock: Box::new(LiveClock),
        })
    }

    /// Creates a live context whose interactions are recorded into `dir`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context or the session cannot be created.
    pub fn recording_at(settings: &Settings, dir: &Path) -> Result<(Self, RecordingSession), String> {
        let live = Self::live(settings)?;
        let session = RecordingSession::new(dir)?;
        let ctx = Self {
            storage: Box::new(RecordingStorage::new(live.storage, session.storage.clone())),
            entropy: Box::new(RecordingEntropy::new(live.entropy, session.entropy.clone())),
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file holding all ports.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        // Each port gets its own replayer so per-port cursors are independent.
        Ok(Self {
            storage: Box::new(ReplayingStorage::new(CassetteReplayer::from_file(path)?)),
            entropy: Box::new(ReplayingEntropy::new(CassetteReplayer::from_file(path)?)),
            clock: Box::new(ReplayingClock::new(CassetteReplayer::from_file(path)?)),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            storage: match replayers.storage {
                Some(r) => Box::new(ReplayingStorage::new(r)),
                None => Box::new(PanickingStorage),
            },
            entropy: match replayers.entropy {
                Some(r) => Box::new(ReplayingEntropy::new(r)),
                None => Box::new(PanickingEntropy),
            },
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingStorage;
impl KeyValueStore for PanickingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, PortError> {
        panic!("Storage port not configured in CassetteConfig: no cassette loaded for storage");
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), PortError> {
        panic!("Storage port not configured in CassetteConfig: no cassette loaded for storage");
    }
}

struct PanickingEntropy;
impl Entropy for PanickingEntropy {
    fn fill_strong(&self, _words: &mut [u32]) -> Result<(), PortError> {
        panic!("Entropy port not configured in CassetteConfig: no cassette loaded for entropy");
    }
    fn next_weak(&self) -> u32 {
        panic!("Entropy port not configured in CassetteConfig: no cassette loaded for entropy");
    }
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::recorder::CassetteRecorder;
    use serde_json::json;

    #[test]
    fn replaying_context_from_monolithic_cassette() {
        let dir = std::env::temp_dir().join("greenid_ctx_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test", "abc");
        recorder.record("storage", "get", json!({"key": "user"}), json!({"ok": "raw"}));
        recorder.record("entropy", "next_weak", json!(null), json!(99));
        recorder.record("clock", "now", json!(null), json!("2024-01-01T00:00:00Z"));
        recorder.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.storage.get("user").unwrap().as_deref(), Some("raw"));
        assert_eq!(ctx.entropy.next_weak(), 99);
        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "not configured in CassetteConfig")]
    fn unspecified_port_panics_with_clear_message() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified()).unwrap();
        let _ = ctx.entropy.next_weak();
    }

    #[test]
    fn live_context_rejects_bad_origin() {
        let settings = Settings { origin: "../escape".into(), ..Settings::default() };
        assert!(ServiceContext::live(&settings).is_err());
    }
}
