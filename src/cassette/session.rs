//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing `<port>.cassette.yaml` into the
/// session directory.
pub struct RecordingSession {
    /// Recorder for storage interactions.
    pub storage: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for entropy interactions.
    pub entropy: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already holds cassettes or cannot
    /// be created.
    pub fn new(output_dir: &Path) -> Result<Self, String> {
        if output_dir.join("storage.cassette.yaml").exists() {
            return Err(format!("Cassettes already recorded in {}", output_dir.display()));
        }
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let commit = get_commit_hash();
        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"), &commit)))
        };

        Ok(Self {
            storage: make_recorder("storage"),
            entropy: make_recorder("entropy"),
            clock: make_recorder("clock"),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.storage, "storage")?;
        finish_one(self.entropy, "entropy")?;
        finish_one(self.clock, "clock")?;
        Ok(self.output_dir)
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        warn!("could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_writes_one_cassette_per_port() {
        let dir = std::env::temp_dir().join("greenid_session_test");
        let _ = std::fs::remove_dir_all(&dir);

        let session = RecordingSession::new(&dir).unwrap();
        let output = session.finish().unwrap();

        assert_eq!(output, dir);
        assert!(dir.join("storage.cassette.yaml").exists());
        assert!(dir.join("entropy.cassette.yaml").exists());
        assert!(dir.join("clock.cassette.yaml").exists());
        assert!(RecordingSession::new(&dir).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn get_commit_hash_returns_string() {
        assert!(!get_commit_hash().is_empty());
    }
}
