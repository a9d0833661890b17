//! Record-replay round-trip integration test.
//!
//! 1. Run the provisioner against an in-memory store with recording adapters.
//! 2. Replay the session cassettes through `ServiceContext::replaying_from()`.
//! 3. Assert the replayed run resolves the identical identity.

use std::sync::Arc;

use greenid::adapters::live::clock::LiveClock;
use greenid::adapters::live::entropy::OsEntropy;
use greenid::adapters::live::memory::MemoryStorage;
use greenid::adapters::recording::{RecordingClock, RecordingEntropy, RecordingStorage};
use greenid::cassette::config::CassetteConfig;
use greenid::cassette::recorder::CassetteRecorder;
use greenid::cassette::session::RecordingSession;
use greenid::context::ServiceContext;
use greenid::identity::{Provisioner, Source, StoragePolicy};
use serde_json::json;

fn resolve(ctx: &ServiceContext) -> greenid::identity::Resolution {
    Provisioner::new(ctx.storage.as_ref(), ctx.entropy.as_ref(), "user", StoragePolicy::FailFast)
        .resolve()
        .expect("resolve")
}

#[test]
fn record_then_replay_produces_identical_identity() {
    let dir = std::env::temp_dir().join("greenid_record_replay_test");
    let _ = std::fs::remove_dir_all(&dir);

    // --- Phase 1: record a first-run provisioning ---
    let session = RecordingSession::new(&dir).unwrap();
    let recorded = {
        let ctx = ServiceContext {
            storage: Box::new(RecordingStorage::new(
                Box::new(MemoryStorage::new()),
                Arc::clone(&session.storage),
            )),
            entropy: Box::new(RecordingEntropy::new(
                Box::new(OsEntropy::new()),
                Arc::clone(&session.entropy),
            )),
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
        };
        resolve(&ctx)
    };
    assert_eq!(recorded.source, Source::Generated);
    session.finish().unwrap();

    // --- Phase 2: replay twice, both must match the recording ---
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::from_session_dir(&dir)).unwrap();
        let replayed = resolve(&ctx);
        assert_eq!(replayed, recorded);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn hand_written_cassette_drives_regeneration() {
    let dir = std::env::temp_dir().join("greenid_hand_cassette_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corrupt.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&path, "corrupt-record", "abc123");
    recorder.record("storage", "get", json!({"key": "user"}), json!({"ok": "{\"name\":\"Guest 1\"}"}));
    recorder.record("entropy", "fill_strong", json!({"count": 4}), json!({"err": "no os rng"}));
    for value in [10, 20, 30, 40, 4096 + 0xA3F] {
        recorder.record("entropy", "next_weak", json!(null), json!(value));
    }
    recorder.record(
        "storage",
        "set",
        json!({"key": "user", "value": "ignored"}),
        json!({"ok": null}),
    );
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(&path).unwrap();
    let resolution = resolve(&ctx);

    assert_eq!(resolution.source, Source::Generated);
    assert_eq!(resolution.identity.player_id, "10-20-30-40");
    assert_eq!(resolution.identity.name, "Guest A3F");
    assert_eq!(resolution.payload, r#"{"player_id":"10-20-30-40","name":"Guest A3F"}"#);

    let _ = std::fs::remove_dir_all(&dir);
}
