//! Replaying adapter for the `KeyValueStore` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{KeyValueStore, PortError};

/// Replays recorded storage operations from a cassette.
pub struct ReplayingStorage {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingStorage {
    /// Creates a new replaying store from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl KeyValueStore for ReplayingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, PortError> {
        let output = next_output(&self.replayer, "storage", "get");
        replay_result(&output, "storage::get")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "storage", "set");
        replay_result(&output, "storage::set")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[test]
    fn replays_values_and_errors() {
        let replayer = make_replayer(vec![
            Interaction {
                seq: 0,
                port: "storage".into(),
                method: "get".into(),
                input: json!({"key": "user"}),
                output: json!({"ok": "stored"}),
            },
            Interaction {
                seq: 1,
                port: "storage".into(),
                method: "get".into(),
                input: json!({"key": "user"}),
                output: json!({"ok": null}),
            },
            Interaction {
                seq: 2,
                port: "storage".into(),
                method: "set".into(),
                input: json!({"key": "user", "value": "x"}),
                output: json!({"err": "quota exceeded"}),
            },
        ]);
        let store = ReplayingStorage::new(replayer);
        assert_eq!(store.get("user").unwrap().as_deref(), Some("stored"));
        assert_eq!(store.get("user").unwrap(), None);
        assert_eq!(store.set("user", "x").unwrap_err().to_string(), "quota exceeded");
    }
}
