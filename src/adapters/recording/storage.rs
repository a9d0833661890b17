//! Recording adapter for the `KeyValueStore` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{KeyValueStore, PortError};

/// Records storage interactions while delegating to an inner implementation.
pub struct RecordingStorage {
    inner: Box<dyn KeyValueStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingStorage {
    /// Creates a new recording store wrapping the given implementation.
    pub fn new(inner: Box<dyn KeyValueStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct GetInput<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct SetInput<'a> {
    key: &'a str,
    value: &'a str,
}

impl KeyValueStore for RecordingStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PortError> {
        let result = self.inner.get(key);
        record_result(&self.recorder, "storage", "get", &GetInput { key }, &result);
        result
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortError> {
        let result = self.inner.set(key, value);
        record_result(&self.recorder, "storage", "set", &SetInput { key, value }, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::memory::MemoryStorage;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_get_and_set() {
        let dir = std::env::temp_dir().join("greenid_rec_storage_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storage.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));
        {
            let store =
                RecordingStorage::new(Box::new(MemoryStorage::new()), Arc::clone(&recorder));
            assert_eq!(store.get("user").unwrap(), None);
            store.set("user", "payload").unwrap();
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].method, "get");
        assert_eq!(cassette.interactions[0].output, serde_json::json!({"ok": null}));
        assert_eq!(cassette.interactions[1].input["value"], "payload");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
