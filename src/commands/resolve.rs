//! `greenid resolve` command.

use std::io::Write;

use tracing::info;

use super::provisioner;
use crate::context::ServiceContext;
use crate::settings::Settings;

/// Execute the `resolve` command: print the identity payload on one line.
///
/// # Errors
///
/// Returns an error string if provisioning or writing output fails.
pub fn run(ctx: &ServiceContext, settings: &Settings, out: &mut dyn Write) -> Result<(), String> {
    let resolution = provisioner(ctx, settings).resolve()?;
    info!(source = %resolution.source, player_id = %resolution.identity.player_id, "identity resolved");
    writeln!(out, "{}", resolution.payload).map_err(|e| format!("Failed to write payload: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::clock::LiveClock;
    use crate::adapters::live::entropy::OsEntropy;
    use crate::adapters::live::memory::MemoryStorage;
    use crate::identity::{inspect, StoredIdentity};

    fn memory_context(store: MemoryStorage) -> ServiceContext {
        ServiceContext {
            storage: Box::new(store),
            entropy: Box::new(OsEntropy::with_seed(3)),
            clock: Box::new(LiveClock),
        }
    }

    #[test]
    fn prints_payload_that_matches_storage() {
        let ctx = memory_context(MemoryStorage::new());
        let mut out = Vec::new();
        run(&ctx, &Settings::default(), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        let stored = ctx.storage.get("user").unwrap().unwrap();
        assert_eq!(printed.trim_end(), stored);
        assert!(matches!(inspect(Some(stored.as_str())), StoredIdentity::Valid(_)));
    }

    #[test]
    fn uses_configured_key() {
        let ctx = memory_context(MemoryStorage::with_entries([(
            "player",
            r#"{"player_id":"9-9-9-9","name":"Guest 9"}"#,
        )]));
        let settings = Settings { key: "player".into(), ..Settings::default() };
        let mut out = Vec::new();
        run(&ctx, &settings, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap().trim_end(), r#"{"player_id":"9-9-9-9","name":"Guest 9"}"#);
        assert_eq!(ctx.storage.get("user").unwrap(), None);
    }
}
