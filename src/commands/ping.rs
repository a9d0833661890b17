//! `greenid ping` command.

use std::io::Write;

use tracing::{info, warn};

use super::provisioner;
use crate::context::ServiceContext;
use crate::identity::{Source, StoragePolicy};
use crate::presence::Roster;
use crate::settings::Settings;

/// Execute the `ping` command: mark the resolved player as present on `team`.
///
/// Prints one line per presence event, then the number of players still
/// present. When storage is unavailable under the in-memory policy the
/// roster holds only this player and nothing is written.
///
/// # Errors
///
/// Returns an error string if provisioning fails, the roster cannot be read
/// or written under the fail-fast policy, or output fails.
pub fn run(ctx: &ServiceContext, settings: &Settings, team: u8, out: &mut dyn Write) -> Result<(), String> {
    let resolution = provisioner(ctx, settings).resolve()?;
    let identity = &resolution.identity;
    let persist = resolution.source != Source::Ephemeral;

    let mut roster = if persist {
        match Roster::load(ctx.storage.as_ref()) {
            Ok(roster) => roster,
            Err(e) => fallback(settings.policy, "read", &e.to_string())?,
        }
    } else {
        Roster::default()
    };

    let now = ctx.clock.now();
    let mut events = roster.mark_seen(&identity.player_id, &identity.name, team, now);
    events.extend(roster.prune(now));

    if persist {
        if let Err(e) = roster.save(ctx.storage.as_ref()) {
            fallback(settings.policy, "write", &e.to_string())?;
        }
    }

    let present = roster.players().count();
    info!(player_id = %identity.player_id, team, present, "player seen");

    let write_err = |e: std::io::Error| format!("Failed to write output: {e}");
    for event in &events {
        writeln!(out, "{event}").map_err(write_err)?;
    }
    writeln!(out, "players: {present}").map_err(write_err)
}

/// Applies the storage policy to a failed roster read or write.
fn fallback(policy: StoragePolicy, action: &str, error: &str) -> Result<Roster, String> {
    match policy {
        StoragePolicy::FailFast => Err(format!("Failed to {action} presence roster: {error}")),
        StoragePolicy::InMemory => {
            warn!(error, "presence roster {action} failed; continuing without it");
            Ok(Roster::default())
        }
    }
}
