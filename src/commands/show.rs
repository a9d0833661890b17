//! `greenid show` command.

use std::io::Write;

use super::provisioner;
use crate::context::ServiceContext;
use crate::identity::{is_composite_player_id, parse_guest_number, StoredIdentity};
use crate::settings::Settings;

/// Execute the `show` command.
///
/// Reports whether a valid identity is stored under the configured key
/// without writing to storage.
///
/// # Errors
///
/// Returns an error string if storage cannot be read or output fails.
pub fn run(ctx: &ServiceContext, settings: &Settings, out: &mut dyn Write) -> Result<(), String> {
    let (_, status) = provisioner(ctx, settings).inspect_only()?;
    let write_err = |e: std::io::Error| format!("Failed to write output: {e}");

    match status {
        StoredIdentity::Valid(identity) => {
            writeln!(out, "status:    valid").map_err(write_err)?;
            writeln!(out, "player_id: {}", identity.player_id).map_err(write_err)?;
            writeln!(out, "name:      {}", identity.name).map_err(write_err)?;
            if !is_composite_player_id(&identity.player_id) {
                writeln!(out, "note:      player_id is not in the generated format").map_err(write_err)?;
            }
            if parse_guest_number(&identity.name).is_none() {
                writeln!(out, "note:      custom display name").map_err(write_err)?;
            }
        }
        StoredIdentity::Invalid(rejection) => {
            writeln!(out, "status:    invalid ({rejection})").map_err(write_err)?;
            writeln!(out, "a new identity will be generated on next launch").map_err(write_err)?;
        }
    }
    Ok(())
}
