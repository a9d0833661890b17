//! Player identity provisioning for the game client bootstrap.
//!
//! On startup the client needs a stable player identity. [`identity`]
//! resolves it from an origin-scoped key-value store, generating and
//! persisting a fresh one when the stored record is missing or invalid,
//! and the `launch` command hands the result to the UI application.
//! [`presence`] tracks which players are around, keyed by the resolved
//! `player_id`.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod identity;
pub mod logger;
pub mod ports;
pub mod presence;
pub mod settings;

use clap::Parser;

use crate::settings::Settings;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing, configuration, or command
/// execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    let settings = Settings::from_env()?.apply_overrides(&cli)?;
    match logger::init(&settings.log_level) {
        // Already installed when embedded or under test.
        Ok(()) | Err(logger::InitError::AlreadySet) => {}
        Err(err) => return Err(err.to_string()),
    }
    commands::dispatch(&cli.command, &settings)
}
