//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::presence::MAX_TEAM;

/// Top-level CLI parser for `greenid`.
#[derive(Debug, Parser)]
#[command(name = "greenid", version, about = "Provision a player identity and start the game client")]
pub struct Cli {
    /// Directory holding per-origin store files.
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,
    /// Origin the store is scoped to.
    #[arg(long, global = true)]
    pub origin: Option<String>,
    /// Storage key of the identity record.
    #[arg(long, global = true)]
    pub key: Option<String>,
    /// Fail instead of continuing with a non-persisted identity when storage is unavailable.
    #[arg(long, global = true)]
    pub strict: bool,
    /// Log filter directive (overridden by `RUST_LOG`).
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the player identity and print its payload.
    Resolve,
    /// Resolve the player identity and start the UI application with it.
    Launch {
        /// Mount target passed to the application.
        #[arg(long, default_value = "root")]
        mount: String,
        /// Program (and arguments) to start; prints the startup call when omitted.
        #[arg(last = true, value_name = "PROGRAM")]
        program: Vec<String>,
    },
    /// Show the stored identity without modifying storage.
    Show,
    /// Mark the player as present and drop players that went silent.
    Ping {
        /// Side to join: 1 or 2, or 0 to keep the current one.
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_TEAM)))]
        team: u8,
    },
}
