//! Command dispatch and handlers.

pub mod launch;
pub mod ping;
pub mod resolve;
pub mod show;

use std::io::Write;

use tracing::info;

use crate::adapters::live::app::{ProcessApp, StdoutApp};
use crate::cli::Command;
use crate::context::ServiceContext;
use crate::identity::Provisioner;
use crate::ports::UiApp;
use crate::settings::Settings;

/// Dispatch a parsed command to its handler.
///
/// When `settings.record_dir` is set, storage, entropy and clock interactions are
/// recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command, settings: &Settings) -> Result<(), String> {
    let (ctx, session) = match &settings.record_dir {
        Some(dir) => {
            let (ctx, session) = ServiceContext::recording_at(settings, dir)?;
            (ctx, Some(session))
        }
        None => (ServiceContext::live(settings)?, None),
    };

    let mut stdout = std::io::stdout().lock();
    let result = dispatch_with_context(command, &ctx, settings, &mut stdout);

    // Finish recording after the command completes, even on error.
    if let Some(session) = session {
        drop(ctx);
        let dir = session.finish()?;
        info!(dir = %dir.display(), "recording saved");
    }

    result
}

/// Dispatch a command with the given service context, writing output to `out`.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Command::Resolve => resolve::run(ctx, settings, out),
        Command::Launch { mount, program } => {
            let app: Box<dyn UiApp> = match program.split_first() {
                Some((program, args)) => Box::new(ProcessApp::new(program.as_str(), args.to_vec())),
                None => Box::new(StdoutApp),
            };
            launch::run(ctx, settings, mount, app.as_ref())
        }
        Command::Show => show::run(ctx, settings, out),
        Command::Ping { team } => ping::run(ctx, settings, *team, out),
    }
}

/// Builds a provisioner over the context's ports.
fn provisioner<'a>(ctx: &'a ServiceContext, settings: &Settings) -> Provisioner<'a> {
    Provisioner::new(ctx.storage.as_ref(), ctx.entropy.as_ref(), &settings.key, settings.policy)
}
