//! `greenid launch` command.

use tracing::info;

use super::provisioner;
use crate::context::ServiceContext;
use crate::ports::UiApp;
use crate::settings::Settings;

/// Execute the `launch` command: resolve the identity, then start `app` once.
///
/// # Errors
///
/// Returns an error string if provisioning fails or the application cannot start.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    mount: &str,
    app: &dyn UiApp,
) -> Result<(), String> {
    let resolution = provisioner(ctx, settings).resolve()?;
    info!(source = %resolution.source, mount, "handing identity to ui application");
    app.init(mount, &resolution.payload)
        .map_err(|e| format!("Failed to start UI application: {e}"))
}
