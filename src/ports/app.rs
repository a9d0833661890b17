//! UI application port: the external initializer receiving the identity.

use super::PortError;

/// The externally defined UI application entry point.
pub trait UiApp {
    /// Starts the application once with a mount target and opaque startup flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the application could not be started.
    fn init(&self, mount: &str, flags: &str) -> Result<(), PortError>;
}
