//! Live UI application adapters.

use std::process::Command;

use tracing::info;

use crate::ports::{PortError, UiApp};

/// Environment variable carrying the mount target to a spawned application.
pub const MOUNT_ENV: &str = "GREENID_MOUNT";
/// Environment variable carrying the startup flags to a spawned application.
pub const FLAGS_ENV: &str = "GREENID_FLAGS";

/// Starts an external program, passing mount and flags through the environment.
pub struct ProcessApp {
    program: String,
    args: Vec<String>,
}

impl ProcessApp {
    /// Creates an adapter that will run `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl UiApp for ProcessApp {
    fn init(&self, mount: &str, flags: &str) -> Result<(), PortError> {
        info!(program = %self.program, mount, "starting ui application");
        let status = Command::new(&self.program)
            .args(&self.args)
            .env(MOUNT_ENV, mount)
            .env(FLAGS_ENV, flags)
            .status()
            .map_err(|e| format!("failed to start {}: {e}", self.program))?;
        if !status.success() {
            return Err(format!("{} exited with {status}", self.program).into());
        }
        Ok(())
    }
}

/// Writes the startup call as a single JSON line on stdout.
pub struct StdoutApp;

/// Renders `{"node": mount, "flags": flags}`.
#[must_use]
pub fn render_startup(mount: &str, flags: &str) -> String {
    serde_json::json!({ "node": mount, "flags": flags }).to_string()
}

impl UiApp for StdoutApp {
    fn init(&self, mount: &str, flags: &str) -> Result<(), PortError> {
        println!("{}", render_startup(mount, flags));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_line_keeps_flags_opaque() {
        let flags = r#"{"player_id":"1-2-3-4","name":"Guest 1"}"#;
        let line = render_startup("root", flags);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["node"], "root");
        assert_eq!(parsed["flags"], flags);
    }

    #[test]
    fn process_app_receives_environment() {
        let app = ProcessApp::new(
            "sh",
            vec!["-c".into(), format!("test \"${MOUNT_ENV}\" = root && test -n \"${FLAGS_ENV}\"")],
        );
        app.init("root", "{}").unwrap();
    }

    #[test]
    fn process_app_reports_failure_exit() {
        let app = ProcessApp::new("sh", vec!["-c".into(), "exit 3".into()]);
        let err = app.init("root", "{}").unwrap_err();
        assert!(err.to_string().contains("exited"));
    }
}
