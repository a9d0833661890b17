//! Binary entrypoint for the `greenid` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Settings may come from a local .env file.
    let _ = dotenvy::dotenv();
    match greenid::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
