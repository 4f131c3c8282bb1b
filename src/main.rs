//! Binary entrypoint for the `deploy-complexity` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording is handled in commands::dispatch via DEPLOY_COMPLEXITY_RECORD=<file>.
    match deploy_complexity::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
