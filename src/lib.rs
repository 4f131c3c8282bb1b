//! Core library entry for the `deploy-complexity` CLI.
//!
//! A report describes one deploy: the commits and pull requests between two
//! revisions, the migrations they add, and the third-party dependencies they
//! change across Elm, Ruby and JavaScript manifests.

pub mod adapters;
pub mod cassette;
pub mod changed_files;
pub mod cli;
pub mod commands;
pub mod comparator;
pub mod config;
pub mod context;
pub mod dependency;
pub mod deploy;
pub mod github;
pub mod manifest;
pub mod ports;
pub mod pull_request;
pub mod report;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    dotenvy::dotenv().ok();
    init_logging();
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => return Err(err.to_string()),
        },
    };
    commands::dispatch(&cli)
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["deploy-complexity", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_prints_version() {
        assert!(run(["deploy-complexity", "--version"]).is_ok());
    }

    #[test]
    fn run_errors_without_subcommand() {
        assert!(run(["deploy-complexity"]).is_err());
    }

    #[test]
    fn logging_can_be_initialized_twice() {
        super::init_logging();
        super::init_logging();
    }
}
