//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;

/// Top-level CLI parser for `deploy-complexity`.
#[derive(Debug, Parser)]
#[command(
    name = "deploy-complexity",
    version,
    about = "Describe the commits, migrations and dependency changes in a deploy"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
    /// Options shared by every command.
    #[command(flatten)]
    pub options: GlobalOptions,
}

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Deploy branch whose tags mark past deploys.
    #[arg(short, long, global = true, default_value = "production")]
    pub branch: String,
    /// Include statistics on directory changes.
    #[arg(long, global = true)]
    pub dirstat: bool,
    /// Include statistics on file changes.
    #[arg(long, global = true)]
    pub stat: bool,
    /// Project directory to run git commands in.
    #[arg(long, global = true, value_name = "DIR")]
    pub git_dir: Option<PathBuf>,
    /// Project URL to build links from.
    #[arg(long, global = true, value_name = "URL")]
    pub gh_url: Option<String>,
    /// Only count merges that change a file matching this regex.
    #[arg(long, global = true, value_name = "REGEX", value_parser = parse_pattern)]
    pub pattern: Option<Regex>,
    /// Post the report to this Slack channel; may be repeated.
    #[arg(long = "slack", global = true, value_name = "CHANNEL")]
    pub slack_channels: Vec<String>,
    /// Output format written to stdout.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Cli)]
    pub format: OutputFormat,
}

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text sections.
    Cli,
    /// The chat payload as pretty JSON.
    Slack,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report on `BASE...TO`; BASE defaults to the latest deploy tag.
    Diff {
        /// `[BASE] TO`
        #[arg(value_name = "REF", num_args = 1..=2, required = true)]
        refs: Vec<String>,
    },
    /// Report on past deploys of the branch.
    History {
        /// Only the last N deploys.
        #[arg(short = 'n', long = "last", value_name = "N")]
        last: Option<usize>,
    },
    /// Report on what promoting staging and master would deploy.
    Promote,
}

impl Command {
    /// Splits `diff` refs into an optional base and the deployed ref.
    #[must_use]
    pub fn diff_range(refs: &[String]) -> (Option<&str>, &str) {
        match refs {
            [base, to] => (Some(base.as_str()), to.as_str()),
            [to] => (None, to.as_str()),
            _ => (None, ""),
        }
    }
}

fn parse_pattern(raw: &str) -> Result<Regex, regex::Error> {
    Regex::new(raw)
}
