//! Command dispatch and handlers.

pub mod diff;
pub mod history;
pub mod promote;
pub mod report;

use tracing::info;

use crate::cli::{Cli, Command};
use crate::config;
use crate::context::ServiceContext;

pub use report::Reporter;

/// Dispatch a parsed command to its handler and print its reports.
///
/// When `DEPLOY_COMPLEXITY_RECORD` names a file, every port interaction is
/// recorded to that cassette.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let git_dir = cli.options.git_dir.as_deref();
    let webhook = config::slack_webhook();
    let ctx = match config::record_path() {
        Some(path) => ServiceContext::recording(&path, git_dir, webhook),
        None => ServiceContext::live(git_dir, webhook),
    };
    if ctx.is_recording() {
        info!("recording port interactions");
    }

    let reports = dispatch_with_context(cli, &ctx)?;
    println!("{}", reports.join("\n\n"));
    Ok(())
}

/// Dispatch a command with the given service context, returning the rendered
/// reports in order.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<Vec<String>, String> {
    let reporter = Reporter::new(ctx, &cli.options)?;
    let branch = crate::pull_request::safe_name(&cli.options.branch);
    match &cli.command {
        Command::Diff { refs } => {
            let (base, to) = Command::diff_range(refs);
            diff::run(ctx, &reporter, branch, base, to)
        }
        Command::History { last } => history::run(ctx, &reporter, branch, *last),
        Command::Promote => promote::run(&reporter),
    }
}
