//! `deploy-complexity diff` command.

use tracing::info;

use super::report::{deploy_tags, Reporter};
use crate::context::ServiceContext;

/// Reports on `base...to`, defaulting `base` to the latest deploy tag of `branch`.
///
/// # Errors
///
/// Returns an error string if no base can be found or the report fails.
pub fn run(
    ctx: &ServiceContext,
    reporter: &Reporter<'_>,
    branch: &str,
    base: Option<&str>,
    to: &str,
) -> Result<Vec<String>, String> {
    let base = match base {
        Some(base) => base.to_string(),
        None => latest_deploy(ctx, branch)?,
    };
    info!(base, to, "diffing");
    Ok(vec![reporter.report(&base, to)?])
}

fn latest_deploy(ctx: &ServiceContext, branch: &str) -> Result<String, String> {
    let tags = ctx
        .revisions
        .tags()
        .map_err(|e| format!("Failed to list tags: {e}"))?;
    let Some(latest) = deploy_tags(&tags, branch).last().copied() else {
        return Err(format!(
            "No deploy tags found for branch {branch}; pass BASE explicitly"
        ));
    };
    Ok(latest.to_string())
}
