//! `deploy-complexity history` command.

use tracing::info;

use super::report::{deploy_tags, Reporter};
use crate::context::ServiceContext;

/// Reports on each consecutive pair of deploy tags for `branch`, optionally
/// only the last `last` deploys. Zero means all of them.
///
/// # Errors
///
/// Returns an error string if tags cannot be listed or a report fails.
pub fn run(
    ctx: &ServiceContext,
    reporter: &Reporter<'_>,
    branch: &str,
    last: Option<usize>,
) -> Result<Vec<String>, String> {
    let tags = ctx
        .revisions
        .tags()
        .map_err(|e| format!("Failed to list tags: {e}"))?;
    let deploys = deploy_tags(&tags, branch);
    let deploys = match last {
        Some(n) if n > 0 => &deploys[deploys.len().saturating_sub(n.saturating_add(1))..],
        _ => &deploys[..],
    };
    info!(branch, deploys = deploys.len(), "walking deploy history");

    deploys
        .windows(2)
        .map(|pair| reporter.report(pair[0], pair[1]))
        .collect()
}
