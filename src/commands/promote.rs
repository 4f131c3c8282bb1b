//! `deploy-complexity promote` command.

use super::report::Reporter;

/// Ranges a promotion would deploy, in report order.
pub const PROMOTIONS: [(&str, &str); 2] = [
    ("origin/production", "origin/staging"),
    ("origin/staging", "origin/master"),
];

/// Reports on promoting staging to production and master to staging.
///
/// # Errors
///
/// Returns an error string if either report fails.
pub fn run(reporter: &Reporter<'_>) -> Result<Vec<String>, String> {
    PROMOTIONS
        .iter()
        .map(|(base, to)| reporter.report(base, to))
        .collect()
}
