//! Report configuration: project links and section colors.

use std::env;
use std::path::PathBuf;

use crate::github::UrlBuilder;
use crate::report::SectionKind;

/// Environment variable holding the chat webhook URL.
pub const SLACK_WEBHOOK_VAR: &str = "SLACK_WEBHOOK";
/// Environment variable holding the project URL when `--gh-url` is absent.
pub const PROJECT_URL_VAR: &str = "DEPLOY_COMPLEXITY_GH_URL";
/// Environment variable naming a cassette file to record git interactions to.
pub const RECORD_VAR: &str = "DEPLOY_COMPLEXITY_RECORD";

/// Attachment color for each chat section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionColors {
    /// Migrations section.
    pub migrations: String,
    /// Elm dependency changes.
    pub elm: String,
    /// Ruby dependency changes.
    pub ruby: String,
    /// JavaScript dependency changes.
    pub javascript: String,
    /// Pull requests.
    pub pull_requests: String,
    /// Raw commits, when no pull request was found.
    pub commits: String,
    /// Directory stat block.
    pub dirstat: String,
    /// File stat block.
    pub stat: String,
}

impl Default for SectionColors {
    fn default() -> Self {
        Self {
            migrations: "#E6E6FA".into(),
            elm: "#FFB6C1".into(),
            ruby: "#B6FFE0".into(),
            javascript: "#B6C6FF".into(),
            pull_requests: "#FFCCB6".into(),
            commits: "#FFF3B6".into(),
            dirstat: "#D3D3D3".into(),
            stat: "#C0C0C0".into(),
        }
    }
}

impl SectionColors {
    /// Color for a section kind.
    #[must_use]
    pub fn for_kind(&self, kind: SectionKind) -> &str {
        use crate::manifest::Ecosystem;

        match kind {
            SectionKind::Migrations => &self.migrations,
            SectionKind::Dependencies(Ecosystem::Elm) => &self.elm,
            SectionKind::Dependencies(Ecosystem::Ruby) => &self.ruby,
            SectionKind::Dependencies(Ecosystem::Javascript) => &self.javascript,
            SectionKind::PullRequests => &self.pull_requests,
            SectionKind::Commits => &self.commits,
            SectionKind::Dirstat => &self.dirstat,
            SectionKind::Stat => &self.stat,
        }
    }
}

/// Everything a renderer needs besides the report itself.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Link templates for the project.
    pub urls: UrlBuilder,
    /// Chat attachment colors.
    pub colors: SectionColors,
}

impl ReportConfig {
    /// Config with default colors.
    #[must_use]
    pub fn new(urls: UrlBuilder) -> Self {
        Self {
            urls,
            colors: SectionColors::default(),
        }
    }
}

/// Reads the project URL override from the environment, if set.
#[must_use]
pub fn project_url_from_env() -> Option<String> {
    env::var(PROJECT_URL_VAR)
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Resolves the project URL from the flag, the environment override, or the
/// origin remote, in that order.
///
/// `remote` is only called when neither the flag nor the override is set.
///
/// # Errors
///
/// Returns an error if none of the three yields a URL.
pub fn resolve_project_url(
    flag: Option<&str>,
    from_env: Option<&str>,
    remote: impl FnOnce() -> Option<String>,
) -> Result<UrlBuilder, String> {
    if let Some(url) = flag.or(from_env) {
        return Ok(UrlBuilder::new(url));
    }
    remote()
        .as_deref()
        .and_then(UrlBuilder::from_remote)
        .ok_or_else(|| {
            format!(
                "Could not determine the project URL: pass --gh-url, set {PROJECT_URL_VAR}, \
                 or configure an origin remote"
            )
        })
}

/// Reads the chat webhook URL, if configured.
#[must_use]
pub fn slack_webhook() -> Option<String> {
    env::var(SLACK_WEBHOOK_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Cassette path to record to, if recording is requested.
#[must_use]
pub fn record_path() -> Option<PathBuf> {
    env::var_os(RECORD_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Ecosystem;

    const SSH_REMOTE: &str = "git@github.com:org/app.git";
    const OVERRIDE: &str = "https://example.com/org/app/";

    #[test]
    fn default_colors_per_section() {
        let colors = SectionColors::default();
        let ruby = SectionKind::Dependencies(Ecosystem::Ruby);
        let javascript = SectionKind::Dependencies(Ecosystem::Javascript);
        assert_eq!(colors.for_kind(SectionKind::Migrations), "#E6E6FA");
        assert_eq!(
            colors.for_kind(SectionKind::Dependencies(Ecosystem::Elm)),
            "#FFB6C1"
        );
        assert_eq!(colors.for_kind(ruby), "#B6FFE0");
        assert_eq!(colors.for_kind(javascript), "#B6C6FF");
        assert_eq!(colors.for_kind(SectionKind::PullRequests), "#FFCCB6");
    }

    #[test]
    fn flag_wins_over_environment_and_remote() {
        let urls = resolve_project_url(
            Some("https://example.com/org/app"),
            Some("https://example.com/other/app"),
            || panic!("remote read"),
        )
        .unwrap();
        assert_eq!(urls.project_url(), "https://example.com/org/app");
    }

    #[test]
    fn environment_override_skips_the_remote() {
        let remote = || -> Option<String> { panic!("remote read") };
        let urls = resolve_project_url(None, Some(OVERRIDE), remote).unwrap();
        assert_eq!(urls.project_url(), "https://example.com/org/app");
    }

    #[test]
    fn remote_is_the_last_resort() {
        let remote = || Some(SSH_REMOTE.to_string());
        let urls = resolve_project_url(None, None, remote).unwrap();
        assert_eq!(urls.project_url(), "https://github.com/org/app");
    }

    #[test]
    fn unusable_remote_is_an_error() {
        let remote = || Some("/srv/git/app".to_string());
        let err = resolve_project_url(None, None, remote).unwrap_err();
        assert!(err.starts_with("Could not determine the project URL"));
        assert!(resolve_project_url(None, None, || None).is_err());
    }
}
