//! Link templates for the hosted project.

/// Builds comparison, blob and pull-request URLs under one project URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    project_url: String,
}

impl UrlBuilder {
    /// Creates a builder for `project_url`, e.g. `https://github.com/org/repo`.
    pub fn new(project_url: impl Into<String>) -> Self {
        let project_url: String = project_url.into();
        Self {
            project_url: project_url.trim_end_matches('/').to_string(),
        }
    }

    /// The project URL links are built under.
    #[must_use]
    pub fn project_url(&self) -> &str {
        &self.project_url
    }

    /// `<project>/compare/<from>...<to>`
    #[must_use]
    pub fn compare(&self, from: &str, to: &str) -> String {
        format!("{}/compare/{from}...{to}", self.project_url)
    }

    /// `<project>/blob/<revision>/<path>`
    #[must_use]
    pub fn blob(&self, revision: &str, path: &str) -> String {
        format!("{}/blob/{revision}/{path}", self.project_url)
    }

    /// `<project>/pull/<number>`
    #[must_use]
    pub fn pull_request(&self, number: u64) -> String {
        format!("{}/pull/{number}", self.project_url)
    }

    /// Derives a web URL from an `origin` remote URL.
    ///
    /// Accepts `git@host:org/repo.git` and `https://host/org/repo(.git)`.
    #[must_use]
    pub fn from_remote(remote: &str) -> Option<Self> {
        let remote = remote.trim();
        let remote = remote.strip_suffix(".git").unwrap_or(remote);

        if let Some(rest) = remote.strip_prefix("git@") {
            let (host, path) = rest.split_once(':')?;
            return Some(Self::new(format!("https://{host}/{path}")));
        }
        if remote.starts_with("https://") || remote.starts_with("http://") {
            return Some(Self::new(remote));
        }
        None
    }
}
