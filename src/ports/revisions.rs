//! Revision source port for version-control queries.

use serde::{Deserialize, Serialize};

/// Which `--stat` flavour of a range diff to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Cumulative per-directory line counts.
    Dir,
    /// Per-file insertion/deletion counts.
    Full,
}

/// Read access to the history of the deployed repository.
///
/// Abstracting version control allows deterministic replay and testing
/// without requiring a real repository.
pub trait RevisionSource: Send + Sync {
    /// Returns the content of `path` at `revision`.
    ///
    /// A path that does not exist at `revision` yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision is unknown or the object cannot be read.
    fn file_at_revision(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists the paths touched between `base` and `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be diffed.
    fn changed_paths(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists one-line commit summaries in `to` but not `base`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be walked.
    fn commits(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the abbreviated hash `reference` points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference cannot be resolved.
    fn short_revision(
        &self,
        reference: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns a stable name for a branch: a tag pointing at it whose name
    /// contains the branch name, or its abbreviated hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference cannot be resolved.
    fn reference(&self, name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns a raw stat block for the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be diffed.
    fn diff_stat(
        &self,
        base: &str,
        to: &str,
        kind: StatKind,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists all tags in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the tags cannot be listed.
    fn tags(&self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists the files a merge commit changed relative to its first parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be read.
    fn merge_files(
        &self,
        commit: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns the fetch URL of the `origin` remote, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository configuration cannot be read.
    fn remote_url(&self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;
}
