//! Replaying adapter for the `RevisionSource` port.

use std::sync::Mutex;

use super::extract_result;
use crate::cassette::CassetteReplayer;
use crate::ports::{RevisionSource, StatKind};

/// Serves recorded revision queries from a cassette.
///
/// Outputs are matched by method and call order; arguments are not compared.
pub struct ReplayingGitRevisions {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingGitRevisions {
    /// Creates a replaying source from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }

    fn next<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        extract_result(&self.replayer, "git", method)
    }
}

impl RevisionSource for ReplayingGitRevisions {
    fn file_at_revision(
        &self,
        _revision: &str,
        _path: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.next("file_at_revision")
    }

    fn changed_paths(
        &self,
        _base: &str,
        _to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.next("changed_paths")
    }

    fn commits(
        &self,
        _base: &str,
        _to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.next("commits")
    }

    fn short_revision(
        &self,
        _reference: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.next("short_revision")
    }

    fn reference(&self, _name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.next("reference")
    }

    fn diff_stat(
        &self,
        _base: &str,
        _to: &str,
        _kind: StatKind,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.next("diff_stat")
    }

    fn tags(&self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.next("tags")
    }

    fn merge_files(
        &self,
        _commit: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.next("merge_files")
    }

    fn remote_url(&self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.next("remote_url")
    }
}
