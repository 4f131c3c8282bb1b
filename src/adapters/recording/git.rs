//! Recording adapter for the `RevisionSource` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::CassetteRecorder;
use crate::ports::{RevisionSource, StatKind};

/// Records revision queries while delegating to an inner implementation.
pub struct RecordingGitRevisions {
    inner: Box<dyn RevisionSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGitRevisions {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn RevisionSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<T: Serialize>(
        &self,
        method: &str,
        input: &impl Serialize,
        result: &Result<T, Box<dyn std::error::Error + Send + Sync>>,
    ) {
        record_result(&self.recorder, "git", method, input, result);
    }
}

#[derive(Serialize)]
struct FileInput<'a> {
    revision: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct RangeInput<'a> {
    base: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct StatInput<'a> {
    base: &'a str,
    to: &'a str,
    kind: StatKind,
}

#[derive(Serialize)]
struct RefInput<'a> {
    reference: &'a str,
}

impl RevisionSource for RecordingGitRevisions {
    fn file_at_revision(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.file_at_revision(revision, path);
        let input = FileInput { revision, path };
        self.record("file_at_revision", &input, &result);
        result
    }

    fn changed_paths(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.changed_paths(base, to);
        let input = RangeInput { base, to };
        self.record("changed_paths", &input, &result);
        result
    }

    fn commits(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.commits(base, to);
        self.record("commits", &RangeInput { base, to }, &result);
        result
    }

    fn short_revision(
        &self,
        reference: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.short_revision(reference);
        let input = RefInput { reference };
        self.record("short_revision", &input, &result);
        result
    }

    fn reference(&self, name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.reference(name);
        let input = RefInput { reference: name };
        self.record("reference", &input, &result);
        result
    }

    fn diff_stat(
        &self,
        base: &str,
        to: &str,
        kind: StatKind,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.diff_stat(base, to, kind);
        let input = StatInput { base, to, kind };
        self.record("diff_stat", &input, &result);
        result
    }

    fn tags(&self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.tags();
        self.record("tags", &(), &result);
        result
    }

    fn merge_files(
        &self,
        commit: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.merge_files(commit);
        let input = RefInput { reference: commit };
        self.record("merge_files", &input, &result);
        result
    }

    fn remote_url(&self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.remote_url();
        self.record("remote_url", &(), &result);
        result
    }
}
