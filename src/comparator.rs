//! Dependency comparison across two revisions.

use thiserror::Error;
use tracing::{debug, warn};

use crate::dependency::{self, DependencyRecord};
use crate::manifest::{ManifestParseError, ManifestParser};
use crate::ports::RevisionSource;

/// A failure while comparing one manifest across revisions.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// The revision source could not produce the file content.
    #[error("failed to read {file} at {revision}: {message}")]
    Fetch {
        /// Manifest path.
        file: String,
        /// Revision being read.
        revision: String,
        /// Error reported by the revision source.
        message: String,
    },
    /// The content was read but is malformed.
    #[error(transparent)]
    Parse(#[from] ManifestParseError),
}

/// Outcome of comparing one ecosystem's manifests.
///
/// A failed comparison is data, not an error: it renders as diagnostic
/// text in the report instead of aborting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Changed packages, per file in file order, each file sorted by name.
    Changes(Vec<DependencyRecord>),
    /// The comparison stopped at an error.
    Failed {
        /// One-line error message.
        message: String,
        /// Detailed error description.
        trace: String,
    },
}

impl Comparison {
    /// A comparison with nothing to report.
    #[must_use]
    pub fn empty() -> Self {
        Self::Changes(Vec::new())
    }

    /// Report lines: one per change, or the two diagnostic lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Changes(records) => records.iter().map(ToString::to_string).collect(),
            Self::Failed { message, trace } => vec![message.clone(), trace.clone()],
        }
    }

    /// `true` when there is nothing to render.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Changes(records) if records.is_empty())
    }
}

/// Fetches manifests at two revisions and diffs them.
pub struct RevisionComparator<'a> {
    source: &'a dyn RevisionSource,
}

impl<'a> RevisionComparator<'a> {
    /// Creates a comparator reading file content from `source`.
    #[must_use]
    pub fn new(source: &'a dyn RevisionSource) -> Self {
        Self { source }
    }

    /// Compares every file in `files` between `base` and `to`.
    ///
    /// Never fails: any fetch or parse error turns the whole result into
    /// [`Comparison::Failed`].
    #[must_use]
    pub fn compare(
        &self,
        parser: &dyn ManifestParser,
        files: &[String],
        base: &str,
        to: &str,
    ) -> Comparison {
        match self.try_compare(parser, files, base, to) {
            Ok(records) => Comparison::Changes(records),
            Err(err) => {
                warn!(error = %err, "dependency comparison failed");
                Comparison::Failed {
                    message: err.to_string(),
                    trace: format!("{err:?}"),
                }
            }
        }
    }

    fn try_compare(
        &self,
        parser: &dyn ManifestParser,
        files: &[String],
        base: &str,
        to: &str,
    ) -> Result<Vec<DependencyRecord>, ComparisonError> {
        let mut records = Vec::new();
        for file in files {
            let old = self.fetch(base, file)?;
            let new = self.fetch(to, file)?;
            let old = parser.parse(file, &old)?;
            let new = parser.parse(file, &new)?;
            let changes = dependency::diff(&old, &new, file);
            debug!(file = %file, changes = changes.len(), "compared manifest");
            records.extend(changes);
        }
        Ok(records)
    }

    fn fetch(&self, revision: &str, file: &str) -> Result<String, ComparisonError> {
        self.source
            .file_at_revision(revision, file)
            .map_err(|e| ComparisonError::Fetch {
                file: file.to_string(),
                revision: revision.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::manifest::{Ecosystem, ManifestSnapshot};
    use crate::ports::StatKind;

    type PortResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

    /// Serves file content from a map; `None` entries fail the fetch.
    struct FakeRevisions {
        files: HashMap<(String, String), Option<String>>,
    }

    impl FakeRevisions {
        fn new(entries: &[(&str, &str, Option<&str>)]) -> Self {
            let files = entries
                .iter()
                .map(|(rev, path, content)| {
                    (((*rev).to_string(), (*path).to_string()), (*content).map(String::from))
                })
                .collect();
            Self { files }
        }
    }

    impl RevisionSource for FakeRevisions {
        fn file_at_revision(&self, revision: &str, path: &str) -> PortResult<String> {
            match self.files.get(&(revision.to_string(), path.to_string())) {
                Some(Some(content)) => Ok(content.clone()),
                Some(None) => Err("bad bad".into()),
                None => Ok(String::new()),
            }
        }
        fn changed_paths(&self, _base: &str, _to: &str) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn commits(&self, _base: &str, _to: &str) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn short_revision(&self, reference: &str) -> PortResult<String> {
            Ok(reference.to_string())
        }
        fn reference(&self, name: &str) -> PortResult<String> {
            Ok(name.to_string())
        }
        fn diff_stat(&self, _base: &str, _to: &str, _kind: StatKind) -> PortResult<String> {
            Ok(String::new())
        }
        fn tags(&self) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn merge_files(&self, _commit: &str) -> PortResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn remote_url(&self) -> PortResult<Option<String>> {
            Ok(None)
        }
    }

    /// Treats the content `new` as a manifest with one dependency.
    struct FakeParser;

    impl ManifestParser for FakeParser {
        fn parse(
            &self,
            _file: &str,
            content: &str,
        ) -> Result<ManifestSnapshot, ManifestParseError> {
            let mut snapshot = ManifestSnapshot::new();
            if content == "new" {
                snapshot.insert("a_cool_dependency".into(), "4.2".into());
            }
            Ok(snapshot)
        }
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn outputs_changes() {
        let source = FakeRevisions::new(&[("bbb", "file.txt", Some("new"))]);
        let comparator = RevisionComparator::new(&source);
        let manifests = files(&["file.txt"]);
        let comparison = comparator.compare(&FakeParser, &manifests, "aaa", "bbb");
        let lines = comparison.lines();
        assert_eq!(lines, vec!["Added a_cool_dependency: 4.2 (file.txt)"]);
    }

    #[test]
    fn fetch_error_degrades_to_diagnostic_lines() {
        let source = FakeRevisions::new(&[("aaa", "file.txt", None)]);
        let comparator = RevisionComparator::new(&source);
        let manifests = files(&["file.txt"]);
        let comparison = comparator.compare(&FakeParser, &manifests, "aaa", "bbb");

        let lines = comparison.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "failed to read file.txt at aaa: bad bad");
        assert!(lines[1].contains("Fetch"));
        assert!(!comparison.is_empty());
    }

    #[test]
    fn parse_error_degrades_to_diagnostic_lines() {
        let source = FakeRevisions::new(&[
            ("aaa", "frontend/elm.json", Some("{ not json")),
            ("bbb", "frontend/elm.json", Some("{}")),
        ]);
        let comparison = RevisionComparator::new(&source).compare(
            Ecosystem::Elm.parser(),
            &files(&["frontend/elm.json"]),
            "aaa",
            "bbb",
        );

        match comparison {
            Comparison::Failed { message, trace } => {
                assert!(message.starts_with("frontend/elm.json: invalid JSON"));
                assert!(trace.contains("Json"));
            }
            Comparison::Changes(_) => panic!("expected a failed comparison"),
        }
    }

    #[test]
    fn missing_files_count_as_empty_manifests() {
        let added = r#"{"dependencies": {"left-pad": {"version": "1.3.0"}}}"#;
        let removed = r#"{"dependencies": {"right-pad": {"version": "0.1.0"}}}"#;
        let source = FakeRevisions::new(&[
            ("bbb", "web/package-lock.json", Some(added)),
            ("aaa", "old/package-lock.json", Some(removed)),
        ]);

        let comparison = RevisionComparator::new(&source).compare(
            Ecosystem::Javascript.parser(),
            &files(&["web/package-lock.json", "old/package-lock.json"]),
            "aaa",
            "bbb",
        );

        assert_eq!(
            comparison.lines(),
            vec![
                "Added left-pad: 1.3.0 (web/package-lock.json)",
                "Removed right-pad: 0.1.0 (old/package-lock.json)",
            ]
        );
    }

    #[test]
    fn no_files_is_empty() {
        let source = FakeRevisions::new(&[]);
        let comparator = RevisionComparator::new(&source);
        let comparison = comparator.compare(&FakeParser, &[], "aaa", "bbb");
        assert!(comparison.is_empty());
        assert_eq!(comparison, Comparison::empty());
    }
}
