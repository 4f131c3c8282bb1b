//! Assembles a [`ReportModel`] for one `base...to` deploy.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info};

use crate::changed_files::ChangedFileSet;
use crate::comparator::RevisionComparator;
use crate::manifest::Ecosystem;
use crate::ports::{RevisionSource, StatKind};
use crate::pull_request::{self, safe_name};
use crate::report::ReportModel;

/// `production-2016-10-22-0103`
static DEPLOY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(\d{4}-\d{2}-\d{2}-\d{4})").expect("deploy tag pattern is valid")
});

/// Optional extras for a report.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Include the per-directory stat block.
    pub dirstat: bool,
    /// Include the per-file stat block.
    pub stat: bool,
    /// Only count merges that touch a file matching this pattern.
    pub pattern: Option<Regex>,
}

/// Gathers everything the report needs from the revision source.
pub struct Deploy<'a> {
    source: &'a dyn RevisionSource,
    options: &'a DeployOptions,
}

impl<'a> Deploy<'a> {
    /// Creates a deploy reader over `source`.
    #[must_use]
    pub fn new(source: &'a dyn RevisionSource, options: &'a DeployOptions) -> Self {
        Self { source, options }
    }

    /// Builds the report for deploying `to` on top of `base`.
    ///
    /// Dependency comparison failures are captured in the model; only
    /// failures to read the range itself are returned.
    ///
    /// # Errors
    ///
    /// Returns an error string if commits, paths or references cannot be read.
    pub fn generate(&self, base: &str, to: &str) -> Result<ReportModel, String> {
        info!(base, to, "generating deploy report");
        let range = format!("{base}...{to}");

        let revision = self
            .source
            .short_revision(to)
            .map_err(|e| format!("Failed to resolve revision {to}: {e}"))?;
        let time_delta = time_between_deploys(safe_name(base), safe_name(to));

        let commits = self
            .source
            .commits(base, to)
            .map_err(|e| format!("Failed to list commits in {range}: {e}"))?;
        let merges = self.merges(&commits)?;
        let pull_requests = pull_request::pull_requests(&merges);
        debug!(
            commits = commits.len(),
            merges = merges.len(),
            "walked range"
        );

        let paths = self
            .source
            .changed_paths(base, to)
            .map_err(|e| format!("Failed to list changed files in {range}: {e}"))?;
        let changed = ChangedFileSet::classify(paths);

        let dirstat = self.stat_block(base, to, StatKind::Dir, self.options.dirstat)?;
        let stat = self.stat_block(base, to, StatKind::Full, self.options.stat)?;

        let base_reference = self
            .source
            .reference(base)
            .map_err(|e| format!("Failed to resolve reference {base}: {e}"))?;
        let to_reference = self
            .source
            .reference(to)
            .map_err(|e| format!("Failed to resolve reference {to}: {e}"))?;

        let comparator = RevisionComparator::new(self.source);
        let [elm, ruby, javascript] = Ecosystem::ALL.map(|ecosystem| {
            let files = changed.manifests(ecosystem);
            comparator.compare(ecosystem.parser(), files, base, to)
        });

        Ok(ReportModel {
            base: base.to_string(),
            to: to.to_string(),
            revision,
            base_reference,
            to_reference,
            time_delta,
            commits,
            merges,
            pull_requests,
            migrations: changed.migrations,
            elm,
            ruby,
            javascript,
            dirstat,
            stat,
        })
    }

    fn merges(&self, commits: &[String]) -> Result<Vec<String>, String> {
        let merges = commits.iter().filter(|line| pull_request::is_merge(line));
        let Some(pattern) = &self.options.pattern else {
            return Ok(merges.cloned().collect());
        };

        let mut matching = Vec::new();
        for line in merges {
            let hash = line.split_whitespace().next().unwrap_or_default();
            let files = self
                .source
                .merge_files(hash)
                .map_err(|e| format!("Failed to list files changed by {hash}: {e}"))?;
            if files.iter().any(|file| pattern.is_match(file)) {
                matching.push(line.clone());
            }
        }
        Ok(matching)
    }

    fn stat_block(
        &self,
        base: &str,
        to: &str,
        kind: StatKind,
        wanted: bool,
    ) -> Result<Option<String>, String> {
        if !wanted {
            return Ok(None);
        }
        let range = format!("{base}...{to}");
        self.source
            .diff_stat(base, to, kind)
            .map(Some)
            .map_err(|e| format!("Failed to get {kind:?} stat for {range}: {e}"))
    }
}

/// Parses the timestamp embedded in a deploy tag.
#[must_use]
pub fn parse_when(tag: &str) -> Option<NaiveDateTime> {
    let caps = DEPLOY_TIME.captures(tag)?;
    let stamp = &caps[1];
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d-%H%M").ok()
}

/// Describes the time between two deploy tags.
#[must_use]
pub fn time_between_deploys(from: &str, to: &str) -> String {
    let (Some(last), Some(deploy)) = (parse_when(from), parse_when(to)) else {
        return "pending deploy".to_string();
    };

    #[allow(clippy::cast_precision_loss)]
    let hours = (deploy - last).num_minutes() as f64 / 60.0;
    if hours < 24.0 {
        format!("after {hours:.1} hours")
    } else {
        format!("after {:.1} days", hours / 24.0)
    }
}
