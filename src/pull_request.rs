//! Pull-request references recovered from one-line commit summaries.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static MERGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Merges|#\d+").expect("merge pattern is valid"));

/// `abc1234 Merge pull request #123 from org/branch`
static MERGE_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pull request #(\d+) from (.*)$").expect("merge commit pattern is valid")
});

/// `abc1234 Subject of the squashed branch (#123)`
static SQUASH_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(.*)\(#(\d+)\)\s*$").expect("squash commit pattern is valid")
});

/// How a pull request landed on the deployed branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    /// A merge commit.
    Merge,
    /// A squash merge.
    Squash,
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merge => "-",
            Self::Squash => "S",
        })
    }
}

/// A pull request included in a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Pull request number.
    pub number: u64,
    /// Provenance marker.
    pub joiner: Joiner,
    /// Branch name for merges, subject for squashes.
    pub name: String,
}

impl PullRequestRef {
    /// Extracts a reference from one commit summary line.
    ///
    /// The merge-commit form takes precedence: a merge whose branch name
    /// happens to end in `(#N)` is still a merge of its own number.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = MERGE_COMMIT.captures(line) {
            return Some(Self {
                number: caps[1].parse().ok()?,
                joiner: Joiner::Merge,
                name: safe_name(&caps[2]).to_string(),
            });
        }
        let caps = SQUASH_COMMIT.captures(line)?;
        Some(Self {
            number: caps[3].parse().ok()?,
            joiner: Joiner::Squash,
            name: caps[2].trim().to_string(),
        })
    }
}

/// `true` for summary lines that look like they landed a pull request.
#[must_use]
pub fn is_merge(line: &str) -> bool {
    MERGE_LINE.is_match(line)
}

/// References for every merge line that names a pull request.
#[must_use]
pub fn pull_requests(merges: &[String]) -> Vec<PullRequestRef> {
    merges
        .iter()
        .filter_map(|line| PullRequestRef::parse(line))
        .collect()
}

/// Strips trailing newlines and a leading `origin/` from a ref name.
#[must_use]
pub fn safe_name(name: &str) -> &str {
    let name = name.trim_end_matches(['\n', '\r']);
    name.strip_prefix("origin/").unwrap_or(name)
}
