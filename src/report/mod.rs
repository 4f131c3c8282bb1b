//! The structured deploy report and its renderers.
//!
//! [`ReportModel`] is assembled once per revision range and never mutated.
//! Both renderers walk the same section decision tree in [`sections`]; they
//! differ only in how links and free text are written.

pub mod cli;
pub mod slack;

use thiserror::Error;

use crate::comparator::Comparison;
use crate::manifest::Ecosystem;
use crate::pull_request::PullRequestRef;

pub use cli::CliFormatter;
pub use slack::{Attachment, SlackFormatter, SlackMessage};

/// Text shown in place of a report that failed to render.
pub const RENDER_FAILURE: &str = "something went wrong formatting output";

/// A failure while rendering a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Links cannot be built without a project URL.
    #[error("no project URL configured for links")]
    MissingProjectUrl,
    /// The chat payload could not be serialized.
    #[error("failed to serialize chat payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything known about one `base...to` deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportModel {
    /// Ref currently deployed.
    pub base: String,
    /// Ref being deployed.
    pub to: String,
    /// Abbreviated hash of `to`.
    pub revision: String,
    /// Stable name for `base` used in the compare link.
    pub base_reference: String,
    /// Stable name for `to` used in the compare link.
    pub to_reference: String,
    /// Human-readable time since the previous deploy.
    pub time_delta: String,
    /// One-line summaries of every commit in the range.
    pub commits: Vec<String>,
    /// The subset of `commits` that landed pull requests.
    pub merges: Vec<String>,
    /// Pull requests recovered from `merges`.
    pub pull_requests: Vec<PullRequestRef>,
    /// Added or changed migration paths.
    pub migrations: Vec<String>,
    /// Elm package changes.
    pub elm: Comparison,
    /// Ruby gem changes.
    pub ruby: Comparison,
    /// JavaScript package changes.
    pub javascript: Comparison,
    /// Directory stat block, when requested.
    pub dirstat: Option<String>,
    /// File stat block, when requested.
    pub stat: Option<String>,
}

impl ReportModel {
    /// Dependency changes for one ecosystem.
    #[must_use]
    pub fn dependencies(&self, ecosystem: Ecosystem) -> &Comparison {
        match ecosystem {
            Ecosystem::Elm => &self.elm,
            Ecosystem::Ruby => &self.ruby,
            Ecosystem::Javascript => &self.javascript,
        }
    }

    /// `true` when the range holds no commits at all.
    #[must_use]
    pub fn is_redeploy(&self) -> bool {
        self.commits.is_empty()
    }

    fn header(&self) -> String {
        format!("Deploy tag {} [{}]", self.to, self.revision)
    }

    fn summary(&self) -> String {
        format!(
            "{} pull requests of {} merges, {} commits {}",
            self.pull_requests.len(),
            self.merges.len(),
            self.commits.len(),
            self.time_delta
        )
    }

    fn redeployed(&self) -> String {
        format!("redeployed {} {}", self.base, self.time_delta)
    }
}

/// Kinds of optional report sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Migration links.
    Migrations,
    /// Dependency changes for one ecosystem.
    Dependencies(Ecosystem),
    /// Pull requests in the deploy.
    PullRequests,
    /// Raw commits, when no pull request could be found.
    Commits,
    /// Directory stat block.
    Dirstat,
    /// File stat block.
    Stat,
}

impl SectionKind {
    /// Section title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Migrations => "Migrations",
            Self::Dependencies(ecosystem) => ecosystem.section_title(),
            Self::PullRequests => "Pull Requests",
            Self::Commits => "Commits",
            Self::Dirstat => "Dirstat",
            Self::Stat => "Stat",
        }
    }
}

/// A titled, non-empty list of report lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// What the section holds.
    pub kind: SectionKind,
    /// Rendered lines.
    pub items: Vec<String>,
}

/// Per-renderer formatting of links and free text.
pub(crate) trait SectionStyle {
    /// What building a link can fail with.
    type Error;

    /// Link to the comparison between the two references.
    fn compare_link(&self, model: &ReportModel) -> Result<String, Self::Error>;
    /// Link to a migration file at the deployed revision.
    fn migration(&self, model: &ReportModel, path: &str) -> Result<String, Self::Error>;
    /// One pull-request line.
    fn pull_request(&self, pr: &PullRequestRef) -> Result<String, Self::Error>;
    /// Free text, escaped as the target requires.
    fn text(&self, raw: &str) -> String;
}

/// Builds the optional sections in their fixed order, dropping empty ones.
pub(crate) fn sections<S: SectionStyle>(
    style: &S,
    model: &ReportModel,
) -> Result<Vec<Section>, S::Error> {
    let mut sections = Vec::new();
    let mut push = |kind: SectionKind, items: Vec<String>| {
        if !items.is_empty() {
            sections.push(Section { kind, items });
        }
    };

    push(
        SectionKind::Migrations,
        model
            .migrations
            .iter()
            .map(|path| style.migration(model, path))
            .collect::<Result<_, _>>()?,
    );

    for ecosystem in Ecosystem::ALL {
        let lines = model.dependencies(ecosystem).lines();
        push(
            SectionKind::Dependencies(ecosystem),
            lines.iter().map(|l| style.text(l)).collect(),
        );
    }

    // Commits can land without any detectable pull request; list them raw
    // only when no pull request was found at all.
    if model.pull_requests.is_empty() {
        push(
            SectionKind::Commits,
            model.commits.iter().map(|c| style.text(c)).collect(),
        );
    } else {
        push(
            SectionKind::PullRequests,
            model
                .pull_requests
                .iter()
                .map(|pr| style.pull_request(pr))
                .collect::<Result<_, _>>()?,
        );
    }

    push(
        SectionKind::Dirstat,
        block_lines(style, model.dirstat.as_deref()),
    );
    push(SectionKind::Stat, block_lines(style, model.stat.as_deref()));

    Ok(sections)
}

fn block_lines(style: &impl SectionStyle, block: Option<&str>) -> Vec<String> {
    block
        .map(|raw| {
            raw.lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(|line| style.text(line))
                .collect()
        })
        .unwrap_or_default()
}

/// Diagnostic lines for a report that could not be rendered.
pub(crate) fn failure_lines(err: &RenderError) -> String {
    format!("{RENDER_FAILURE}\n{err}\n{err:?}")
}
