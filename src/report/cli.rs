//! Plain-text renderer for terminals.

use std::convert::Infallible;

use super::{sections, ReportModel, SectionStyle};
use crate::config::ReportConfig;
use crate::pull_request::PullRequestRef;

/// Renders a report as blank-line separated plain-text sections.
///
/// Links are written as bare URLs, so rendering cannot fail.
pub struct CliFormatter<'a> {
    config: &'a ReportConfig,
}

impl<'a> CliFormatter<'a> {
    /// Creates a formatter using the given link and color configuration.
    #[must_use]
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Renders `model`.
    #[must_use]
    pub fn format(&self, model: &ReportModel) -> String {
        if model.is_redeploy() {
            return model.redeployed();
        }
        let compare = self.compare_link(model).unwrap_or_else(unreachable);
        let sections = sections(self, model).unwrap_or_else(unreachable);

        let mut blocks = vec![[model.header(), model.summary(), compare].join("\n")];
        let bodies = sections.into_iter().map(|section| {
            let items = section.items.join("\n");
            format!("{}\n{items}", section.kind.title())
        });
        blocks.extend(bodies);
        blocks.join("\n\n")
    }
}

fn unreachable<T>(never: Infallible) -> T {
    match never {}
}

impl SectionStyle for CliFormatter<'_> {
    type Error = Infallible;

    fn compare_link(&self, model: &ReportModel) -> Result<String, Infallible> {
        let urls = &self.config.urls;
        Ok(urls.compare(&model.base_reference, &model.to_reference))
    }

    fn migration(&self, model: &ReportModel, path: &str) -> Result<String, Infallible> {
        Ok(self.config.urls.blob(&model.revision, path))
    }

    fn pull_request(&self, pr: &PullRequestRef) -> Result<String, Infallible> {
        Ok(format!(
            "{} {} {}",
            self.config.urls.pull_request(pr.number),
            pr.joiner,
            pr.name
        ))
    }

    fn text(&self, raw: &str) -> String {
        raw.to_string()
    }
}
