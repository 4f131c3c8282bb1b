//! Chat renderer producing a Slack message with attachments.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{failure_lines, sections, RenderError, ReportModel, SectionStyle};
use crate::config::ReportConfig;
use crate::pull_request::PullRequestRef;

/// One colored block under the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Section title.
    pub title: String,
    /// Newline-joined section lines.
    pub text: String,
    /// Hex color of the attachment bar.
    pub color: String,
}

/// A rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackMessage {
    /// Header, summary and compare link.
    pub text: String,
    /// One attachment per non-empty section.
    pub attachments: Vec<Attachment>,
}

impl SlackMessage {
    /// Pretty-printed JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Escapes the three characters Slack treats as control sequences.
#[must_use]
pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders a report as a Slack message.
pub struct SlackFormatter<'a> {
    config: &'a ReportConfig,
}

impl<'a> SlackFormatter<'a> {
    /// Creates a formatter using the given link and color configuration.
    #[must_use]
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Renders `model`, falling back to a diagnostic message on failure.
    #[must_use]
    pub fn format(&self, model: &ReportModel) -> SlackMessage {
        if model.is_redeploy() {
            return SlackMessage {
                text: escape(&model.redeployed()),
                attachments: Vec::new(),
            };
        }
        match self.try_format(model) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "failed to format report for chat");
                SlackMessage {
                    text: failure_lines(&err),
                    attachments: Vec::new(),
                }
            }
        }
    }

    fn try_format(&self, model: &ReportModel) -> Result<SlackMessage, RenderError> {
        let text = [
            format!("*{}*", escape(&model.header())),
            escape(&model.summary()),
            self.compare_link(model)?,
        ]
        .join("\n");

        let attachments = sections(self, model)?
            .into_iter()
            .map(|section| Attachment {
                title: section.kind.title().to_string(),
                text: section.items.join("\n"),
                color: self.config.colors.for_kind(section.kind).to_string(),
            })
            .collect();

        Ok(SlackMessage { text, attachments })
    }

    fn link(&self, url: &str, label: &str) -> Result<String, RenderError> {
        if self.config.urls.project_url().is_empty() {
            return Err(RenderError::MissingProjectUrl);
        }
        Ok(format!("<{url}|{}>", escape(label)))
    }
}

impl SectionStyle for SlackFormatter<'_> {
    type Error = RenderError;

    fn compare_link(&self, model: &ReportModel) -> Result<String, RenderError> {
        let urls = &self.config.urls;
        let url = urls.compare(&model.base_reference, &model.to_reference);
        let label = format!("{}...{}", model.base_reference, model.to_reference);
        self.link(&url, &label)
    }

    fn migration(&self, model: &ReportModel, path: &str) -> Result<String, RenderError> {
        let url = self.config.urls.blob(&model.revision, path);
        self.link(&url, path)
    }

    fn pull_request(&self, pr: &PullRequestRef) -> Result<String, RenderError> {
        let url = self.config.urls.pull_request(pr.number);
        let link = self.link(&url, &pr.number.to_string())?;
        Ok(format!("{link} {} {}", pr.joiner, escape(&pr.name)))
    }

    fn text(&self, raw: &str) -> String {
        escape(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::UrlBuilder;
    use crate::report::{fixtures, RENDER_FAILURE};

    const BLOB: &str = "https://example.com/blob/aaaa";

    fn config() -> ReportConfig {
        ReportConfig::new(UrlBuilder::new("https://example.com"))
    }

    fn attachment(title: &str, text: &str, color: &str) -> Attachment {
        Attachment {
            title: title.into(),
            text: text.into(),
            color: color.into(),
        }
    }

    #[test]
    fn redeploy_has_no_attachments() {
        let config = config();
        let message = SlackFormatter::new(&config).format(&fixtures::redeploy());
        assert_eq!(
            message,
            SlackMessage {
                text: "redeployed base_commit after 2.0 hours".into(),
                attachments: vec![],
            }
        );
    }

    #[test]
    fn full_report() {
        let config = config();
        let message = SlackFormatter::new(&config).format(&fixtures::full());
        let migrations = [
            "db/migrate/001_migrate_away.rb",
            "db/migrate/002_migrate_away_again.rb",
        ]
        .map(|path| format!("<{BLOB}/{path}|{path}>"))
        .join("\n");

        assert_eq!(
            message.text,
            "*Deploy tag to_commit [aaaa]*\n\
             2 pull requests of 2 merges, 2 commits after 2.0 hours\n\
             <https://example.com/compare/base_ref...to_ref|base_ref...to_ref>"
        );
        assert_eq!(
            message.attachments,
            vec![
                attachment("Migrations", &migrations, "#E6E6FA"),
                attachment(
                    "Changed Elm Packages",
                    "Updated elm/core: 1.1.0 -&gt; 1.2.0 (elm.json)",
                    "#FFB6C1",
                ),
                attachment(
                    "Changed Ruby Dependencies",
                    "Updated rspec: 3.1.0 -&gt; 3.2.0 (Gemfile.lock)",
                    "#B6FFE0",
                ),
                attachment(
                    "Changed JavaScript Dependencies",
                    "Updated clipboard: 0.0.1 -&gt; 0.0.5 (package-lock.json)",
                    "#B6C6FF",
                ),
                attachment(
                    "Pull Requests",
                    "<https://example.com/pull/1|1> - add-more-cats\n\
                     <https://example.com/pull/2|2> S Do the thing again",
                    "#FFCCB6",
                ),
                attachment("Dirstat", "  60.0% app/\n  40.0% db/", "#D3D3D3"),
                attachment("Stat", " app/cats.rb | 2 +-\n 1 file changed", "#C0C0C0"),
            ]
        );
    }

    #[test]
    fn missing_project_url_falls_back_to_diagnostics() {
        let config = ReportConfig::new(UrlBuilder::new(""));
        let message = SlackFormatter::new(&config).format(&fixtures::full());

        assert!(message.attachments.is_empty());
        let mut lines = message.text.lines();
        assert_eq!(lines.next(), Some(RENDER_FAILURE));
        assert_eq!(lines.next(), Some("no project URL configured for links"));
        assert_eq!(lines.next(), Some("MissingProjectUrl"));
    }

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn payload_serializes_to_json() {
        let config = config();
        let json = SlackFormatter::new(&config)
            .format(&fixtures::full())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["attachments"][0]["title"], "Migrations");
        assert_eq!(value["attachments"][0]["color"], "#E6E6FA");
    }
}
