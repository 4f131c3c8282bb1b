//! Shared report generation, rendering and chat delivery.

use tokio::runtime::{Builder, Runtime};
use tracing::warn;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::{self, ReportConfig};
use crate::context::ServiceContext;
use crate::deploy::{Deploy, DeployOptions};
use crate::report::{CliFormatter, SlackFormatter, SlackMessage};

/// Turns revision ranges into rendered reports for one invocation.
pub struct Reporter<'a> {
    ctx: &'a ServiceContext,
    config: ReportConfig,
    deploy: DeployOptions,
    format: OutputFormat,
    channels: Vec<String>,
    runtime: Option<Runtime>,
}

impl<'a> Reporter<'a> {
    /// Resolves links and delivery settings for `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if no project URL can be determined. The origin
    /// remote is only read when neither `--gh-url` nor the environment
    /// override names one.
    pub fn new(ctx: &'a ServiceContext, options: &GlobalOptions) -> Result<Self, String> {
        let flag = options.gh_url.as_deref();
        let from_env = config::project_url_from_env();
        let urls = config::resolve_project_url(flag, from_env.as_deref(), || {
            ctx.revisions.remote_url().unwrap_or_else(|e| {
                warn!(error = %e, "could not read the origin remote");
                None
            })
        })?;

        let runtime = if options.slack_channels.is_empty() {
            None
        } else {
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => Some(runtime),
                Err(e) => {
                    warn!(error = %e, "could not start async runtime, chat delivery disabled");
                    None
                }
            }
        };

        Ok(Self {
            ctx,
            config: ReportConfig::new(urls),
            deploy: DeployOptions {
                dirstat: options.dirstat,
                stat: options.stat,
                pattern: options.pattern.clone(),
            },
            format: options.format,
            channels: options.slack_channels.clone(),
            runtime,
        })
    }

    /// Generates, renders and delivers the report for `base...to`.
    ///
    /// Returns the text to print.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be read or the payload cannot be
    /// serialized. Chat delivery failures are only logged.
    pub fn report(&self, base: &str, to: &str) -> Result<String, String> {
        let revisions = self.ctx.revisions.as_ref();
        let model = Deploy::new(revisions, &self.deploy).generate(base, to)?;

        let wants_chat = !self.channels.is_empty() || self.format == OutputFormat::Slack;
        let message = if wants_chat {
            Some(SlackFormatter::new(&self.config).format(&model))
        } else {
            None
        };
        if let Some(message) = &message {
            self.notify(message);
        }

        match (self.format, message) {
            (OutputFormat::Slack, Some(message)) => message.to_json().map_err(|e| e.to_string()),
            _ => Ok(CliFormatter::new(&self.config).format(&model)),
        }
    }

    fn notify(&self, message: &SlackMessage) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        for channel in &self.channels {
            if let Err(e) = runtime.block_on(self.ctx.notifier.post(channel, message)) {
                warn!(channel, error = %e, "failed to notify slack");
            }
        }
    }
}

/// Deploy tags for `branch`, oldest first.
#[must_use]
pub fn deploy_tags<'t>(tags: &'t [String], branch: &str) -> Vec<&'t str> {
    tags.iter()
        .map(String::as_str)
        .filter(|tag| tag.contains(branch))
        .collect()
}
