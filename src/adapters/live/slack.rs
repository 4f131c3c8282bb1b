//! Chat notifiers: an incoming-webhook client and a dry-run logger.

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::ports::{ChatNotifier, NotifyFuture};
use crate::report::{Attachment, SlackMessage};

/// Name the messages are posted under.
pub const USERNAME: &str = "DeployComplexity";

/// Webhook body: the rendered message plus delivery defaults.
#[derive(Debug, Serialize)]
pub(crate) struct WebhookPayload<'a> {
    channel: &'a str,
    username: &'a str,
    text: &'a str,
    attachments: &'a [Attachment],
}

impl<'a> WebhookPayload<'a> {
    pub(crate) fn new(channel: &'a str, message: &'a SlackMessage) -> Self {
        Self {
            channel,
            username: USERNAME,
            text: &message.text,
            attachments: &message.attachments,
        }
    }
}

/// Posts messages to a Slack incoming webhook.
pub struct LiveSlackNotifier {
    client: Client,
    webhook: String,
}

impl LiveSlackNotifier {
    /// Creates a notifier for `webhook`.
    #[must_use]
    pub fn new(webhook: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            webhook: webhook.into(),
        }
    }
}

impl ChatNotifier for LiveSlackNotifier {
    fn post(&self, channel: &str, message: &SlackMessage) -> NotifyFuture<'_> {
        let body = serde_json::to_value(WebhookPayload::new(channel, message));
        let channel = channel.to_string();

        Box::pin(async move {
            let body = body?;
            let response = self
                .client
                .post(&self.webhook)
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("Slack webhook request failed: {e}"))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let code = status.as_u16();
                return Err(format!("Slack webhook error ({code}): {text}").into());
            }
            info!(channel, "posted deploy report");
            Ok(())
        })
    }
}

/// Logs the payload instead of posting it; used when no webhook is configured.
#[derive(Debug, Default)]
pub struct DryRunNotifier;

impl ChatNotifier for DryRunNotifier {
    fn post(&self, channel: &str, message: &SlackMessage) -> NotifyFuture<'_> {
        let body = serde_json::to_string(&WebhookPayload::new(channel, message));
        let channel = channel.to_string();

        Box::pin(async move {
            let payload = body?;
            info!(channel, %payload, "no webhook configured, not posting");
            Ok(())
        })
    }
}
