//! Replaying adapter for the `ChatNotifier` port.

use std::sync::Mutex;

use super::extract_result;
use crate::cassette::CassetteReplayer;
use crate::ports::{ChatNotifier, NotifyFuture};
use crate::report::SlackMessage;

/// Answers chat posts with their recorded outcome instead of posting.
pub struct ReplayingNotifier {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingNotifier {
    /// Creates a replaying notifier from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl ChatNotifier for ReplayingNotifier {
    fn post(&self, _channel: &str, _message: &SlackMessage) -> NotifyFuture<'_> {
        let result = extract_result::<()>(&self.replayer, "chat", "post");
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn replays_post_outcomes_in_order() {
        let post = |seq, output| Interaction {
            seq,
            port: "chat".into(),
            method: "post".into(),
            input: json!({"channel": "#deploys"}),
            output,
        };
        let cassette = Cassette {
            name: "chat".into(),
            recorded_at: Utc::now(),
            version: String::new(),
            interactions: vec![
                post(0, json!({"ok": null})),
                post(1, json!({"err": "channel_not_found"})),
            ],
        };
        let notifier = ReplayingNotifier::new(CassetteReplayer::new(&cassette));
        let message = SlackMessage {
            text: "hi".into(),
            attachments: vec![],
        };

        notifier.post("#deploys", &message).await.unwrap();
        let err = notifier.post("#nowhere", &message).await.unwrap_err();
        assert_eq!(err.to_string(), "channel_not_found");
    }
}
