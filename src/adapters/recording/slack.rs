//! Recording adapter for the `ChatNotifier` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::CassetteRecorder;
use crate::ports::{ChatNotifier, NotifyFuture};
use crate::report::SlackMessage;

/// Records chat posts while delegating to an inner notifier.
pub struct RecordingNotifier {
    inner: Box<dyn ChatNotifier>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingNotifier {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn ChatNotifier>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PostInput<'a> {
    channel: &'a str,
    message: &'a SlackMessage,
}

impl ChatNotifier for RecordingNotifier {
    fn post(&self, channel: &str, message: &SlackMessage) -> NotifyFuture<'_> {
        let channel = channel.to_string();
        let message = message.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.post(&channel, &message).await;
            let input = PostInput {
                channel: &channel,
                message: &message,
            };
            record_result(&recorder, "chat", "post", &input, &result);
            result
        })
    }
}
