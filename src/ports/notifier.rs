//! Chat notifier port for sending rendered reports.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::report::SlackMessage;

/// Boxed future type alias used by [`ChatNotifier`] to keep the trait dyn-compatible.
pub type NotifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Delivers a chat-formatted report to a channel.
pub trait ChatNotifier: Send + Sync {
    /// Posts `message` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered (network, auth, etc.).
    fn post(&self, channel: &str, message: &SlackMessage) -> NotifyFuture<'_>;
}
