//! Replaying adapters that serve recorded interactions.

pub mod git;
pub mod slack;

pub use git::ReplayingGitRevisions;
pub use slack::ReplayingNotifier;

use std::sync::Mutex;

use crate::cassette::CassetteReplayer;

/// Takes the next recorded output for `port::method` and decodes it.
///
/// Mirror of `recording::record_result`: `{"err": msg}` becomes an error,
/// `{"ok": v}` is deserialized into `T`.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    let call = format!("{port}::{method}");
    let output = {
        let mut replayer = replayer
            .lock()
            .map_err(|_| format!("{call}: replayer lock poisoned"))?;
        replayer.next_interaction(port, method)?.output.clone()
    };

    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").into());
    }
    let value = output.get("ok").cloned().unwrap_or(output);
    serde_json::from_value(value)
        .map_err(|e| format!("{call}: failed to deserialize: {e}").into())
}
