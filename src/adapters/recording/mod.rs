//! Recording adapters that capture interactions to cassettes.

pub mod git;
pub mod slack;

pub use git::RecordingGitRevisions;
pub use slack::RecordingNotifier;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::CassetteRecorder;

/// Records a fallible call as `{"ok": v}` or `{"err": message}`.
///
/// Mirror of `replaying::extract_result`.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");

    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize ok value");
            serde_json::json!({ "ok": inner })
        }
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}
