//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `git` or `chat`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// Returned value, as `{"ok": v}` or `{"err": message}` for fallible calls.
    pub output: serde_json::Value,
}

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the tool that recorded it.
    #[serde(default)]
    pub version: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let shown = path.display();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {shown}: {e}"))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {shown}: {e}"))
    }
}
