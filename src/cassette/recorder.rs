//! Collects interactions and writes them as a cassette.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Accumulates interactions in call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Appends one interaction, numbering it.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Number of interactions captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes the cassette to disk and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be produced or written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette)
            .map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}
