//! Serves recorded interactions back in order.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays a cassette with an independent cursor per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Indexes the interactions of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Returns the next interaction recorded for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns an error naming what was requested if the cassette holds no
    /// further interaction for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = PortMethodKey {
            port: port.to_string(),
            method: method.to_string(),
        };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> = self
                .queues
                .keys()
                .map(|k| format!("{}::{}", k.port, k.method))
                .collect();
            available.sort();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            ));
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(format!(
                "Cassette exhausted: all {} interactions for {port}::{method} have been consumed",
                queue.len()
            ));
        };
        *cursor += 1;
        Ok(interaction)
    }
}
