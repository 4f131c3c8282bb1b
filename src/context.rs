//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::adapters::live::{DryRunNotifier, LiveGitRevisions, LiveSlackNotifier};
use crate::adapters::recording::{RecordingGitRevisions, RecordingNotifier};
use crate::adapters::replaying::{ReplayingGitRevisions, ReplayingNotifier};
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::ports::{ChatNotifier, RevisionSource};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying).
pub struct ServiceContext {
    /// Version-control queries.
    pub revisions: Box<dyn RevisionSource>,
    /// Chat delivery.
    pub notifier: Box<dyn ChatNotifier>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

fn live_revisions(git_dir: Option<&Path>) -> LiveGitRevisions {
    match git_dir {
        Some(dir) => LiveGitRevisions::in_dir(dir),
        None => LiveGitRevisions::new(),
    }
}

fn live_notifier(webhook: Option<String>) -> Box<dyn ChatNotifier> {
    match webhook {
        Some(url) => Box::new(LiveSlackNotifier::new(url)),
        None => Box::new(DryRunNotifier),
    }
}

impl ServiceContext {
    /// Creates a live context running git in `git_dir` (or the current
    /// directory) and posting to `webhook` when one is configured.
    #[must_use]
    pub fn live(git_dir: Option<&Path>, webhook: Option<String>) -> Self {
        Self {
            revisions: Box::new(live_revisions(git_dir)),
            notifier: live_notifier(webhook),
            recorder: None,
        }
    }

    /// Creates a live context that also records every interaction.
    ///
    /// The cassette is written to `path` when this context is dropped.
    #[must_use]
    pub fn recording(path: &Path, git_dir: Option<&Path>, webhook: Option<String>) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "deploy-complexity")));
        Self {
            revisions: Box::new(RecordingGitRevisions::new(
                Box::new(live_revisions(git_dir)),
                Arc::clone(&recorder),
            )),
            notifier: Box::new(RecordingNotifier::new(
                live_notifier(webhook),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a context that serves every port from a recorded cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;

        // Each port gets its own replayer so cursors stay independent.
        let git = CassetteReplayer::new(&cassette);
        let chat = CassetteReplayer::new(&cassette);
        Ok(Self {
            revisions: Box::new(ReplayingGitRevisions::new(git)),
            notifier: Box::new(ReplayingNotifier::new(chat)),
            recorder: None,
        })
    }

    /// `true` when interactions are being captured to a cassette.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        // Replace the adapters so their clones of the recorder are released.
        self.revisions = Box::new(LiveGitRevisions::new());
        self.notifier = Box::new(DryRunNotifier);

        let recorder = match Arc::try_unwrap(recorder) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(_) => {
                warn!("cassette recorder still shared, not writing cassette");
                return;
            }
        };
        if recorder.is_empty() {
            debug!("no interactions recorded, not writing cassette");
            return;
        }
        let interactions = recorder.len();
        match recorder.finish() {
            Ok(path) => info!(path = %path.display(), interactions, "wrote cassette"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}
