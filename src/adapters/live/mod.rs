//! Live adapters for real external interactions.

pub mod git;
pub mod slack;

pub use git::LiveGitRevisions;
pub use slack::{DryRunNotifier, LiveSlackNotifier};
