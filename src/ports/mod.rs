//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the report core and an
//! external system (version control, chat). Implementations live in
//! `src/adapters/`.

pub mod notifier;
pub mod revisions;

pub use notifier::{ChatNotifier, NotifyFuture};
pub use revisions::{RevisionSource, StatKind};
