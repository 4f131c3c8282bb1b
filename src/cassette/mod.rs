//! YAML cassettes of recorded port interactions.
//!
//! A recording context captures every call made through a port, and a
//! replaying context serves those calls back in order, so a whole report run
//! can be reproduced without a git checkout.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;
