//! Async boundary around a [crate::session::RoundSession].
//!
//! The [Actor] owns the session and runs a single event loop over three sources: requests
//! arriving on its [Mailbox], the landing signal of the in-flight token, and the auto-play
//! delay. A [Dropper] produces landing signals; it is the only collaborator the actor waits on.

use std::time::Duration;

use plinko_types::{PlinkoError, AUTO_PLAY_DELAY_MS};
use thiserror::Error;

use crate::session::SessionConfig;

mod actor;
pub use actor::Actor;
mod dropper;
pub use dropper::{DropRequest, Dropper, SimulatedDropper};
mod ingress;
pub use ingress::{Mailbox, Message};

/// Requests held in the mailbox before senders wait.
pub const DEFAULT_MAILBOX_SIZE: usize = 64;

/// Configuration for the table actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Initial session state.
    pub session: SessionConfig,

    /// Pause between a settled auto-play round and the next one.
    pub auto_delay: Duration,

    /// Number of requests to hold in the mailbox before blocking.
    pub mailbox_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            auto_delay: Duration::from_millis(AUTO_PLAY_DELAY_MS),
            mailbox_size: DEFAULT_MAILBOX_SIZE,
        }
    }
}

/// Errors returned by the [Mailbox].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("table actor stopped")]
    Closed,
    #[error("request rejected: {0}")]
    Rejected(#[from] PlinkoError),
}
