//! Plinko round engine.
//!
//! This crate decides where tokens land ([descent]), turns a landing into a payout
//! ([resolver]), tracks balance and play mode ([session]) and runs a session behind an async
//! mailbox with auto-play ([table]).
//!
//! ## Invariants
//! - At most one round is in flight per session. The bet leaves the balance when the round
//!   opens and the payout arrives when it settles.
//! - A round is priced with the table that was active when it opened.
//! - Every validation failure leaves balance and mode untouched.
//!
//! ## Minimal round (example)
//! ```rust
//! use plinko_execution::{
//!     descent::{Descent, DescentSimulator, DescentStrategy},
//!     session::{RoundSession, SessionConfig},
//! };
//!
//! let (mut session, _events) = RoundSession::new(SessionConfig::default()).unwrap();
//! let mut descent = Descent::from_seed(DescentStrategy::Stepwise, 7);
//! if let Some(ticket) = session.place_bet(10.0).unwrap() {
//!     let slot = descent.descend(ticket.rows());
//!     let result = session.settle(ticket, slot).unwrap();
//!     println!("{result}");
//! }
//! ```

pub mod descent;
pub mod resolver;
pub mod session;
pub mod table;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use descent::{Descent, DescentSimulator, DescentStrategy};
pub use resolver::resolve;
pub use session::{Events, RoundSession, SessionConfig, Ticket};
pub use table::{Actor as TableActor, Config as TableConfig, Mailbox};
