//! Plinko domain types.
//!
//! Defines the board, payout table, round result, session event and error types shared by
//! the execution engine and its consumers.

mod board;
mod constants;
mod error;
mod events;
mod paytable;
mod round;
mod session;

pub use board::*;
pub use constants::*;
pub use error::*;
pub use events::*;
pub use paytable::*;
pub use round::*;
pub use session::*;
