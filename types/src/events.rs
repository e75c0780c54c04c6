use serde::Serialize;

use super::{PayoutTable, PlinkoError, RoundResult};

/// Why an auto-play loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    ZeroBalance,
    InvalidBet,
    InsufficientBalance,
    UserRequested,
}

impl StopReason {
    /// Map a validation failure to the reason it terminates auto-play with.
    pub fn from_error(err: &PlinkoError) -> Option<Self> {
        match err {
            PlinkoError::InvalidBet { .. } => Some(StopReason::InvalidBet),
            PlinkoError::InsufficientBalance { .. } => Some(StopReason::InsufficientBalance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::ZeroBalance => "balance is 0",
            StopReason::InvalidBet => "enter a valid bet larger than 0",
            StopReason::InsufficientBalance => "insufficient balance",
            StopReason::UserRequested => "stopped by user",
        }
    }
}

/// Notifications a session raises for whoever renders it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A new payout table applies to subsequent rounds.
    Configured { table: PayoutTable },
    /// A bet was debited and its token dispatched.
    RoundStarted { round: u64, bet: f64, balance: f64 },
    /// A round landed and its payout was credited.
    RoundSettled {
        round: u64,
        result: RoundResult,
        balance: f64,
    },
    /// A round never received its landing signal and the bet was refunded.
    RoundVoided { round: u64, bet: f64, balance: f64 },
    AutoStarted,
    AutoStopped { reason: StopReason },
    /// An inbound request was refused; state is unchanged.
    Rejected { error: PlinkoError },
}
