use serde::Serialize;
use thiserror::Error;

/// A board or payout table that cannot be used for a round.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationError {
    #[error("rows out of range (got={rows}, min={min}, max={max})")]
    RowsOutOfRange { rows: u8, min: u8, max: u8 },
    #[error("payout table must have at least one slot (got={slots})")]
    EmptyTable { slots: usize },
    #[error("payout table length mismatch (expected={expected}, got={got})")]
    TableLengthMismatch { expected: usize, got: usize },
    #[error("multiplier at slot {slot} must be finite and non-negative (got={value})")]
    InvalidMultiplier { slot: usize, value: f64 },
}

/// Errors that block a round.
///
/// None of these are fatal: the attempted round does not happen, balance and mode are left
/// untouched, and the error is reported on the session's event channel.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PlinkoError {
    #[error("bet must be a positive finite number (got={amount})")]
    InvalidBet { amount: f64 },
    #[error("insufficient balance (bet={bet}, balance={balance})")]
    InsufficientBalance { bet: f64, balance: f64 },
    #[error("slot {slot} outside payout table of {slots} slots")]
    InvalidSlot { slot: usize, slots: usize },
    #[error("round {got} is not in flight (in flight={expected:?})")]
    RoundMismatch { expected: Option<u64>, got: u64 },
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Failure to parse a [crate::RiskTier].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown risk tier: {0} (expected low, medium or high)")]
pub struct ParseRiskError(pub String);
