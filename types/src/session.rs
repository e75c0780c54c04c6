use serde::Serialize;

use super::{Outcome, PayoutTable, RoundResult};

/// Externally visible play mode.
///
/// `AutoPlaying` takes precedence: an auto-play loop is reported as such even while one of
/// its rounds is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Idle,
    AwaitingResult,
    AutoPlaying,
}

/// Running totals for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub rounds: u64,
    pub wins: u64,
    pub pushes: u64,
    pub losses: u64,
    pub voided: u64,
    pub wagered: f64,
    pub returned: f64,
    pub best_multiplier: f64,
}

impl SessionStats {
    /// Record a bet leaving the balance.
    pub fn record_bet(&mut self, bet: f64) {
        self.wagered += bet;
    }

    /// Record a settled round. The bet must already have been recorded.
    pub fn record_result(&mut self, result: &RoundResult) {
        self.rounds += 1;
        self.returned += result.payout;
        self.best_multiplier = self.best_multiplier.max(result.multiplier);
        match result.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Push => self.pushes += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    /// Record a voided round whose bet was returned.
    pub fn record_refund(&mut self, bet: f64) {
        self.voided += 1;
        self.returned += bet;
    }

    /// Sum of payouts minus sum of bets.
    pub fn net(&self) -> f64 {
        self.returned - self.wagered
    }

    /// Fraction of wagered credits returned (0 when nothing was wagered).
    pub fn return_to_player(&self) -> f64 {
        if self.wagered == 0.0 {
            0.0
        } else {
            self.returned / self.wagered
        }
    }
}

/// Point-in-time view of a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub balance: f64,
    pub mode: SessionMode,
    pub wager: f64,
    pub table: PayoutTable,
    pub stats: SessionStats,
}
