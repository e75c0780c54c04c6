use std::fmt;

use serde::Serialize;

/// Classification of a settled round relative to its bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Push,
    Loss,
}

impl Outcome {
    /// Classify `payout` against `bet`.
    ///
    /// Push is exact float equality: both values derive from the same bet, so no epsilon is
    /// applied. Fractional multipliers can round away from an exact push.
    pub fn classify(bet: f64, payout: f64) -> Self {
        if payout > bet {
            Outcome::Win
        } else if payout == bet {
            Outcome::Push
        } else {
            Outcome::Loss
        }
    }
}

/// Outcome of one dropped token.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoundResult {
    pub slot: usize,
    pub multiplier: f64,
    pub bet: f64,
    pub payout: f64,
    pub outcome: Outcome,
}

impl RoundResult {
    /// Balance change caused by this round.
    pub fn net(&self) -> f64 {
        self.payout - self.bet
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot x{:.2}. ", self.multiplier)?;
        match self.outcome {
            Outcome::Win => write!(f, "You won {:.2} virtual credits.", self.payout),
            Outcome::Push => write!(f, "You got your bet back ({:.2}).", self.payout),
            Outcome::Loss => write!(
                f,
                "You receive {:.2} back from {:.2}.",
                self.payout, self.bet
            ),
        }
    }
}
