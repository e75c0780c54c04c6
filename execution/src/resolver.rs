//! Payout resolution for a landed token.

use plinko_types::{Outcome, PlinkoError, RoundResult};

/// Compute the result of a `bet` landing in `slot` of `multipliers`.
///
/// The payout is `bet * multipliers[slot]` with no rounding, and the outcome is classified
/// against the bet with exact equality deciding a push.
pub fn resolve(bet: f64, slot: usize, multipliers: &[f64]) -> Result<RoundResult, PlinkoError> {
    if !bet.is_finite() || bet <= 0.0 {
        return Err(PlinkoError::InvalidBet { amount: bet });
    }
    let multiplier = *multipliers.get(slot).ok_or(PlinkoError::InvalidSlot {
        slot,
        slots: multipliers.len(),
    })?;
    let payout = bet * multiplier;
    Ok(RoundResult {
        slot,
        multiplier,
        bet,
        payout,
        outcome: Outcome::classify(bet, payout),
    })
}
