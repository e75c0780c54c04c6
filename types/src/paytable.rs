//! Payout tables.
//!
//! A table holds one multiplier per slot. Tables are looked up by `(risk, rows)`; pairs
//! without a registered table fall back to a synthesized profile that grows quadratically
//! from the center slot to the edges.

use std::fmt;

use serde::Serialize;

use super::{BoardConfig, ConfigurationError, RiskTier, SYNTHESIZED_DECIMALS};

const LOW_10: [f64; 11] = [5.6, 2.4, 1.6, 1.3, 1.1, 1.0, 1.1, 1.3, 1.6, 2.4, 5.6];

const MEDIUM_10: [f64; 11] = [22.0, 5.0, 2.0, 1.4, 0.6, 0.4, 0.6, 1.4, 2.0, 5.0, 22.0];

const MEDIUM_16: [f64; 17] = [
    110.0, 41.0, 10.0, 5.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 5.0, 10.0, 41.0, 110.0,
];

const HIGH_10: [f64; 11] = [76.0, 10.0, 3.0, 0.9, 0.3, 0.2, 0.3, 0.9, 3.0, 10.0, 76.0];

const HIGH_16: [f64; 17] = [
    620.0, 165.0, 41.0, 15.0, 6.2, 2.6, 1.4, 0.7, 0.4, 0.7, 1.4, 2.6, 6.2, 15.0, 41.0, 165.0,
    620.0,
];

/// Canonical table for a `(risk, rows)` pair, if one is registered.
fn registered(risk: RiskTier, rows: u8) -> Option<&'static [f64]> {
    match (risk, rows) {
        (RiskTier::Low, 10) => Some(&LOW_10),
        (RiskTier::Medium, 10) => Some(&MEDIUM_10),
        (RiskTier::Medium, 16) => Some(&MEDIUM_16),
        (RiskTier::High, 10) => Some(&HIGH_10),
        (RiskTier::High, 16) => Some(&HIGH_16),
        _ => None,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Synthesize a symmetric table of `slots` multipliers for `risk`.
///
/// `value(i) = center + (edge - center) * (|i - mid| / mid)^2`, rounded to one decimal.
pub fn generate_default(slots: usize, risk: RiskTier) -> Result<Vec<f64>, ConfigurationError> {
    if slots < 1 {
        return Err(ConfigurationError::EmptyTable { slots });
    }
    let (center, edge) = risk.profile();
    if slots == 1 {
        return Ok(vec![center]);
    }

    let mid = (slots - 1) as f64 / 2.0;
    Ok((0..slots)
        .map(|i| {
            let dist = (i as f64 - mid).abs() / mid;
            round_to(center + (edge - center) * dist * dist, SYNTHESIZED_DECIMALS)
        })
        .collect())
}

/// Multipliers for every slot of a board under one risk tier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayoutTable {
    risk: RiskTier,
    board: BoardConfig,
    multipliers: Vec<f64>,
    synthesized: bool,
}

impl PayoutTable {
    /// Look up the table for `(risk, rows)`, synthesizing one if none is registered.
    pub fn resolve(risk: RiskTier, rows: u8) -> Result<Self, ConfigurationError> {
        let board = BoardConfig::new(rows)?;
        let (multipliers, synthesized) = match registered(risk, rows) {
            Some(table) => (table.to_vec(), false),
            None => (generate_default(board.slots(), risk)?, true),
        };
        Ok(Self {
            risk,
            board,
            multipliers,
            synthesized,
        })
    }

    /// Build a table from caller supplied multipliers.
    pub fn custom(
        risk: RiskTier,
        board: BoardConfig,
        multipliers: Vec<f64>,
    ) -> Result<Self, ConfigurationError> {
        if multipliers.len() != board.slots() {
            return Err(ConfigurationError::TableLengthMismatch {
                expected: board.slots(),
                got: multipliers.len(),
            });
        }
        if let Some((slot, &value)) = multipliers
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(ConfigurationError::InvalidMultiplier { slot, value });
        }
        Ok(Self {
            risk,
            board,
            multipliers,
            synthesized: false,
        })
    }

    pub fn risk(&self) -> RiskTier {
        self.risk
    }

    pub fn board(&self) -> BoardConfig {
        self.board
    }

    pub fn rows(&self) -> u8 {
        self.board.rows()
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.multipliers.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// Whether the table was generated rather than registered or supplied.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    pub fn max_multiplier(&self) -> f64 {
        self.multipliers.iter().copied().fold(0.0, f64::max)
    }
}

impl fmt::Display for PayoutTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Multipliers ({} risk, {} rows): ",
            self.risk,
            self.board.rows()
        )?;
        for (idx, multiplier) in self.multipliers.iter().enumerate() {
            if idx > 0 {
                f.write_str(" · ")?;
            }
            write!(f, "x{multiplier}")?;
        }
        Ok(())
    }
}
