use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{ConfigurationError, ParseRiskError, MAX_ROWS, MIN_ROWS};

/// Named payout profile trading volatility against typical multiplier size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Multipliers `(center, edge)` used when no table is registered for a row count.
    ///
    /// Higher tiers trade a smaller center for a much larger edge.
    pub fn profile(&self) -> (f64, f64) {
        match self {
            RiskTier::Low => (1.0, 13.0),
            RiskTier::Medium => (0.5, 60.0),
            RiskTier::High => (0.3, 200.0),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = ParseRiskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            _ => Err(ParseRiskError(value.to_string())),
        }
    }
}

/// Triangular peg board: `rows` rows of pegs above `rows + 1` slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BoardConfig {
    rows: u8,
}

impl BoardConfig {
    pub fn new(rows: u8) -> Result<Self, ConfigurationError> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(ConfigurationError::RowsOutOfRange {
                rows,
                min: MIN_ROWS,
                max: MAX_ROWS,
            });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of landing slots, always one more than the number of rows.
    pub fn slots(&self) -> usize {
        self.rows as usize + 1
    }

    /// Index of the center slot (the left one of the two centers on odd row counts).
    pub fn center(&self) -> usize {
        self.rows as usize / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_is_rows_plus_one() {
        for rows in MIN_ROWS..=MAX_ROWS {
            let board = BoardConfig::new(rows).unwrap();
            assert_eq!(board.slots(), rows as usize + 1);
        }
    }

    #[test]
    fn test_rows_out_of_range() {
        assert_eq!(
            BoardConfig::new(0),
            Err(ConfigurationError::RowsOutOfRange {
                rows: 0,
                min: MIN_ROWS,
                max: MAX_ROWS
            })
        );
        assert!(BoardConfig::new(MAX_ROWS + 1).is_err());
    }

    #[test]
    fn test_risk_round_trip_through_str() {
        for risk in RiskTier::ALL {
            assert_eq!(risk.as_str().parse::<RiskTier>(), Ok(risk));
        }
        assert_eq!(" HIGH ".parse::<RiskTier>(), Ok(RiskTier::High));
        assert_eq!(
            "extreme".parse::<RiskTier>(),
            Err(ParseRiskError("extreme".to_string()))
        );
    }

    #[test]
    fn test_risk_profiles_scale_edge_to_center() {
        let ratio = |risk: RiskTier| {
            let (center, edge) = risk.profile();
            edge / center
        };
        assert!(ratio(RiskTier::Low) < ratio(RiskTier::Medium));
        assert!(ratio(RiskTier::Medium) < ratio(RiskTier::High));
    }

    #[test]
    fn test_risk_serde_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"high\"");
        let risk: RiskTier = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(risk, RiskTier::Low);
    }
}
