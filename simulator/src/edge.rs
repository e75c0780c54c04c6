//! Monte Carlo house-edge estimates.
//!
//! Every `(risk, rows)` pair is simulated independently with its own seeded descent, so a
//! report is reproducible regardless of how rayon schedules the work.

use plinko_execution::{
    descent::expected_return, resolve, Descent, DescentSimulator, DescentStrategy,
};
use plinko_types::{PayoutTable, PlinkoError, RiskTier, RoundResult, MAX_ROWS, MIN_ROWS};
use rayon::prelude::*;
use serde::Serialize;

/// Stake used for every simulated round.
pub const UNIT_BET: f64 = 1.0;

/// Totals over a run of simulated rounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub rounds: u64,
    pub wagered: f64,
    pub returned: f64,
    /// Sum of each round's squared net.
    pub net_sq: f64,
}

impl Stats {
    pub fn record(&mut self, result: &RoundResult) {
        let net = result.net();
        self.rounds += 1;
        self.wagered += result.bet;
        self.returned += result.payout;
        self.net_sq += net * net;
    }

    /// Fold in the totals of an independent run.
    pub fn merge(&mut self, other: &Stats) {
        self.rounds += other.rounds;
        self.wagered += other.wagered;
        self.returned += other.returned;
        self.net_sq += other.net_sq;
    }

    pub fn return_to_player(&self) -> f64 {
        if self.wagered == 0.0 {
            return 0.0;
        }
        self.returned / self.wagered
    }

    pub fn house_edge(&self) -> f64 {
        if self.wagered == 0.0 {
            return 0.0;
        }
        1.0 - self.return_to_player()
    }

    /// Standard error of [Self::house_edge].
    pub fn stderr(&self) -> f64 {
        if self.rounds <= 1 {
            return 0.0;
        }
        let rounds = self.rounds as f64;
        let mean_net = (self.returned - self.wagered) / rounds;
        let variance = (self.net_sq / rounds - mean_net * mean_net).max(0.0);
        (variance / rounds).sqrt() / (self.wagered / rounds)
    }
}

/// One line of a house-edge report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeRow {
    pub risk: RiskTier,
    pub rows: u8,
    pub synthesized: bool,
    /// Exact return to player from the binomial distribution.
    pub rtp: f64,
    /// House edge implied by `rtp`.
    pub expected_edge: f64,
    pub stats: Stats,
}

impl EdgeRow {
    pub const CSV_HEADER: &'static str =
        "risk,rows,synthesized,rounds,rtp,expected_edge,house_edge,stderr";

    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.6},{:.6},{:.6}",
            self.risk,
            self.rows,
            self.synthesized,
            self.stats.rounds,
            self.rtp,
            self.expected_edge,
            self.stats.house_edge(),
            self.stats.stderr()
        )
    }
}

/// Play `trials` unit bets on `table`.
pub fn simulate(
    table: &PayoutTable,
    descent: &mut impl DescentSimulator,
    trials: u64,
) -> Result<Stats, PlinkoError> {
    let mut stats = Stats::default();
    for _ in 0..trials {
        let slot = descent.descend(table.rows());
        let result = resolve(UNIT_BET, slot, table.multipliers())?;
        stats.record(&result);
    }
    Ok(stats)
}

/// Estimate the house edge of every registered or synthesized table.
pub fn report(
    trials: u64,
    strategy: DescentStrategy,
    seed: u64,
) -> Result<Vec<EdgeRow>, PlinkoError> {
    let pairs: Vec<(RiskTier, u8)> = RiskTier::ALL
        .iter()
        .flat_map(|risk| (MIN_ROWS..=MAX_ROWS).map(move |rows| (*risk, rows)))
        .collect();
    pairs
        .into_par_iter()
        .enumerate()
        .map(|(index, (risk, rows))| -> Result<EdgeRow, PlinkoError> {
            let table = PayoutTable::resolve(risk, rows)?;
            let mut descent = Descent::from_seed(strategy, seed.wrapping_add(index as u64));
            let stats = simulate(&table, &mut descent, trials)?;
            let rtp = expected_return(&table);
            Ok(EdgeRow {
                risk,
                rows,
                synthesized: table.is_synthesized(),
                rtp,
                expected_edge: 1.0 - rtp,
                stats,
            })
        })
        .collect()
}

/// Merge the rows of a report into one total per risk tier.
pub fn tier_totals(rows: &[EdgeRow]) -> Vec<(RiskTier, Stats)> {
    RiskTier::ALL
        .into_iter()
        .map(|risk| {
            let mut totals = Stats::default();
            for row in rows.iter().filter(|row| row.risk == risk) {
                totals.merge(&row.stats);
            }
            (risk, totals)
        })
        .collect()
}
