//! Descent simulation.
//!
//! A token dropped onto a board of `rows` peg rows bounces left or right at every row with
//! equal probability and lands in the slot whose index is the number of rightward bounces
//! (a Galton board). Two strategies produce that distribution:
//!
//! - [StepwiseWalk] draws every bounce, so the path can be replayed by a renderer.
//! - [WeightedSampler] draws a single uniform value against the binomial distribution.
//!
//! Both implement [DescentSimulator] and are selected at runtime through [Descent].

use std::{collections::HashMap, fmt, str::FromStr};

use plinko_types::PayoutTable;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Probability of a rightward bounce at each peg.
pub const RIGHT_PROBABILITY: f64 = 0.5;

/// Decides which slot one dropped token lands in.
pub trait DescentSimulator {
    /// Returns a slot in `0..=rows`.
    fn descend(&mut self, rows: u8) -> usize;
}

impl<T: DescentSimulator + ?Sized> DescentSimulator for Box<T> {
    fn descend(&mut self, rows: u8) -> usize {
        (**self).descend(rows)
    }
}

/// `C(n, k)` in the multiplicative form, which stays exact well past the supported row range.
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut res = 1.0;
    for i in 1..=k {
        res = res * (n - k + i) as f64 / i as f64;
    }
    res
}

/// Probability of landing in each slot of a board with `rows` rows.
///
/// The result is normalized to sum to 1 to absorb floating-point drift.
pub fn binomial_pmf(rows: u8) -> Vec<f64> {
    let n = rows as u32;
    let p = RIGHT_PROBABILITY;
    let mut pmf: Vec<f64> = (0..=n)
        .map(|k| binomial_coefficient(n, k) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32))
        .collect();
    let total: f64 = pmf.iter().sum();
    for probability in pmf.iter_mut() {
        *probability /= total;
    }
    pmf
}

/// Expected multiplier of `table` (its return to player).
pub fn expected_return(table: &PayoutTable) -> f64 {
    binomial_pmf(table.rows())
        .iter()
        .zip(table.multipliers())
        .map(|(probability, multiplier)| probability * multiplier)
        .sum()
}

/// Direction of a single bounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Left,
    Right,
}

/// Sequence of bounces a token took on its way down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DescentPath {
    steps: Vec<Step>,
}

impl DescentPath {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Slot the token landed in.
    pub fn slot(&self) -> usize {
        self.steps.iter().filter(|step| **step == Step::Right).count()
    }

    /// Column of the token after each row (the running count of rightward bounces).
    pub fn positions(&self) -> Vec<usize> {
        self.steps
            .iter()
            .scan(0, |column, step| {
                if *step == Step::Right {
                    *column += 1;
                }
                Some(*column)
            })
            .collect()
    }
}

/// Simulates every bounce.
pub struct StepwiseWalk<R: Rng> {
    rng: R,
}

impl<R: Rng> StepwiseWalk<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn walk(&mut self, rows: u8) -> DescentPath {
        let steps = (0..rows)
            .map(|_| {
                if self.rng.gen_bool(RIGHT_PROBABILITY) {
                    Step::Right
                } else {
                    Step::Left
                }
            })
            .collect();
        DescentPath { steps }
    }
}

impl<R: Rng> DescentSimulator for StepwiseWalk<R> {
    fn descend(&mut self, rows: u8) -> usize {
        self.walk(rows).slot()
    }
}

/// Samples the landing slot directly from the binomial distribution.
pub struct WeightedSampler<R: Rng> {
    rng: R,
    cdfs: HashMap<u8, Vec<f64>>,
}

impl<R: Rng> WeightedSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            cdfs: HashMap::new(),
        }
    }

    /// Cumulative distribution for `rows`, computed on first use.
    pub fn cdf(&mut self, rows: u8) -> &[f64] {
        self.cdfs.entry(rows).or_insert_with(|| {
            binomial_pmf(rows)
                .into_iter()
                .scan(0.0, |acc, probability| {
                    *acc += probability;
                    Some(*acc)
                })
                .collect()
        })
    }
}

impl<R: Rng> DescentSimulator for WeightedSampler<R> {
    fn descend(&mut self, rows: u8) -> usize {
        let draw: f64 = self.rng.gen();
        // Drift can leave the last cumulative value just under 1.
        self.cdf(rows)
            .iter()
            .position(|cumulative| draw < *cumulative)
            .unwrap_or(rows as usize)
    }
}

/// Strategy used to decide landing slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescentStrategy {
    #[default]
    Stepwise,
    Weighted,
}

impl DescentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescentStrategy::Stepwise => "stepwise",
            DescentStrategy::Weighted => "weighted",
        }
    }
}

impl fmt::Display for DescentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown descent strategy: {0} (expected stepwise or weighted)")]
pub struct ParseStrategyError(pub String);

impl FromStr for DescentStrategy {
    type Err = ParseStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stepwise" => Ok(DescentStrategy::Stepwise),
            "weighted" => Ok(DescentStrategy::Weighted),
            _ => Err(ParseStrategyError(value.to_string())),
        }
    }
}

/// A descent simulator chosen by [DescentStrategy].
pub enum Descent<R: Rng = ChaCha20Rng> {
    Stepwise(StepwiseWalk<R>),
    Weighted(WeightedSampler<R>),
}

impl<R: Rng> Descent<R> {
    pub fn new(strategy: DescentStrategy, rng: R) -> Self {
        match strategy {
            DescentStrategy::Stepwise => Descent::Stepwise(StepwiseWalk::new(rng)),
            DescentStrategy::Weighted => Descent::Weighted(WeightedSampler::new(rng)),
        }
    }

    pub fn strategy(&self) -> DescentStrategy {
        match self {
            Descent::Stepwise(_) => DescentStrategy::Stepwise,
            Descent::Weighted(_) => DescentStrategy::Weighted,
        }
    }
}

impl Descent<ChaCha20Rng> {
    /// Reproducible simulator.
    pub fn from_seed(strategy: DescentStrategy, seed: u64) -> Self {
        Self::new(strategy, ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(strategy: DescentStrategy) -> Self {
        Self::new(strategy, ChaCha20Rng::from_entropy())
    }
}

impl<R: Rng> DescentSimulator for Descent<R> {
    fn descend(&mut self, rows: u8) -> usize {
        match self {
            Descent::Stepwise(walk) => walk.descend(rows),
            Descent::Weighted(sampler) => sampler.descend(rows),
        }
    }
}
