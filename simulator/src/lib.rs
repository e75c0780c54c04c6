//! Headless plinko sessions.
//!
//! Loads a [Config] (YAML), runs auto-play sessions against the table actor ([play]) and
//! estimates house edge across every risk tier and row count ([edge]).

use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use plinko_execution::{session::SessionConfig, table, DescentStrategy, TableConfig};
use plinko_types::{
    ConfigurationError, RiskTier, AUTO_PLAY_DELAY_MS, DEFAULT_ROWS, DEFAULT_WAGER,
    STARTING_BALANCE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

pub mod edge;
pub mod play;

pub use play::{play, play_with, Summary};

/// Rounds played before auto-play is stopped.
pub const DEFAULT_MAX_ROUNDS: u64 = 100;

fn default_starting_balance() -> f64 {
    STARTING_BALANCE
}

fn default_rows() -> u8 {
    DEFAULT_ROWS
}

fn default_wager() -> f64 {
    DEFAULT_WAGER
}

fn default_auto_delay_ms() -> u64 {
    AUTO_PLAY_DELAY_MS
}

fn default_max_rounds() -> u64 {
    DEFAULT_MAX_ROUNDS
}

fn default_mailbox_size() -> usize {
    table::DEFAULT_MAILBOX_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Session configuration (from config file).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
    #[serde(default = "default_rows")]
    pub rows: u8,
    #[serde(default)]
    pub risk: RiskTier,
    #[serde(default = "default_wager")]
    pub wager: f64,
    /// Custom multipliers, one per slot.
    #[serde(default)]
    pub multipliers: Option<Vec<f64>>,
    #[serde(default)]
    pub strategy: DescentStrategy,
    /// Seed for the descent simulator. Entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_auto_delay_ms")]
    pub auto_delay_ms: u64,
    /// Simulated time a token spends falling.
    #[serde(default)]
    pub animation_ms: u64,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,
    #[serde(default = "default_mailbox_size")]
    pub mailbox_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_balance: default_starting_balance(),
            rows: default_rows(),
            risk: RiskTier::default(),
            wager: default_wager(),
            multipliers: None,
            strategy: DescentStrategy::default(),
            seed: None,
            auto_delay_ms: default_auto_delay_ms(),
            animation_ms: 0,
            max_rounds: default_max_rounds(),
            mailbox_size: default_mailbox_size(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be a positive finite number (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("invalid table: {0}")]
    Table(#[from] ConfigurationError),
}

/// Config with every field checked and converted.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub table: TableConfig,
    pub strategy: DescentStrategy,
    pub seed: Option<u64>,
    pub animation: Duration,
    pub log_level: Level,
    pub json_logs: bool,
}

fn ensure_amount(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidAmount { field, value });
    }
    Ok(())
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        ensure_amount("starting_balance", self.starting_balance)?;
        ensure_amount("wager", self.wager)?;
        if self.max_rounds == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "max_rounds",
                value: 0,
            });
        }
        if self.mailbox_size == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "mailbox_size",
                value: 0,
            });
        }
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        let session = SessionConfig {
            starting_balance: self.starting_balance,
            rows: self.rows,
            risk: self.risk,
            wager: self.wager,
            multipliers: self.multipliers,
            auto_rounds: Some(self.max_rounds),
        };
        session.table()?;

        Ok(ValidatedConfig {
            table: TableConfig {
                session,
                auto_delay: Duration::from_millis(self.auto_delay_ms),
                mailbox_size: self.mailbox_size,
            },
            strategy: self.strategy,
            seed: self.seed,
            animation: Duration::from_millis(self.animation_ms),
            log_level,
            json_logs: self.json_logs,
        })
    }
}
