use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plinko_execution::{descent::binomial_pmf, descent::expected_return, DescentStrategy};
use plinko_simulator::{edge, play, Config};
use plinko_types::{PayoutTable, RiskTier};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless plinko sessions and house-edge reports.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an auto-play session.
    Play {
        /// YAML config file (defaults apply to anything it omits).
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        rows: Option<u8>,

        #[arg(long)]
        risk: Option<RiskTier>,

        #[arg(long)]
        wager: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        max_rounds: Option<u64>,

        /// Print the final session state as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Estimate house edge for every risk tier and row count.
    Edge {
        #[arg(long, default_value_t = 100_000)]
        trials: u64,

        #[arg(long, default_value_t = DescentStrategy::Weighted)]
        strategy: DescentStrategy,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print a payout table with its landing probabilities.
    Table {
        #[arg(long, default_value_t = RiskTier::Medium)]
        risk: RiskTier,

        #[arg(long, default_value_t = plinko_types::DEFAULT_ROWS)]
        rows: u8,
    },
}

fn init_tracing(level: Level, json: bool) {
    let builder = tracing_subscriber::fmt().with_max_level(level);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Play {
            config,
            rows,
            risk,
            wager,
            seed,
            max_rounds,
            json,
        } => {
            // Load from config file
            let mut config = match config {
                Some(path) => Config::load(&path).context("failed to load config")?,
                None => Config::default(),
            };
            if let Some(rows) = rows {
                config.rows = rows;
            }
            if let Some(risk) = risk {
                config.risk = risk;
            }
            if let Some(wager) = wager {
                config.wager = wager;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if let Some(max_rounds) = max_rounds {
                config.max_rounds = max_rounds;
            }
            let config = config.validate().context("invalid config")?;

            // Setup logging
            init_tracing(config.log_level, config.json_logs);
            info!(
                balance = config.table.session.starting_balance,
                rows = config.table.session.rows,
                risk = %config.table.session.risk,
                wager = config.table.session.wager,
                strategy = %config.strategy,
                seed = config.seed,
                "starting session"
            );

            let summary = play(&config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let stats = summary.snapshot.stats;
                println!(
                    "rounds={} wins={} pushes={} losses={} voided={}",
                    stats.rounds, stats.wins, stats.pushes, stats.losses, stats.voided
                );
                println!(
                    "wagered={:.2} returned={:.2} net={:.2} rtp={:.4} best=x{:.2}",
                    stats.wagered,
                    stats.returned,
                    stats.net(),
                    stats.return_to_player(),
                    stats.best_multiplier
                );
                println!("balance={:.2}", summary.snapshot.balance);
                if let Some(reason) = summary.reason {
                    println!("stopped: {}", reason.as_str());
                }
            }
        }
        Command::Edge {
            trials,
            strategy,
            seed,
        } => {
            init_tracing(Level::INFO, false);
            info!(trials, %strategy, seed, "estimating house edge");
            let rows = edge::report(trials, strategy, seed)?;
            println!("{}", edge::EdgeRow::CSV_HEADER);
            for row in &rows {
                println!("{}", row.to_csv());
            }
            for (risk, stats) in edge::tier_totals(&rows) {
                eprintln!(
                    "{risk}: rounds={} rtp={:.6} house_edge={:.6} stderr={:.6}",
                    stats.rounds,
                    stats.return_to_player(),
                    stats.house_edge(),
                    stats.stderr()
                );
            }
        }
        Command::Table { risk, rows } => {
            let table = PayoutTable::resolve(risk, rows).context("invalid table")?;
            println!("{table}");
            println!("slot,multiplier,probability");
            for (slot, (multiplier, probability)) in table
                .multipliers()
                .iter()
                .zip(binomial_pmf(rows))
                .enumerate()
            {
                println!("{slot},{multiplier},{probability:.6}");
            }
            println!("rtp={:.6}", expected_return(&table));
        }
    }

    Ok(())
}
