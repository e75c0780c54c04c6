//! Auto-play sessions driven through the table actor.

use anyhow::Result;
use plinko_execution::{
    table::{Dropper, SimulatedDropper},
    Descent, TableActor,
};
use plinko_types::{SessionEvent, SessionSnapshot, StopReason};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ValidatedConfig;

/// Final state of a finished session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub snapshot: SessionSnapshot,
    pub reason: Option<StopReason>,
}

/// Run one auto-play session with a [Descent] built from `config`.
pub async fn play(config: &ValidatedConfig) -> Result<Summary> {
    let descent = match config.seed {
        Some(seed) => Descent::from_seed(config.strategy, seed),
        None => Descent::from_entropy(config.strategy),
    };
    let dropper = SimulatedDropper::new(descent).with_latency(config.animation);
    play_with(config, dropper).await
}

/// Run one auto-play session until it stops.
///
/// The session's round budget (`max_rounds`) ends the run from inside the table actor.
pub async fn play_with<D: Dropper>(config: &ValidatedConfig, dropper: D) -> Result<Summary> {
    let (actor, mailbox, mut events) = TableActor::new(config.table.clone(), dropper)?;
    let handle = actor.start();

    mailbox.start_auto().await?;
    let mut reason = None;
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::RoundSettled {
                round,
                result,
                balance,
            } => {
                info!(
                    round,
                    slot = result.slot,
                    multiplier = result.multiplier,
                    payout = result.payout,
                    balance,
                    "{result}"
                );
            }
            SessionEvent::RoundVoided { round, bet, .. } => {
                warn!(round, bet, "round voided");
            }
            SessionEvent::Rejected { error } => {
                warn!(?error, "request rejected");
            }
            SessionEvent::AutoStopped { reason: stopped } => {
                reason = Some(stopped);
                break;
            }
            event => debug!(?event, "session event"),
        }
    }

    let snapshot = mailbox.snapshot().await?;
    drop(mailbox);
    handle.await?;
    info!(
        rounds = snapshot.stats.rounds,
        balance = snapshot.balance,
        net = snapshot.stats.net(),
        reason = reason.map(|reason| reason.as_str()),
        "session finished"
    );
    Ok(Summary { snapshot, reason })
}
