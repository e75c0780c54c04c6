use std::time::Duration;

use tokio::sync::oneshot;

use crate::descent::DescentSimulator;

/// A token to drop for an in-flight round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropRequest {
    pub round: u64,
    pub rows: u8,
}

/// Drops tokens and reports where they land.
///
/// The returned receiver resolves exactly once with the landing slot. Dropping the sender
/// without sending voids the round.
pub trait Dropper: Send + 'static {
    fn drop_ball(&mut self, request: &DropRequest) -> oneshot::Receiver<usize>;
}

/// Dropper backed by a [DescentSimulator], optionally delaying each landing to stand in for
/// an animation.
pub struct SimulatedDropper<D: DescentSimulator> {
    descent: D,
    latency: Duration,
}

impl<D: DescentSimulator + Send + 'static> SimulatedDropper<D> {
    pub fn new(descent: D) -> Self {
        Self {
            descent,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl<D: DescentSimulator + Send + 'static> Dropper for SimulatedDropper<D> {
    fn drop_ball(&mut self, request: &DropRequest) -> oneshot::Receiver<usize> {
        let slot = self.descent.descend(request.rows);
        let (sender, receiver) = oneshot::channel();
        if self.latency.is_zero() {
            let _ = sender.send(slot);
        } else {
            let latency = self.latency;
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                let _ = sender.send(slot);
            });
        }
        receiver
    }
}
