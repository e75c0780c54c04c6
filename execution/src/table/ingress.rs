use plinko_types::{PlinkoError, RiskTier, SessionSnapshot};
use tokio::sync::{mpsc, oneshot};

use super::Error;

/// Requests handled by the table actor.
pub enum Message {
    Configure {
        rows: u8,
        risk: RiskTier,
        response: oneshot::Sender<Result<(), PlinkoError>>,
    },
    PlaceBet {
        amount: f64,
        response: oneshot::Sender<Result<Option<u64>, PlinkoError>>,
    },
    SetWager {
        amount: f64,
    },
    StartAuto {
        response: oneshot::Sender<Option<u64>>,
    },
    StopAuto {
        response: oneshot::Sender<bool>,
    },
    Snapshot {
        response: oneshot::Sender<SessionSnapshot>,
    },
}

/// Mailbox for the table actor.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
}

impl Mailbox {
    pub(super) fn new(sender: mpsc::Sender<Message>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> Result<T, Error> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(message(sender))
            .await
            .map_err(|_| Error::Closed)?;
        receiver.await.map_err(|_| Error::Closed)
    }

    /// Switch the payout table for subsequent rounds.
    pub async fn configure(&self, rows: u8, risk: RiskTier) -> Result<(), Error> {
        self.request(|response| Message::Configure {
            rows,
            risk,
            response,
        })
        .await??;
        Ok(())
    }

    /// Place a manual bet. Returns the round id, or `None` if the bet was ignored because a
    /// round is in flight or auto-play is on.
    pub async fn place_bet(&self, amount: f64) -> Result<Option<u64>, Error> {
        Ok(self
            .request(|response| Message::PlaceBet { amount, response })
            .await??)
    }

    pub async fn set_wager(&self, amount: f64) -> Result<(), Error> {
        self.sender
            .send(Message::SetWager { amount })
            .await
            .map_err(|_| Error::Closed)
    }

    /// Turn auto-play on. Returns the id of the round it opened, if any.
    pub async fn start_auto(&self) -> Result<Option<u64>, Error> {
        self.request(|response| Message::StartAuto { response }).await
    }

    /// Turn auto-play off. Returns whether it was on.
    pub async fn stop_auto(&self) -> Result<bool, Error> {
        self.request(|response| Message::StopAuto { response }).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, Error> {
        self.request(|response| Message::Snapshot { response }).await
    }
}
