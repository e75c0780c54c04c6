use std::{future, pin::Pin, time::Duration};

use plinko_types::PlinkoError;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{sleep, Sleep},
};
use tracing::{debug, warn};

use super::{Config, DropRequest, Dropper, Mailbox, Message};
use crate::session::{Events, RoundSession, Ticket};

/// Round waiting for its landing signal.
struct Pending {
    ticket: Ticket,
    landed: oneshot::Receiver<usize>,
}

/// Drives a [RoundSession] from mailbox requests and dropper signals.
pub struct Actor<D: Dropper> {
    session: RoundSession,
    dropper: D,
    mailbox: mpsc::Receiver<Message>,
    auto_delay: Duration,

    pending: Option<Pending>,
    delay: Option<Pin<Box<Sleep>>>,
}

async fn landing(pending: &mut Option<Pending>) -> Result<usize, oneshot::error::RecvError> {
    match pending {
        Some(pending) => (&mut pending.landed).await,
        None => future::pending().await,
    }
}

async fn elapsed(delay: &mut Option<Pin<Box<Sleep>>>) {
    match delay {
        Some(delay) => delay.as_mut().await,
        None => future::pending().await,
    }
}

impl<D: Dropper> Actor<D> {
    pub fn new(config: Config, dropper: D) -> Result<(Self, Mailbox, Events), PlinkoError> {
        let (session, events) = RoundSession::new(config.session)?;
        let (sender, mailbox) = mpsc::channel(config.mailbox_size.max(1));
        Ok((
            Self {
                session,
                dropper,
                mailbox,
                auto_delay: config.auto_delay,
                pending: None,
                delay: None,
            },
            Mailbox::new(sender),
            events,
        ))
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until every [Mailbox] has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                message = self.mailbox.recv() => {
                    let Some(message) = message else {
                        debug!("mailbox closed, stopping table");
                        return;
                    };
                    self.handle(message);
                },
                landed = landing(&mut self.pending) => {
                    let Some(Pending { ticket, .. }) = self.pending.take() else {
                        continue;
                    };
                    self.conclude(ticket, landed.ok());
                },
                _ = elapsed(&mut self.delay) => {
                    self.delay = None;
                    if let Some(ticket) = self.session.resume_auto() {
                        self.dispatch(ticket);
                    }
                },
            }
        }
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Configure {
                rows,
                risk,
                response,
            } => {
                let _ = response.send(self.session.configure(rows, risk));
            }
            Message::PlaceBet { amount, response } => {
                let result = match self.session.place_bet(amount) {
                    Ok(Some(ticket)) => Ok(Some(self.dispatch(ticket))),
                    Ok(None) => Ok(None),
                    Err(err) => Err(err),
                };
                let _ = response.send(result);
            }
            Message::SetWager { amount } => {
                self.session.set_wager(amount);
            }
            Message::StartAuto { response } => {
                let round = self.session.start_auto().map(|ticket| self.dispatch(ticket));
                let _ = response.send(round);
            }
            Message::StopAuto { response } => {
                let stopped = self.session.stop_auto();
                if stopped {
                    self.delay = None;
                }
                let _ = response.send(stopped);
            }
            Message::Snapshot { response } => {
                let _ = response.send(self.session.snapshot());
            }
        }
    }

    fn dispatch(&mut self, ticket: Ticket) -> u64 {
        let round = ticket.round();
        let request = DropRequest {
            round,
            rows: ticket.rows(),
        };
        let landed = self.dropper.drop_ball(&request);
        debug!(round, rows = request.rows, "token dropped");
        self.pending = Some(Pending { ticket, landed });
        round
    }

    fn conclude(&mut self, ticket: Ticket, slot: Option<usize>) {
        let round = ticket.round();
        let concluded = match slot {
            Some(slot) => self.session.settle(ticket, slot).map(|_| ()),
            None => {
                warn!(round, "landing signal lost");
                self.session.void(ticket)
            }
        };
        if let Err(err) = concluded {
            warn!(round, ?err, "failed to conclude round");
        }
        if self.session.should_schedule_auto() {
            self.delay = Some(Box::pin(sleep(self.auto_delay)));
        }
    }
}
