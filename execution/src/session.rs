//! Round session state machine.
//!
//! [RoundSession] owns the balance, the active payout table, the wager input and the
//! auto-play flag. It never waits on anything itself: opening a round hands back a [Ticket],
//! and whoever drives the token (see [crate::table]) later returns that ticket through
//! [RoundSession::settle] or [RoundSession::void].
//!
//! ## Modes
//!
//! - `Idle`: no round in flight, auto-play off.
//! - `AwaitingResult`: a bet was debited and its landing signal has not arrived yet.
//! - `AutoPlaying`: auto-play is on (whether or not one of its rounds is in flight).
//!
//! ## Auto-play
//!
//! After a round settles the driver asks [RoundSession::should_schedule_auto]. A zero
//! balance ends the loop there, before any delay. Otherwise the driver waits and calls
//! [RoundSession::resume_auto], which re-validates the wager and either opens the next round
//! or ends the loop with the failure as the reason. A session configured with an auto-play
//! round budget ends the loop with `UserRequested` once that many auto rounds have opened.

use plinko_types::{
    BoardConfig, ConfigurationError, PayoutTable, PlinkoError, RiskTier, RoundResult,
    SessionEvent, SessionMode, SessionSnapshot, SessionStats, StopReason, DEFAULT_ROWS,
    DEFAULT_WAGER, STARTING_BALANCE,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::resolver::resolve;

/// Receiving half of a session's event stream.
pub type Events = mpsc::UnboundedReceiver<SessionEvent>;

/// Initial state of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub starting_balance: f64,
    pub rows: u8,
    pub risk: RiskTier,
    /// Wager used by auto-play until the player enters another.
    pub wager: f64,
    /// Custom multipliers replacing the registered or synthesized table.
    pub multipliers: Option<Vec<f64>>,
    /// Rounds one auto-play run may open. Unlimited when `None`.
    pub auto_rounds: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            rows: DEFAULT_ROWS,
            risk: RiskTier::default(),
            wager: DEFAULT_WAGER,
            multipliers: None,
            auto_rounds: None,
        }
    }
}

impl SessionConfig {
    /// Payout table described by this config.
    pub fn table(&self) -> Result<PayoutTable, ConfigurationError> {
        match &self.multipliers {
            Some(multipliers) => {
                PayoutTable::custom(self.risk, BoardConfig::new(self.rows)?, multipliers.clone())
            }
            None => PayoutTable::resolve(self.risk, self.rows),
        }
    }
}

/// Receipt for an in-flight round.
///
/// Carries the table the round was opened against so later reconfiguration does not change
/// its payout. Consumed by [RoundSession::settle] or [RoundSession::void].
#[derive(Debug, PartialEq)]
pub struct Ticket {
    round: u64,
    bet: f64,
    table: PayoutTable,
}

impl Ticket {
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn table(&self) -> &PayoutTable {
        &self.table
    }

    pub fn rows(&self) -> u8 {
        self.table.rows()
    }
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    round: u64,
    bet: f64,
}

/// Balance, table and mode of one player's session.
pub struct RoundSession {
    balance: f64,
    table: PayoutTable,
    wager: f64,
    auto: bool,
    auto_rounds: Option<u64>,
    auto_opened: u64,
    in_flight: Option<InFlight>,
    next_round: u64,
    stats: SessionStats,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl RoundSession {
    /// Create a session and the stream of events it raises.
    pub fn new(config: SessionConfig) -> Result<(Self, Events), PlinkoError> {
        let table = config.table()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = Self {
            balance: config.starting_balance,
            table,
            wager: config.wager,
            auto: false,
            auto_rounds: config.auto_rounds,
            auto_opened: 0,
            in_flight: None,
            next_round: 1,
            stats: SessionStats::default(),
            events: sender,
        };
        info!(
            balance = session.balance,
            risk = %session.table.risk(),
            rows = session.table.rows(),
            "session created"
        );
        session.emit(SessionEvent::Configured {
            table: session.table.clone(),
        });
        Ok((session, receiver))
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is not an error.
        let _ = self.events.send(event);
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn mode(&self) -> SessionMode {
        if self.auto {
            SessionMode::AutoPlaying
        } else if self.in_flight.is_some() {
            SessionMode::AwaitingResult
        } else {
            SessionMode::Idle
        }
    }

    pub fn wager(&self) -> f64 {
        self.wager
    }

    pub fn table(&self) -> &PayoutTable {
        &self.table
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Round id of the in-flight round, if any.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight.map(|flight| flight.round)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            balance: self.balance,
            mode: self.mode(),
            wager: self.wager,
            table: self.table.clone(),
            stats: self.stats,
        }
    }

    /// Switch to the table for `(rows, risk)`. Applies to rounds opened afterwards.
    pub fn configure(&mut self, rows: u8, risk: RiskTier) -> Result<(), PlinkoError> {
        match PayoutTable::resolve(risk, rows) {
            Ok(table) => {
                self.install_table(table);
                Ok(())
            }
            Err(err) => {
                let err = PlinkoError::from(err);
                warn!(rows, %risk, ?err, "rejected configuration");
                self.emit(SessionEvent::Rejected { error: err.clone() });
                Err(err)
            }
        }
    }

    /// Install an already built table. Applies to rounds opened afterwards.
    pub fn install_table(&mut self, table: PayoutTable) {
        info!(
            risk = %table.risk(),
            rows = table.rows(),
            synthesized = table.is_synthesized(),
            "payout table configured"
        );
        self.table = table;
        self.emit(SessionEvent::Configured {
            table: self.table.clone(),
        });
    }

    /// Record the wager input without placing a bet.
    pub fn set_wager(&mut self, amount: f64) {
        self.wager = amount;
    }

    /// Place a manual bet.
    ///
    /// Returns `Ok(None)` without touching the balance while a round is in flight or auto-play
    /// is on. A rejected bet is reported on the event stream and leaves state unchanged.
    pub fn place_bet(&mut self, amount: f64) -> Result<Option<Ticket>, PlinkoError> {
        self.wager = amount;
        if self.auto || self.in_flight.is_some() {
            debug!(amount, mode = ?self.mode(), "ignored bet");
            return Ok(None);
        }
        if let Err(err) = self.validate(amount) {
            warn!(amount, balance = self.balance, ?err, "rejected bet");
            self.emit(SessionEvent::Rejected { error: err.clone() });
            return Err(err);
        }
        Ok(Some(self.open_round(amount)))
    }

    fn validate(&self, bet: f64) -> Result<(), PlinkoError> {
        if !bet.is_finite() || bet <= 0.0 {
            return Err(PlinkoError::InvalidBet { amount: bet });
        }
        if bet > self.balance {
            return Err(PlinkoError::InsufficientBalance {
                bet,
                balance: self.balance,
            });
        }
        Ok(())
    }

    /// Debit `bet` and hand out the ticket for its round. The bet must be validated.
    fn open_round(&mut self, bet: f64) -> Ticket {
        let round = self.next_round;
        self.next_round += 1;
        self.balance -= bet;
        self.stats.record_bet(bet);
        self.in_flight = Some(InFlight { round, bet });
        debug!(round, bet, balance = self.balance, "round started");
        self.emit(SessionEvent::RoundStarted {
            round,
            bet,
            balance: self.balance,
        });
        Ticket {
            round,
            bet,
            table: self.table.clone(),
        }
    }

    fn check_ticket(&self, ticket: &Ticket) -> Result<InFlight, PlinkoError> {
        match self.in_flight {
            Some(flight) if flight.round == ticket.round => Ok(flight),
            other => Err(PlinkoError::RoundMismatch {
                expected: other.map(|flight| flight.round),
                got: ticket.round,
            }),
        }
    }

    /// Settle the round behind `ticket` at the slot its token landed in.
    ///
    /// Slots past the last one are clamped to it.
    pub fn settle(&mut self, ticket: Ticket, slot: usize) -> Result<RoundResult, PlinkoError> {
        let flight = self.check_ticket(&ticket)?;
        let last = ticket.table.len().saturating_sub(1);
        let landed = if slot > last {
            warn!(round = flight.round, slot, last, "slot out of range, clamping");
            last
        } else {
            slot
        };
        let result = match resolve(flight.bet, landed, ticket.table.multipliers()) {
            Ok(result) => result,
            Err(err) => {
                warn!(round = flight.round, ?err, "round could not be resolved");
                self.refund(flight);
                return Err(err);
            }
        };

        self.in_flight = None;
        self.balance += result.payout;
        self.stats.record_result(&result);
        debug!(
            round = flight.round,
            slot = result.slot,
            multiplier = result.multiplier,
            payout = result.payout,
            balance = self.balance,
            "round settled"
        );
        self.emit(SessionEvent::RoundSettled {
            round: flight.round,
            result,
            balance: self.balance,
        });
        Ok(result)
    }

    /// Close the round behind `ticket` without a landing and refund its bet.
    pub fn void(&mut self, ticket: Ticket) -> Result<(), PlinkoError> {
        let flight = self.check_ticket(&ticket)?;
        self.refund(flight);
        Ok(())
    }

    fn refund(&mut self, flight: InFlight) {
        self.in_flight = None;
        self.balance += flight.bet;
        self.stats.record_refund(flight.bet);
        warn!(
            round = flight.round,
            bet = flight.bet,
            balance = self.balance,
            "round voided, bet refunded"
        );
        self.emit(SessionEvent::RoundVoided {
            round: flight.round,
            bet: flight.bet,
            balance: self.balance,
        });
    }

    /// Turn auto-play on and open its first round if none is in flight.
    pub fn start_auto(&mut self) -> Option<Ticket> {
        if self.auto {
            return None;
        }
        self.auto = true;
        self.auto_opened = 0;
        info!(
            wager = self.wager,
            balance = self.balance,
            budget = self.auto_rounds,
            "auto-play started"
        );
        self.emit(SessionEvent::AutoStarted);
        if self.in_flight.is_some() {
            return None;
        }
        self.auto_round()
    }

    /// Turn auto-play off. An in-flight round still settles.
    pub fn stop_auto(&mut self) -> bool {
        if !self.auto {
            return false;
        }
        self.halt_auto(StopReason::UserRequested);
        true
    }

    fn halt_auto(&mut self, reason: StopReason) {
        self.auto = false;
        info!(reason = reason.as_str(), balance = self.balance, "auto-play stopped");
        self.emit(SessionEvent::AutoStopped { reason });
    }

    /// Whether the driver should wait out the delay and call [Self::resume_auto].
    ///
    /// Ends auto-play when the balance is exhausted or the round budget is spent.
    pub fn should_schedule_auto(&mut self) -> bool {
        if !self.auto || self.in_flight.is_some() {
            return false;
        }
        if self.balance <= 0.0 {
            self.halt_auto(StopReason::ZeroBalance);
            return false;
        }
        if self.budget_spent() {
            self.halt_auto(StopReason::UserRequested);
            return false;
        }
        true
    }

    fn budget_spent(&self) -> bool {
        self.auto_rounds.is_some_and(|budget| self.auto_opened >= budget)
    }

    /// Open the next auto-play round after the delay has elapsed.
    pub fn resume_auto(&mut self) -> Option<Ticket> {
        if !self.auto || self.in_flight.is_some() {
            return None;
        }
        self.auto_round()
    }

    fn auto_round(&mut self) -> Option<Ticket> {
        if self.budget_spent() {
            self.halt_auto(StopReason::UserRequested);
            return None;
        }
        let wager = self.wager;
        match self.validate(wager) {
            Ok(()) => {
                self.auto_opened += 1;
                Some(self.open_round(wager))
            }
            Err(err) => {
                let reason = StopReason::from_error(&err).unwrap_or(StopReason::InvalidBet);
                self.halt_auto(reason);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descent::{Descent, DescentSimulator, DescentStrategy};
    use plinko_types::Outcome;

    fn session(config: SessionConfig) -> (RoundSession, Events) {
        RoundSession::new(config).unwrap()
    }

    fn drain(events: &mut Events) -> Vec<SessionEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    fn with_balance(starting_balance: f64) -> SessionConfig {
        SessionConfig {
            starting_balance,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let (session, mut events) = session(SessionConfig::default());
        assert_eq!(session.balance(), 1_000.0);
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.table().rows(), 10);
        assert_eq!(session.table().risk(), RiskTier::Medium);
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::Configured { .. }]
        ));
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = SessionConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            RoundSession::new(config),
            Err(PlinkoError::Configuration(ConfigurationError::RowsOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_center_landing_loses() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);

        let ticket = session.place_bet(100.0).unwrap().unwrap();
        assert_eq!(session.balance(), 900.0);
        assert_eq!(session.mode(), SessionMode::AwaitingResult);

        let result = session.settle(ticket, 5).unwrap();
        assert_eq!(result.payout, 40.0);
        assert_eq!(result.outcome, Outcome::Loss);
        assert_eq!(session.balance(), 940.0);
        assert_eq!(session.mode(), SessionMode::Idle);

        let events = drain(&mut events);
        assert_eq!(
            events[0],
            SessionEvent::RoundStarted {
                round: 1,
                bet: 100.0,
                balance: 900.0
            }
        );
        assert_eq!(
            events[1],
            SessionEvent::RoundSettled {
                round: 1,
                result,
                balance: 940.0
            }
        );
    }

    #[test]
    fn test_edge_landing_wins() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.place_bet(50.0).unwrap().unwrap();
        let result = session.settle(ticket, 0).unwrap();
        assert_eq!(result.payout, 1_100.0);
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(session.balance(), 2_050.0);
    }

    #[test]
    fn test_invalid_bet_rejected() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        for amount in [-5.0, f64::NAN, 0.0] {
            assert!(matches!(
                session.place_bet(amount),
                Err(PlinkoError::InvalidBet { .. })
            ));
            assert_eq!(session.balance(), 1_000.0);
            assert_eq!(session.mode(), SessionMode::Idle);
        }
        let events = drain(&mut events);
        assert_eq!(events.len(), 3);
        assert!(events
            .iter()
            .all(|event| matches!(event, SessionEvent::Rejected { .. })));
    }

    #[test]
    fn test_insufficient_balance_rejected() {
        let (mut session, _events) = session(with_balance(30.0));
        assert_eq!(
            session.place_bet(50.0),
            Err(PlinkoError::InsufficientBalance {
                bet: 50.0,
                balance: 30.0
            })
        );
        assert_eq!(session.balance(), 30.0);
        assert_eq!(session.stats().wagered, 0.0);
    }

    #[test]
    fn test_bet_of_entire_balance() {
        let (mut session, _events) = session(with_balance(30.0));
        let ticket = session.place_bet(30.0).unwrap().unwrap();
        assert_eq!(session.balance(), 0.0);
        session.settle(ticket, 5).unwrap();
        assert_eq!(session.balance(), 12.0);
    }

    #[test]
    fn test_bet_while_awaiting_is_ignored() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        let ticket = session.place_bet(100.0).unwrap().unwrap();
        assert_eq!(session.place_bet(100.0), Ok(None));
        assert_eq!(session.balance(), 900.0);
        assert_eq!(session.wager(), 100.0);
        assert_eq!(drain(&mut events).len(), 1);
        session.settle(ticket, 5).unwrap();
    }

    #[test]
    fn test_configure_keeps_in_flight_table() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.place_bet(10.0).unwrap().unwrap();
        session.configure(16, RiskTier::High).unwrap();
        assert_eq!(ticket.rows(), 10);

        let result = session.settle(ticket, 0).unwrap();
        assert_eq!(result.multiplier, 22.0);

        let ticket = session.place_bet(10.0).unwrap().unwrap();
        let result = session.settle(ticket, 0).unwrap();
        assert_eq!(result.multiplier, 620.0);
    }

    #[test]
    fn test_configure_rejects_bad_rows() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        assert!(session.configure(0, RiskTier::Low).is_err());
        assert_eq!(session.table().rows(), 10);
        assert!(matches!(
            drain(&mut events).as_slice(),
            [SessionEvent::Rejected { .. }]
        ));
    }

    #[test]
    fn test_synthesized_table_configured() {
        let (mut session, _events) = session(SessionConfig::default());
        session.configure(8, RiskTier::Medium).unwrap();
        assert!(session.table().is_synthesized());
        assert_eq!(session.table().len(), 9);
    }

    #[test]
    fn test_slot_is_clamped() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.place_bet(10.0).unwrap().unwrap();
        let result = session.settle(ticket, 99).unwrap();
        assert_eq!(result.slot, 10);
        assert_eq!(result.multiplier, 22.0);
    }

    #[test]
    fn test_void_refunds_bet() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        let ticket = session.place_bet(100.0).unwrap().unwrap();
        session.void(ticket).unwrap();
        assert_eq!(session.balance(), 1_000.0);
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.stats().voided, 1);
        assert_eq!(
            drain(&mut events).last(),
            Some(&SessionEvent::RoundVoided {
                round: 1,
                bet: 100.0,
                balance: 1_000.0
            })
        );
    }

    #[test]
    fn test_unresolvable_round_is_voided() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        let ticket = session.place_bet(100.0).unwrap().unwrap();
        session.in_flight = Some(InFlight { round: 1, bet: 0.0 });

        assert_eq!(
            session.settle(ticket, 5),
            Err(PlinkoError::InvalidBet { amount: 0.0 })
        );
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.in_flight(), None);
        assert_eq!(session.stats().voided, 1);
        assert!(matches!(
            drain(&mut events).last(),
            Some(SessionEvent::RoundVoided { round: 1, .. })
        ));
        assert!(session.place_bet(10.0).unwrap().is_some());
    }

    #[test]
    fn test_foreign_ticket_rejected() {
        let (mut first, _first_events) = session(SessionConfig::default());
        let (mut second, _second_events) = session(SessionConfig::default());
        let ticket = first.place_bet(10.0).unwrap().unwrap();
        assert_eq!(
            second.settle(ticket, 0),
            Err(PlinkoError::RoundMismatch {
                expected: None,
                got: 1
            })
        );
        assert_eq!(second.balance(), 1_000.0);
    }

    #[test]
    fn test_auto_stops_at_zero_balance() {
        let config = SessionConfig {
            starting_balance: 100.0,
            rows: 2,
            wager: 100.0,
            multipliers: Some(vec![2.0, 0.0, 2.0]),
            ..Default::default()
        };
        let (mut session, mut events) = session(config);
        drain(&mut events);

        let ticket = session.start_auto().unwrap();
        assert_eq!(session.mode(), SessionMode::AutoPlaying);
        session.settle(ticket, 1).unwrap();
        assert_eq!(session.balance(), 0.0);

        assert!(!session.should_schedule_auto());
        assert!(!session.is_auto());
        assert_eq!(session.mode(), SessionMode::Idle);
        assert_eq!(session.resume_auto(), None);
        assert_eq!(session.stats().wagered, 100.0);

        let events = drain(&mut events);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::AutoStopped {
                reason: StopReason::ZeroBalance
            })
        );
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, SessionEvent::RoundStarted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_auto_stops_on_insufficient_balance() {
        let config = SessionConfig {
            starting_balance: 30.0,
            wager: 50.0,
            ..Default::default()
        };
        let (mut session, mut events) = session(config);
        drain(&mut events);
        assert_eq!(session.start_auto(), None);
        assert!(!session.is_auto());
        assert_eq!(session.balance(), 30.0);
        assert_eq!(
            drain(&mut events),
            vec![
                SessionEvent::AutoStarted,
                SessionEvent::AutoStopped {
                    reason: StopReason::InsufficientBalance
                }
            ]
        );
    }

    #[test]
    fn test_auto_stops_on_invalid_wager() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        let ticket = session.start_auto().unwrap();
        session.settle(ticket, 5).unwrap();
        session.set_wager(-1.0);
        assert!(session.should_schedule_auto());
        assert_eq!(session.resume_auto(), None);
        assert_eq!(
            drain(&mut events).last(),
            Some(&SessionEvent::AutoStopped {
                reason: StopReason::InvalidBet
            })
        );
    }

    #[test]
    fn test_auto_round_budget() {
        let config = SessionConfig {
            auto_rounds: Some(2),
            ..Default::default()
        };
        let (mut session, mut events) = session(config);
        drain(&mut events);

        let ticket = session.start_auto().unwrap();
        session.settle(ticket, 5).unwrap();
        assert!(session.should_schedule_auto());
        let ticket = session.resume_auto().unwrap();
        session.settle(ticket, 5).unwrap();

        assert!(!session.should_schedule_auto());
        assert!(!session.is_auto());
        assert_eq!(session.resume_auto(), None);
        assert_eq!(session.stats().rounds, 2);
        assert_eq!(
            drain(&mut events).last(),
            Some(&SessionEvent::AutoStopped {
                reason: StopReason::UserRequested
            })
        );

        // A new run gets a fresh budget.
        assert!(session.start_auto().is_some());
    }

    #[test]
    fn test_stop_auto_lets_round_settle() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.start_auto().unwrap();
        assert!(session.stop_auto());
        assert!(!session.stop_auto());
        assert_eq!(session.mode(), SessionMode::AwaitingResult);
        session.settle(ticket, 5).unwrap();
        assert!(!session.should_schedule_auto());
        assert_eq!(session.balance(), 994.0);
    }

    #[test]
    fn test_manual_bet_ignored_during_auto() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.start_auto().unwrap();
        session.settle(ticket, 5).unwrap();
        assert_eq!(session.place_bet(20.0), Ok(None));
        assert_eq!(session.balance(), 994.0);
        // The entered amount still feeds the next auto round.
        assert!(session.should_schedule_auto());
        let ticket = session.resume_auto().unwrap();
        assert_eq!(ticket.bet(), 20.0);
    }

    #[test]
    fn test_auto_waits_for_manual_round() {
        let (mut session, _events) = session(SessionConfig::default());
        let ticket = session.place_bet(10.0).unwrap().unwrap();
        assert_eq!(session.start_auto(), None);
        assert!(session.is_auto());
        session.settle(ticket, 5).unwrap();
        assert!(session.should_schedule_auto());
        assert!(session.resume_auto().is_some());
    }

    #[test]
    fn test_balance_conserved() {
        let (mut session, _events) = session(SessionConfig::default());
        let mut descent = Descent::from_seed(DescentStrategy::Weighted, 2024);
        let mut wagered = 0.0;
        let mut returned = 0.0;
        for round in 0..500 {
            let bet = 1.0 + (round % 7) as f64;
            let Ok(Some(ticket)) = session.place_bet(bet) else {
                break;
            };
            let slot = descent.descend(ticket.rows());
            let result = session.settle(ticket, slot).unwrap();
            wagered += bet;
            returned += result.payout;
        }
        let expected = 1_000.0 - wagered + returned;
        assert!((session.balance() - expected).abs() < 1e-6);
        assert!((session.stats().net() - (returned - wagered)).abs() < 1e-6);
    }

    #[test]
    fn test_events_serialize_tagged() {
        let (mut session, mut events) = session(SessionConfig::default());
        drain(&mut events);
        let _ = session.place_bet(-5.0);
        let _ticket = session.place_bet(100.0).unwrap().unwrap();

        let events = drain(&mut events);
        assert_eq!(
            serde_json::to_value(&events[0]).unwrap(),
            serde_json::json!({
                "event": "rejected",
                "error": {"kind": "invalid_bet", "detail": {"amount": -5.0}}
            })
        );
        assert_eq!(
            serde_json::to_value(&events[1]).unwrap(),
            serde_json::json!({
                "event": "round_started",
                "round": 1,
                "bet": 100.0,
                "balance": 900.0
            })
        );
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut session, _events) = session(SessionConfig::default());
        let _ticket = session.place_bet(10.0).unwrap().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.balance, 990.0);
        assert_eq!(snapshot.mode, SessionMode::AwaitingResult);
        assert_eq!(snapshot.wager, 10.0);
        assert_eq!(snapshot.stats.wagered, 10.0);
    }
}
