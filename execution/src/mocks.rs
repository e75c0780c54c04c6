//! Deterministic doubles for tests and downstream crates.

use tokio::sync::oneshot;

use crate::{
    descent::DescentSimulator,
    table::{DropRequest, Dropper, SimulatedDropper},
};

/// Lands tokens in a fixed sequence of slots, cycling once exhausted.
///
/// Slots are returned as scripted, even when they exceed `rows`. An empty script lands every
/// token in the center slot.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDescent {
    slots: Vec<usize>,
    next: usize,
}

impl ScriptedDescent {
    pub fn new(slots: Vec<usize>) -> Self {
        Self { slots, next: 0 }
    }

    /// Tokens dropped so far.
    pub fn dropped(&self) -> usize {
        self.next
    }
}

impl DescentSimulator for ScriptedDescent {
    fn descend(&mut self, rows: u8) -> usize {
        let slot = if self.slots.is_empty() {
            rows as usize / 2
        } else {
            self.slots[self.next % self.slots.len()]
        };
        self.next += 1;
        slot
    }
}

/// Dropper landing tokens immediately at scripted slots.
pub fn scripted_dropper(slots: Vec<usize>) -> SimulatedDropper<ScriptedDescent> {
    SimulatedDropper::new(ScriptedDescent::new(slots))
}

/// Dropper that never reports a landing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingDropper;

impl Dropper for FailingDropper {
    fn drop_ball(&mut self, _: &DropRequest) -> oneshot::Receiver<usize> {
        let (_, receiver) = oneshot::channel();
        receiver
    }
}
