//! Events that trigger status transitions

use super::machine::RunFault;
use crate::scheduler::Phase;

/// Events emitted while a run progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A phase is about to issue its first command
    PhaseStarted(Phase),
    /// A phase finished without error
    PhaseComplete(Phase),
    /// The run stopped: hardware fault, bad parameter or cancellation
    Fault(RunFault),
    /// Every actuator was commanded to its safe state
    FinalizeComplete,
}

impl Event {
    /// Check if this event indicates an error
    pub fn is_fault(&self) -> bool {
        matches!(self, Event::Fault(_))
    }

    /// Phase the event refers to, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseStarted(p) | Event::PhaseComplete(p) => Some(*p),
            Event::Fault(fault) => Some(fault.phase),
            Event::FinalizeComplete => Some(Phase::Finalize),
        }
    }
}
