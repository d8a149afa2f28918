//! Phases of a feeding run

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named stage of the feeding recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Aeration and inlet valve on
    Initialize,
    /// Fill and drain the lines
    Prime,
    /// Dispense food and fill the tank
    Prepare,
    /// Alternate fill/drain to circulate the food
    Stream,
    /// Rinse cycles
    Clean,
    /// Every actuator to its safe state
    Finalize,
}

impl Phase {
    /// Recipe phases in execution order (finalize runs separately)
    pub const RECIPE: [Phase; 5] = [
        Phase::Initialize,
        Phase::Prime,
        Phase::Prepare,
        Phase::Stream,
        Phase::Clean,
    ];

    /// Short name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Initialize => "initialize",
            Phase::Prime => "prime",
            Phase::Prepare => "prepare",
            Phase::Stream => "stream",
            Phase::Clean => "clean",
            Phase::Finalize => "finalize",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
