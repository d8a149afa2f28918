//! Run status definition
//!
//! A run walks forward through the recipe one phase at a time. Faults can
//! arrive in any non-terminal status; finalize only turns a fully cleaned
//! run into `Finalized`.

use super::events::Event;
use crate::config::ConfigError;
use crate::scheduler::Phase;
use crate::traits::ActuatorError;

/// How far a run got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunStatus {
    /// No command issued yet
    #[default]
    NotStarted,
    /// Air pump and inlet solenoid on
    Initialized,
    /// Lines primed
    Primed,
    /// Food dispensed and tank filled
    FoodPrepared,
    /// Stream cycles done
    Streamed,
    /// Clean cycles done
    Cleaned,
    /// Run completed and every actuator is off
    Finalized,
    /// Run stopped early
    Failed(RunFault),
}

/// Category of a run failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Bad angle, non-binary target, or invalid timing profile
    InvalidParameter,
    /// Bus or PWM write failed
    HardwareFault,
    /// External stop request
    Cancelled,
}

impl FaultKind {
    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            FaultKind::InvalidParameter => "invalid parameter",
            FaultKind::HardwareFault => "hardware fault",
            FaultKind::Cancelled => "cancelled",
        }
    }
}

/// Underlying error behind a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultCause {
    /// Actuator command failed
    Actuator(ActuatorError),
    /// Timing profile rejected before the run
    Config(ConfigError),
}

impl core::fmt::Display for FaultCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FaultCause::Actuator(e) => write!(f, "{}", e),
            FaultCause::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Why and where a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunFault {
    /// Phase in progress when the run stopped
    pub phase: Phase,
    /// Failure category
    pub kind: FaultKind,
    /// Underlying error, absent for cancellation
    pub cause: Option<FaultCause>,
}

impl RunFault {
    /// Fault from a failed actuator command
    pub fn from_actuator(phase: Phase, error: ActuatorError) -> Self {
        let kind = match error {
            ActuatorError::InvalidParameter(_) => FaultKind::InvalidParameter,
            ActuatorError::HardwareFault { .. } => FaultKind::HardwareFault,
        };
        Self {
            phase,
            kind,
            cause: Some(FaultCause::Actuator(error)),
        }
    }

    /// Fault from a rejected timing profile
    pub fn from_config(error: ConfigError) -> Self {
        Self {
            phase: Phase::Initialize,
            kind: FaultKind::InvalidParameter,
            cause: Some(FaultCause::Config(error)),
        }
    }

    /// Fault from an external stop request
    pub fn cancelled(phase: Phase) -> Self {
        Self {
            phase,
            kind: FaultKind::Cancelled,
            cause: None,
        }
    }
}

impl core::fmt::Display for RunFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} failed: {}", self.phase, self.kind.name())?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl RunStatus {
    /// Check if the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Finalized | RunStatus::Failed(_))
    }

    /// Fault that ended the run, if any
    pub fn fault(&self) -> Option<RunFault> {
        match self {
            RunStatus::Failed(fault) => Some(*fault),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::NotStarted => "NotStarted",
            RunStatus::Initialized => "Initialized",
            RunStatus::Primed => "Primed",
            RunStatus::FoodPrepared => "FoodPrepared",
            RunStatus::Streamed => "Streamed",
            RunStatus::Cleaned => "Cleaned",
            RunStatus::Finalized => "Finalized",
            RunStatus::Failed(_) => "Failed",
        }
    }

    /// Process an event and return the next status
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use RunStatus::*;

        match (self, event) {
            // Forward progress, one phase at a time
            (NotStarted, PhaseComplete(Phase::Initialize)) => Initialized,
            (Initialized, PhaseComplete(Phase::Prime)) => Primed,
            (Primed, PhaseComplete(Phase::Prepare)) => FoodPrepared,
            (FoodPrepared, PhaseComplete(Phase::Stream)) => Streamed,
            (Streamed, PhaseComplete(Phase::Clean)) => Cleaned,

            // Only a fully cleaned run finalizes successfully
            (Cleaned, FinalizeComplete) => Finalized,

            // First fault wins
            (Finalized, Fault(_)) | (Failed(_), Fault(_)) => self,
            (_, Fault(fault)) => Failed(fault),

            // Default: stay in current status
            _ => self,
        }
    }
}

impl core::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
