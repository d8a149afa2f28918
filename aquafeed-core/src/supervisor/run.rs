//! Run execution and reporting

use core::future::Future;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

use super::guard::FinalizeGuard;
use crate::config::TimingProfile;
use crate::scheduler::{EventSink, Phase, PhaseSequencer};
use crate::state::{Event, FaultKind, RunFault, RunStatus};
use crate::traits::{ActuatorError, ActuatorPort, Clock};

/// Exit code of a finalized run
pub const EXIT_OK: u8 = 0;
/// Exit code when a bus or PWM write failed
pub const EXIT_HARDWARE_FAULT: u8 = 1;
/// Exit code for a rejected command or timing profile
pub const EXIT_INVALID_PARAMETER: u8 = 2;
/// Exit code for an external stop request
pub const EXIT_CANCELLED: u8 = 130;

/// Outcome of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    /// Final status
    pub status: RunStatus,
    /// Clock time when Initialize began; `None` if the run never started
    pub started_at_ms: Option<u64>,
    /// Finalize was executed
    pub finalized: bool,
    /// First error raised by finalize itself
    pub finalize_fault: Option<ActuatorError>,
}

impl RunReport {
    /// Check if the run completed every phase and finalized cleanly
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Finalized
    }

    /// Process-style exit code
    pub fn exit_code(&self) -> u8 {
        match self.status {
            RunStatus::Finalized => EXIT_OK,
            RunStatus::Failed(fault) => match fault.kind {
                FaultKind::HardwareFault => EXIT_HARDWARE_FAULT,
                FaultKind::InvalidParameter => EXIT_INVALID_PARAMETER,
                FaultKind::Cancelled => EXIT_CANCELLED,
            },
            // Reports are built after finalize, so the status is terminal
            _ => EXIT_HARDWARE_FAULT,
        }
    }
}

impl core::fmt::Display for RunReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.started_at_ms {
            Some(ms) => write!(f, "{} {}", ms, self.status),
            None => write!(f, "- {}", self.status),
        }
    }
}

/// Runs the feeding recipe with the finalize guarantee
pub struct RunSupervisor<P, D, C> {
    port: P,
    delay: D,
    clock: C,
    last: Option<RunReport>,
}

impl<P, D, C> RunSupervisor<P, D, C>
where
    P: ActuatorPort,
    D: DelayNs,
    C: Clock,
{
    pub fn new(port: P, delay: D, clock: C) -> Self {
        Self {
            port,
            delay,
            clock,
            last: None,
        }
    }

    /// Actuator port, for inspecting actuator state
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Status of the last completed run
    pub fn status(&self) -> RunStatus {
        self.last.map(|r| r.status).unwrap_or_default()
    }

    /// Report of the last completed run
    pub fn last_report(&self) -> Option<&RunReport> {
        self.last.as_ref()
    }

    /// Give back the owned drivers
    pub fn release(self) -> (P, D, C) {
        (self.port, self.delay, self.clock)
    }

    /// Execute one feeding run
    ///
    /// Phases run until they all complete, one fails, or `cancel`
    /// resolves. `cancel` is polled before the phases, so a stop request
    /// that is already pending prevents every recipe command. Finalize
    /// then runs exactly once. If this future is dropped mid-run, the
    /// guard finalizes on drop and no report is stored.
    pub async fn execute<F, S>(
        &mut self,
        profile: TimingProfile,
        cancel: F,
        sink: &mut S,
    ) -> RunReport
    where
        F: Future<Output = ()>,
        S: EventSink,
    {
        let mut guard = FinalizeGuard::new(&mut self.port);
        let mut seq = PhaseSequencer::new(
            profile,
            guard.port(),
            &mut self.delay,
            &self.clock,
            &mut *sink,
        );

        let outcome = match profile.validate() {
            Err(e) => Err(RunFault::from_config(e)),
            Ok(()) => {
                let raced = select(cancel, seq.run()).await;
                match raced {
                    Either::First(()) => Err(RunFault::cancelled(seq.current_phase())),
                    Either::Second(result) => result,
                }
            }
        };

        if let Err(fault) = outcome {
            seq.record(Event::Fault(fault));
        }
        let mut status = seq.status();
        let started_at_ms = seq.started_at_ms();

        let finalize_fault = guard.finish().err();
        let event = match finalize_fault {
            None => Event::FinalizeComplete,
            Some(e) => Event::Fault(RunFault::from_actuator(Phase::Finalize, e)),
        };
        status = status.transition(event);
        sink.emit(event);

        let report = RunReport {
            status,
            started_at_ms,
            finalized: true,
            finalize_fault,
        };
        self.last = Some(report);
        report
    }
}
