//! Phase sequencer
//!
//! Runs the feeding recipe phase by phase against an [`ActuatorPort`]:
//!
//! 1. Initialize: air pump and inlet solenoid on
//! 2. Prime: inlet pulses, then outlet pulses
//! 3. Prepare: servo dispense sweeps, then a fixed tank fill
//! 4. Stream: one drain, then fill/drain pairs
//! 5. Clean: one fill/drain pair, repeated pairs, then fixed final rinses
//!
//! Finalize is not part of [`PhaseSequencer::run`]; the supervisor runs it
//! through its guard so it happens on every exit path.
//!
//! The sequencer tracks the phase in progress and the run status. Both stay
//! readable after the run future is dropped, which is how a cancelled run
//! learns where it stopped.

use embedded_hal_async::delay::DelayNs;

use super::phase::Phase;
use super::pulse::PulseTrain;
use super::sink::EventSink;
use crate::config::TimingProfile;
use crate::state::{Event, RunFault, RunStatus};
use crate::traits::{ActuatorError, ActuatorId, ActuatorPort, Clock};

/// Inlet pulses that fill the tank after food is dispensed
pub const PREPARE_FILL_CYCLES: u16 = 10;

/// Inlet pulses per final rinse
pub const FINAL_CLEAN_IN_CYCLES: u16 = 10;

/// Outlet pulses per final rinse
pub const FINAL_CLEAN_OUT_CYCLES: u16 = 6;

/// Servo angle that tips food into the tank
pub const DISPENSE_ANGLE: i16 = 180;

/// Servo resting angle
pub const REST_ANGLE: i16 = 0;

/// Switch every actuator to its safe state
///
/// All four binary actuators are commanded OFF even if some writes fail,
/// then the servo is parked. Returns the first error. Safe to call any
/// number of times.
pub fn finalize_outputs<P>(port: &mut P) -> Result<(), ActuatorError>
where
    P: ActuatorPort + ?Sized,
{
    let mut first_error = None;

    for id in ActuatorId::BINARY {
        if let Err(e) = port.set_binary(id, false) {
            first_error.get_or_insert(e);
        }
    }

    if let Err(e) = port.park_servo() {
        first_error.get_or_insert(e);
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Drives one feeding run
pub struct PhaseSequencer<'a, P, D, C, S> {
    profile: TimingProfile,
    port: &'a mut P,
    delay: &'a mut D,
    clock: &'a C,
    sink: &'a mut S,
    status: RunStatus,
    current: Phase,
    started_at_ms: Option<u64>,
}

impl<'a, P, D, C, S> PhaseSequencer<'a, P, D, C, S>
where
    P: ActuatorPort,
    D: DelayNs,
    C: Clock,
    S: EventSink,
{
    /// Create a sequencer for one run
    ///
    /// The profile is copied in and cannot change for the rest of the run.
    pub fn new(
        profile: TimingProfile,
        port: &'a mut P,
        delay: &'a mut D,
        clock: &'a C,
        sink: &'a mut S,
    ) -> Self {
        Self {
            profile,
            port,
            delay,
            clock,
            sink,
            status: RunStatus::NotStarted,
            current: Phase::Initialize,
            started_at_ms: None,
        }
    }

    /// Profile this run uses
    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    /// Current run status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Phase in progress, or the last one started
    pub fn current_phase(&self) -> Phase {
        self.current
    }

    /// Timestamp captured when Initialize began
    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    /// Apply an event to the status and forward it to the sink
    pub fn record(&mut self, event: Event) {
        self.status = self.status.transition(event);
        self.sink.emit(event);
    }

    /// Run phases 1 to 5 in order
    ///
    /// Stops at the first failed command. Does not record the fault; the
    /// caller decides how the run ends.
    pub async fn run(&mut self) -> Result<(), RunFault> {
        for phase in Phase::RECIPE {
            self.current = phase;
            self.record(Event::PhaseStarted(phase));
            self.run_phase(phase)
                .await
                .map_err(|e| RunFault::from_actuator(phase, e))?;
            self.record(Event::PhaseComplete(phase));
        }
        Ok(())
    }

    /// Run a single phase
    pub async fn run_phase(&mut self, phase: Phase) -> Result<(), ActuatorError> {
        match phase {
            Phase::Initialize => self.initialize(),
            Phase::Prime => self.prime().await,
            Phase::Prepare => self.prepare().await,
            Phase::Stream => self.stream().await,
            Phase::Clean => self.clean().await,
            Phase::Finalize => finalize_outputs(&mut *self.port),
        }
    }

    /// Switch everything off and record the outcome
    pub fn finalize(&mut self) -> Result<(), ActuatorError> {
        self.current = Phase::Finalize;
        match finalize_outputs(&mut *self.port) {
            Ok(()) => {
                self.record(Event::FinalizeComplete);
                Ok(())
            }
            Err(e) => {
                self.record(Event::Fault(RunFault::from_actuator(Phase::Finalize, e)));
                Err(e)
            }
        }
    }

    fn initialize(&mut self) -> Result<(), ActuatorError> {
        self.started_at_ms = Some(self.clock.now_ms());
        self.port.set_binary(ActuatorId::AirPump, true)?;
        self.port.set_binary(ActuatorId::InletSolenoid, true)?;
        Ok(())
    }

    async fn prime(&mut self) -> Result<(), ActuatorError> {
        self.pulse(ActuatorId::InletPump, self.profile.prime_in_cycles)
            .await?;
        self.pulse(ActuatorId::OutletPump, self.profile.prime_out_cycles)
            .await
    }

    async fn prepare(&mut self) -> Result<(), ActuatorError> {
        for _ in 0..self.profile.feeder_repeat {
            for angle in [DISPENSE_ANGLE, REST_ANGLE] {
                self.port.set_angle(angle)?;
                self.delay.delay_ms(self.profile.servo_settle_ms).await;
            }
        }
        self.pulse(ActuatorId::InletPump, PREPARE_FILL_CYCLES).await
    }

    async fn stream(&mut self) -> Result<(), ActuatorError> {
        let p = self.profile;
        self.pulse(ActuatorId::OutletPump, p.stream_out_cycles).await?;
        for _ in 0..p.stream_repeat_cycles {
            self.fill_drain(p.stream_in_cycles, p.stream_out_cycles)
                .await?;
        }
        Ok(())
    }

    async fn clean(&mut self) -> Result<(), ActuatorError> {
        let p = self.profile;
        self.fill_drain(p.clean_in_cycles, p.clean_out_cycles).await?;
        for _ in 0..p.clean_repeat_cycles {
            self.fill_drain(p.clean_in_cycles, p.clean_out_cycles).await?;
        }
        for _ in 0..p.final_clean_cycles {
            self.fill_drain(FINAL_CLEAN_IN_CYCLES, FINAL_CLEAN_OUT_CYCLES)
                .await?;
        }
        Ok(())
    }

    async fn fill_drain(&mut self, in_cycles: u16, out_cycles: u16) -> Result<(), ActuatorError> {
        self.pulse(ActuatorId::InletPump, in_cycles).await?;
        self.pulse(ActuatorId::OutletPump, out_cycles).await
    }

    async fn pulse(&mut self, actuator: ActuatorId, cycles: u16) -> Result<(), ActuatorError> {
        PulseTrain::pump(actuator, &self.profile, cycles)
            .run(&mut *self.port, &mut *self.delay)
            .await
    }
}

/// Expected duration of phases 1 to 5 (ms), ignoring bus latency
pub fn estimated_duration_ms(profile: &TimingProfile) -> u64 {
    let p = profile;
    let pulses = |n: u16| n as u64 * p.pulse_ms();
    let pairs = |times: u16, fill: u16, drain: u16| times as u64 * (pulses(fill) + pulses(drain));

    let prime = pulses(p.prime_in_cycles) + pulses(p.prime_out_cycles);
    let prepare = 2 * p.feeder_repeat as u64 * p.servo_settle_ms as u64 + pulses(PREPARE_FILL_CYCLES);
    let stream = pulses(p.stream_out_cycles)
        + pairs(p.stream_repeat_cycles, p.stream_in_cycles, p.stream_out_cycles);
    let clean = pairs(1, p.clean_in_cycles, p.clean_out_cycles)
        + pairs(p.clean_repeat_cycles, p.clean_in_cycles, p.clean_out_cycles)
        + pairs(p.final_clean_cycles, FINAL_CLEAN_IN_CYCLES, FINAL_CLEAN_OUT_CYCLES);

    prime + prepare + stream + clean
}
