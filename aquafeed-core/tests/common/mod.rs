//! Shared fakes for integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::future::{pending, poll_fn};
use std::task::Poll;

use aquafeed_core::config::TimingProfile;
use aquafeed_core::traits::{
    validate_angle, ActuatorError, ActuatorId, ActuatorPort, ActuatorState, Clock,
    HardwareCause, InvalidParameter,
};
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Binary(ActuatorId, bool),
    Angle(u8),
    Park,
}

/// Fake relay board + servo that can fail one write
#[derive(Default)]
pub struct FakeFeeder {
    pub writes: Vec<Write>,
    pub states: [ActuatorState; 5],
    pub fail_at: Option<usize>,
    pub attempts: usize,
}

impl FakeFeeder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    fn attempt(&mut self, actuator: ActuatorId, write: Write) -> Result<(), ActuatorError> {
        let n = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(n) {
            return Err(ActuatorError::HardwareFault {
                actuator,
                cause: HardwareCause::I2cBus,
            });
        }
        self.writes.push(write);
        Ok(())
    }

    pub fn pulses(&self, id: ActuatorId) -> usize {
        self.writes
            .iter()
            .filter(|w| **w == Write::Binary(id, true))
            .count()
    }

    pub fn servo_moves(&self) -> usize {
        self.writes
            .iter()
            .filter(|w| matches!(w, Write::Angle(_)))
            .count()
    }

    pub fn all_safe(&self) -> bool {
        ActuatorId::ALL.iter().all(|id| self.state(*id).is_safe())
    }
}

impl ActuatorPort for FakeFeeder {
    fn set_binary(&mut self, id: ActuatorId, on: bool) -> Result<(), ActuatorError> {
        if !id.is_binary() {
            return Err(InvalidParameter::NotBinary(id).into());
        }
        self.attempt(id, Write::Binary(id, on))?;
        self.states[id.index()] = if on {
            ActuatorState::On
        } else {
            ActuatorState::Off
        };
        Ok(())
    }

    fn set_angle(&mut self, degrees: i16) -> Result<(), ActuatorError> {
        let angle = validate_angle(degrees)?;
        self.attempt(ActuatorId::FeederServo, Write::Angle(angle))?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Angle(angle);
        Ok(())
    }

    fn park_servo(&mut self) -> Result<(), ActuatorError> {
        self.attempt(ActuatorId::FeederServo, Write::Park)?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Parked;
        Ok(())
    }

    fn state(&self, id: ActuatorId) -> ActuatorState {
        self.states[id.index()]
    }
}

/// Instant delay; optionally raises a stop flag and hangs on one call
pub struct FakeDelay<'a> {
    pub calls: usize,
    pub slept_ms: u64,
    pub stop_at: Option<(usize, &'a Cell<bool>)>,
}

impl<'a> FakeDelay<'a> {
    pub fn new() -> Self {
        Self {
            calls: 0,
            slept_ms: 0,
            stop_at: None,
        }
    }

    pub fn stopping_at(call: usize, flag: &'a Cell<bool>) -> Self {
        Self {
            stop_at: Some((call, flag)),
            ..Self::new()
        }
    }
}

impl DelayNs for FakeDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        let call = self.calls;
        self.calls += 1;
        if let Some((at, flag)) = self.stop_at {
            if at == call {
                flag.set(true);
                pending::<()>().await;
            }
        }
        self.slept_ms += u64::from(ms);
    }
}

pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Resolves once the flag is raised
pub async fn stop_requested(flag: &Cell<bool>) {
    poll_fn(|_| {
        if flag.get() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    })
    .await
}

/// Profile from the reference end-to-end scenario
pub fn scenario_profile() -> TimingProfile {
    TimingProfile {
        prime_in_cycles: 2,
        prime_out_cycles: 1,
        pump_on_ms: 10,
        pump_off_ms: 10,
        feeder_repeat: 1,
        stream_out_cycles: 1,
        stream_repeat_cycles: 1,
        stream_in_cycles: 1,
        clean_repeat_cycles: 0,
        final_clean_cycles: 0,
        ..TimingProfile::default()
    }
}
