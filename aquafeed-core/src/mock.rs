//! Recording port, delay and clock for unit tests

use core::cell::Cell;

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::traits::{
    validate_angle, ActuatorError, ActuatorId, ActuatorPort, ActuatorState, Clock,
    HardwareCause, InvalidParameter,
};

/// One command that reached the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Binary(ActuatorId, bool),
    Angle(u8),
    Park,
}

/// Actuator port that records writes and can fail the nth one
pub struct MockPort {
    pub log: Vec<Command, 512>,
    pub states: [ActuatorState; 5],
    /// Zero-based index of the write attempt to fail
    pub fail_at: Option<usize>,
    pub attempts: usize,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            states: [ActuatorState::Unknown; 5],
            fail_at: None,
            attempts: 0,
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    fn write(&mut self, actuator: ActuatorId, command: Command) -> Result<(), ActuatorError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(ActuatorError::HardwareFault {
                actuator,
                cause: HardwareCause::I2cNack,
            });
        }
        let _ = self.log.push(command);
        Ok(())
    }

    pub fn count(&self, id: ActuatorId, on: bool) -> usize {
        self.log
            .iter()
            .filter(|c| **c == Command::Binary(id, on))
            .count()
    }

    pub fn angles(&self) -> usize {
        self.log
            .iter()
            .filter(|c| matches!(c, Command::Angle(_)))
            .count()
    }
}

impl ActuatorPort for MockPort {
    fn set_binary(&mut self, id: ActuatorId, on: bool) -> Result<(), ActuatorError> {
        if !id.is_binary() {
            return Err(InvalidParameter::NotBinary(id).into());
        }
        self.write(id, Command::Binary(id, on))?;
        self.states[id.index()] = if on {
            ActuatorState::On
        } else {
            ActuatorState::Off
        };
        Ok(())
    }

    fn set_angle(&mut self, degrees: i16) -> Result<(), ActuatorError> {
        let angle = validate_angle(degrees)?;
        self.write(ActuatorId::FeederServo, Command::Angle(angle))?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Angle(angle);
        Ok(())
    }

    fn park_servo(&mut self) -> Result<(), ActuatorError> {
        self.write(ActuatorId::FeederServo, Command::Park)?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Parked;
        Ok(())
    }

    fn state(&self, id: ActuatorId) -> ActuatorState {
        self.states[id.index()]
    }
}

/// Delay that returns immediately, or hangs after raising a stop flag
pub struct MockDelay<'a> {
    pub total_ms: u64,
    pub calls: usize,
    /// Raise the flag and never complete on this zero-based call
    pub stop_at: Option<(usize, &'a Cell<bool>)>,
}

impl<'a> MockDelay<'a> {
    pub fn new() -> Self {
        Self {
            total_ms: 0,
            calls: 0,
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

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        let call = self.calls;
        self.calls += 1;
        if let Some((at, flag)) = self.stop_at {
            if at == call {
                flag.set(true);
                core::future::pending::<()>().await;
            }
        }
        self.total_ms += ms as u64;
    }
}

/// Clock frozen at a fixed time
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Future that completes once the flag is raised
pub async fn wait_flag(flag: &Cell<bool>) {
    core::future::poll_fn(|_| {
        if flag.get() {
            core::task::Poll::Ready(())
        } else {
            core::task::Poll::Pending
        }
    })
    .await
}
