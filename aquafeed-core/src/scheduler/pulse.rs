//! Pulse trains
//!
//! A pulse train switches one binary actuator ON, waits, switches it OFF,
//! waits, and repeats. Every pump movement in the recipe is one of these.

use embedded_hal_async::delay::DelayNs;

use crate::config::TimingProfile;
use crate::traits::{ActuatorError, ActuatorId, ActuatorPort};

/// Repeated ON-wait-OFF-wait cycle on one actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTrain {
    /// Binary actuator to pulse
    pub actuator: ActuatorId,
    /// ON time per cycle (ms)
    pub on_ms: u32,
    /// OFF time per cycle (ms)
    pub off_ms: u32,
    /// Number of cycles; zero is a no-op
    pub cycles: u16,
}

impl PulseTrain {
    pub const fn new(actuator: ActuatorId, on_ms: u32, off_ms: u32, cycles: u16) -> Self {
        Self {
            actuator,
            on_ms,
            off_ms,
            cycles,
        }
    }

    /// Pump pulses with the profile's ON/OFF times
    pub fn pump(actuator: ActuatorId, profile: &TimingProfile, cycles: u16) -> Self {
        Self::new(actuator, profile.pump_on_ms, profile.pump_off_ms, cycles)
    }

    /// Total wall time of the train (ms)
    pub fn duration_ms(&self) -> u64 {
        self.cycles as u64 * (self.on_ms as u64 + self.off_ms as u64)
    }

    /// Run every cycle
    ///
    /// The first failed write aborts the remaining cycles. If that write
    /// was the OFF half, the actuator may still be on; the caller's
    /// finalize handles it.
    pub async fn run<P, D>(&self, port: &mut P, delay: &mut D) -> Result<(), ActuatorError>
    where
        P: ActuatorPort + ?Sized,
        D: DelayNs,
    {
        for _ in 0..self.cycles {
            port.set_binary(self.actuator, true)?;
            delay.delay_ms(self.on_ms).await;
            port.set_binary(self.actuator, false)?;
            delay.delay_ms(self.off_ms).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Command, MockDelay, MockPort};
    use crate::traits::{ActuatorState, HardwareCause, InvalidParameter};
    use embassy_futures::block_on;

    #[test]
    fn test_cycles_and_order() {
        let mut port = MockPort::new();
        let mut delay = MockDelay::new();
        let train = PulseTrain::new(ActuatorId::InletPump, 10, 20, 3);

        block_on(train.run(&mut port, &mut delay)).unwrap();

        assert_eq!(port.log.len(), 6);
        for pair in port.log.chunks(2) {
            assert_eq!(pair[0], Command::Binary(ActuatorId::InletPump, true));
            assert_eq!(pair[1], Command::Binary(ActuatorId::InletPump, false));
        }
        assert_eq!(delay.calls, 6);
        assert_eq!(delay.total_ms, train.duration_ms());
        assert_eq!(port.state(ActuatorId::InletPump), ActuatorState::Off);
    }

    #[test]
    fn test_zero_cycles_is_noop() {
        let mut port = MockPort::new();
        let mut delay = MockDelay::new();
        let train = PulseTrain::new(ActuatorId::OutletPump, 500, 500, 0);

        block_on(train.run(&mut port, &mut delay)).unwrap();

        assert!(port.log.is_empty());
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn test_error_aborts_remaining_cycles() {
        // Fail the second ON (attempt index 2)
        let mut port = MockPort::failing_at(2);
        let mut delay = MockDelay::new();
        let train = PulseTrain::new(ActuatorId::OutletPump, 1, 1, 5);

        let err = block_on(train.run(&mut port, &mut delay)).unwrap_err();

        assert_eq!(
            err,
            ActuatorError::HardwareFault {
                actuator: ActuatorId::OutletPump,
                cause: HardwareCause::I2cNack,
            }
        );
        assert_eq!(port.attempts, 3);
        assert_eq!(port.log.len(), 2);
    }

    #[test]
    fn test_servo_rejected() {
        let mut port = MockPort::new();
        let mut delay = MockDelay::new();
        let train = PulseTrain::new(ActuatorId::FeederServo, 1, 1, 1);

        let err = block_on(train.run(&mut port, &mut delay)).unwrap_err();

        assert_eq!(
            err,
            ActuatorError::InvalidParameter(InvalidParameter::NotBinary(ActuatorId::FeederServo))
        );
        assert!(port.log.is_empty());
    }
}
