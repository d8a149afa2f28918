//! Feeder actuator port
//!
//! Combines the I2C relay board and the PWM servo into the single
//! [`ActuatorPort`] the recipe runs against. Bus and PWM handles are
//! injected at construction. Actuator state is updated only after a write
//! succeeds.

use aquafeed_core::config::RelayBoardConfig;
use aquafeed_core::traits::{
    validate_angle, ActuatorError, ActuatorId, ActuatorPort, ActuatorState, HardwareCause,
    InvalidParameter,
};
use aquafeed_hal::{I2cBus, I2cBusError, PwmError, PwmOutput};

use crate::relay::{I2cRelayBoard, RelayError};
use crate::servo::PwmServo;

fn i2c_cause(e: I2cBusError) -> HardwareCause {
    match e {
        I2cBusError::Nack => HardwareCause::I2cNack,
        I2cBusError::Bus => HardwareCause::I2cBus,
        I2cBusError::ArbitrationLost => HardwareCause::I2cArbitration,
        I2cBusError::Overrun => HardwareCause::I2cOverrun,
        I2cBusError::Other => HardwareCause::I2cOther,
    }
}

/// Relay board + servo behind one actuator port
pub struct FeederActuators<B, P> {
    relays: I2cRelayBoard<B>,
    servo: PwmServo<P>,
    states: [ActuatorState; 5],
}

impl<B, P> FeederActuators<B, P>
where
    B: I2cBus<Error = I2cBusError>,
    P: PwmOutput<Error = PwmError>,
{
    /// Create the port; every actuator starts in [`ActuatorState::Unknown`]
    pub fn new(bus: B, pwm: P, relay_config: RelayBoardConfig) -> Self {
        Self {
            relays: I2cRelayBoard::new(bus, relay_config),
            servo: PwmServo::new(pwm),
            states: [ActuatorState::Unknown; 5],
        }
    }

    /// Check every actuator is off or parked
    pub fn all_safe(&self) -> bool {
        self.states.iter().all(ActuatorState::is_safe)
    }

    /// Release the bus and PWM handles
    pub fn release(self) -> (B, P) {
        (self.relays.release(), self.servo.release())
    }

    fn servo_fault(_e: PwmError) -> ActuatorError {
        ActuatorError::HardwareFault {
            actuator: ActuatorId::FeederServo,
            cause: HardwareCause::Pwm,
        }
    }
}

impl<B, P> ActuatorPort for FeederActuators<B, P>
where
    B: I2cBus<Error = I2cBusError>,
    P: PwmOutput<Error = PwmError>,
{
    fn set_binary(&mut self, id: ActuatorId, on: bool) -> Result<(), ActuatorError> {
        self.relays.switch(id, on).map_err(|e| match e {
            RelayError::NotOnBoard(id) => ActuatorError::from(InvalidParameter::NotBinary(id)),
            RelayError::Bus(e) => ActuatorError::HardwareFault {
                actuator: id,
                cause: i2c_cause(e),
            },
        })?;

        self.states[id.index()] = if on {
            ActuatorState::On
        } else {
            ActuatorState::Off
        };
        Ok(())
    }

    fn set_angle(&mut self, degrees: i16) -> Result<(), ActuatorError> {
        let angle = validate_angle(degrees)?;
        self.servo.set_angle(angle).map_err(Self::servo_fault)?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Angle(angle);
        Ok(())
    }

    fn park_servo(&mut self) -> Result<(), ActuatorError> {
        self.servo.park().map_err(Self::servo_fault)?;
        self.states[ActuatorId::FeederServo.index()] = ActuatorState::Parked;
        Ok(())
    }

    fn state(&self, id: ActuatorId) -> ActuatorState {
        self.states[id.index()]
    }
}
