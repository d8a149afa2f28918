//! Actuator port trait
//!
//! The feeder has a fixed set of actuators: four relay-switched binary
//! outputs (pumps and the inlet solenoid) and one positional output (the
//! food-dispensing servo). Implementations issue exactly one write to the
//! underlying bus or PWM driver per call, never retry, and never read the
//! actuator back.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest servo angle in degrees
pub const MAX_ANGLE: i16 = 180;

/// Actuator identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActuatorId {
    /// Continuous aeration pump
    AirPump,
    /// Water inlet solenoid valve
    InletSolenoid,
    /// Water inlet pump
    InletPump,
    /// Water outlet pump
    OutletPump,
    /// Food-dispensing servo
    FeederServo,
}

impl ActuatorId {
    /// All actuators
    pub const ALL: [ActuatorId; 5] = [
        ActuatorId::AirPump,
        ActuatorId::InletSolenoid,
        ActuatorId::InletPump,
        ActuatorId::OutletPump,
        ActuatorId::FeederServo,
    ];

    /// Binary actuators in shutdown order
    ///
    /// Pumps are stopped before the air pump and the inlet valve.
    pub const BINARY: [ActuatorId; 4] = [
        ActuatorId::InletPump,
        ActuatorId::OutletPump,
        ActuatorId::AirPump,
        ActuatorId::InletSolenoid,
    ];

    /// Check if this actuator is switched on/off
    pub fn is_binary(&self) -> bool {
        !matches!(self, ActuatorId::FeederServo)
    }

    /// Short name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ActuatorId::AirPump => "air pump",
            ActuatorId::InletSolenoid => "inlet solenoid",
            ActuatorId::InletPump => "inlet pump",
            ActuatorId::OutletPump => "outlet pump",
            ActuatorId::FeederServo => "feeder servo",
        }
    }

    /// Stable index into per-actuator tables
    pub fn index(&self) -> usize {
        match self {
            ActuatorId::AirPump => 0,
            ActuatorId::InletSolenoid => 1,
            ActuatorId::InletPump => 2,
            ActuatorId::OutletPump => 3,
            ActuatorId::FeederServo => 4,
        }
    }
}

impl core::fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Last commanded actuator value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorState {
    /// Never commanded since power-on
    #[default]
    Unknown,
    /// Binary actuator switched off
    Off,
    /// Binary actuator switched on
    On,
    /// Servo held at an angle (degrees, 0-180)
    Angle(u8),
    /// Servo drive signal stopped
    Parked,
}

impl ActuatorState {
    /// Check if the actuator is in its safe resting state
    pub fn is_safe(&self) -> bool {
        matches!(self, ActuatorState::Off | ActuatorState::Parked)
    }
}

/// Rejected actuator command (caller or configuration bug)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidParameter {
    /// Servo angle outside 0-180 degrees
    AngleOutOfRange(i16),
    /// On/off command addressed to the servo
    NotBinary(ActuatorId),
}

impl core::fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidParameter::AngleOutOfRange(deg) => {
                write!(f, "angle {} outside 0-{} degrees", deg, MAX_ANGLE)
            }
            InvalidParameter::NotBinary(id) => write!(f, "{} is not an on/off actuator", id),
        }
    }
}

/// Driver-level reason a write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareCause {
    /// Relay board did not acknowledge
    I2cNack,
    /// I2C bus error
    I2cBus,
    /// I2C arbitration lost
    I2cArbitration,
    /// I2C overrun
    I2cOverrun,
    /// Other I2C failure
    I2cOther,
    /// Servo PWM rejected the duty cycle
    Pwm,
}

impl core::fmt::Display for HardwareCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            HardwareCause::I2cNack => "i2c no acknowledge",
            HardwareCause::I2cBus => "i2c bus error",
            HardwareCause::I2cArbitration => "i2c arbitration lost",
            HardwareCause::I2cOverrun => "i2c overrun",
            HardwareCause::I2cOther => "i2c error",
            HardwareCause::Pwm => "pwm write failed",
        };
        f.write_str(msg)
    }
}

/// Errors from actuator commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Command rejected before reaching hardware
    InvalidParameter(InvalidParameter),
    /// Bus or pin write failed; physical state is unknown
    HardwareFault {
        /// Actuator being commanded
        actuator: ActuatorId,
        /// Driver-level cause
        cause: HardwareCause,
    },
}

impl From<InvalidParameter> for ActuatorError {
    fn from(e: InvalidParameter) -> Self {
        ActuatorError::InvalidParameter(e)
    }
}

impl core::fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActuatorError::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            ActuatorError::HardwareFault { actuator, cause } => {
                write!(f, "hardware fault on {}: {}", actuator, cause)
            }
        }
    }
}

/// Check a servo angle and narrow it to the commandable range
pub fn validate_angle(degrees: i16) -> Result<u8, InvalidParameter> {
    if (0..=MAX_ANGLE).contains(&degrees) {
        Ok(degrees as u8)
    } else {
        Err(InvalidParameter::AngleOutOfRange(degrees))
    }
}

/// Command channel to the feeder's actuators
///
/// Implementations own the bus/PWM handles they were constructed with
/// and the per-actuator [`ActuatorState`]. State is only updated when a
/// write succeeds.
pub trait ActuatorPort {
    /// Switch a binary actuator on or off
    ///
    /// Fails with [`InvalidParameter::NotBinary`] for the servo, without
    /// issuing any write.
    fn set_binary(&mut self, id: ActuatorId, on: bool) -> Result<(), ActuatorError>;

    /// Move the feeder servo to an angle in degrees
    ///
    /// Fails with [`InvalidParameter::AngleOutOfRange`] outside 0-180,
    /// without issuing any write.
    fn set_angle(&mut self, degrees: i16) -> Result<(), ActuatorError>;

    /// Stop the servo drive signal
    fn park_servo(&mut self) -> Result<(), ActuatorError>;

    /// Last commanded state of an actuator
    fn state(&self, id: ActuatorId) -> ActuatorState;
}

impl<P: ActuatorPort + ?Sized> ActuatorPort for &mut P {
    fn set_binary(&mut self, id: ActuatorId, on: bool) -> Result<(), ActuatorError> {
        (**self).set_binary(id, on)
    }

    fn set_angle(&mut self, degrees: i16) -> Result<(), ActuatorError> {
        (**self).set_angle(degrees)
    }

    fn park_servo(&mut self) -> Result<(), ActuatorError> {
        (**self).park_servo()
    }

    fn state(&self, id: ActuatorId) -> ActuatorState {
        (**self).state(id)
    }
}
