//! Hardware configuration types
//!
//! Relay board addressing and servo output settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::timing::{ConfigError, TimingProfile};
use crate::traits::ActuatorId;

/// Lowest non-reserved 7-bit I2C address
pub const I2C_ADDRESS_MIN: u8 = 0x08;

/// Highest non-reserved 7-bit I2C address
pub const I2C_ADDRESS_MAX: u8 = 0x77;

/// I2C relay board configuration
///
/// Each binary actuator sits behind one register of the board; writing
/// `on_value` to the register closes the relay, `off_value` opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RelayBoardConfig {
    /// 7-bit device address
    pub address: u8,
    /// Register for the air pump relay
    pub air_pump_register: u8,
    /// Register for the inlet solenoid relay
    pub inlet_solenoid_register: u8,
    /// Register for the inlet pump relay
    pub inlet_pump_register: u8,
    /// Register for the outlet pump relay
    pub outlet_pump_register: u8,
    /// Value written to switch a relay on
    pub on_value: u8,
    /// Value written to switch a relay off
    pub off_value: u8,
}

impl Default for RelayBoardConfig {
    fn default() -> Self {
        Self {
            address: 0x10,
            air_pump_register: 1,
            inlet_solenoid_register: 2,
            inlet_pump_register: 3,
            outlet_pump_register: 4,
            on_value: 0xFF,
            off_value: 0x00,
        }
    }
}

impl RelayBoardConfig {
    /// Register that switches the given actuator
    ///
    /// Returns None for the servo, which is not on the relay board.
    pub fn register(&self, id: ActuatorId) -> Option<u8> {
        match id {
            ActuatorId::AirPump => Some(self.air_pump_register),
            ActuatorId::InletSolenoid => Some(self.inlet_solenoid_register),
            ActuatorId::InletPump => Some(self.inlet_pump_register),
            ActuatorId::OutletPump => Some(self.outlet_pump_register),
            ActuatorId::FeederServo => None,
        }
    }

    /// Value to write for the requested relay state
    pub fn value(&self, on: bool) -> u8 {
        if on {
            self.on_value
        } else {
            self.off_value
        }
    }

    /// Check address range and register uniqueness
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(I2C_ADDRESS_MIN..=I2C_ADDRESS_MAX).contains(&self.address) {
            return Err(ConfigError::InvalidAddress(self.address));
        }

        let registers = [
            self.air_pump_register,
            self.inlet_solenoid_register,
            self.inlet_pump_register,
            self.outlet_pump_register,
        ];
        for (i, reg) in registers.iter().enumerate() {
            if registers[i + 1..].contains(reg) {
                return Err(ConfigError::DuplicateRegister(*reg));
            }
        }
        Ok(())
    }
}

/// Highest servo frame rate accepted (Hz)
pub const SERVO_FRAME_HZ_MAX: u32 = 400;

/// Feeder servo output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ServoConfig {
    /// PWM frame rate (Hz)
    pub frame_hz: u32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self { frame_hz: 50 }
    }
}

/// Complete feeder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct FeederConfig {
    /// Recipe timing
    pub timing: TimingProfile,
    /// Relay board addressing
    pub relay: RelayBoardConfig,
    /// Servo output
    pub servo: ServoConfig,
}

impl FeederConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.relay.validate()?;
        if self.servo.frame_hz == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.servo.frame_hz > SERVO_FRAME_HZ_MAX {
            return Err(ConfigError::FrameRateTooHigh(self.servo.frame_hz));
        }
        Ok(())
    }
}
