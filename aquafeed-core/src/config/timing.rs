//! Timing profile for the feeding recipe
//!
//! Holds every configurable duration and repeat count. The recipe's fixed
//! counts (the prepare fill, the final clean loop) are not here; they live
//! with the phases in [`crate::scheduler`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A duration that must be positive is zero
    ZeroDuration(&'static str),
    /// I2C address outside the 7-bit non-reserved range
    InvalidAddress(u8),
    /// Two actuators share one relay register
    DuplicateRegister(u8),
    /// Servo frame rate of zero
    ZeroFrameRate,
    /// Servo frame rate above what a hobby servo accepts
    FrameRateTooHigh(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroDuration(field) => write!(f, "{} must be greater than zero", field),
            ConfigError::InvalidAddress(addr) => write!(f, "invalid i2c address {:#04x}", addr),
            ConfigError::DuplicateRegister(reg) => {
                write!(f, "relay register {} assigned twice", reg)
            }
            ConfigError::ZeroFrameRate => f.write_str("servo frame rate must be greater than zero"),
            ConfigError::FrameRateTooHigh(hz) => {
                write!(f, "servo frame rate {} Hz above {} Hz", hz, super::SERVO_FRAME_HZ_MAX)
            }
        }
    }
}

/// Durations and repeat counts for one feeding run
///
/// Durations are in milliseconds and must be positive. Cycle counts may be
/// zero, which leaves the pulse train in place but makes it a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimingProfile {
    /// Inlet pump pulses while priming
    pub prime_in_cycles: u16,
    /// Outlet pump pulses while priming
    pub prime_out_cycles: u16,
    /// Pump ON time for every pulse (ms)
    pub pump_on_ms: u32,
    /// Pump OFF time for every pulse (ms)
    pub pump_off_ms: u32,
    /// Servo dispense sweeps while preparing food
    pub feeder_repeat: u16,
    /// Wait after each servo move (ms)
    pub servo_settle_ms: u32,
    /// Outlet pump pulses per stream drain
    pub stream_out_cycles: u16,
    /// Inlet pump pulses per stream fill
    pub stream_in_cycles: u16,
    /// Stream fill/drain pair repetitions
    pub stream_repeat_cycles: u16,
    /// Inlet pump pulses per clean fill
    pub clean_in_cycles: u16,
    /// Outlet pump pulses per clean drain
    pub clean_out_cycles: u16,
    /// Clean fill/drain pair repetitions
    pub clean_repeat_cycles: u16,
    /// Repetitions of the fixed final rinse pair
    pub final_clean_cycles: u16,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self {
            prime_in_cycles: 15,
            prime_out_cycles: 5,
            pump_on_ms: 500,
            pump_off_ms: 500,
            feeder_repeat: 1,
            servo_settle_ms: 20,
            stream_out_cycles: 6,
            stream_in_cycles: 8,
            stream_repeat_cycles: 2,
            clean_in_cycles: 9,
            clean_out_cycles: 5,
            clean_repeat_cycles: 3,
            final_clean_cycles: 3,
        }
    }
}

impl TimingProfile {
    /// Check the profile invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pump_on_ms == 0 {
            return Err(ConfigError::ZeroDuration("pump_on_ms"));
        }
        if self.pump_off_ms == 0 {
            return Err(ConfigError::ZeroDuration("pump_off_ms"));
        }
        if self.servo_settle_ms == 0 {
            return Err(ConfigError::ZeroDuration("servo_settle_ms"));
        }
        Ok(())
    }

    /// Duration of one ON/OFF pump pulse (ms)
    pub fn pulse_ms(&self) -> u64 {
        self.pump_on_ms as u64 + self.pump_off_ms as u64
    }
}
