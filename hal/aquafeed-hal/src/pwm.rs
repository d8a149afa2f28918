//! PWM output abstractions
//!
//! Duty cycles are expressed in hundredths of a percent (`duty_x100`,
//! 0..=10_000) so servo positions can be represented exactly without
//! floating point on Cortex-M0.

use embedded_hal::pwm::SetDutyCycle;

/// Full-scale duty cycle (100.00%)
pub const DUTY_X100_MAX: u16 = 10_000;

/// PWM output channel
pub trait PwmOutput {
    /// Error type for PWM operations
    type Error;

    /// Set the duty cycle in hundredths of a percent
    ///
    /// 0 stops the drive signal entirely.
    fn set_duty_x100(&mut self, duty_x100: u16) -> Result<(), Self::Error>;
}

/// Errors from PWM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Requested duty cycle above 100%
    DutyOutOfRange,
    /// Underlying PWM peripheral rejected the write
    Hardware,
}

impl core::fmt::Display for PwmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PwmError::DutyOutOfRange => f.write_str("duty cycle out of range"),
            PwmError::Hardware => f.write_str("pwm write failed"),
        }
    }
}

/// [`PwmOutput`] over any `embedded-hal` 1.0 PWM channel
pub struct EmbeddedPwm<T> {
    inner: T,
}

impl<T: SetDutyCycle> EmbeddedPwm<T> {
    /// Wrap an `embedded-hal` PWM channel
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped channel
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T: SetDutyCycle> PwmOutput for EmbeddedPwm<T> {
    type Error = PwmError;

    fn set_duty_x100(&mut self, duty_x100: u16) -> Result<(), Self::Error> {
        if duty_x100 > DUTY_X100_MAX {
            return Err(PwmError::DutyOutOfRange);
        }
        self.inner
            .set_duty_cycle_fraction(duty_x100, DUTY_X100_MAX)
            .map_err(|_| PwmError::Hardware)
    }
}

/// PWM slice timing for a hobby servo frame
///
/// Hobby servos expect a fixed frame rate (50 Hz); the pulse width inside
/// that frame sets the position. RP2040 PWM slices count to `top` at
/// `sys_clk / divider`, so both have to be chosen to fit a 16-bit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoTiming {
    /// Integer clock divider (1-255)
    pub divider: u8,
    /// Counter wrap value
    pub top: u16,
}

impl ServoTiming {
    /// Standard servo frame rate
    pub const FRAME_HZ: u32 = 50;

    /// Compute divider and top for the given system clock and frame rate
    ///
    /// Returns None if no integer divider in 1-255 fits the 16-bit counter,
    /// or if the frame is shorter than one clock cycle.
    pub const fn for_frame(sys_clk_hz: u32, frame_hz: u32) -> Option<Self> {
        if frame_hz == 0 {
            return None;
        }
        let counts = sys_clk_hz / frame_hz;
        if counts == 0 {
            return None;
        }
        // Smallest divider that keeps counts/divider within u16 range
        let divider = counts.div_ceil(65_536);
        let divider = if divider == 0 { 1 } else { divider };
        if divider > 255 {
            return None;
        }
        let top = counts / divider - 1;
        Some(Self {
            divider: divider as u8,
            top: top as u16,
        })
    }

    /// Timing for a 50 Hz servo frame
    pub const fn servo(sys_clk_hz: u32) -> Option<Self> {
        Self::for_frame(sys_clk_hz, Self::FRAME_HZ)
    }
}
