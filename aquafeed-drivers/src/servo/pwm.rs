//! PWM hobby servo
//!
//! Duty cycle in percent is `angle / 18 + 2`, so 0 degrees is 2% and
//! 180 degrees is 12% of a 50 Hz frame. Duty is carried as hundredths of
//! a percent to stay in integers.

use aquafeed_hal::{PwmError, PwmOutput};

/// Duty written to stop driving the servo
pub const PARK_DUTY_X100: u16 = 0;

/// Duty (hundredths of a percent) for an angle in degrees
pub fn angle_to_duty_x100(angle: u8) -> u16 {
    angle as u16 * 100 / 18 + 200
}

/// Servo on a PWM channel
pub struct PwmServo<P> {
    pwm: P,
}

impl<P: PwmOutput<Error = PwmError>> PwmServo<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    /// Drive the servo to an angle (0-180, checked by the caller)
    pub fn set_angle(&mut self, angle: u8) -> Result<(), PwmError> {
        self.pwm.set_duty_x100(angle_to_duty_x100(angle))
    }

    /// Stop the drive signal
    pub fn park(&mut self) -> Result<(), PwmError> {
        self.pwm.set_duty_x100(PARK_DUTY_X100)
    }

    pub fn release(self) -> P {
        self.pwm
    }
}
