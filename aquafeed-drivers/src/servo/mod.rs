//! Servo drivers

pub mod pwm;

pub use pwm::{angle_to_duty_x100, PwmServo, PARK_DUTY_X100};
