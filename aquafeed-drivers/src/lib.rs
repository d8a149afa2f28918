//! Hardware driver implementations
//!
//! This crate provides the concrete actuator port for the feeder:
//!
//! - Relay board on I2C (air pump, inlet solenoid, inlet and outlet pumps)
//! - Hobby servo on PWM (food dispenser)
//! - [`FeederActuators`], which combines both behind
//!   [`aquafeed_core::traits::ActuatorPort`]

#![no_std]
#![deny(unsafe_code)]

pub mod feeder;
pub mod relay;
pub mod servo;

pub use feeder::FeederActuators;
