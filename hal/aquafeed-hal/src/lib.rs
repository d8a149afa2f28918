//! Aquafeed Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the feeder drivers
//! are written against, plus adapters that lift any `embedded-hal` 1.0
//! peripheral into them. Chip support comes from the chip HAL's own
//! `embedded-hal` implementations, so the same driver code runs on the
//! RP2040 board and against host-side mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (aquafeed-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  aquafeed-drivers (relay board, servo)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  aquafeed-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal 1.0 (embassy-rp, mocks)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master writes
//! - [`pwm::PwmOutput`] - PWM duty cycle output

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use i2c::{EmbeddedI2c, I2cBus, I2cBusError, I2cConfig};
pub use pwm::{EmbeddedPwm, PwmError, PwmOutput, ServoTiming};
