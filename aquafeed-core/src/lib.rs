//! Board-agnostic core logic for the aquarium feeding controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Actuator port trait (relay-switched pumps, feeder servo)
//! - Pulse trains and the fixed feeding recipe
//! - Phase sequencer and run supervisor with the finalize guarantee
//! - Run state machine
//! - Configuration types and the config text parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod scheduler;
pub mod state;
pub mod supervisor;
pub mod traits;

#[cfg(test)]
mod mock;
