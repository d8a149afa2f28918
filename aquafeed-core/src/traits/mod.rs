//! Hardware abstraction traits
//!
//! These traits define the interface between the feeding recipe and the
//! hardware-specific implementations.

pub mod actuator;
pub mod clock;

pub use actuator::{
    validate_angle, ActuatorError, ActuatorId, ActuatorPort, ActuatorState, HardwareCause,
    InvalidParameter, MAX_ANGLE,
};
pub use clock::Clock;
