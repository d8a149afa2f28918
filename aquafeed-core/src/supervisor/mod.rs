//! Run supervisor
//!
//! Owns the actuator port, the delay provider and the clock, runs the
//! recipe under a cancellation future, and guarantees finalize runs
//! exactly once per run on every exit path.

pub mod guard;
pub mod run;

pub use guard::FinalizeGuard;
pub use run::{
    RunReport, RunSupervisor, EXIT_CANCELLED, EXIT_HARDWARE_FAULT, EXIT_INVALID_PARAMETER,
    EXIT_OK,
};
