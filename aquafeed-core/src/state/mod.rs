//! Run state machine
//!
//! Tracks how far a feeding run got. The status is a pure function of the
//! events the sequencer and supervisor emit, so the same event log always
//! yields the same status.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FaultCause, FaultKind, RunFault, RunStatus};
