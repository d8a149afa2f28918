//! Feeding recipe scheduler
//!
//! Turns a [`TimingProfile`](crate::config::TimingProfile) into actuator
//! commands: pulse trains for the pumps, sweeps for the feeder servo, and
//! the fixed phase order of a feeding run.

pub mod phase;
pub mod pulse;
pub mod sequencer;
pub mod sink;

pub use phase::Phase;
pub use pulse::PulseTrain;
pub use sequencer::{
    estimated_duration_ms, finalize_outputs, PhaseSequencer, DISPENSE_ANGLE, FINAL_CLEAN_IN_CYCLES,
    FINAL_CLEAN_OUT_CYCLES, PREPARE_FILL_CYCLES, REST_ANGLE,
};
pub use sink::{EventSink, NullSink};
