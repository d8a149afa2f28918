//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod stop_button;

pub use stop_button::{stop_button_task, StopButtonConfig};
