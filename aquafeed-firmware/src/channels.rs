//! Inter-task communication channels
//!
//! Defines the static signals used between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Stop request from the stop button; the running feed cycle awaits it
pub static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
