//! Event sink for run progress

use crate::state::Event;

/// Receives every event a run emits, in order
///
/// Implemented for closures, so a firmware logger or a test recorder can
/// be passed directly.
pub trait EventSink {
    /// Handle one event
    fn emit(&mut self, event: Event);
}

impl<F: FnMut(Event)> EventSink for F {
    fn emit(&mut self, event: Event) {
        self(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}
