//! Wall-clock source for run timestamps

/// Millisecond clock
///
/// Only used to stamp the start of a run; sequencing itself never reads
/// the clock, all waits go through the delay provider.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch (boot, for firmware)
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
