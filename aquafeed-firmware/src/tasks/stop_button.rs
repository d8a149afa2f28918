//! Stop button task
//!
//! Watches an active-low push button (internal pull-up) and raises
//! [`STOP`] once the press survives the debounce window.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::STOP;

/// Stop button configuration
pub struct StopButtonConfig {
    /// Press must still be held after this long (ms)
    pub debounce_ms: u64,
}

impl Default for StopButtonConfig {
    fn default() -> Self {
        Self { debounce_ms: 30 }
    }
}

#[embassy_executor::task]
pub async fn stop_button_task(mut button: Input<'static>, config: StopButtonConfig) {
    info!("Stop button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(config.debounce_ms).await;

        if button.is_low() {
            warn!("Stop button pressed");
            STOP.signal(());
            // Ignore the rest of this press
            button.wait_for_high().await;
        }
    }
}
