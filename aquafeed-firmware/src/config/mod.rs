//! Configuration loading
//!
//! The configuration is `feeder.toml`, embedded at compile time and parsed
//! at boot by the core no_std parser. build.rs has already validated it,
//! so the fallback to built-in defaults only triggers during development.

use defmt::*;

use aquafeed_core::config::{parse_config, FeederConfig};

/// Embedded configuration (compiled into firmware)
/// Edit feeder.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../feeder.toml");

/// Parse the embedded configuration, or fall back to defaults
pub fn load() -> FeederConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", Display2Format(&e));
            error!("Using built-in defaults");
            FeederConfig::default()
        }
    }
}

/// Log the settings that matter for a run
pub fn log_summary(config: &FeederConfig) {
    let t = &config.timing;
    info!(
        "Timing: pulse {}/{} ms, prime {}+{}, feed x{}, stream {}/{} x{}, clean {}/{} x{}, final x{}",
        t.pump_on_ms,
        t.pump_off_ms,
        t.prime_in_cycles,
        t.prime_out_cycles,
        t.feeder_repeat,
        t.stream_in_cycles,
        t.stream_out_cycles,
        t.stream_repeat_cycles,
        t.clean_in_cycles,
        t.clean_out_cycles,
        t.clean_repeat_cycles,
        t.final_clean_cycles
    );
    info!(
        "Relay board at {=u8:#x}, servo frame {} Hz",
        config.relay.address, config.servo.frame_hz
    );
}
