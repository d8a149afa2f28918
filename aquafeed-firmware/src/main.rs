//! Aquafeed - Aquarium Feeding Controller Firmware
//!
//! Main firmware binary for RP2040-based feeding controllers. Runs one
//! feeding cycle per power-up: prime, dispense food, stream, clean, and
//! finally switch every pump, the valve and the servo off, whether the
//! run completed, hit a fault, or was stopped with the stop button.
//!
//! Board wiring:
//! - Relay board on I2C0 (SDA = GPIO4, SCL = GPIO5)
//! - Feeder servo on GPIO16 (PWM slice 0, channel A)
//! - Stop button on GPIO15, active low

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Delay, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use aquafeed_core::scheduler::estimated_duration_ms;
use aquafeed_core::state::Event;
use aquafeed_core::supervisor::RunSupervisor;
use aquafeed_core::traits::Clock;
use aquafeed_drivers::FeederActuators;
use aquafeed_hal::{EmbeddedI2c, EmbeddedPwm, I2cConfig, ServoTiming};

use crate::channels::STOP;
use crate::tasks::StopButtonConfig;

mod channels;
mod config;
mod tasks;

/// Milliseconds since boot
struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Aquafeed firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    config::log_summary(&config);

    // Relay board
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2cConfig::STANDARD.frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    info!("I2C initialized for relay board");

    // Feeder servo
    let sys_clk_hz = embassy_rp::clocks::clk_sys_freq();
    let Some(timing) = ServoTiming::for_frame(sys_clk_hz, config.servo.frame_hz) else {
        error!(
            "No PWM divider fits a {} Hz servo frame at {} Hz",
            config.servo.frame_hz, sys_clk_hz
        );
        halt().await
    };
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = timing.divider.into();
    pwm_config.top = timing.top;
    pwm_config.compare_a = 0; // Drive signal off until the first move
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config);
    let (servo_channel, _) = pwm.split();
    let Some(servo_channel) = servo_channel else {
        error!("Servo PWM channel unavailable");
        halt().await
    };
    info!(
        "Servo PWM initialized: divider={}, top={}",
        timing.divider, timing.top
    );

    let port = FeederActuators::new(
        EmbeddedI2c::new(i2c),
        EmbeddedPwm::new(servo_channel),
        config.relay,
    );

    // Stop button
    let button = Input::new(p.PIN_15, Pull::Up);
    spawner
        .spawn(tasks::stop_button_task(button, StopButtonConfig::default()))
        .unwrap();

    info!(
        "Feeding run starting, about {} s",
        estimated_duration_ms(&config.timing) / 1000
    );

    let mut supervisor = RunSupervisor::new(port, Delay, UptimeClock);
    let mut sink = log_event;
    STOP.reset();
    let report = supervisor
        .execute(config.timing, STOP.wait(), &mut sink)
        .await;

    if let Some(e) = report.finalize_fault {
        error!("Finalize incomplete: {}", Display2Format(&e));
    }
    info!("{}", Display2Format(&report));
    info!("Exit code {}", report.exit_code());

    // Single-shot: nothing left to do until the next power cycle
    halt().await
}

/// Log one run event
fn log_event(event: Event) {
    match event {
        Event::PhaseStarted(phase) => info!("Phase {} started", phase.name()),
        Event::PhaseComplete(phase) => info!("Phase {} complete", phase.name()),
        Event::Fault(fault) => error!("{}", Display2Format(&fault)),
        Event::FinalizeComplete => info!("All actuators off"),
    }
}

/// Park the main task forever
async fn halt() -> ! {
    loop {
        Timer::after_secs(3600).await;
    }
}
