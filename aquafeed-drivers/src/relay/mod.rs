//! Relay board drivers

pub mod i2c_board;

pub use i2c_board::{I2cRelayBoard, RelayError};
