//! I2C relay board
//!
//! The board exposes one register per relay. A relay is switched with a
//! single two-byte write, `[register, value]`, to the board's address.
//! There is no read-back.

use aquafeed_core::config::RelayBoardConfig;
use aquafeed_core::traits::ActuatorId;
use aquafeed_hal::{I2cBus, I2cBusError};

/// Relay board errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayError {
    /// Actuator has no relay on this board
    NotOnBoard(ActuatorId),
    /// Bus write failed
    Bus(I2cBusError),
}

/// Relay board driven over I2C
pub struct I2cRelayBoard<B> {
    bus: B,
    config: RelayBoardConfig,
}

impl<B: I2cBus<Error = I2cBusError>> I2cRelayBoard<B> {
    /// Create a board driver on an owned bus handle
    pub fn new(bus: B, config: RelayBoardConfig) -> Self {
        Self { bus, config }
    }

    /// Switch the relay for an actuator
    pub fn switch(&mut self, id: ActuatorId, on: bool) -> Result<(), RelayError> {
        let register = self.config.register(id).ok_or(RelayError::NotOnBoard(id))?;
        let frame = [register, self.config.value(on)];
        self.bus
            .write(self.config.address, &frame)
            .map_err(RelayError::Bus)
    }

    /// Release the bus handle
    pub fn release(self) -> B {
        self.bus
    }
}
