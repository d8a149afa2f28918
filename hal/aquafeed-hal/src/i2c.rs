//! I2C bus abstractions
//!
//! Provides the I2C master trait used by the relay board driver, and an
//! adapter for any `embedded-hal` 1.0 I2C implementation.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

/// I2C bus master
///
/// The feeder only ever writes to its peripherals (the relay board is
/// driven open-loop), so writes are the whole contract.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl From<ErrorKind> for I2cBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

impl core::fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            I2cBusError::Bus => "bus error",
            I2cBusError::ArbitrationLost => "arbitration lost",
            I2cBusError::Nack => "no acknowledge",
            I2cBusError::Overrun => "overrun",
            I2cBusError::Other => "i2c error",
        };
        f.write_str(msg)
    }
}

/// [`I2cBus`] over any `embedded-hal` 1.0 blocking I2C master
pub struct EmbeddedI2c<T> {
    inner: T,
}

impl<T: I2c> EmbeddedI2c<T> {
    /// Wrap an `embedded-hal` I2C master
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Release the wrapped bus
    pub fn release(self) -> T {
        self.inner
    }
}

impl<T: I2c> I2cBus for EmbeddedI2c<T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner
            .write(address, data)
            .map_err(|e| I2cBusError::from(e.kind()))
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorType, NoAcknowledgeSource, Operation};
    use heapless::Vec;

    /// Mock embedded-hal bus that records written frames
    struct MockBus {
        writes: Vec<(u8, Vec<u8, 4>), 8>,
        fail_with: Option<ErrorKind>,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                fail_with: None,
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if let Some(kind) = self.fail_with {
                return Err(kind);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    let frame = Vec::from_slice(bytes).map_err(|_| ErrorKind::Overrun)?;
                    self.writes
                        .push((address, frame))
                        .map_err(|_| ErrorKind::Overrun)?;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_passes_through() {
        let mut bus = EmbeddedI2c::new(MockBus::new());
        bus.write(0x10, &[0x03, 0xFF]).unwrap();

        let inner = bus.release();
        assert_eq!(inner.writes.len(), 1);
        assert_eq!(inner.writes[0].0, 0x10);
        assert_eq!(inner.writes[0].1.as_slice(), &[0x03, 0xFF]);
    }

    #[test]
    fn test_error_kinds_map() {
        let mut mock = MockBus::new();
        mock.fail_with = Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        let mut bus = EmbeddedI2c::new(mock);

        assert_eq!(bus.write(0x10, &[0x01, 0x00]), Err(I2cBusError::Nack));
        assert_eq!(I2cBusError::from(ErrorKind::Bus), I2cBusError::Bus);
        assert_eq!(
            I2cBusError::from(ErrorKind::ArbitrationLoss),
            I2cBusError::ArbitrationLost
        );
        assert_eq!(I2cBusError::from(ErrorKind::Other), I2cBusError::Other);
    }
}
