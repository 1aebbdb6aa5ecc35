//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by platform crates.

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a big-endian 16-bit register
    ///
    /// Devices like the ADS1015 send the MSB first, unlike the SMBus word
    /// convention.
    fn read_register_be(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.write_read(address, &[register], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a big-endian 16-bit register
    fn write_register_be(
        &mut self,
        address: u8,
        register: u8,
        value: u16,
    ) -> Result<(), Self::Error> {
        let [msb, lsb] = value.to_be_bytes();
        self.write(address, &[register, msb, lsb])
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2cConfig {
    /// Bus number (`/dev/i2c-N` on the Pi)
    pub bus: u8,
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            bus: 1,
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single register file at one address
    struct Registers {
        pointer: u8,
        values: [u16; 4],
        writes: usize,
    }

    impl I2cBus for Registers {
        type Error = ();

        fn write(&mut self, _address: u8, data: &[u8]) -> Result<(), ()> {
            self.writes += 1;
            self.pointer = data[0];
            if data.len() == 3 {
                self.values[self.pointer as usize] = u16::from_be_bytes([data[1], data[2]]);
            }
            Ok(())
        }

        fn read(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), ()> {
            buf.copy_from_slice(&self.values[self.pointer as usize].to_be_bytes());
            Ok(())
        }

        fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), ()> {
            self.pointer = write_data[0];
            self.read(address, read_buf)
        }
    }

    #[test]
    fn test_register_word_is_msb_first() {
        let mut bus = Registers {
            pointer: 0,
            values: [0; 4],
            writes: 0,
        };
        bus.write_register_be(0x49, 1, 0x8583).unwrap();
        assert_eq!(bus.values[1], 0x8583);
        assert_eq!(bus.read_register_be(0x49, 1).unwrap(), 0x8583);
        assert_eq!(bus.writes, 1);
    }

    #[test]
    fn test_default_config() {
        let config = I2cConfig::default();
        assert_eq!(config.bus, 1);
        assert_eq!(config.frequency, 100_000);
    }
}
