//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Afe4400Interface;
use crate::registers::REGISTER_VALUE_MASK;

/// SPI-based interface implementation for the AFE4400 driver.
///
/// The device expects mode 0 (clock idle low, sample on leading edge);
/// configuring the bus accordingly is the platform's responsibility.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Splits a 24-bit value into its big-endian wire bytes.
    fn value_bytes(value: u32) -> [u8; 3] {
        let value = value & REGISTER_VALUE_MASK;
        [(value >> 16) as u8, (value >> 8) as u8, value as u8]
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Afe4400Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_register(&mut self, register: u8, value: u32)
        -> core::result::Result<(), Self::Error>
    {
        let address = [register];
        let payload = Self::value_bytes(value);
        let mut operations = [Operation::Write(&address), Operation::Write(&payload)];
        self.spi.transaction(&mut operations)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u32, Self::Error> {
        let address = [register];
        let mut payload = [0u8; 3];
        {
            let mut operations = [Operation::Write(&address), Operation::Read(&mut payload)];
            self.spi.transaction(&mut operations)?;
        }
        Ok(u32::from(payload[0]) << 16 | u32::from(payload[1]) << 8 | u32::from(payload[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Afe4400Interface;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            match *expected {
                TransactionExpectation::Read { address, response } => {
                    assert_eq!(operations.len(), 2, "expected write+read operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "address length mismatch");
                            assert_eq!(data[0], address, "address byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Read(buf) => {
                            assert_eq!(buf.len(), 3, "register payload must be three bytes");
                            buf.copy_from_slice(&response);
                        }
                        _ => panic!("second operation must be read"),
                    }
                }
                TransactionExpectation::Write { address, payload } => {
                    assert_eq!(operations.len(), 2, "expected write+write operations");
                    let (first, rest) = operations.split_first_mut().expect("missing first op");
                    match first {
                        Operation::Write(data) => {
                            assert_eq!(data.len(), 1, "address length mismatch");
                            assert_eq!(data[0], address, "address byte mismatch");
                        }
                        _ => panic!("first operation must be write"),
                    }

                    let second = rest.first_mut().expect("missing second op");
                    match second {
                        Operation::Write(data) => {
                            assert_eq!(*data, payload, "payload mismatch");
                        }
                        _ => panic!("second operation must be write"),
                    }
                }
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation {
        Read { address: u8, response: [u8; 3] },
        Write { address: u8, payload: [u8; 3] },
    }

    #[test]
    fn write_register_frames_value_big_endian() {
        let expectations = [TransactionExpectation::Write {
            address: 0x22,
            payload: [0x12, 0x34, 0x56],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register(0x22, 0x12_3456).unwrap();
    }

    #[test]
    fn write_register_masks_bits_above_23() {
        let expectations = [TransactionExpectation::Write {
            address: 0x1D,
            payload: [0x00, 0x1F, 0x3F],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register(0x1D, 0xAB00_1F3F).unwrap();
    }

    #[test]
    fn read_register_reassembles_big_endian() {
        let expectations = [TransactionExpectation::Read {
            address: 0x2F,
            response: [0xAA, 0xBB, 0xCC],
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let value = interface.read_register(0x2F).unwrap();
        assert_eq!(value, 0xAA_BBCC);
    }
}
