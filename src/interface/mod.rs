//! Bus interface abstraction for the AFE4400 driver.

pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// One invocation moves exactly one 24-bit register value. Read-enable
/// bracketing is handled above this layer; implementations only frame the
/// address byte and the three value bytes with chip-select.
pub trait Afe4400Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single 24-bit register.
    fn write_register(&mut self, register: u8, value: u32)
        -> core::result::Result<(), Self::Error>;

    /// Reads a single 24-bit register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u32, Self::Error>;
}
