//! Error handling primitives for the AFE4400 driver.

use crate::device::DeviceState;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// A bit index outside the 24-bit register width was requested.
    BitIndexOutOfRange(u8),
    /// The operation is not permitted in the device's current state.
    OutOfSequence {
        /// State the device was in when the call was rejected.
        current: DeviceState,
    },
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
