//! Timing engine programming for the AFE4400.
//!
//! The sample-and-LED-drive timing engine is configured through a contiguous
//! block of 29 registers (`LED2STC` through `PRPCOUNT`). A [`TimingProfile`]
//! is an ordered table of (address, 16-bit count) pairs written verbatim into
//! that block; counts are expressed in cycles of the 4 MHz timing clock.

use crate::registers::{
    REG_ADCRSTENDCT0, REG_ADCRSTENDCT1, REG_ADCRSTENDCT2, REG_ADCRSTENDCT3, REG_ADCRSTSTCT0,
    REG_ADCRSTSTCT1, REG_ADCRSTSTCT2, REG_ADCRSTSTCT3, REG_ALED1ENDC, REG_ALED1CONVEND,
    REG_ALED1CONVST, REG_ALED1STC, REG_ALED2ENDC, REG_ALED2CONVEND, REG_ALED2CONVST,
    REG_ALED2STC, REG_LED1ENDC, REG_LED1CONVEND, REG_LED1CONVST, REG_LED1LEDENDC,
    REG_LED1LEDSTC, REG_LED1STC, REG_LED2ENDC, REG_LED2CONVEND, REG_LED2CONVST,
    REG_LED2LEDENDC, REG_LED2LEDSTC, REG_LED2STC, REG_PRPCOUNT,
};

/// First address of the timing-register block.
pub const TIMING_REG_FIRST: u8 = REG_LED2STC;
/// Last address of the timing-register block.
pub const TIMING_REG_LAST: u8 = REG_PRPCOUNT;
/// Number of registers in the timing block.
pub const TIMING_REG_COUNT: usize = (TIMING_REG_LAST - TIMING_REG_FIRST + 1) as usize;

/// Returns whether `address` falls inside the timing-register block.
pub const fn is_timing_address(address: u8) -> bool {
    address >= TIMING_REG_FIRST && address <= TIMING_REG_LAST
}

/// One (register address, timer count) entry of a timing profile.
pub type TimingEntry = (u8, u16);

/// An ordered timing-register program.
///
/// Entries are written in table order, one full register write each. The
/// table contents are an opaque calibration profile; the driver only checks
/// that every address lies inside the timing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    entries: &'static [TimingEntry],
}

impl TimingProfile {
    /// Default profile: 500 Hz pulse-repetition frequency, 25% duty cycle.
    ///
    /// Four time-division-multiplexed phases (LED2 sample, ambient-2 sample,
    /// LED1 sample, ambient-1 sample), each with its own LED drive window,
    /// ADC conversion window and ADC reset pulse, over an 8000-count period.
    /// The counts are a fixed calibration table and must be reproduced
    /// exactly for hardware compatibility.
    pub const DEFAULT: Self = Self::new(&[
        (REG_LED2STC, 6000),
        (REG_LED2ENDC, 7999),
        (REG_LED2LEDSTC, 6000),
        (REG_LED2LEDENDC, 7998),
        (REG_ALED2STC, 0),
        (REG_ALED2ENDC, 1998),
        (REG_LED1STC, 2000),
        (REG_LED1ENDC, 3998),
        (REG_LED1LEDSTC, 2000),
        (REG_LED1LEDENDC, 3999),
        (REG_ALED1STC, 4000),
        (REG_ALED1ENDC, 5998),
        (REG_LED2CONVST, 2),
        (REG_LED2CONVEND, 1999),
        (REG_ALED2CONVST, 2002),
        (REG_ALED2CONVEND, 3999),
        (REG_LED1CONVST, 4002),
        (REG_LED1CONVEND, 5999),
        (REG_ALED1CONVST, 6002),
        (REG_ALED1CONVEND, 7999),
        (REG_ADCRSTSTCT0, 0),
        (REG_ADCRSTENDCT0, 2),
        (REG_ADCRSTSTCT1, 2000),
        (REG_ADCRSTENDCT1, 2002),
        (REG_ADCRSTSTCT2, 4000),
        (REG_ADCRSTENDCT2, 4002),
        (REG_ADCRSTSTCT3, 6000),
        (REG_ADCRSTENDCT3, 6002),
        (REG_PRPCOUNT, 7999),
    ]);

    /// Wraps a caller-provided entry table.
    pub const fn new(entries: &'static [TimingEntry]) -> Self {
        Self { entries }
    }

    /// Returns the ordered entries of this profile.
    pub const fn entries(&self) -> &'static [TimingEntry] {
        self.entries
    }

    /// Checks that every entry targets a register inside the timing block.
    pub fn validate(&self) -> core::result::Result<(), u8> {
        match self
            .entries
            .iter()
            .find(|(address, _)| !is_timing_address(*address))
        {
            Some((address, _)) => Err(*address),
            None => Ok(()),
        }
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}
