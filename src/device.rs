//! High-level AFE4400 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::spi::SpiInterface;
use crate::interface::Afe4400Interface;
use crate::log::{debug_log, warn_log};
use crate::registers::{
    LedControl, LED_CURRENT_ON_BIT, REGISTER_VALUE_MASK, REGISTER_WIDTH_BITS, REG_CONTROL0,
    REG_CONTROL1, REG_CONTROL2, REG_LED1_ALED1VAL, REG_LED2_ALED2VAL, REG_LEDCNTRL,
    READ_DISABLE_COMMAND, READ_ENABLE_COMMAND, SW_RST_BIT, TIMER_EN_BIT, TX_BRIDGE_MODE_BIT,
};
use crate::timing::{is_timing_address, TimingProfile, TIMING_REG_FIRST, TIMING_REG_LAST};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

// AFE4400 power-up to first-command settle delay (milliseconds).
const POWER_UP_DELAY_MS: u32 = 1000;
// Wait after raising the self-clearing soft-reset bit; the device is not polled.
const SOFT_RESET_DELAY_MS: u32 = 10;
// Settle delay after each CONTROL0 write of the read-enable bracket.
const READ_BRACKET_DELAY_MS: u32 = 1;

/// Bring-up progress of one attached front end.
///
/// Operations that depend on earlier configuration steps are rejected with
/// [`Error::OutOfSequence`] instead of silently arming a half-configured
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// No communication with the device has happened yet.
    Uninitialized,
    /// The device has been soft-reset and is ready for configuration.
    Reset,
    /// LED currents and the timing program have been installed.
    Configured,
    /// The timing engine is running and samples are being captured.
    Measuring,
}

/// High-level synchronous driver for the AFE4400 pulse-oximetry front end.
///
/// The driver owns the delay provider because every bracketed register read
/// carries fixed settle delays, not just initialization.
///
/// All register traffic must be serialized through one logical caller: the
/// read-enable bracket and the read-modify-write bit helper are multi-step
/// sequences with no atomicity against interleaved access.
pub struct Afe4400<IFACE, D> {
    interface: IFACE,
    delay: D,
    state: DeviceState,
    pulse: u32,
    oximetry: u32,
}

impl<IFACE, D> Afe4400<IFACE, D> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, delay: D) -> Self {
        Self {
            interface,
            delay,
            state: DeviceState::Uninitialized,
            pulse: 0,
            oximetry: 0,
        }
    }

    /// Consumes the driver and returns the owned interface and delay.
    pub fn release(self) -> (IFACE, D) {
        (self.interface, self.delay)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the current bring-up state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    // ==================================================================
    // == Cached Measurement Session Values =============================
    // ==================================================================
    /// Returns the most recently recorded pulse sample.
    ///
    /// Never touches the bus; returns zero before the first capture.
    pub fn read_pulse_data(&self) -> u32 {
        self.pulse
    }

    /// Returns the most recently recorded oximetry sample.
    ///
    /// Never touches the bus; returns zero before the first capture.
    pub fn read_ox_data(&self) -> u32 {
        self.oximetry
    }

    /// Stores a (pulse, oximetry) pair captured by the polling collaborator.
    ///
    /// The driver arms the hardware but does not run an acquisition loop;
    /// the integrator periodically reads the measurement-value registers and
    /// feeds the parsed results back through this method.
    pub fn record_sample(&mut self, pulse: u32, oximetry: u32) {
        self.pulse = pulse;
        self.oximetry = oximetry;
    }

    #[cfg(test)]
    fn force_state(&mut self, state: DeviceState) {
        self.state = state;
    }
}

impl<SPI, D> Afe4400<SpiInterface<SPI>, D>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, delay: D) -> Self {
        Self::new(SpiInterface::new(spi), delay)
    }

    /// Releases the driver, returning the SPI device and delay.
    pub fn release_spi(self) -> (SPI, D) {
        let (iface, delay) = self.release();
        (iface.release(), delay)
    }
}

impl<IFACE, CommE, D> Afe4400<IFACE, D>
where
    IFACE: Afe4400Interface<Error = CommE>,
    D: DelayNs,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Brings the device out of power-up and issues a soft reset.
    ///
    /// SPI mode-0 bus setup and chip-select pin direction belong to the
    /// platform layer; this driver assumes the transport is ready. Callable
    /// from any state to restart bring-up; the device is left in
    /// [`DeviceState::Reset`] awaiting configuration.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.delay.delay_ms(POWER_UP_DELAY_MS);
        self.soft_reset()?;
        self.state = DeviceState::Reset;
        debug_log!("AFE4400 soft reset complete");
        Ok(())
    }

    /// Raises the self-clearing soft-reset bit and waits the fixed settle
    /// time. Completion is not polled.
    pub fn soft_reset(&mut self) -> Result<(), CommE> {
        self.write_register_bit(REG_CONTROL0, SW_RST_BIT, true)?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        Ok(())
    }

    // ==================================================================
    // == Register Access Layer =========================================
    // ==================================================================
    /// Reads a full 24-bit register value.
    ///
    /// Every read is bracketed: `CONTROL0` is placed in register-readback
    /// mode first and restored afterwards, with a fixed settle delay after
    /// each bracket write.
    pub fn read_register(&mut self, address: u8) -> Result<u32, CommE> {
        self.write_read_mode(READ_ENABLE_COMMAND)?;
        let value = self.interface.read_register(address).map_err(Error::from)?;
        self.write_read_mode(READ_DISABLE_COMMAND)?;
        Ok(value & REGISTER_VALUE_MASK)
    }

    /// Writes a full register value, masked to the 24 valid bits.
    pub fn write_register(&mut self, address: u8, value: u32) -> Result<(), CommE> {
        self.interface
            .write_register(address, value & REGISTER_VALUE_MASK)
            .map_err(Error::from)
    }

    /// Read-modify-writes a single bit, preserving all other bits exactly.
    ///
    /// If the bit already has the requested value no bus write is issued.
    /// Bit indices must be below 24.
    pub fn write_register_bit(&mut self, address: u8, bit: u8, high: bool) -> Result<(), CommE> {
        if bit >= REGISTER_WIDTH_BITS {
            return Err(Error::BitIndexOutOfRange(bit));
        }

        let current = self.read_register(address)?;
        let mask = 1u32 << bit;
        if (current & mask != 0) == high {
            return Ok(());
        }

        let updated = if high { current | mask } else { current & !mask };
        self.write_register(address, updated)
    }

    fn write_read_mode(&mut self, command: u32) -> Result<(), CommE> {
        self.interface
            .write_register(REG_CONTROL0, command)
            .map_err(Error::from)?;
        self.delay.delay_ms(READ_BRACKET_DELAY_MS);
        Ok(())
    }

    // ==================================================================
    // == Timing Program Loader =========================================
    // ==================================================================
    /// Writes one 16-bit value into a timing register.
    ///
    /// Addresses outside the timing block are reported on the diagnostic
    /// channel and skipped without touching the bus; configuration continues
    /// (non-fatal, per the hardware bring-up flow).
    pub fn write_timing_value(&mut self, address: u8, value: u16) -> Result<(), CommE> {
        if !is_timing_address(address) {
            warn_log!(
                "timing write to address {=u8:x} outside {=u8:x}..={=u8:x}, skipped",
                address,
                TIMING_REG_FIRST,
                TIMING_REG_LAST,
            );
            return Ok(());
        }

        self.write_register(address, u32::from(value))
    }

    /// Installs the default 500 Hz four-phase timing program.
    pub fn set_default_timing(&mut self) -> Result<(), CommE> {
        self.load_timing_profile(TimingProfile::DEFAULT)
    }

    /// Installs a timing program, one register write per table entry.
    ///
    /// Valid once the device has been reset; leaves it
    /// [`DeviceState::Configured`]. Per the hardware bring-up flow, LED
    /// currents should be set before this and measurement armed after.
    pub fn load_timing_profile(&mut self, profile: TimingProfile) -> Result<(), CommE> {
        match self.state {
            DeviceState::Reset | DeviceState::Configured => {}
            current => return Err(Error::OutOfSequence { current }),
        }

        for &(address, value) in profile.entries() {
            self.write_timing_value(address, value)?;
        }

        self.state = DeviceState::Configured;
        Ok(())
    }

    // ==================================================================
    // == LED & Measurement Control =====================================
    // ==================================================================
    /// Programs the LED drive current codes (LED1 bits 15:8, LED2 bits 7:0).
    ///
    /// Valid any time after [`Self::init`]; the enable bit and the rest of
    /// `LEDCNTRL` are preserved.
    pub fn set_led_current(&mut self, led1: u8, led2: u8) -> Result<(), CommE> {
        if self.state == DeviceState::Uninitialized {
            return Err(Error::OutOfSequence {
                current: self.state,
            });
        }

        let current = self.read_register(REG_LEDCNTRL)?;
        let control = LedControl::from(current)
            .with_led1_current(led1)
            .with_led2_current(led2);

        let updated = u32::from(control);
        if updated != current {
            self.write_register(REG_LEDCNTRL, updated)?;
        }

        Ok(())
    }

    /// Applies LED currents and the timing program from a [`Config`].
    pub fn configure(&mut self, config: &Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.set_led_current(config.led1_current, config.led2_current)?;
        self.load_timing_profile(config.timing)
    }

    /// Arms continuous measurement.
    ///
    /// Selects H-bridge LED drive, enables LED current output and starts the
    /// internal timing engine. No sampling loop is started; acquisition is
    /// the polling collaborator's job. Rejected unless the device is
    /// [`DeviceState::Configured`].
    pub fn begin_measure(&mut self) -> Result<(), CommE> {
        if self.state != DeviceState::Configured {
            return Err(Error::OutOfSequence {
                current: self.state,
            });
        }

        self.write_register_bit(REG_CONTROL2, TX_BRIDGE_MODE_BIT, false)?;
        self.write_register_bit(REG_LEDCNTRL, LED_CURRENT_ON_BIT, true)?;
        self.write_register_bit(REG_CONTROL1, TIMER_EN_BIT, true)?;

        self.state = DeviceState::Measuring;
        debug_log!("measurement armed");
        Ok(())
    }

    // ==================================================================
    // == Measurement Register Readout ==================================
    // ==================================================================
    #[inline]
    fn sign_extend_22(raw: u32) -> i32 {
        // ADC accumulations are 22-bit two's complement.
        ((raw << 10) as i32) >> 10
    }

    /// Reads the combined LED1 minus ambient-1 sample (`LED1_ALED1VAL`).
    pub fn read_led1_sample(&mut self) -> Result<i32, CommE> {
        let raw = self.read_register(REG_LED1_ALED1VAL)?;
        Ok(Self::sign_extend_22(raw))
    }

    /// Reads the combined LED2 minus ambient-2 sample (`LED2_ALED2VAL`).
    pub fn read_led2_sample(&mut self) -> Result<i32, CommE> {
        let raw = self.read_register(REG_LED2_ALED2VAL)?;
        Ok(Self::sign_extend_22(raw))
    }
}
