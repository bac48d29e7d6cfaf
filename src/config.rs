//! Configuration primitives for the AFE4400 driver.

use crate::timing::TimingProfile;

/// User-facing configuration for the AFE4400 front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// LED1 drive current code (full scale 50 mA at 0xFF).
    pub led1_current: u8,
    /// LED2 drive current code (full scale 50 mA at 0xFF).
    pub led2_current: u8,
    /// Timing-engine program applied during configuration.
    pub timing: TimingProfile,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        self.timing
            .validate()
            .map_err(ConfigError::TimingAddressOutOfRange)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the LED1 drive current code.
    pub fn led1_current(mut self, code: u8) -> Self {
        self.config.led1_current = code;
        self
    }

    /// Sets the LED2 drive current code.
    pub fn led2_current(mut self, code: u8) -> Self {
        self.config.led2_current = code;
        self
    }

    /// Sets the same drive current code for both LEDs.
    pub fn led_currents(mut self, code: u8) -> Self {
        self.config.led1_current = code;
        self.config.led2_current = code;
        self
    }

    /// Overrides the timing-engine program.
    pub fn timing(mut self, timing: TimingProfile) -> Self {
        self.config.timing = timing;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            led1_current: 0,
            led2_current: 0,
            timing: TimingProfile::DEFAULT,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timing entry targets a register outside the timing block.
    TimingAddressOutOfRange(u8),
}
