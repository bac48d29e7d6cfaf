//! Register map definitions for the AFE4400 analog front end.
//!
//! Every register is 24 bits wide and addressed by an 8-bit constant. Values
//! are carried in `u32` for convenience; bits above bit 23 are always zero.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

/// Register address of `CONTROL0`.
pub const REG_CONTROL0: u8 = 0x00;
/// Register address of `LED2STC` (first timing register).
pub const REG_LED2STC: u8 = 0x01;
/// Register address of `LED2ENDC`.
pub const REG_LED2ENDC: u8 = 0x02;
/// Register address of `LED2LEDSTC`.
pub const REG_LED2LEDSTC: u8 = 0x03;
/// Register address of `LED2LEDENDC`.
pub const REG_LED2LEDENDC: u8 = 0x04;
/// Register address of `ALED2STC`.
pub const REG_ALED2STC: u8 = 0x05;
/// Register address of `ALED2ENDC`.
pub const REG_ALED2ENDC: u8 = 0x06;
/// Register address of `LED1STC`.
pub const REG_LED1STC: u8 = 0x07;
/// Register address of `LED1ENDC`.
pub const REG_LED1ENDC: u8 = 0x08;
/// Register address of `LED1LEDSTC`.
pub const REG_LED1LEDSTC: u8 = 0x09;
/// Register address of `LED1LEDENDC`.
pub const REG_LED1LEDENDC: u8 = 0x0A;
/// Register address of `ALED1STC`.
pub const REG_ALED1STC: u8 = 0x0B;
/// Register address of `ALED1ENDC`.
pub const REG_ALED1ENDC: u8 = 0x0C;
/// Register address of `LED2CONVST`.
pub const REG_LED2CONVST: u8 = 0x0D;
/// Register address of `LED2CONVEND`.
pub const REG_LED2CONVEND: u8 = 0x0E;
/// Register address of `ALED2CONVST`.
pub const REG_ALED2CONVST: u8 = 0x0F;
/// Register address of `ALED2CONVEND`.
pub const REG_ALED2CONVEND: u8 = 0x10;
/// Register address of `LED1CONVST`.
pub const REG_LED1CONVST: u8 = 0x11;
/// Register address of `LED1CONVEND`.
pub const REG_LED1CONVEND: u8 = 0x12;
/// Register address of `ALED1CONVST`.
pub const REG_ALED1CONVST: u8 = 0x13;
/// Register address of `ALED1CONVEND`.
pub const REG_ALED1CONVEND: u8 = 0x14;
/// Register address of `ADCRSTSTCT0`.
pub const REG_ADCRSTSTCT0: u8 = 0x15;
/// Register address of `ADCRSTENDCT0`.
pub const REG_ADCRSTENDCT0: u8 = 0x16;
/// Register address of `ADCRSTSTCT1`.
pub const REG_ADCRSTSTCT1: u8 = 0x17;
/// Register address of `ADCRSTENDCT1`.
pub const REG_ADCRSTENDCT1: u8 = 0x18;
/// Register address of `ADCRSTSTCT2`.
pub const REG_ADCRSTSTCT2: u8 = 0x19;
/// Register address of `ADCRSTENDCT2`.
pub const REG_ADCRSTENDCT2: u8 = 0x1A;
/// Register address of `ADCRSTSTCT3`.
pub const REG_ADCRSTSTCT3: u8 = 0x1B;
/// Register address of `ADCRSTENDCT3`.
pub const REG_ADCRSTENDCT3: u8 = 0x1C;
/// Register address of `PRPCOUNT` (last timing register, period length).
pub const REG_PRPCOUNT: u8 = 0x1D;
/// Register address of `CONTROL1`.
pub const REG_CONTROL1: u8 = 0x1E;
/// Register address of `SPARE1`.
pub const REG_SPARE1: u8 = 0x1F;
/// Register address of `TIAGAIN`.
pub const REG_TIAGAIN: u8 = 0x20;
/// Register address of `TIA_AMB_GAIN`.
pub const REG_TIA_AMB_GAIN: u8 = 0x21;
/// Register address of `LEDCNTRL`.
pub const REG_LEDCNTRL: u8 = 0x22;
/// Register address of `CONTROL2`.
pub const REG_CONTROL2: u8 = 0x23;
/// Register address of `SPARE2`.
pub const REG_SPARE2: u8 = 0x24;
/// Register address of `SPARE3`.
pub const REG_SPARE3: u8 = 0x25;
/// Register address of `SPARE4`.
pub const REG_SPARE4: u8 = 0x26;
/// Register address of `RESERVED1`.
pub const REG_RESERVED1: u8 = 0x27;
/// Register address of `RESERVED2`.
pub const REG_RESERVED2: u8 = 0x28;
/// Register address of `ALARM`.
pub const REG_ALARM: u8 = 0x29;
/// Register address of `LED2VAL`.
pub const REG_LED2VAL: u8 = 0x2A;
/// Register address of `ALED2VAL`.
pub const REG_ALED2VAL: u8 = 0x2B;
/// Register address of `LED1VAL`.
pub const REG_LED1VAL: u8 = 0x2C;
/// Register address of `ALED1VAL`.
pub const REG_ALED1VAL: u8 = 0x2D;
/// Register address of `LED2_ALED2VAL`.
pub const REG_LED2_ALED2VAL: u8 = 0x2E;
/// Register address of `LED1_ALED1VAL`.
pub const REG_LED1_ALED1VAL: u8 = 0x2F;
/// Register address of `DIAG`.
pub const REG_DIAG: u8 = 0x30;

/// Mask selecting the 24 valid bits of a register value.
pub const REGISTER_VALUE_MASK: u32 = 0x00FF_FFFF;
/// Number of valid bits in a register value.
pub const REGISTER_WIDTH_BITS: u8 = 24;

/// `CONTROL0` soft-reset bit position (self-clearing).
pub const SW_RST_BIT: u8 = 3;
/// `CONTROL1` timer engine enable bit position.
pub const TIMER_EN_BIT: u8 = 8;
/// `CONTROL2` LED driver mode bit position (0 selects H-bridge).
pub const TX_BRIDGE_MODE_BIT: u8 = 11;
/// `LEDCNTRL` LED current output enable bit position.
pub const LED_CURRENT_ON_BIT: u8 = 17;

/// `CONTROL0` value that places the device in register-readback mode.
pub const READ_ENABLE_COMMAND: u32 = 0x00_0001;
/// `CONTROL0` value that restores register-write mode.
pub const READ_DISABLE_COMMAND: u32 = 0x00_0000;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// LED transmit stage drive topology (`CONTROL2.TXBRGMOD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum LedDriveMode {
    /// H-bridge drive, current direction can reverse.
    HBridge = 0,
    /// Push-pull drive.
    PushPull = 1,
}

/// Bitfield representation of the `CONTROL0` register (address `0x00`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control0 {
    // Register readback enable (bit 0).
    pub spi_read: bool,
    // Timer counter reset (bit 1).
    pub tim_count_rst: bool,
    // Diagnostics mode enable (bit 2).
    pub diag_en: bool,
    // Software reset, self-clearing (bit 3).
    pub sw_rst: bool,
    #[skip]
    __: B20,
}

/// Bitfield representation of the `CONTROL1` register (address `0x1E`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control1 {
    #[skip]
    __: B8,
    // Timer engine enable (bit 8).
    pub timer_en: bool,
    #[skip]
    __: B15,
}

/// Bitfield representation of the `CONTROL2` register (address `0x23`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control2 {
    #[skip]
    __: B11,
    // LED driver topology selection (bit 11).
    pub tx_bridge_mode: LedDriveMode,
    #[skip]
    __: B12,
}

/// Bitfield representation of the `LEDCNTRL` register (address `0x22`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedControl {
    // LED2 drive current code (bits 7:0).
    pub led2_current: B8,
    // LED1 drive current code (bits 15:8).
    pub led1_current: B8,
    #[skip]
    __: B1,
    // LED current output enable (bit 17).
    pub led_current_on: bool,
    #[skip]
    __: B6,
}

macro_rules! register_u32_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<u32> for $ty {
                fn from(value: u32) -> Self {
                    Self::from_bytes([value as u8, (value >> 8) as u8, (value >> 16) as u8])
                }
            }

            impl From<$ty> for u32 {
                fn from(value: $ty) -> Self {
                    let bytes = value.into_bytes();
                    u32::from(bytes[0]) | u32::from(bytes[1]) << 8 | u32::from(bytes[2]) << 16
                }
            }
        )*
    };
}

register_u32_conversions!(Control0, Control1, Control2, LedControl);

impl Register for Control0 {
    type Raw = u32;
    const ADDRESS: u8 = REG_CONTROL0;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00_0000);
}

impl Register for Control1 {
    type Raw = u32;
    const ADDRESS: u8 = REG_CONTROL1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00_0000);
}

impl Register for Control2 {
    type Raw = u32;
    const ADDRESS: u8 = REG_CONTROL2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00_0000);
}

impl Register for LedControl {
    type Raw = u32;
    const ADDRESS: u8 = REG_LEDCNTRL;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00_0000);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that Control0 bitfields match the datasheet layout.
    #[test]
    fn control0_layout_matches_datasheet() {
        let ctrl = Control0::new().with_sw_rst(true);
        assert_eq!(u32::from(ctrl), 1 << SW_RST_BIT);

        let ctrl = Control0::from(READ_ENABLE_COMMAND);
        assert!(ctrl.spi_read());
        assert!(!ctrl.sw_rst());
    }

    #[test]
    fn control1_timer_enable_is_bit_8() {
        let ctrl = Control1::new().with_timer_en(true);
        assert_eq!(u32::from(ctrl), 1 << TIMER_EN_BIT);
    }

    #[test]
    fn control2_drive_mode_is_bit_11() {
        let ctrl = Control2::new().with_tx_bridge_mode(LedDriveMode::PushPull);
        assert_eq!(u32::from(ctrl), 1 << TX_BRIDGE_MODE_BIT);
        assert_eq!(
            Control2::from(0u32).tx_bridge_mode(),
            LedDriveMode::HBridge
        );
    }

    /// Ensures LedControl encodes both current fields at the documented offsets.
    #[test]
    fn led_control_field_offsets() {
        let led = LedControl::new()
            .with_led1_current(0x12)
            .with_led2_current(0x34);
        assert_eq!(u32::from(led), 0x00_1234);

        let led = LedControl::new().with_led_current_on(true);
        assert_eq!(u32::from(led), 1 << LED_CURRENT_ON_BIT);
    }

    /// Conversions from a wide word must drop bits above bit 23.
    #[test]
    fn u32_conversion_masks_to_24_bits() {
        let led = LedControl::from(0xFF00_1234);
        assert_eq!(u32::from(led), 0x00_1234);
    }
}
