//! TI ADS1015 12-bit ADC
//!
//! The ADS1015 exposes 16-bit registers over I2C, MSB first. The driver
//! keeps the chip in continuous conversion mode and switches the input
//! multiplexer to read one single-ended channel at a time.
//!
//! # Usage
//!
//! ```ignore
//! let mut adc = Ads1015::new(i2c, Ads1015Config::default())?;
//! let left = adc.read_channel(AdcChannel::A0, &mut delay)?;
//! let right = adc.read_channel(AdcChannel::A1, &mut delay)?;
//! ```

use embedded_hal::delay::DelayNs;
use raspibot_hal::I2cBus;

/// Default bus address (ADDR pin tied to VDD)
pub const DEFAULT_ADDRESS: u8 = 0x49;

const CONVERSION_REGISTER: u8 = 0b00;
const CONFIG_REGISTER: u8 = 0b01;

const CONFIG_MUX_BITS: u16 = 0b0111_0000_0000_0000;
const CONFIG_PGA_BITS: u16 = 0b0000_1110_0000_0000;
const CONFIG_MODE_BITS: u16 = 0b0000_0001_0000_0000;

/// Time for one conversion after a mux change at the default data rate
const SETTLE_US: u32 = 1_000;

/// Single-ended input, measured against ground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdcChannel {
    A0,
    A1,
    A2,
    A3,
}

impl AdcChannel {
    pub const ALL: [AdcChannel; 4] = [
        AdcChannel::A0,
        AdcChannel::A1,
        AdcChannel::A2,
        AdcChannel::A3,
    ];

    /// Map a channel index (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    fn mux_bits(self) -> u16 {
        match self {
            AdcChannel::A0 => 0b0100_0000_0000_0000,
            AdcChannel::A1 => 0b0101_0000_0000_0000,
            AdcChannel::A2 => 0b0110_0000_0000_0000,
            AdcChannel::A3 => 0b0111_0000_0000_0000,
        }
    }
}

/// Programmable gain amplifier full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gain {
    /// ±6.144 V
    TwoThirds,
    /// ±4.096 V
    #[default]
    One,
    /// ±2.048 V
    Two,
    /// ±1.024 V
    Four,
    /// ±0.512 V
    Eight,
    /// ±0.256 V
    Sixteen,
}

impl Gain {
    fn pga_bits(self) -> u16 {
        let code: u16 = match self {
            Gain::TwoThirds => 0b000,
            Gain::One => 0b001,
            Gain::Two => 0b010,
            Gain::Four => 0b011,
            Gain::Eight => 0b100,
            Gain::Sixteen => 0b101,
        };
        code << 9
    }

    /// Full-scale range in millivolts
    pub fn full_scale_mv(self) -> u32 {
        match self {
            Gain::TwoThirds => 6144,
            Gain::One => 4096,
            Gain::Two => 2048,
            Gain::Four => 1024,
            Gain::Eight => 512,
            Gain::Sixteen => 256,
        }
    }
}

/// Conversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    Continuous,
    SingleShot,
}

impl Mode {
    fn mode_bits(self) -> u16 {
        match self {
            Mode::Continuous => 0,
            Mode::SingleShot => CONFIG_MODE_BITS,
        }
    }
}

/// ADS1015 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Ads1015Config {
    /// 7-bit I2C address
    pub address: u8,
    pub gain: Gain,
    pub mode: Mode,
}

impl Default for Ads1015Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            gain: Gain::One,
            mode: Mode::Continuous,
        }
    }
}

/// ADS1015 driver
pub struct Ads1015<B> {
    bus: B,
    config: Ads1015Config,
}

impl<B: I2cBus> Ads1015<B> {
    /// Configure the chip: input A0, configured gain and mode
    ///
    /// All other configuration bits are left as read from the chip.
    pub fn new(bus: B, config: Ads1015Config) -> Result<Self, B::Error> {
        let mut adc = Self { bus, config };

        let mut value = adc.read_config_register()?;
        value = (value & !CONFIG_MUX_BITS) | AdcChannel::A0.mux_bits();
        value = (value & !CONFIG_PGA_BITS) | config.gain.pga_bits();
        value = (value & !CONFIG_MODE_BITS) | config.mode.mode_bits();
        adc.write_config_register(value)?;

        debug!("ADS1015 at {=u8:#x} configured: {=u16:#x}", config.address, value);
        Ok(adc)
    }

    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Bus address of the chip
    pub fn address(&self) -> u8 {
        self.config.address
    }

    pub fn config(&self) -> &Ads1015Config {
        &self.config
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Read the 16-bit configuration register
    pub fn read_config_register(&mut self) -> Result<u16, B::Error> {
        self.bus.read_register_be(self.config.address, CONFIG_REGISTER)
    }

    /// Write the 16-bit configuration register
    pub fn write_config_register(&mut self, value: u16) -> Result<(), B::Error> {
        self.bus
            .write_register_be(self.config.address, CONFIG_REGISTER, value)
    }

    /// Read the latest conversion result
    ///
    /// The lowest four bits of the register are always zero; the 12-bit
    /// result is returned right-aligned.
    pub fn read_conversion_value(&mut self) -> Result<u16, B::Error> {
        let raw = self
            .bus
            .read_register_be(self.config.address, CONVERSION_REGISTER)?;
        Ok(raw >> 4)
    }

    /// Route `channel` to the converter, measured against ground
    pub fn set_mux_absolute(&mut self, channel: AdcChannel) -> Result<(), B::Error> {
        let value = self.read_config_register()?;
        self.write_config_register((value & !CONFIG_MUX_BITS) | channel.mux_bits())
    }

    /// Read one value from `channel`
    ///
    /// Waits for a fresh conversion with the new multiplexer setting.
    pub fn read_channel(
        &mut self,
        channel: AdcChannel,
        delay: &mut impl DelayNs,
    ) -> Result<u16, B::Error> {
        self.set_mux_absolute(channel)?;
        delay.delay_us(SETTLE_US);
        let value = self.read_conversion_value()?;
        trace!("ADC {:?} = {=u16}", channel, value);
        Ok(value)
    }

    /// Convert a 12-bit reading to millivolts at the configured gain
    pub fn to_millivolts(&self, value: u16) -> u32 {
        value as u32 * self.config.gain.full_scale_mv() / 2048
    }
}
