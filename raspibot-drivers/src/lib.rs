//! RaspiBot peripheral drivers
//!
//! Drivers for the peripherals the Raspberry Pi talks to directly, written
//! against the traits in `raspibot-hal`:
//!
//! - ADS1015 12-bit ADC on I2C (distance sensors)
//! - HD44780 character LCD in 4-bit GPIO mode
//! - Push button with red and green status LEDs
//!
//! Timing comes from an `embedded_hal::delay::DelayNs` implementation
//! passed in by the caller.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod adc;
pub mod button;
pub mod lcd;

pub use adc::{AdcChannel, Ads1015, Ads1015Config, Gain, Mode};
pub use button::Button;
pub use lcd::{Hd44780, LcdPins, LcdTiming};
