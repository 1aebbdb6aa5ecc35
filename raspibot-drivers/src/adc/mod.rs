//! Analog to digital converters

pub mod ads1015;

pub use ads1015::{AdcChannel, Ads1015, Ads1015Config, Gain, Mode};
