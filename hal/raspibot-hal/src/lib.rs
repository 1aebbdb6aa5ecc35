//! RaspiBot Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the RaspiBot protocol and drivers
//! are written against. A platform crate (Linux character devices, a test
//! mock, an emulator) implements them once and every higher layer runs on it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  raspibot-protocol        raspibot-drivers   │
//! └──────────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │  raspibot-hal (this crate - traits)          │
//! └──────────────────────────────────────────────┘
//!                     │
//!                     ▼
//!         serial port / i2c-dev / gpiochip
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialChannel`] - Byte channel with read timeout
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

mod fmt;

pub mod gpio;
pub mod i2c;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use serial::{IoChannel, SerialChannel, SerialConfig};
