//! RaspiBot ATtiny serial protocol
//!
//! This crate implements the command/response protocol the Raspberry Pi uses
//! to drive the robot's ATtiny motor/encoder controller over a serial link.
//!
//! # Protocol Overview
//!
//! Every transaction is one request followed by one fixed-length reply:
//! ```text
//! request  ┌────────┬──────────────────┐
//!          │ OPCODE │ PARAMETERS       │
//!          │ 1B     │ 0–5B             │
//!          └────────┴──────────────────┘
//! reply    ┌──────────────────────────┐
//!          │ ACK/NAK (1B) or DATA     │
//!          └──────────────────────────┘
//! ```
//!
//! Multi-byte integers are big-endian. Commands without data reply with
//! ACK (0x10) or NAK (0x14); a read timeout counts as NAK. Numeric
//! parameters are saturated to their wire range before encoding, so the
//! wire never carries an out-of-range value.
//!
//! ```ignore
//! let mut attiny = AttinyProtocol::new(&mut port);
//! if attiny.alive()? {
//!     attiny.set_motors(80, 80)?;
//!     let EncoderValues { left, right } = attiny.get_encoders()?;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod attiny;
pub mod command;
pub mod error;
pub mod opcode;
pub mod reply;
pub mod types;

pub use attiny::AttinyProtocol;
pub use command::{Command, Request, MAX_REQUEST_LEN};
pub use error::{ProtocolError, ReplyBytes};
pub use opcode::{Opcode, ReplyKind, ACK, NAK};
pub use reply::{Reply, MAX_REPLY_LEN};
pub use types::{
    Acknowledgement, EchoPayload, EncoderValues, MotorSpeed, PiParameters, MAX_ECHO_LEN,
};
