//! Request encoding and parsing
//!
//! A request is one opcode byte followed by the command's fixed-size
//! parameters. Only the echo command has a variable payload.

use heapless::Vec;

use crate::error::ProtocolError;
use crate::opcode::{Opcode, ReplyKind};
use crate::types::{MotorSpeed, PiParameters, MAX_ECHO_LEN};

/// Longest request on the wire (PI parameters: opcode + 5 bytes)
pub const MAX_REQUEST_LEN: usize = 1 + PiParameters::WIRE_LEN;

/// Encoded request bytes
pub type Request = Vec<u8, MAX_REQUEST_LEN>;

/// Commands sent from the Pi to the ATtiny
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Liveness probe
    Alive,
    GetEncoderRight,
    GetEncoderLeft,
    GetEncodersBoth,
    ResetEncoderRight,
    ResetEncoderLeft,
    ResetEncodersBoth,
    /// Loopback test, the payload must come back unchanged
    Echo(&'a [u8]),
    /// Stop both motors
    ///
    /// Same effect as setting both speeds to zero, but its own wire command.
    StopMotors,
    SetRightMotor(MotorSpeed),
    SetLeftMotor(MotorSpeed),
    SetBothMotors {
        left: MotorSpeed,
        right: MotorSpeed,
    },
    SetPiParameters(PiParameters),
}

impl<'a> Command<'a> {
    /// Opcode identifying this command on the wire
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Alive => Opcode::Alive,
            Command::GetEncoderRight => Opcode::GetEncoderRight,
            Command::GetEncoderLeft => Opcode::GetEncoderLeft,
            Command::GetEncodersBoth => Opcode::GetEncodersBoth,
            Command::ResetEncoderRight => Opcode::ResetEncoderRight,
            Command::ResetEncoderLeft => Opcode::ResetEncoderLeft,
            Command::ResetEncodersBoth => Opcode::ResetEncodersBoth,
            Command::Echo(_) => Opcode::Echo,
            Command::StopMotors => Opcode::StopMotors,
            Command::SetRightMotor(_) => Opcode::SetRightMotor,
            Command::SetLeftMotor(_) => Opcode::SetLeftMotor,
            Command::SetBothMotors { .. } => Opcode::SetBothMotors,
            Command::SetPiParameters(_) => Opcode::SetPiParameters,
        }
    }

    /// Number of reply bytes this command expects
    pub fn reply_len(&self) -> usize {
        match self {
            Command::Echo(payload) => payload.len(),
            _ => self.reply_kind().fixed_len().unwrap_or(0),
        }
    }

    pub fn reply_kind(&self) -> ReplyKind {
        self.opcode().reply_kind()
    }

    /// Check the request can be sent, without encoding it
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Command::Echo(payload) if payload.len() > MAX_ECHO_LEN => {
                Err(ProtocolError::invalid_length(MAX_ECHO_LEN, payload.len()))
            }
            _ => Ok(()),
        }
    }

    /// Encode this command into request bytes
    ///
    /// Fails only for an oversized echo payload.
    pub fn encode(&self) -> Result<Request, ProtocolError> {
        self.validate()?;

        let mut params = [0u8; PiParameters::WIRE_LEN];
        let payload: &[u8] = match self {
            Command::Echo(payload) => *payload,
            Command::SetRightMotor(speed) | Command::SetLeftMotor(speed) => {
                params[0] = speed.to_byte();
                &params[..1]
            }
            Command::SetBothMotors { left, right } => {
                params[0] = left.to_byte();
                params[1] = right.to_byte();
                &params[..2]
            }
            Command::SetPiParameters(pi) => {
                params = pi.to_bytes();
                &params
            }
            _ => &[],
        };

        let too_long = || ProtocolError::invalid_length(MAX_REQUEST_LEN, 1 + payload.len());
        let mut request = Request::new();
        request.push(self.opcode().to_byte()).map_err(|_| too_long())?;
        request.extend_from_slice(payload).map_err(|_| too_long())?;

        Ok(request)
    }

    /// Parse request bytes, as the controller firmware does
    ///
    /// `bytes` must hold exactly one request.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ProtocolError> {
        let (&first, payload) = bytes
            .split_first()
            .ok_or(ProtocolError::invalid_length(1, 0))?;
        let opcode = Opcode::from_byte(first).ok_or(ProtocolError::invalid_response(&[first]))?;

        let expected = opcode.payload_len().unwrap_or(payload.len());
        if payload.len() != expected {
            return Err(ProtocolError::invalid_length(expected, payload.len()));
        }

        let speed = |byte: u8| {
            MotorSpeed::from_byte(byte).ok_or(ProtocolError::invalid_response(&[byte]))
        };

        let command = match opcode {
            Opcode::Alive => Command::Alive,
            Opcode::GetEncoderRight => Command::GetEncoderRight,
            Opcode::GetEncoderLeft => Command::GetEncoderLeft,
            Opcode::GetEncodersBoth => Command::GetEncodersBoth,
            Opcode::ResetEncoderRight => Command::ResetEncoderRight,
            Opcode::ResetEncoderLeft => Command::ResetEncoderLeft,
            Opcode::ResetEncodersBoth => Command::ResetEncodersBoth,
            Opcode::Echo => Command::Echo(payload),
            Opcode::StopMotors => Command::StopMotors,
            Opcode::SetRightMotor => Command::SetRightMotor(speed(payload[0])?),
            Opcode::SetLeftMotor => Command::SetLeftMotor(speed(payload[0])?),
            Opcode::SetBothMotors => Command::SetBothMotors {
                left: speed(payload[0])?,
                right: speed(payload[1])?,
            },
            Opcode::SetPiParameters => {
                let mut params = [0u8; PiParameters::WIRE_LEN];
                params.copy_from_slice(payload);
                Command::SetPiParameters(PiParameters::from_bytes(params))
            }
        };

        command.validate()?;
        Ok(command)
    }
}
