//! Transactions with the ATtiny controller
//!
//! Every operation is one request written to the channel followed by one
//! blocking read of the expected reply length. There is no retry: a NAK or
//! an error goes straight back to the caller, who knows whether resending
//! is safe (see [`Opcode::is_idempotent`](crate::Opcode::is_idempotent)).

use raspibot_hal::SerialChannel;

use crate::command::Command;
use crate::error::ProtocolError;
use crate::reply::{self, Reply, MAX_REPLY_LEN};
use crate::types::{EchoPayload, EncoderValues, MotorSpeed, PiParameters};

/// Protocol endpoint on a serial channel
///
/// Holds nothing but the channel. Pass `&mut port` to keep ownership of the
/// port; concurrent use from several threads needs an outer lock.
pub struct AttinyProtocol<S> {
    channel: S,
}

impl<S: SerialChannel> AttinyProtocol<S> {
    /// Create a protocol instance on a serial channel
    pub fn new(channel: S) -> Self {
        Self { channel }
    }

    /// Mutably borrow the channel
    pub fn channel_mut(&mut self) -> &mut S {
        &mut self.channel
    }

    /// Give the channel back
    pub fn into_inner(self) -> S {
        self.channel
    }

    /// Write the request, read its reply and decode it
    ///
    /// Nothing is written if the request cannot be encoded.
    fn exchange<T>(
        &mut self,
        command: Command<'_>,
        decode: impl FnOnce(&[u8]) -> Result<T, ProtocolError>,
    ) -> Result<T, ProtocolError> {
        let request = command.encode()?;
        let expected = command.reply_len();

        let mut buf = [0u8; MAX_REPLY_LEN];
        self.channel.write(&request);
        let received = self.channel.read(&mut buf[..expected]).min(expected);

        decode(&buf[..received])
    }

    fn acknowledged(&mut self, command: Command<'_>) -> Result<bool, ProtocolError> {
        self.exchange(command, reply::decode_acknowledgement)
            .map(bool::from)
    }

    /// Run any command and return its decoded reply
    pub fn transact(&mut self, command: Command<'_>) -> Result<Reply, ProtocolError> {
        let sent: &[u8] = match command {
            Command::Echo(payload) => payload,
            _ => &[],
        };
        self.exchange(command, |bytes| Reply::decode(command.reply_kind(), sent, bytes))
    }

    /// Ask whether the controller is alive
    ///
    /// A timeout is reported as "not alive", not as an error.
    pub fn alive(&mut self) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::Alive)
    }

    pub fn get_left_encoder(&mut self) -> Result<u16, ProtocolError> {
        self.exchange(Command::GetEncoderLeft, reply::decode_encoder)
    }

    pub fn get_right_encoder(&mut self) -> Result<u16, ProtocolError> {
        self.exchange(Command::GetEncoderRight, reply::decode_encoder)
    }

    /// Read both encoders in one transaction
    pub fn get_encoders(&mut self) -> Result<EncoderValues, ProtocolError> {
        self.exchange(Command::GetEncodersBoth, reply::decode_encoders)
    }

    pub fn reset_left_encoder(&mut self) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::ResetEncoderLeft)
    }

    pub fn reset_right_encoder(&mut self) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::ResetEncoderRight)
    }

    pub fn reset_encoders(&mut self) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::ResetEncodersBoth)
    }

    /// Set the speed of the left motor
    ///
    /// Speeds outside `[-127, 127]` are set to their respective extreme.
    /// Negative values turn the wheel backwards, zero stops it.
    pub fn set_left_motor(&mut self, speed: i32) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::SetLeftMotor(MotorSpeed::new(speed)))
    }

    /// Set the speed of the right motor, clamped like [`Self::set_left_motor`]
    pub fn set_right_motor(&mut self, speed: i32) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::SetRightMotor(MotorSpeed::new(speed)))
    }

    /// Set both motor speeds in one transaction, each clamped independently
    pub fn set_motors(&mut self, left: i32, right: i32) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::SetBothMotors {
            left: MotorSpeed::new(left),
            right: MotorSpeed::new(right),
        })
    }

    pub fn stop_motors(&mut self) -> Result<bool, ProtocolError> {
        self.acknowledged(Command::StopMotors)
    }

    /// Send speed controller tuning
    ///
    /// `proportional` and `integral` saturate to i16, `speed_limit` to u8.
    pub fn set_pi_parameters(
        &mut self,
        proportional: i32,
        integral: i32,
        speed_limit: i32,
    ) -> Result<bool, ProtocolError> {
        let params = PiParameters::new(proportional, integral, speed_limit);
        self.acknowledged(Command::SetPiParameters(params))
    }

    /// Loopback test
    ///
    /// Payloads longer than [`MAX_ECHO_LEN`](crate::MAX_ECHO_LEN) are
    /// rejected before anything is written.
    pub fn echo(&mut self, payload: &[u8]) -> Result<EchoPayload, ProtocolError> {
        self.exchange(Command::Echo(payload), |bytes| reply::decode_echo(payload, bytes))
    }
}
