//! Opcode table of the ATtiny firmware

/// Positive acknowledgement
pub const ACK: u8 = 0x10;
/// Negative acknowledgement
pub const NAK: u8 = 0x14;

// Wire format values
const OP_ALIVE: u8 = 0x01;
const OP_GET_ENCODER_RIGHT: u8 = 0x02;
const OP_GET_ENCODER_LEFT: u8 = 0x03;
const OP_GET_ENCODERS_BOTH: u8 = 0x04;
const OP_RESET_ENCODER_RIGHT: u8 = 0x05;
const OP_RESET_ENCODER_LEFT: u8 = 0x06;
const OP_RESET_ENCODERS_BOTH: u8 = 0x07;
const OP_ECHO: u8 = 0x0C;
const OP_STOP_MOTORS: u8 = 0x21;
const OP_SET_RIGHT_MOTOR: u8 = 0x25;
const OP_SET_LEFT_MOTOR: u8 = 0x29;
const OP_SET_BOTH_MOTORS: u8 = 0x2D;
const OP_SET_PI_PARAMETERS: u8 = 0x2F;

/// Request kinds understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    Alive,
    GetEncoderRight,
    GetEncoderLeft,
    GetEncodersBoth,
    ResetEncoderRight,
    ResetEncoderLeft,
    ResetEncodersBoth,
    Echo,
    StopMotors,
    SetRightMotor,
    SetLeftMotor,
    SetBothMotors,
    SetPiParameters,
}

/// Shape of the reply a request expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyKind {
    /// One ACK or NAK byte
    Acknowledgement,
    /// One big-endian u16
    Encoder,
    /// Two big-endian u16, left then right
    Encoders,
    /// The request payload, repeated
    Echo,
}

impl ReplyKind {
    /// Reply size in bytes, `None` if it depends on the request
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            ReplyKind::Acknowledgement => Some(1),
            ReplyKind::Encoder => Some(2),
            ReplyKind::Encoders => Some(4),
            ReplyKind::Echo => None,
        }
    }
}

impl Opcode {
    /// All opcodes, in wire order
    pub const ALL: [Opcode; 13] = [
        Opcode::Alive,
        Opcode::GetEncoderRight,
        Opcode::GetEncoderLeft,
        Opcode::GetEncodersBoth,
        Opcode::ResetEncoderRight,
        Opcode::ResetEncoderLeft,
        Opcode::ResetEncodersBoth,
        Opcode::Echo,
        Opcode::StopMotors,
        Opcode::SetRightMotor,
        Opcode::SetLeftMotor,
        Opcode::SetBothMotors,
        Opcode::SetPiParameters,
    ];

    /// Parse an opcode from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_ALIVE => Some(Opcode::Alive),
            OP_GET_ENCODER_RIGHT => Some(Opcode::GetEncoderRight),
            OP_GET_ENCODER_LEFT => Some(Opcode::GetEncoderLeft),
            OP_GET_ENCODERS_BOTH => Some(Opcode::GetEncodersBoth),
            OP_RESET_ENCODER_RIGHT => Some(Opcode::ResetEncoderRight),
            OP_RESET_ENCODER_LEFT => Some(Opcode::ResetEncoderLeft),
            OP_RESET_ENCODERS_BOTH => Some(Opcode::ResetEncodersBoth),
            OP_ECHO => Some(Opcode::Echo),
            OP_STOP_MOTORS => Some(Opcode::StopMotors),
            OP_SET_RIGHT_MOTOR => Some(Opcode::SetRightMotor),
            OP_SET_LEFT_MOTOR => Some(Opcode::SetLeftMotor),
            OP_SET_BOTH_MOTORS => Some(Opcode::SetBothMotors),
            OP_SET_PI_PARAMETERS => Some(Opcode::SetPiParameters),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Alive => OP_ALIVE,
            Opcode::GetEncoderRight => OP_GET_ENCODER_RIGHT,
            Opcode::GetEncoderLeft => OP_GET_ENCODER_LEFT,
            Opcode::GetEncodersBoth => OP_GET_ENCODERS_BOTH,
            Opcode::ResetEncoderRight => OP_RESET_ENCODER_RIGHT,
            Opcode::ResetEncoderLeft => OP_RESET_ENCODER_LEFT,
            Opcode::ResetEncodersBoth => OP_RESET_ENCODERS_BOTH,
            Opcode::Echo => OP_ECHO,
            Opcode::StopMotors => OP_STOP_MOTORS,
            Opcode::SetRightMotor => OP_SET_RIGHT_MOTOR,
            Opcode::SetLeftMotor => OP_SET_LEFT_MOTOR,
            Opcode::SetBothMotors => OP_SET_BOTH_MOTORS,
            Opcode::SetPiParameters => OP_SET_PI_PARAMETERS,
        }
    }

    /// Parameter bytes following the opcode, `None` for the variable-length echo
    pub fn payload_len(self) -> Option<usize> {
        match self {
            Opcode::Echo => None,
            Opcode::SetRightMotor | Opcode::SetLeftMotor => Some(1),
            Opcode::SetBothMotors => Some(2),
            Opcode::SetPiParameters => Some(5),
            _ => Some(0),
        }
    }

    /// What the controller sends back
    pub fn reply_kind(self) -> ReplyKind {
        match self {
            Opcode::GetEncoderRight | Opcode::GetEncoderLeft => ReplyKind::Encoder,
            Opcode::GetEncodersBoth => ReplyKind::Encoders,
            Opcode::Echo => ReplyKind::Echo,
            _ => ReplyKind::Acknowledgement,
        }
    }

    /// Returns true if resending the command after a lost reply is harmless
    ///
    /// Motor commands are idempotent and safe to resend, encoder resets are
    /// not: a reset whose ACK timed out may already have happened.
    pub fn is_idempotent(self) -> bool {
        !matches!(
            self,
            Opcode::ResetEncoderRight | Opcode::ResetEncoderLeft | Opcode::ResetEncodersBoth
        )
    }
}
