//! Reply decoding
//!
//! Each decoder takes exactly the bytes the channel returned, which may be
//! fewer than requested after a timeout.

use crate::error::ProtocolError;
use crate::opcode::{ReplyKind, ACK, NAK};
use crate::types::{Acknowledgement, EchoPayload, EncoderValues, MAX_ECHO_LEN};

/// Longest reply on the wire (both encoders)
pub const MAX_REPLY_LEN: usize = 4;

/// A decoded reply
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Acknowledgement(Acknowledgement),
    Encoder(u16),
    Encoders(EncoderValues),
    Echo(EchoPayload),
}

impl Reply {
    /// Decode `bytes` as the reply of the given kind
    ///
    /// `sent` is the request payload, used to validate echoes.
    pub fn decode(kind: ReplyKind, sent: &[u8], bytes: &[u8]) -> Result<Self, ProtocolError> {
        match kind {
            ReplyKind::Acknowledgement => decode_acknowledgement(bytes).map(Reply::Acknowledgement),
            ReplyKind::Encoder => decode_encoder(bytes).map(Reply::Encoder),
            ReplyKind::Encoders => decode_encoders(bytes).map(Reply::Encoders),
            ReplyKind::Echo => decode_echo(sent, bytes).map(Reply::Echo),
        }
    }
}

/// ACK/NAK reply; an empty read is a NAK
pub fn decode_acknowledgement(bytes: &[u8]) -> Result<Acknowledgement, ProtocolError> {
    match bytes {
        [ACK] => Ok(Acknowledgement::Ack),
        [NAK] | [] => Ok(Acknowledgement::Nak),
        other => Err(ProtocolError::invalid_response(other)),
    }
}

pub fn decode_encoder(bytes: &[u8]) -> Result<u16, ProtocolError> {
    match *bytes {
        [hi, lo] => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(ProtocolError::invalid_length(2, bytes.len())),
    }
}

/// Left value first, then right
pub fn decode_encoders(bytes: &[u8]) -> Result<EncoderValues, ProtocolError> {
    if bytes.len() != 4 {
        return Err(ProtocolError::invalid_length(4, bytes.len()));
    }
    Ok(EncoderValues {
        left: decode_encoder(&bytes[..2])?,
        right: decode_encoder(&bytes[2..])?,
    })
}

/// The reply must repeat `sent` byte for byte
pub fn decode_echo(sent: &[u8], bytes: &[u8]) -> Result<EchoPayload, ProtocolError> {
    if bytes.len() != sent.len() {
        return Err(ProtocolError::invalid_length(sent.len(), bytes.len()));
    }
    if bytes != sent {
        return Err(ProtocolError::invalid_response(bytes));
    }
    EchoPayload::from_slice(bytes)
        .map_err(|_| ProtocolError::invalid_length(MAX_ECHO_LEN, bytes.len()))
}
