//! Protocol error taxonomy

use core::fmt;

use heapless::Vec;

use crate::reply::MAX_REPLY_LEN;

/// Offending bytes carried by [`ProtocolError::InvalidResponse`]
pub type ReplyBytes = Vec<u8, MAX_REPLY_LEN>;

/// Errors raised by a protocol transaction
///
/// A read timeout on an ACK/NAK command is not an error; it decodes as NAK.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// The bytes read back cannot answer the request just sent
    InvalidResponse(ReplyBytes),
    /// A payload or reply has the wrong number of bytes
    ///
    /// Raised before writing for an oversized echo payload, after the read
    /// for a short data reply.
    InvalidLength {
        /// Bytes required (or the maximum allowed)
        expected: usize,
        /// Bytes supplied or received
        actual: usize,
    },
}

impl ProtocolError {
    /// Build an [`ProtocolError::InvalidResponse`], keeping as many bytes as fit
    pub fn invalid_response(bytes: &[u8]) -> Self {
        ProtocolError::InvalidResponse(bytes.iter().copied().take(MAX_REPLY_LEN).collect())
    }

    pub fn invalid_length(expected: usize, actual: usize) -> Self {
        ProtocolError::InvalidLength { expected, actual }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::InvalidResponse(bytes) => {
                write!(f, "invalid response {:02x?}", bytes.as_slice())
            }
            ProtocolError::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_response_truncates() {
        let err = ProtocolError::invalid_response(&[1, 2, 3, 4, 5, 6]);
        match err {
            ProtocolError::InvalidResponse(bytes) => assert_eq!(bytes.as_slice(), &[1, 2, 3, 4]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let err = ProtocolError::invalid_response(&[0x42]);
        assert_eq!(err.to_string(), "invalid response [42]");

        let err = ProtocolError::invalid_length(2, 1);
        assert_eq!(err.to_string(), "invalid length: expected 2 bytes, got 1");
    }
}
