//! Central error types for the wire codec.
//!
//! Every failure of the primitive transforms, the encoder and the decoder is
//! reported through [`Error`]. A clean end of stream is never an error: the
//! decoder signals it with `Ok(None)`.

use core::fmt;

use crate::wire::WireType;

/// All errors the codec can report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The buffer ended before a varint, fixed value or declared payload was complete.
    PrematureEndOfStream,
    /// A varint is longer than 10 bytes or carries more than 64 bits.
    VarintOverflow,
    /// A tag carries a wire type outside {0, 1, 2, 5}.
    UnknownWireType {
        /// Raw wire type bits of the tag.
        wire_type: u8,
        /// Byte offset of the tag in the decoded buffer.
        offset: usize,
    },
    /// Field number 0 or larger than [`crate::wire::MAX_FIELD_NUMBER`].
    InvalidFieldNumber(u64),
    /// Packed payload length does not match the expected element count.
    PackedLengthMismatch {
        /// Length of the length-delimited payload in bytes.
        payload_len: usize,
        /// Expected number of elements.
        expected: usize,
    },
    /// A packed element does not fit its target type.
    ValueOutOfRange { value: u64, max: u64 },
    /// A typed accessor was used on a payload of another wire type.
    WireTypeMismatch {
        expected: WireType,
        found: WireType,
    },
    /// A length-delimited payload is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrematureEndOfStream => write!(f, "premature end of stream"),
            Self::VarintOverflow => write!(f, "varint overflow (more than 10 bytes or 64 bits)"),
            Self::UnknownWireType { wire_type, offset } => {
                write!(f, "unknown wire type {wire_type} at offset {offset}")
            }
            Self::InvalidFieldNumber(n) => write!(
                f,
                "invalid field number {n} (valid: 1..={})",
                crate::wire::MAX_FIELD_NUMBER
            ),
            Self::PackedLengthMismatch { payload_len, expected } => write!(
                f,
                "packed payload of {payload_len} bytes does not hold {expected} elements"
            ),
            Self::ValueOutOfRange { value, max } => {
                write!(f, "packed value {value} exceeds maximum {max}")
            }
            Self::WireTypeMismatch { expected, found } => {
                write!(f, "wire type mismatch: expected {expected}, found {found}")
            }
            Self::InvalidUtf8 => write!(f, "length-delimited payload is not valid UTF-8"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Erstellt einen `WireTypeMismatch` Fehler.
    pub fn wire_type_mismatch(expected: WireType, found: WireType) -> Self {
        Self::WireTypeMismatch { expected, found }
    }

    /// `true` for errors caused by malformed or truncated input.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::PrematureEndOfStream
                | Self::VarintOverflow
                | Self::UnknownWireType { .. }
                | Self::InvalidFieldNumber(_)
                | Self::PackedLengthMismatch { .. }
                | Self::ValueOutOfRange { .. }
        )
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premature_end_display() {
        let msg = Error::PrematureEndOfStream.to_string();
        assert!(msg.contains("end of stream"), "{msg}");
    }

    #[test]
    fn unknown_wire_type_display() {
        let msg = Error::UnknownWireType { wire_type: 3, offset: 7 }.to_string();
        assert!(msg.contains("wire type 3"), "{msg}");
        assert!(msg.contains("offset 7"), "{msg}");
    }

    #[test]
    fn invalid_field_number_display() {
        let msg = Error::InvalidFieldNumber(0).to_string();
        assert!(msg.contains("field number 0"), "{msg}");
        assert!(msg.contains("536870911"), "{msg}");
    }

    #[test]
    fn packed_mismatch_display() {
        let msg = Error::PackedLengthMismatch { payload_len: 7, expected: 2 }.to_string();
        assert!(msg.contains("7 bytes"), "{msg}");
        assert!(msg.contains("2 elements"), "{msg}");
    }

    #[test]
    fn wire_type_mismatch_display() {
        let e = Error::wire_type_mismatch(WireType::LengthDelimited, WireType::Varint);
        let msg = e.to_string();
        assert!(msg.contains("length-delimited"), "{msg}");
        assert!(msg.contains("varint"), "{msg}");
    }

    #[test]
    fn malformed_classification() {
        assert!(Error::PrematureEndOfStream.is_malformed());
        assert!(Error::VarintOverflow.is_malformed());
        assert!(!Error::InvalidUtf8.is_malformed());
        assert!(!Error::wire_type_mismatch(WireType::Varint, WireType::Fixed32).is_malformed());
    }
}
