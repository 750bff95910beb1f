//! Decoded record model.
//!
//! A [`KeyValPair`] is one tag + value record as produced by the decoder. The
//! payload is a [`FieldValue`] sum type; its variant selects the wire type.
//! Length-delimited payloads borrow the decoder's buffer.

use core::fmt;

use crate::packed::{self, PackedScalar};
use crate::wire::WireType;
use crate::{Error, Result, zigzag};

/// Payload of a decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Wire type 0. Holds the raw varint; signed and zigzag views are derived.
    Varint(u64),
    /// Wire type 1. Raw 8 bytes as a little-endian integer.
    Fixed64(u64),
    /// Wire type 2. Slice into the decoder's buffer, not a copy.
    LengthDelimited(&'a [u8]),
    /// Wire type 5. Raw 4 bytes as a little-endian integer.
    Fixed32(u32),
}

impl FieldValue<'_> {
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Varint(_) => WireType::Varint,
            Self::Fixed64(_) => WireType::Fixed64,
            Self::LengthDelimited(_) => WireType::LengthDelimited,
            Self::Fixed32(_) => WireType::Fixed32,
        }
    }
}

/// One decoded record: field number, repeat index and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValPair<'a> {
    /// Field number from the tag.
    pub field_number: u32,
    /// 0-based occurrence of this field number in the stream.
    pub repeat_index: u32,
    pub value: FieldValue<'a>,
}

impl<'a> KeyValPair<'a> {
    pub fn new(field_number: u32, repeat_index: u32, value: FieldValue<'a>) -> Self {
        Self { field_number, repeat_index, value }
    }

    pub fn wire_type(&self) -> WireType {
        self.value.wire_type()
    }

    fn mismatch(&self, expected: WireType) -> Error {
        Error::wire_type_mismatch(expected, self.wire_type())
    }

    /// Unsigned view of a varint or fixed64 payload, widened view of a fixed32.
    pub fn as_u64(&self) -> Result<u64> {
        match self.value {
            FieldValue::Varint(v) | FieldValue::Fixed64(v) => Ok(v),
            FieldValue::Fixed32(v) => Ok(u64::from(v)),
            FieldValue::LengthDelimited(_) => Err(self.mismatch(WireType::Varint)),
        }
    }

    /// Two's complement view (protobuf `int64` / `sfixed64`).
    pub fn as_i64(&self) -> Result<i64> {
        match self.value {
            FieldValue::Varint(v) | FieldValue::Fixed64(v) => Ok(v as i64),
            FieldValue::Fixed32(v) => Ok(i64::from(v as i32)),
            FieldValue::LengthDelimited(_) => Err(self.mismatch(WireType::Varint)),
        }
    }

    /// ZigZag-decoded view of a varint (protobuf `sint64`).
    ///
    /// The wire cannot tell whether the writer used zigzag mapping; calling
    /// this is the caller's assertion that it did.
    pub fn as_zigzag(&self) -> Result<i64> {
        match self.value {
            FieldValue::Varint(v) => Ok(zigzag::decode(v)),
            _ => Err(self.mismatch(WireType::Varint)),
        }
    }

    /// Unsigned 32-bit view of a fixed32 payload, truncated view of a varint.
    pub fn as_u32(&self) -> Result<u32> {
        match self.value {
            FieldValue::Fixed32(v) => Ok(v),
            FieldValue::Varint(v) => Ok(v as u32),
            _ => Err(self.mismatch(WireType::Fixed32)),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        self.as_u32().map(|v| v as i32)
    }

    pub fn as_f32(&self) -> Result<f32> {
        match self.value {
            FieldValue::Fixed32(v) => Ok(f32::from_bits(v)),
            _ => Err(self.mismatch(WireType::Fixed32)),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.value {
            FieldValue::Fixed64(v) => Ok(f64::from_bits(v)),
            _ => Err(self.mismatch(WireType::Fixed64)),
        }
    }

    /// Raw bytes of a length-delimited payload.
    pub fn as_bytes(&self) -> Result<&'a [u8]> {
        match self.value {
            FieldValue::LengthDelimited(bytes) => Ok(bytes),
            _ => Err(self.mismatch(WireType::LengthDelimited)),
        }
    }

    /// Length-delimited payload as UTF-8 text.
    pub fn as_str(&self) -> Result<&'a str> {
        let bytes = self.as_bytes()?;
        core::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes a packed payload holding exactly `count` elements.
    pub fn packed<T: PackedScalar>(&self, count: usize) -> Result<Vec<T>> {
        packed::decode(self.as_bytes()?, count)
    }

    /// Decodes every element of a packed payload.
    pub fn packed_all<T: PackedScalar>(&self) -> Result<Vec<T>> {
        packed::decode_all(self.as_bytes()?)
    }
}

impl fmt::Display for KeyValPair<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}[{}] ", self.field_number, self.repeat_index)?;
        match self.value {
            FieldValue::Varint(v) => {
                write!(f, "varint u={v} s={} zz={}", v as i64, zigzag::decode(v))
            }
            FieldValue::Fixed64(v) => {
                write!(f, "fixed64 u={v} s={} d={}", v as i64, f64::from_bits(v))
            }
            FieldValue::Fixed32(v) => {
                write!(f, "fixed32 u={v} s={} f={}", v as i32, f32::from_bits(v))
            }
            FieldValue::LengthDelimited(bytes) => {
                write!(f, "bytes({}) \"{}\"", bytes.len(), bytes.escape_ascii())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_follows_variant() {
        assert_eq!(FieldValue::Varint(1).wire_type(), WireType::Varint);
        assert_eq!(FieldValue::Fixed64(1).wire_type(), WireType::Fixed64);
        assert_eq!(FieldValue::LengthDelimited(b"").wire_type(), WireType::LengthDelimited);
        assert_eq!(FieldValue::Fixed32(1).wire_type(), WireType::Fixed32);
    }

    #[test]
    fn varint_views() {
        let pair = KeyValPair::new(1, 0, FieldValue::Varint(3));
        assert_eq!(pair.as_u64().unwrap(), 3);
        assert_eq!(pair.as_i64().unwrap(), 3);
        assert_eq!(pair.as_zigzag().unwrap(), -2);
        assert_eq!(pair.as_u32().unwrap(), 3);

        let negative = KeyValPair::new(1, 0, FieldValue::Varint(-5i64 as u64));
        assert_eq!(negative.as_i64().unwrap(), -5);
        assert_eq!(negative.as_i32().unwrap(), -5);
    }

    #[test]
    fn fixed_views() {
        let d = KeyValPair::new(2, 0, FieldValue::Fixed64(2.5f64.to_bits()));
        assert_eq!(d.as_f64().unwrap(), 2.5);
        assert_eq!(d.as_u64().unwrap(), 2.5f64.to_bits());

        let f = KeyValPair::new(3, 0, FieldValue::Fixed32((-1.5f32).to_bits()));
        assert_eq!(f.as_f32().unwrap(), -1.5);

        let s = KeyValPair::new(3, 0, FieldValue::Fixed32(-7i32 as u32));
        assert_eq!(s.as_i32().unwrap(), -7);
        assert_eq!(s.as_i64().unwrap(), -7);
    }

    #[test]
    fn bytes_views() {
        let pair = KeyValPair::new(4, 1, FieldValue::LengthDelimited(b"abc"));
        assert_eq!(pair.as_bytes().unwrap(), b"abc");
        assert_eq!(pair.as_str().unwrap(), "abc");

        let invalid = KeyValPair::new(4, 0, FieldValue::LengthDelimited(&[0xFF, 0xFE]));
        assert_eq!(invalid.as_str().unwrap_err(), Error::InvalidUtf8);
    }

    #[test]
    fn accessor_on_wrong_wire_type() {
        let pair = KeyValPair::new(1, 0, FieldValue::Varint(1));
        assert_eq!(
            pair.as_bytes().unwrap_err(),
            Error::wire_type_mismatch(WireType::LengthDelimited, WireType::Varint)
        );
        assert_eq!(
            pair.as_f64().unwrap_err(),
            Error::wire_type_mismatch(WireType::Fixed64, WireType::Varint)
        );

        let bytes = KeyValPair::new(1, 0, FieldValue::LengthDelimited(b"x"));
        assert!(bytes.as_zigzag().is_err());
        assert!(bytes.as_u64().is_err());
    }

    #[test]
    fn packed_view() {
        let payload = [0x03, 0x8E, 0x02, 0x9E, 0xA7, 0x05];
        let pair = KeyValPair::new(4, 0, FieldValue::LengthDelimited(&payload));
        assert_eq!(pair.packed::<u32>(3).unwrap(), vec![3, 270, 86942]);
        assert_eq!(pair.packed_all::<u64>().unwrap(), vec![3, 270, 86942]);
        assert!(pair.packed::<u32>(2).is_err());
    }

    #[test]
    fn display_formats() {
        let v = KeyValPair::new(1, 0, FieldValue::Varint(300));
        assert_eq!(v.to_string(), "#1[0] varint u=300 s=300 zz=150");

        let b = KeyValPair::new(2, 3, FieldValue::LengthDelimited(b"a\"b\n"));
        assert_eq!(b.to_string(), "#2[3] bytes(4) \"a\\\"b\\n\"");

        let f = KeyValPair::new(5, 0, FieldValue::Fixed32(1.0f32.to_bits()));
        assert_eq!(f.to_string(), "#5[0] fixed32 u=1065353216 s=1065353216 f=1");
    }
}
