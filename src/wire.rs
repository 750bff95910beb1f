//! Wire types and field tags.
//!
//! A tag is the varint of `(field_number << 3) | wire_type`. Only the four
//! wire types of the supported subset are recognised; group markers (3, 4)
//! and the unassigned values (6, 7) are rejected as unknown.

use core::fmt;

use crate::{Error, Result, varint};

/// Largest field number that fits a 32-bit tag.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Physical encoding of a field value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// 8 bytes, little-endian.
    Fixed64 = 1,
    /// Varint length followed by raw bytes.
    LengthDelimited = 2,
    /// 4 bytes, little-endian.
    Fixed32 = 5,
}

impl WireType {
    #[inline(always)]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Varint => "varint",
            Self::Fixed64 => "fixed64",
            Self::LengthDelimited => "length-delimited",
            Self::Fixed32 => "fixed32",
        };
        f.write_str(name)
    }
}

/// Checks that `field_number` is in `1..=MAX_FIELD_NUMBER`.
#[inline]
pub fn check_field_number(field_number: u32) -> Result<()> {
    if field_number == 0 || field_number > MAX_FIELD_NUMBER {
        return Err(Error::InvalidFieldNumber(u64::from(field_number)));
    }
    Ok(())
}

/// Encodes a tag and appends it to `buf`. Returns the number of bytes written.
///
/// The field number must already be validated with [`check_field_number`].
#[inline]
pub fn encode_tag(field_number: u32, wire_type: WireType, buf: &mut Vec<u8>) -> usize {
    debug_assert!(check_field_number(field_number).is_ok());
    varint::encode((u64::from(field_number) << 3) | u64::from(wire_type.as_u8()), buf)
}

/// Number of bytes the tag for `field_number` occupies.
#[inline]
pub fn tag_len(field_number: u32) -> usize {
    varint::encoded_len(u64::from(field_number) << 3)
}

/// Decodes the tag at the start of `buf`.
///
/// `offset` is only used for error reporting. Returns the field number, the
/// wire type and the number of bytes consumed.
pub fn decode_tag(buf: &[u8], offset: usize) -> Result<(u32, WireType, usize)> {
    let (raw, consumed) = varint::decode(buf)?;
    let field = raw >> 3;
    if field == 0 || field > u64::from(MAX_FIELD_NUMBER) {
        return Err(Error::InvalidFieldNumber(field));
    }
    let wire_bits = (raw & 0x07) as u8;
    let wire_type = WireType::from_u8(wire_bits).ok_or(Error::UnknownWireType {
        wire_type: wire_bits,
        offset,
    })?;
    Ok((field as u32, wire_type, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_from_u8() {
        assert_eq!(WireType::from_u8(0), Some(WireType::Varint));
        assert_eq!(WireType::from_u8(1), Some(WireType::Fixed64));
        assert_eq!(WireType::from_u8(2), Some(WireType::LengthDelimited));
        assert_eq!(WireType::from_u8(5), Some(WireType::Fixed32));
        for v in [3, 4, 6, 7] {
            assert_eq!(WireType::from_u8(v), None, "wire type {v}");
        }
    }

    /// Field 1, varint: the classic 0x08 tag byte.
    #[test]
    fn tag_field_1_varint() {
        let mut buf = Vec::new();
        assert_eq!(encode_tag(1, WireType::Varint, &mut buf), 1);
        assert_eq!(buf, vec![0x08]);
        assert_eq!(decode_tag(&buf, 0).unwrap(), (1, WireType::Varint, 1));
    }

    /// Field 2, length-delimited: 0x12.
    #[test]
    fn tag_field_2_length_delimited() {
        let mut buf = Vec::new();
        encode_tag(2, WireType::LengthDelimited, &mut buf);
        assert_eq!(buf, vec![0x12]);
    }

    /// Field 16 no longer fits a single tag byte.
    #[test]
    fn tag_two_bytes() {
        let mut buf = Vec::new();
        assert_eq!(encode_tag(16, WireType::Fixed32, &mut buf), 2);
        assert_eq!(tag_len(16), 2);
        assert_eq!(tag_len(15), 1);
        assert_eq!(decode_tag(&buf, 0).unwrap(), (16, WireType::Fixed32, 2));
    }

    #[test]
    fn tag_max_field_number() {
        let mut buf = Vec::new();
        encode_tag(MAX_FIELD_NUMBER, WireType::Fixed64, &mut buf);
        assert_eq!(buf.len(), 5);
        assert_eq!(
            decode_tag(&buf, 0).unwrap(),
            (MAX_FIELD_NUMBER, WireType::Fixed64, 5)
        );
    }

    #[test]
    fn check_field_number_bounds() {
        assert_eq!(check_field_number(0), Err(Error::InvalidFieldNumber(0)));
        assert!(check_field_number(1).is_ok());
        assert!(check_field_number(MAX_FIELD_NUMBER).is_ok());
        assert_eq!(
            check_field_number(MAX_FIELD_NUMBER + 1),
            Err(Error::InvalidFieldNumber(u64::from(MAX_FIELD_NUMBER) + 1))
        );
    }

    #[test]
    fn decode_tag_unknown_wire_type() {
        // field 1, wire type 3 (start group)
        assert_eq!(
            decode_tag(&[0x0B], 4).unwrap_err(),
            Error::UnknownWireType { wire_type: 3, offset: 4 }
        );
    }

    #[test]
    fn decode_tag_field_zero() {
        assert_eq!(decode_tag(&[0x00], 0).unwrap_err(), Error::InvalidFieldNumber(0));
    }

    #[test]
    fn decode_tag_truncated() {
        assert_eq!(decode_tag(&[], 0).unwrap_err(), Error::PrematureEndOfStream);
        assert_eq!(decode_tag(&[0x80], 0).unwrap_err(), Error::PrematureEndOfStream);
    }
}
