//! Base-128 variable-length unsigned integers.
//!
//! Each byte has a continuation bit (MSB) and 7 data bits. The least
//! significant group is written first. The last byte has continuation = 0.
//! A `u64` needs at most 10 bytes.

use crate::{Error, Result};

/// Maximum encoded size of a `u64`.
pub const MAX_LEN: usize = 10;

/// Appends the varint encoding of `value` to `buf`. Returns the number of bytes written.
#[inline]
pub fn encode(value: u64, buf: &mut Vec<u8>) -> usize {
    if value < 128 {
        // Fast-Path: Single-Byte (häufigster Fall: Tags, kleine Längen)
        buf.push(value as u8);
        return 1;
    }
    let mut v = value;
    let mut written = 0;
    loop {
        let low7 = (v & 0x7F) as u8;
        v >>= 7;
        written += 1;
        if v == 0 {
            buf.push(low7);
            return written;
        }
        buf.push(0x80 | low7);
    }
}

/// Number of bytes [`encode`] writes for `value`.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    // ceil(bits / 7), mit value|1 damit 0 ein Bit zählt
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decodes a varint from the start of `buf`.
///
/// Returns the value and the number of bytes consumed. Fails with
/// [`Error::PrematureEndOfStream`] if `buf` ends before the terminating byte
/// and with [`Error::VarintOverflow`] if the encoding exceeds 10 bytes or 64 bits.
#[inline]
pub fn decode(buf: &[u8]) -> Result<(u64, usize)> {
    let Some(&byte) = buf.first() else {
        return Err(Error::PrematureEndOfStream);
    };
    if byte & 0x80 == 0 {
        return Ok((u64::from(byte), 1));
    }
    // Multi-Byte: erstes Byte bereits gelesen
    let mut result = u64::from(byte & 0x7F);
    let mut shift: u32 = 7;
    let mut pos = 1;
    loop {
        let Some(&byte) = buf.get(pos) else {
            return Err(Error::PrematureEndOfStream);
        };
        pos += 1;
        let data = u64::from(byte & 0x7F);
        // Beim 10. Byte (shift 63) ist nur Daten-Bit 0 gültig und kein Continuation-Bit.
        if shift == 63 && (data > 1 || byte & 0x80 != 0) {
            return Err(Error::VarintOverflow);
        }
        result |= data << shift;
        if byte & 0x80 == 0 {
            return Ok((result, pos));
        }
        shift += 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: u64) -> u64 {
        let mut buf = Vec::new();
        let written = encode(value, &mut buf);
        assert_eq!(written, buf.len());
        assert_eq!(written, encoded_len(value));
        let (decoded, consumed) = decode(&buf).unwrap();
        assert_eq!(consumed, written);
        decoded
    }

    fn encoded(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode(value, &mut buf);
        buf
    }

    #[test]
    fn encode_decode_0() {
        assert_eq!(round_trip(0), 0);
        assert_eq!(encoded(0), vec![0x00]);
    }

    // max single-byte value (7 data bits)
    #[test]
    fn encode_decode_127() {
        assert_eq!(round_trip(127), 127);
        assert_eq!(encoded(127), vec![0x7F]);
    }

    // min two-byte value
    #[test]
    fn encode_decode_128() {
        assert_eq!(round_trip(128), 128);
        // 128 = 0b1_0000000 → low7=0x00 with cont=1, then 0x01 with cont=0
        assert_eq!(encoded(128), vec![0x80, 0x01]);
    }

    /// 300 = 0b10_0101100 → 0xAC 0x02
    #[test]
    fn encode_decode_300() {
        assert_eq!(round_trip(300), 300);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn encode_decode_16383() {
        assert_eq!(encoded(16383), vec![0xFF, 0x7F]);
        assert_eq!(encoded(16384), vec![0x80, 0x80, 0x01]);
    }

    /// Boundaries of the 1, 2, 5 and 10 byte forms.
    #[test]
    fn encoded_len_boundaries() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(127), 1);
        assert_eq!(encoded_len(128), 2);
        assert_eq!(encoded_len(16383), 2);
        assert_eq!(encoded_len(u64::from(u32::MAX)), 5);
        assert_eq!(encoded_len((1 << 35) - 1), 5);
        assert_eq!(encoded_len(1 << 63), 10);
        assert_eq!(encoded_len(u64::MAX), 10);
    }

    #[test]
    fn u64_max_is_ten_bytes() {
        let buf = encoded(u64::MAX);
        assert_eq!(buf.len(), MAX_LEN);
        assert_eq!(buf[9], 0x01);
        assert_eq!(round_trip(u64::MAX), u64::MAX);
    }

    #[test]
    fn round_trip_diverse_values() {
        for &val in &[
            0,
            1,
            2,
            63,
            64,
            127,
            128,
            255,
            256,
            16383,
            16384,
            1_000_000,
            u64::from(u32::MAX),
            i64::MAX as u64,
            u64::MAX,
        ] {
            assert_eq!(round_trip(val), val, "round-trip failed for {val}");
        }
    }

    /// Trailing bytes after the terminating byte are not consumed.
    #[test]
    fn decode_stops_at_terminator() {
        assert_eq!(decode(&[0xAC, 0x02, 0xFF, 0xFF]).unwrap(), (300, 2));
    }

    #[test]
    fn decode_premature_end_of_stream() {
        assert_eq!(decode(&[]).unwrap_err(), Error::PrematureEndOfStream);
        // Continuation bit set but no more bytes
        assert_eq!(decode(&[0x80]).unwrap_err(), Error::PrematureEndOfStream);
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF]).unwrap_err(), Error::PrematureEndOfStream);
    }

    #[test]
    fn decode_overflow_too_many_bytes() {
        // 10 continuation bytes then a final byte
        let mut data = vec![0x80; 10];
        data.push(0x01);
        assert_eq!(decode(&data).unwrap_err(), Error::VarintOverflow);
    }

    // at shift==63 only data 0 or 1 is valid, and no continuation
    #[test]
    fn decode_overflow_shift63_data_too_large() {
        let mut data = vec![0x80; 9];
        data.push(0x02);
        assert_eq!(decode(&data).unwrap_err(), Error::VarintOverflow);
    }

    #[test]
    fn decode_non_minimal_encoding_accepted() {
        // 0 padded to three bytes is still a valid varint on the wire
        assert_eq!(decode(&[0x80, 0x80, 0x00]).unwrap(), (0, 3));
    }
}
