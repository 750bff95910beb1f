//! Fixed-width little-endian values (wire types Fixed32 and Fixed64).
//!
//! Floating-point values are stored by reinterpreting their bits as an
//! integer of the same width, never by numeric conversion.

use crate::{Error, Result};

/// Appends `value` as 4 little-endian bytes. Returns 4.
#[inline]
pub fn encode_32(value: u32, buf: &mut Vec<u8>) -> usize {
    buf.extend_from_slice(&value.to_le_bytes());
    4
}

/// Appends `value` as 8 little-endian bytes. Returns 8.
#[inline]
pub fn encode_64(value: u64, buf: &mut Vec<u8>) -> usize {
    buf.extend_from_slice(&value.to_le_bytes());
    8
}

/// Reads 4 little-endian bytes from the start of `buf`.
#[inline]
pub fn decode_32(buf: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = buf
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::PrematureEndOfStream)?;
    Ok(u32::from_le_bytes(bytes))
}

/// Reads 8 little-endian bytes from the start of `buf`.
#[inline]
pub fn decode_64(buf: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = buf
        .get(..8)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::PrematureEndOfStream)?;
    Ok(u64::from_le_bytes(bytes))
}

#[inline]
pub fn encode_f32(value: f32, buf: &mut Vec<u8>) -> usize {
    encode_32(value.to_bits(), buf)
}

#[inline]
pub fn encode_f64(value: f64, buf: &mut Vec<u8>) -> usize {
    encode_64(value.to_bits(), buf)
}

#[inline]
pub fn decode_f32(buf: &[u8]) -> Result<f32> {
    decode_32(buf).map(f32::from_bits)
}

#[inline]
pub fn decode_f64(buf: &[u8]) -> Result<f64> {
    decode_64(buf).map(f64::from_bits)
}
