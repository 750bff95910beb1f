//! ZigZag mapping between signed and unsigned integers.
//!
//! Interleaves non-negative and negative values (0, -1, 1, -2, 2, ...) so that
//! small magnitudes stay small varints. The wire does not record whether a
//! varint field was zigzag-mapped; the caller has to know.

/// Maps a signed 64-bit value to its zigzag form: `(n << 1) ^ (n >> 63)`.
#[inline(always)]
pub fn encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`encode`]: `(z >> 1) ^ -(z & 1)`.
#[inline(always)]
pub fn decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// 32-bit variant of [`encode`].
#[inline(always)]
pub fn encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// 32-bit variant of [`decode`].
#[inline(always)]
pub fn decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}
