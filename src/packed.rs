//! Packed scalar arrays.
//!
//! A packed field is a single length-delimited record whose payload is the
//! back-to-back encoding of every element, without per-element tags. Integer
//! elements are varints, `f32`/`f64` elements are fixed-width little-endian.
//!
//! The functions here only deal with the payload; the tag and the length
//! prefix are written by [`crate::encoder::Encoder::add_packed`].

use crate::wire::WireType;
use crate::{Error, Result, fixed, varint};

/// Element type that can be stored in a packed array.
pub trait PackedScalar: Copy + Sized {
    /// Wire type of one element (Varint, Fixed32 or Fixed64).
    const WIRE_TYPE: WireType;
    /// Encoded size of one element for fixed-width types, `None` for varints.
    const FIXED_SIZE: Option<usize>;

    /// Appends the element encoding to `buf`. Returns the number of bytes written.
    fn encode_element(self, buf: &mut Vec<u8>) -> usize;

    /// Bytes [`encode_element`](Self::encode_element) writes.
    fn element_len(self) -> usize;

    /// Decodes one element from the start of `buf`.
    fn decode_element(buf: &[u8]) -> Result<(Self, usize)>;
}

impl PackedScalar for u16 {
    const WIRE_TYPE: WireType = WireType::Varint;
    const FIXED_SIZE: Option<usize> = None;

    fn encode_element(self, buf: &mut Vec<u8>) -> usize {
        varint::encode(u64::from(self), buf)
    }

    fn element_len(self) -> usize {
        varint::encoded_len(u64::from(self))
    }

    fn decode_element(buf: &[u8]) -> Result<(Self, usize)> {
        let (value, n) = varint::decode(buf)?;
        let v = u16::try_from(value).map_err(|_| Error::ValueOutOfRange {
            value,
            max: u64::from(u16::MAX),
        })?;
        Ok((v, n))
    }
}

impl PackedScalar for u32 {
    const WIRE_TYPE: WireType = WireType::Varint;
    const FIXED_SIZE: Option<usize> = None;

    fn encode_element(self, buf: &mut Vec<u8>) -> usize {
        varint::encode(u64::from(self), buf)
    }

    fn element_len(self) -> usize {
        varint::encoded_len(u64::from(self))
    }

    fn decode_element(buf: &[u8]) -> Result<(Self, usize)> {
        let (value, n) = varint::decode(buf)?;
        let v = u32::try_from(value).map_err(|_| Error::ValueOutOfRange {
            value,
            max: u64::from(u32::MAX),
        })?;
        Ok((v, n))
    }
}

impl PackedScalar for u64 {
    const WIRE_TYPE: WireType = WireType::Varint;
    const FIXED_SIZE: Option<usize> = None;

    fn encode_element(self, buf: &mut Vec<u8>) -> usize {
        varint::encode(self, buf)
    }

    fn element_len(self) -> usize {
        varint::encoded_len(self)
    }

    fn decode_element(buf: &[u8]) -> Result<(Self, usize)> {
        varint::decode(buf)
    }
}

impl PackedScalar for f32 {
    const WIRE_TYPE: WireType = WireType::Fixed32;
    const FIXED_SIZE: Option<usize> = Some(4);

    fn encode_element(self, buf: &mut Vec<u8>) -> usize {
        fixed::encode_f32(self, buf)
    }

    fn element_len(self) -> usize {
        4
    }

    fn decode_element(buf: &[u8]) -> Result<(Self, usize)> {
        Ok((fixed::decode_f32(buf)?, 4))
    }
}

impl PackedScalar for f64 {
    const WIRE_TYPE: WireType = WireType::Fixed64;
    const FIXED_SIZE: Option<usize> = Some(8);

    fn encode_element(self, buf: &mut Vec<u8>) -> usize {
        fixed::encode_f64(self, buf)
    }

    fn element_len(self) -> usize {
        8
    }

    fn decode_element(buf: &[u8]) -> Result<(Self, usize)> {
        Ok((fixed::decode_f64(buf)?, 8))
    }
}

/// Appends the packed payload for `items` to `buf`. Returns the payload length.
pub fn encode<T: PackedScalar>(items: &[T], buf: &mut Vec<u8>) -> usize {
    items.iter().map(|&item| item.encode_element(buf)).sum()
}

/// Payload length [`encode`] produces for `items`.
pub fn encoded_len<T: PackedScalar>(items: &[T]) -> usize {
    match T::FIXED_SIZE {
        Some(size) => size * items.len(),
        None => items.iter().map(|&item| item.element_len()).sum(),
    }
}

/// Prüft die Payload-Länge gegen die erwartete Elementanzahl, soweit ohne Decoding möglich.
fn check_length<T: PackedScalar>(payload: &[u8], count: usize) -> Result<()> {
    let consistent = match T::FIXED_SIZE {
        Some(size) => count.checked_mul(size) == Some(payload.len()),
        // jedes Varint-Element belegt mindestens ein Byte
        None => count <= payload.len() && (count > 0 || payload.is_empty()),
    };
    if consistent {
        Ok(())
    } else {
        Err(Error::PackedLengthMismatch { payload_len: payload.len(), expected: count })
    }
}

/// Gemeinsame Element-Schleife für `decode` und `decode_into`.
///
/// Reicht jedes Element an `sink` weiter. Ist die Payload erschöpft, bevor
/// `count` Elemente gelesen sind, oder bleiben Bytes übrig, ist das ein
/// `PackedLengthMismatch`; ein mitten im Element abgeschnittener Varint
/// bleibt `PrematureEndOfStream`.
fn decode_each<T: PackedScalar>(
    payload: &[u8],
    count: usize,
    mut sink: impl FnMut(T),
) -> Result<()> {
    let mismatch = || Error::PackedLengthMismatch { payload_len: payload.len(), expected: count };
    check_length::<T>(payload, count)?;
    let mut pos = 0;
    for _ in 0..count {
        if pos == payload.len() {
            return Err(mismatch());
        }
        let (value, n) = T::decode_element(&payload[pos..])?;
        sink(value);
        pos += n;
    }
    if pos != payload.len() {
        return Err(mismatch());
    }
    Ok(())
}

/// Decodes exactly `out.len()` elements from `payload` into `out`.
///
/// Fails with [`Error::PackedLengthMismatch`] when the payload holds fewer
/// or more than `out.len()` elements, and with
/// [`Error::PrematureEndOfStream`] when a varint element is cut off at the
/// end of the payload. Returns the number of elements written.
pub fn decode_into<T: PackedScalar>(payload: &[u8], out: &mut [T]) -> Result<usize> {
    let count = out.len();
    let mut slot = 0;
    decode_each(payload, count, |value| {
        out[slot] = value;
        slot += 1;
    })?;
    Ok(count)
}

/// Decodes exactly `count` elements from `payload`.
///
/// Same failure conditions as [`decode_into`].
pub fn decode<T: PackedScalar>(payload: &[u8], count: usize) -> Result<Vec<T>> {
    // jedes Element belegt mindestens ein Byte
    let mut items = Vec::with_capacity(count.min(payload.len()));
    decode_each(payload, count, |value| items.push(value))?;
    Ok(items)
}

/// Decodes every element in `payload` without a caller-supplied count.
pub fn decode_all<T: PackedScalar>(payload: &[u8]) -> Result<Vec<T>> {
    if let Some(size) = T::FIXED_SIZE {
        if payload.len() % size != 0 {
            return Err(Error::PackedLengthMismatch {
                payload_len: payload.len(),
                expected: payload.len() / size,
            });
        }
        return decode(payload, payload.len() / size);
    }
    let mut items = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let (value, n) = T::decode_element(&payload[pos..])?;
        items.push(value);
        pos += n;
    }
    Ok(items)
}
