//! Stateless helpers around the primitive codecs.
//!
//! Collects the buffer-level building blocks in one place for callers that
//! do not want to go through [`Encoder`]/[`Decoder`](crate::decoder::Decoder):
//! buffer duplication, varint and fixed-width primitives, packed arrays,
//! debug rendering of records and re-serialization of decoded records.

use core::fmt;

use crate::Result;
use crate::encoder::Encoder;
use crate::packed::{self, PackedScalar};
use crate::pair::{FieldValue, KeyValPair};

pub use crate::fixed::{
    decode_32 as decode_fixed32, decode_64 as decode_fixed64, encode_32 as encode_fixed32,
    encode_64 as encode_fixed64,
};
pub use crate::varint::{
    decode as decode_varint, encode as encode_varint, encoded_len as varint_len,
};
pub use crate::zigzag::{decode as decode_zigzag, encode as encode_zigzag};

const ELLIPSIS: &str = "...";
/// Obergrenze der Vorab-Reservierung in [`to_string`].
const RENDER_CAPACITY: usize = 256;

/// Kopie eines Byte-Puffers.
pub fn dup(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

/// Encodes `items` as a packed payload without tag or length prefix.
pub fn pack<T: PackedScalar>(items: &[T]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(packed::encoded_len(items));
    packed::encode(items, &mut buf);
    buf
}

/// Decodes a packed payload that must hold exactly `count` elements.
pub fn unpack<T: PackedScalar>(payload: &[u8], count: usize) -> Result<Vec<T>> {
    packed::decode(payload, count)
}

/// `fmt::Write`-Senke mit fester Obergrenze; bricht beim Überlauf mit
/// `fmt::Error` ab, damit der Rest des Records nicht formatiert wird.
struct BoundedWriter {
    buf: String,
    limit: usize,
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }
        self.buf.push_str(&s[..floor_char_boundary(s, room)]);
        Err(fmt::Error)
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Renders `pair` for debugging, never longer than `limit` bytes.
///
/// Formatting stops as soon as `limit` is reached, so cost and memory follow
/// `limit` and not the payload size. Longer output is cut on a char boundary
/// and ends in `...`.
pub fn to_string(pair: &KeyValPair<'_>, limit: usize) -> String {
    let mut writer =
        BoundedWriter { buf: String::with_capacity(limit.min(RENDER_CAPACITY)), limit };
    // Err nur bei Überlauf: Display der Records schreibt sonst fehlerfrei
    if fmt::write(&mut writer, format_args!("{pair}")).is_ok() {
        return writer.buf;
    }
    let mut rendered = writer.buf;
    let ellipsis = if limit >= ELLIPSIS.len() { ELLIPSIS } else { "" };
    let keep = (limit - ellipsis.len()).min(rendered.len());
    let cut = floor_char_boundary(&rendered, keep);
    rendered.truncate(cut);
    rendered.push_str(ellipsis);
    rendered
}

/// Writes a decoded record unchanged under `field_number`.
///
/// The payload bytes are reproduced exactly; only the tag changes when
/// `field_number` differs from the record's own.
pub fn add_field(
    encoder: &mut Encoder,
    field_number: u32,
    pair: &KeyValPair<'_>,
) -> Result<usize> {
    match pair.value {
        FieldValue::Varint(v) => encoder.add_varint(field_number, v),
        FieldValue::Fixed64(v) => encoder.add_fixed64(field_number, v),
        FieldValue::LengthDelimited(bytes) => encoder.add_binary(field_number, bytes),
        FieldValue::Fixed32(v) => encoder.add_fixed32(field_number, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::decoder::Decoder;

    #[test]
    fn dup_is_independent_copy() {
        let data = [1u8, 2, 3];
        let copy = dup(&data);
        assert_eq!(copy, data);
        assert!(!std::ptr::eq(copy.as_ptr(), data.as_ptr()));
        assert!(dup(&[]).is_empty());
    }

    #[test]
    fn pack_unpack() {
        let payload = pack(&[3u32, 270, 86942]);
        assert_eq!(payload, vec![0x03, 0x8E, 0x02, 0x9E, 0xA7, 0x05]);
        assert_eq!(unpack::<u32>(&payload, 3).unwrap(), vec![3, 270, 86942]);
        assert!(matches!(
            unpack::<u32>(&payload, 4).unwrap_err(),
            Error::PackedLengthMismatch { .. }
        ));
        assert!(pack::<f64>(&[]).is_empty());
        assert_eq!(pack(&[1.0f32]).len(), 4);
    }

    #[test]
    fn primitive_reexports() {
        let mut buf = Vec::new();
        assert_eq!(encode_varint(300, &mut buf), 2);
        assert_eq!(decode_varint(&buf).unwrap(), (300, 2));
        assert_eq!(varint_len(300), 2);
        assert_eq!(decode_zigzag(encode_zigzag(-3)), -3);

        buf.clear();
        encode_fixed32(7, &mut buf);
        encode_fixed64(9, &mut buf);
        assert_eq!(decode_fixed32(&buf).unwrap(), 7);
        assert_eq!(decode_fixed64(&buf[4..]).unwrap(), 9);
    }

    #[test]
    fn to_string_within_limit() {
        let pair = KeyValPair::new(1, 0, FieldValue::Varint(300));
        assert_eq!(to_string(&pair, 100), "#1[0] varint u=300 s=300 zz=150");
    }

    #[test]
    fn to_string_truncates() {
        let pair = KeyValPair::new(2, 0, FieldValue::LengthDelimited(b"hello world"));
        let full = pair.to_string();
        let short = to_string(&pair, 12);
        assert_eq!(short.len(), 12);
        assert!(short.ends_with("..."));
        assert!(full.starts_with(&short[..9]));

        assert_eq!(to_string(&pair, 2), "#2");
        assert_eq!(to_string(&pair, 0), "");
    }

    /// Ausgabe genau `limit` Bytes lang: kein Abschneiden.
    #[test]
    fn to_string_exact_limit() {
        let pair = KeyValPair::new(1, 0, FieldValue::Varint(300));
        let full = pair.to_string();
        assert_eq!(to_string(&pair, full.len()), full);
        assert_eq!(to_string(&pair, full.len() - 1).len(), full.len() - 1);
    }

    /// Großer Payload: Speicher richtet sich nach `limit`, nicht nach dem Payload.
    #[test]
    fn to_string_large_payload_stays_bounded() {
        let payload = vec![0u8; 4 << 20];
        let pair = KeyValPair::new(2, 0, FieldValue::LengthDelimited(&payload));
        let short = to_string(&pair, 16);
        assert_eq!(short.len(), 16);
        assert_eq!(short, "#2[0] bytes(4...");
        assert!(short.capacity() <= 64, "capacity {}", short.capacity());
    }

    /// Relay: jeder dekodierte Record wird byte-identisch neu geschrieben.
    #[test]
    fn add_field_reproduces_records() {
        let mut source = Encoder::new();
        source.add_varint(1, u64::MAX).unwrap();
        source.add_zigzag(2, -70).unwrap();
        source.add_double(3, 0.25).unwrap();
        source.add_float(4, -8.5).unwrap();
        source.add_string(5, "relay").unwrap();
        source.add_packed(6, &[1u16, 65535]).unwrap();
        let bytes = source.into_vec();

        let decoder = Decoder::from_slice(&bytes);
        let mut relay = Encoder::new();
        for pair in decoder.iter() {
            let pair = pair.unwrap();
            add_field(&mut relay, pair.field_number, &pair).unwrap();
        }
        assert_eq!(relay.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn add_field_renumbers() {
        let pair = KeyValPair::new(1, 0, FieldValue::Fixed32(1));
        let mut encoder = Encoder::new();
        assert_eq!(add_field(&mut encoder, 2, &pair).unwrap(), 5);
        assert_eq!(encoder.as_bytes(), &[0x15, 1, 0, 0, 0]);
        assert_eq!(add_field(&mut encoder, 0, &pair).unwrap_err(), Error::InvalidFieldNumber(0));
    }
}
