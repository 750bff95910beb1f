//! Record encoder.
//!
//! Appends tag + value records to an exclusively owned, growable buffer.
//! Every `add_*` operation validates the field number first and writes
//! nothing when it is rejected.
//!
//! # Beispiel
//!
//! ```
//! use pbkv::encoder::Encoder;
//!
//! let mut encoder = Encoder::new();
//! encoder.add_varint(1, 300).unwrap();
//! encoder.add_string(2, "abc").unwrap();
//! let bytes = encoder.take_buffer();
//! assert_eq!(bytes, vec![0x08, 0xAC, 0x02, 0x12, 0x03, b'a', b'b', b'c']);
//! assert!(encoder.is_empty());
//! ```

mod config;

pub use config::EncoderConfig;

use log::trace;

use crate::packed::{self, PackedScalar};
use crate::wire::{self, WireType};
use crate::{Result, fixed, varint, zigzag};

/// Append-only record encoder.
///
/// `len() <= capacity()` always holds. Allocation failure during growth
/// aborts the process; there is no partially written record.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Creates an encoder without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(EncoderConfig::with_capacity(capacity))
    }

    pub fn with_config(config: EncoderConfig) -> Self {
        Self { buf: Vec::with_capacity(config.initial_capacity) }
    }

    /// Stellt sicher, dass `space` weitere Bytes ohne Reallokation passen.
    ///
    /// Die Kapazität wird verdoppelt, mindestens aber auf `len + space` erhöht.
    pub(crate) fn ensure_space(&mut self, space: usize) {
        let needed = self.buf.len() + space;
        let capacity = self.buf.capacity();
        if needed <= capacity {
            return;
        }
        let new_capacity = needed.max(capacity.saturating_mul(2));
        trace!("encoder grow: {capacity} -> {new_capacity} bytes (len {})", self.buf.len());
        self.buf.reserve_exact(new_capacity - self.buf.len());
    }

    /// Gemeinsamer Pfad aller add-Operationen: Feldnummer prüfen, Platz
    /// reservieren, Tag schreiben, Wert schreiben.
    #[inline]
    fn write_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        value_len: usize,
        write_value: impl FnOnce(&mut Vec<u8>) -> usize,
    ) -> Result<usize> {
        wire::check_field_number(field_number)?;
        self.ensure_space(wire::tag_len(field_number) + value_len);
        let tag = wire::encode_tag(field_number, wire_type, &mut self.buf);
        let value = write_value(&mut self.buf);
        debug_assert_eq!(value, value_len);
        Ok(tag + value)
    }

    /// Writes an unsigned varint field. Returns the bytes written.
    pub fn add_varint(&mut self, field_number: u32, value: u64) -> Result<usize> {
        self.write_field(field_number, WireType::Varint, varint::encoded_len(value), |buf| {
            varint::encode(value, buf)
        })
    }

    /// Writes a signed value as a zigzag varint.
    ///
    /// Shares wire type Varint with [`add_varint`](Self::add_varint); the
    /// reader has to know which mapping the field uses.
    pub fn add_zigzag(&mut self, field_number: u32, value: i64) -> Result<usize> {
        self.add_varint(field_number, zigzag::encode(value))
    }

    pub fn add_double(&mut self, field_number: u32, value: f64) -> Result<usize> {
        self.add_fixed64(field_number, value.to_bits())
    }

    pub fn add_float(&mut self, field_number: u32, value: f32) -> Result<usize> {
        self.add_fixed32(field_number, value.to_bits())
    }

    pub fn add_fixed64(&mut self, field_number: u32, value: u64) -> Result<usize> {
        self.write_field(field_number, WireType::Fixed64, 8, |buf| fixed::encode_64(value, buf))
    }

    pub fn add_fixed32(&mut self, field_number: u32, value: u32) -> Result<usize> {
        self.write_field(field_number, WireType::Fixed32, 4, |buf| fixed::encode_32(value, buf))
    }

    /// Writes a length-delimited field: varint length, then the raw bytes.
    pub fn add_binary(&mut self, field_number: u32, value: &[u8]) -> Result<usize> {
        let len = value.len() as u64;
        self.write_field(
            field_number,
            WireType::LengthDelimited,
            varint::encoded_len(len) + value.len(),
            |buf| {
                let n = varint::encode(len, buf);
                buf.extend_from_slice(value);
                n + value.len()
            },
        )
    }

    /// Writes the UTF-8 bytes of `value` as a length-delimited field.
    pub fn add_string(&mut self, field_number: u32, value: &str) -> Result<usize> {
        self.add_binary(field_number, value.as_bytes())
    }

    /// Writes `items` as one packed length-delimited field.
    ///
    /// An empty slice still produces a record with a zero-length payload.
    pub fn add_packed<T: PackedScalar>(&mut self, field_number: u32, items: &[T]) -> Result<usize> {
        let payload_len = packed::encoded_len(items);
        self.write_field(
            field_number,
            WireType::LengthDelimited,
            varint::encoded_len(payload_len as u64) + payload_len,
            |buf| varint::encode(payload_len as u64, buf) + packed::encode(items, buf),
        )
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Hands the buffer to the caller and leaves the encoder empty with no
    /// storage; the encoder stays usable.
    pub fn take_buffer(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Empties the buffer but keeps its capacity for the next encode cycle.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Consumes the encoder and returns the buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
