use crate::pair::FieldValue;
use crate::wire::{self, WireType};
use crate::{Error, Result, fixed, varint};

/// Decodiert einen einzelnen Wert, dessen Tag bereits gelesen wurde.
///
/// `buf` beginnt direkt hinter dem Tag. Gibt den Wert und die Anzahl
/// konsumierter Bytes zurück; Length-delimited Payloads werden nicht kopiert.
pub(crate) fn decode_value(buf: &[u8], wire_type: WireType) -> Result<(FieldValue<'_>, usize)> {
    match wire_type {
        WireType::Varint => {
            let (v, n) = varint::decode(buf)?;
            Ok((FieldValue::Varint(v), n))
        }
        WireType::Fixed64 => Ok((FieldValue::Fixed64(fixed::decode_64(buf)?), 8)),
        WireType::Fixed32 => Ok((FieldValue::Fixed32(fixed::decode_32(buf)?), 4)),
        WireType::LengthDelimited => {
            let (len, n) = varint::decode(buf)?;
            // Länge gegen den Rest des Puffers prüfen, bevor gesliced wird
            let end = usize::try_from(len)
                .ok()
                .and_then(|len| n.checked_add(len))
                .filter(|&end| end <= buf.len())
                .ok_or(Error::PrematureEndOfStream)?;
            Ok((FieldValue::LengthDelimited(&buf[n..end]), end))
        }
    }
}

/// Liest einen kompletten Record (Tag + Wert) ab `offset`.
///
/// Returns field number, value and total bytes consumed.
pub(crate) fn read_record(data: &[u8], offset: usize) -> Result<(u32, FieldValue<'_>, usize)> {
    let rest = data.get(offset..).ok_or(Error::PrematureEndOfStream)?;
    let (field_number, wire_type, tag_len) = wire::decode_tag(rest, offset)?;
    let (value, value_len) = decode_value(&rest[tag_len..], wire_type)?;
    Ok((field_number, value, tag_len + value_len))
}
