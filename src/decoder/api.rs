use crate::Result;
use crate::pair::KeyValPair;

use super::Records;
use super::value::read_record;

/// Decodiert den gesamten Puffer in eine Liste von Records.
///
/// Bricht beim ersten fehlerhaften Record ab; es gibt keine Teilergebnisse.
pub fn decode(data: &[u8]) -> Result<Vec<KeyValPair<'_>>> {
    Records::new(data).collect()
}

/// Einmaliger Lookup ohne Index.
///
/// Scannt vorwärts bis zum `index`-ten Vorkommen von `field_number` und hört
/// dort auf; Bytes hinter dem Treffer werden nicht validiert. Für mehrere
/// Lookups im selben Puffer ist [`Decoder::find`](super::Decoder::find)
/// günstiger.
pub fn find(data: &[u8], field_number: u32, index: usize) -> Result<Option<KeyValPair<'_>>> {
    let mut seen = 0usize;
    let mut pos = 0;
    while pos < data.len() {
        let (found, value, consumed) = read_record(data, pos)?;
        if found == field_number {
            if seen == index {
                return Ok(Some(KeyValPair::new(found, index as u32, value)));
            }
            seen += 1;
        }
        pos += consumed;
    }
    Ok(None)
}
