//! Lazily built field index for random access.
//!
//! Maps each field number to the ordered byte offsets of its records. The
//! index is built in one forward scan on the first lookup and cached by the
//! decoder until another buffer is attached.

use log::debug;

use crate::FastIndexMap;
use crate::Result;

use super::value::read_record;

/// Feldnummer → Offsets aller Vorkommen (Tag-Anfang), in Stream-Reihenfolge.
#[derive(Debug, Default)]
pub(super) struct FieldIndex {
    /// Iteriert in Reihenfolge des ersten Auftretens.
    offsets: FastIndexMap<u32, Vec<usize>>,
    /// Gesamtzahl Records im Puffer.
    records: usize,
}

impl FieldIndex {
    /// Scannt den gesamten Puffer.
    ///
    /// Alles-oder-nichts: Bei einem fehlerhaften Record wird kein Index
    /// zurückgegeben, auch nicht für den gültigen Anfang.
    pub(super) fn build(data: &[u8]) -> Result<Self> {
        let mut index = Self::default();
        let mut pos = 0;
        while pos < data.len() {
            let (field_number, _, consumed) = read_record(data, pos)?;
            index.offsets.entry(field_number).or_default().push(pos);
            index.records += 1;
            pos += consumed;
        }
        debug!(
            "field index built: {} records, {} distinct fields, {} bytes",
            index.records,
            index.offsets.len(),
            data.len()
        );
        Ok(index)
    }

    /// Offsets aller Vorkommen von `field_number` (leer wenn nicht vorhanden).
    pub(super) fn offsets(&self, field_number: u32) -> &[usize] {
        self.offsets.get(&field_number).map_or(&[], Vec::as_slice)
    }

    pub(super) fn field_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.offsets.keys().copied()
    }

    pub(super) fn records(&self) -> usize {
        self.records
    }
}
