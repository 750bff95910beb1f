//! Record decoder.
//!
//! Walks a byte buffer of tag + value records in two modes: sequential
//! iteration ([`Decoder::get_next`]) and random access by field number
//! ([`Decoder::find`]) through an index that is built once on first use.
//!
//! The decoder never writes to its input. Length-delimited payloads are
//! returned as slices into the buffer, so an attached buffer is only borrowed
//! and a copied buffer is owned and dropped with the decoder.
//!
//! # Beispiel
//!
//! ```
//! use pbkv::decoder::Decoder;
//! use pbkv::encoder::Encoder;
//!
//! let mut encoder = Encoder::new();
//! encoder.add_varint(1, 300).unwrap();
//! encoder.add_string(2, "abc").unwrap();
//! encoder.add_varint(1, 5).unwrap();
//! let bytes = encoder.take_buffer();
//!
//! let decoder = Decoder::from_slice(&bytes);
//! assert_eq!(decoder.find(1, 1).unwrap().unwrap().as_u64().unwrap(), 5);
//! assert_eq!(decoder.find(2, 0).unwrap().unwrap().as_str().unwrap(), "abc");
//!
//! let mut repeats = Vec::new();
//! while let Some(pair) = decoder.get_next().unwrap() {
//!     repeats.push((pair.field_number, pair.repeat_index));
//! }
//! assert_eq!(repeats, vec![(1, 0), (2, 0), (1, 1)]);
//! ```

mod api;
mod index;
mod value;

pub use api::{decode, find};

use std::borrow::Cow;
use std::cell::{Cell, OnceCell, RefCell};

use log::{debug, warn};

use crate::FastHashMap;
use crate::Result;
use crate::pair::KeyValPair;

use index::FieldIndex;
use value::read_record;

/// Zustand der sequentiellen Iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No buffer attached yet.
    Unattached,
    /// Records may remain at the cursor.
    Ready,
    /// The cursor reached the end of a well-formed buffer.
    Exhausted,
    /// A malformed record stopped iteration; the error was returned once.
    Failed,
}

/// Record decoder over a borrowed or owned buffer.
///
/// Cursor, counters and the field index live in cells so that returned
/// records can borrow the buffer while iteration continues. The decoder is
/// therefore `!Sync` and must not be shared between threads.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Borrowed nach `attach`, Owned nach `copy_from`.
    data: Cow<'a, [u8]>,
    state: Cell<DecoderState>,
    /// Byte-Offset des nächsten Records; nie größer als `data.len()`.
    cursor: Cell<usize>,
    /// Anzahl der von `get_next` gelieferten Records.
    records_returned: Cell<usize>,
    /// Feldnummer → Anzahl bisher gesehener Vorkommen.
    repeat_counts: RefCell<FastHashMap<u32, u32>>,
    /// Lazy: wird beim ersten `find` aufgebaut, beim nächsten `attach` verworfen.
    index: OnceCell<FieldIndex>,
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder<'static> {
    /// Creates a decoder owning `data`.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let mut decoder = Self::new();
        decoder.set_buffer(Cow::Owned(data));
        decoder
    }
}

impl<'a> Decoder<'a> {
    /// Creates an unattached decoder.
    pub fn new() -> Self {
        Self {
            data: Cow::Borrowed(&[]),
            state: Cell::new(DecoderState::Unattached),
            cursor: Cell::new(0),
            records_returned: Cell::new(0),
            repeat_counts: RefCell::new(FastHashMap::default()),
            index: OnceCell::new(),
        }
    }

    /// Creates a decoder borrowing `data`.
    pub fn from_slice(data: &'a [u8]) -> Self {
        let mut decoder = Self::new();
        decoder.attach(data);
        decoder
    }

    /// Borrows `data` for decoding. The caller keeps ownership.
    ///
    /// Resets cursor and counters and drops any field index built for the
    /// previous buffer.
    pub fn attach(&mut self, data: &'a [u8]) {
        debug!("decoder attach: {} bytes (borrowed)", data.len());
        self.set_buffer(Cow::Borrowed(data));
    }

    /// Copies `data` into storage owned by the decoder, then behaves like
    /// [`attach`](Self::attach).
    pub fn copy_from(&mut self, data: &[u8]) {
        debug!("decoder copy_from: {} bytes (owned)", data.len());
        self.set_buffer(Cow::Owned(crate::codec::dup(data)));
    }

    fn set_buffer(&mut self, data: Cow<'a, [u8]>) {
        self.data = data;
        self.index = OnceCell::new();
        self.state.set(DecoderState::Ready);
        self.cursor.set(0);
        self.records_returned.set(0);
        self.repeat_counts.get_mut().clear();
    }

    /// Reads the record at the cursor.
    ///
    /// Returns `Ok(None)` at the end of a well-formed buffer and `Err` for a
    /// truncated or malformed record. Once either happened, every further
    /// call returns `Ok(None)` until [`rewind`](Self::rewind) or a new buffer.
    pub fn get_next(&self) -> Result<Option<KeyValPair<'_>>> {
        if self.state.get() != DecoderState::Ready {
            return Ok(None);
        }
        let data: &[u8] = &self.data;
        let pos = self.cursor.get();
        if pos >= data.len() {
            self.state.set(DecoderState::Exhausted);
            return Ok(None);
        }
        match read_record(data, pos) {
            Ok((field_number, value, consumed)) => {
                self.cursor.set(pos + consumed);
                self.records_returned.set(self.records_returned.get() + 1);
                let repeat_index =
                    next_repeat_index(&mut self.repeat_counts.borrow_mut(), field_number);
                Ok(Some(KeyValPair::new(field_number, repeat_index, value)))
            }
            Err(e) => {
                warn!("decode failed at offset {pos} of {}: {e}", data.len());
                self.state.set(DecoderState::Failed);
                self.cursor.set(data.len());
                Err(e)
            }
        }
    }

    /// Moves the cursor back to the start and clears the repeat counters.
    ///
    /// The field index stays cached; it only depends on the buffer.
    pub fn rewind(&self) {
        if self.state.get() == DecoderState::Unattached {
            return;
        }
        self.cursor.set(0);
        self.records_returned.set(0);
        self.repeat_counts.borrow_mut().clear();
        self.state.set(DecoderState::Ready);
    }

    /// Returns the `index`-th (0-based) occurrence of `field_number`.
    ///
    /// The first call scans the whole buffer and caches the field index.
    /// `Ok(None)` if the field occurs `index` times or fewer; `Err` if the
    /// buffer is malformed anywhere (the index is then not cached).
    pub fn find(&self, field_number: u32, index: usize) -> Result<Option<KeyValPair<'_>>> {
        let field_index = self.field_index()?;
        let Some(&offset) = field_index.offsets(field_number).get(index) else {
            return Ok(None);
        };
        let (found, value, _) = read_record(&self.data, offset)?;
        debug_assert_eq!(found, field_number);
        Ok(Some(KeyValPair::new(field_number, index as u32, value)))
    }

    /// Number of occurrences of `field_number` in the buffer.
    pub fn count(&self, field_number: u32) -> Result<usize> {
        Ok(self.field_index()?.offsets(field_number).len())
    }

    /// Distinct field numbers in order of first appearance.
    pub fn field_numbers(&self) -> Result<Vec<u32>> {
        Ok(self.field_index()?.field_numbers().collect())
    }

    /// Total number of records in the buffer.
    pub fn record_count(&self) -> Result<usize> {
        Ok(self.field_index()?.records())
    }

    fn field_index(&self) -> Result<&FieldIndex> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let built = FieldIndex::build(&self.data)?;
        Ok(self.index.get_or_init(|| built))
    }

    /// Iterates over all records from the start, independent of the
    /// sequential cursor.
    pub fn iter(&self) -> Records<'_> {
        Records::new(&self.data)
    }

    pub fn state(&self) -> DecoderState {
        self.state.get()
    }

    /// Byte offset of the next record for [`get_next`](Self::get_next).
    pub fn position(&self) -> usize {
        self.cursor.get()
    }

    /// Number of records returned by [`get_next`](Self::get_next) since the
    /// last rewind or attach.
    pub fn records_returned(&self) -> usize {
        self.records_returned.get()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` if the buffer was copied with [`copy_from`](Self::copy_from).
    pub fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }
}

fn next_repeat_index(counts: &mut FastHashMap<u32, u32>, field_number: u32) -> u32 {
    let count = counts.entry(field_number).or_insert(0);
    let repeat_index = *count;
    *count += 1;
    repeat_index
}

/// Iterator über alle Records eines Puffers.
///
/// Liefert nach einem Fehler genau einmal `Some(Err(..))` und danach `None`.
pub struct Records<'d> {
    data: &'d [u8],
    pos: usize,
    repeat_counts: FastHashMap<u32, u32>,
    failed: bool,
}

impl<'d> Records<'d> {
    pub fn new(data: &'d [u8]) -> Self {
        Self { data, pos: 0, repeat_counts: FastHashMap::default(), failed: false }
    }

    /// Byte offset of the next record.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'d> Iterator for Records<'d> {
    type Item = Result<KeyValPair<'d>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        match read_record(self.data, self.pos) {
            Ok((field_number, value, consumed)) => {
                self.pos += consumed;
                let repeat_index = next_repeat_index(&mut self.repeat_counts, field_number);
                Some(Ok(KeyValPair::new(field_number, repeat_index, value)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Records<'_> {}
