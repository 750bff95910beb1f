//! pbkv – schema-less key/value codec for a subset of the Protocol Buffers
//! wire format.
//!
//! Records are `tag + value` pairs. Wire types 0 (varint), 1 (fixed64),
//! 2 (length-delimited) and 5 (fixed32) are supported; groups are not.
//!
//! # Beispiel
//!
//! ```
//! use pbkv::{Decoder, Encoder};
//!
//! // Encode
//! let mut encoder = Encoder::new();
//! encoder.add_varint(1, 300).unwrap();
//! encoder.add_string(2, "abc").unwrap();
//! encoder.add_packed(3, &[1.5f64, -2.0]).unwrap();
//! let bytes = encoder.take_buffer();
//!
//! // Decode
//! let decoder = Decoder::from_slice(&bytes);
//! assert_eq!(decoder.find(1, 0).unwrap().unwrap().as_u64().unwrap(), 300);
//! let values: Vec<f64> = decoder.find(3, 0).unwrap().unwrap().packed(2).unwrap();
//! assert_eq!(values, vec![1.5, -2.0]);
//! ```

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fixed;
pub mod packed;
pub mod pair;
pub mod varint;
pub mod wire;
pub mod zigzag;

pub use error::{Error, Result};

/// HashMap mit ahash (schneller, nicht DoS-resistent, nur für interne Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Encoder/Decoder
pub use decoder::{Decoder, DecoderState, Records};
pub use encoder::{Encoder, EncoderConfig};

// Public API: Types
pub use packed::PackedScalar;
pub use pair::{FieldValue, KeyValPair};
pub use wire::{MAX_FIELD_NUMBER, WireType};
