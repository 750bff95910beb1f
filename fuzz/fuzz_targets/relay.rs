#![no_main]
use libfuzzer_sys::fuzz_target;
use pbkv::{Encoder, codec};

fuzz_target!(|data: &[u8]| {
    // Überlange Varints werden kanonisch neu geschrieben, die Records bleiben gleich.
    let Ok(pairs) = pbkv::decoder::decode(data) else {
        return;
    };
    let mut encoder = Encoder::new();
    for pair in &pairs {
        codec::add_field(&mut encoder, pair.field_number, pair)
            .expect("decoded field number is valid");
    }
    assert!(encoder.len() <= data.len());
    assert_eq!(pbkv::decoder::decode(encoder.as_bytes()), Ok(pairs));
});
