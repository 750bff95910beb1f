#![no_main]
use libfuzzer_sys::fuzz_target;
use pbkv::Decoder;

fuzz_target!(|data: &[u8]| {
    // Beliebige Bytes: sequentiell und per Index lesen, Ergebnisse müssen übereinstimmen.
    let decoder = Decoder::from_slice(data);
    let mut sequential = Vec::new();
    let failed = loop {
        match decoder.get_next() {
            Ok(Some(pair)) => sequential.push(pair),
            Ok(None) => break false,
            Err(_) => break true,
        }
    };
    assert_eq!(decoder.get_next(), Ok(None));

    if failed {
        assert!(decoder.find(1, 0).is_err());
        return;
    }
    for pair in sequential {
        let found = decoder.find(pair.field_number, pair.repeat_index as usize);
        assert_eq!(found, Ok(Some(pair)));
        let _ = pair.packed_all::<u64>();
        let _ = pair.as_str();
    }
});
