//! Parser robustness properties over adversarial input.

use proptest::prelude::*;

use aldus::store::RecordStore;
use aldus::HeaderProperties;

fn header(num_objects: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&9u16.to_le_bytes());
    out.extend_from_slice(&0x0300u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&num_objects.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

proptest! {
    /// Arbitrary bytes must parse or fail cleanly, never panic.
    #[test]
    fn parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = RecordStore::parse(&data);
        let _ = HeaderProperties::scan(&data);
    }

    /// An unknown function code consumes exactly its declared operand size,
    /// whatever that size is, and parsing continues at the next record.
    #[test]
    fn unknown_records_consume_declared_size(
        function in 0x7000u16..0x7FFF,
        operands in proptest::collection::vec(any::<i16>(), 0..64),
    ) {
        let mut data = header(0);
        data.extend_from_slice(&(3 + operands.len() as u32).to_le_bytes());
        data.extend_from_slice(&function.to_le_bytes());
        for w in &operands {
            data.extend_from_slice(&w.to_le_bytes());
        }
        // a recognizable trailer record proves realignment
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&aldus::constants::record::SET_BK_MODE.to_le_bytes());
        data.extend_from_slice(&1i16.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&0i16.to_le_bytes());

        let store = RecordStore::parse(&data).expect("well-formed stream");
        prop_assert_eq!(store.num_records(), 2);
        prop_assert_eq!(store.records()[0].function, function);
        prop_assert_eq!(store.records()[0].operands.len(), operands.len());
        prop_assert_eq!(
            store.records()[1].function,
            aldus::constants::record::SET_BK_MODE
        );
    }

    /// Declared record sizes are trusted but bounded: a size pointing past
    /// the end of the input is a clean truncation error.
    #[test]
    fn oversized_record_truncates_cleanly(extra in 1u32..10_000) {
        let mut data = header(0);
        data.extend_from_slice(&(3 + extra).to_le_bytes());
        data.extend_from_slice(&0x7A00u16.to_le_bytes());
        // no operand bytes at all
        let truncated = matches!(
            RecordStore::parse(&data),
            Err(aldus::Error::Truncated { .. })
        );
        prop_assert!(truncated);
    }
}
