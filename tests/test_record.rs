//! Quickcheck tests for the counter record encoding
//!
//! The on-medium form is four little-endian bytes at the start of the region.

use flashtally::record::{CounterRecord, RECORD_WIDTH};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn encoding_is_little_endian(value: u32) -> bool {
    CounterRecord::new(value).encode() == value.to_le_bytes()
}

#[quickcheck]
fn decode_reads_any_bit_pattern(bytes: (u8, u8, u8, u8)) -> bool {
    let field = [bytes.0, bytes.1, bytes.2, bytes.3];
    CounterRecord::decode(&field).encode() == field
}

#[quickcheck]
fn next_is_checked(value: u32) -> bool {
    match CounterRecord::new(value).next() {
        Some(next) => value != u32::MAX && next.value() == value + 1,
        None => value == u32::MAX,
    }
}

#[quickcheck]
fn predecessor_undoes_next(value: u32) -> bool {
    let record = CounterRecord::new(value);
    record
        .next()
        .and_then(|next| next.predecessor())
        .map_or(value == u32::MAX, |back| back == record)
}

#[quickcheck]
fn ordering_follows_value(a: u32, b: u32) -> bool {
    (CounterRecord::new(a) < CounterRecord::new(b)) == (a < b)
}

#[test]
fn record_width_matches_encoding() {
    assert_eq!(CounterRecord::initial().encode().len(), RECORD_WIDTH);
    assert!(CounterRecord::decode(&[0xFF; RECORD_WIDTH]).looks_erased());
}
