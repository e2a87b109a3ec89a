#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use dlx_types::{BlockContent, BlockType, DecodeWarning, WaypointBlock, ExchangeTimeBlock};

#[derive(Debug, Arbitrary)]
struct Input {
    selector: u8,
    payload: Vec<u8>,
}

// Fuzz target: every block grammar on arbitrary payloads.
//
// Grammars check lengths before reading, so a well-behaved grammar never
// reports an Internal warning, whatever the payload.
fuzz_target!(|input: Input| {
    let known = BlockType::KNOWN;
    let block_type = known[usize::from(input.selector) % known.len()];

    let decoded = BlockContent::decode(block_type, &input.payload);
    assert_eq!(decoded.value.block_type(), block_type);
    assert!(!decoded
        .warnings
        .iter()
        .any(|w| matches!(w, DecodeWarning::Internal { .. })));

    // The dual-layout grammars are also callable directly.
    let _ = WaypointBlock::decode_legacy(&input.payload);
    let _ = WaypointBlock::decode_current(&input.payload);
    let _ = ExchangeTimeBlock::decode_records(&input.payload);
    let _ = ExchangeTimeBlock::decode_legacy(&input.payload);
});
