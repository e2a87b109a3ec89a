#![no_main]

use libfuzzer_sys::fuzz_target;
use dlx_wire::{BlockEnvelope, ByteCursor, TypeTag};

// Fuzz target: BlockEnvelope write->read roundtrip.
//
// Input format:
//   bytes 0..4: tag
//   bytes 4..:  payload
//
// Builds an envelope with a fresh checksum, serializes it, reads it back
// and checks the frame reader accepts it without a checksum warning.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let tag = TypeTag::new([data[0], data[1], data[2], data[3]]);
    let Ok(envelope) = BlockEnvelope::new(tag, data[4..].to_vec()) else {
        return;
    };

    let mut wire = Vec::new();
    let written = envelope.write_to(&mut wire).unwrap();
    assert_eq!(written, wire.len());

    let mut cursor = ByteCursor::new(&wire);
    let parsed = BlockEnvelope::read_from(&mut cursor).unwrap();
    assert_eq!(parsed, envelope);
    assert!(parsed.checksum_matches());
    assert!(cursor.is_empty());

    let file = dlx_decoder::decode(&wire);
    assert!(file.is_complete());
    assert_eq!(file.blocks.len(), 1);
    assert!(!file.blocks[0]
        .warnings
        .iter()
        .any(|w| matches!(w, dlx_types::DecodeWarning::ChecksumMismatch { .. })));
});
