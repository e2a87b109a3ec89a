#![no_main]

use libfuzzer_sys::fuzz_target;
use dlx_wire::{BlockEnvelope, ByteCursor};

// Fuzz target: BlockEnvelope::read_from on arbitrary bytes.
//
// Every envelope read must account for exactly the bytes it advanced over.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    while let Ok(envelope) = BlockEnvelope::read_from(&mut cursor) {
        assert!(cursor.position() >= envelope.encoded_len());
        let _ = envelope.checksum_matches();
    }
});
