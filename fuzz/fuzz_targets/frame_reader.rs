#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full decoder entry point.
//
// Catches bugs in:
// - Header, payload and checksum truncation handling
// - Grammar dispatch on arbitrary tags
// - FEND handling and trailing data
// - `consumed` accounting
fuzz_target!(|data: &[u8]| {
    let file = dlx_decoder::decode(data);
    assert!(file.consumed <= data.len());
    if let Some(last) = file.blocks.last() {
        assert!(last.offset < file.consumed);
    }
});
