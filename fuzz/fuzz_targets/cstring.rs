#![no_main]

use libfuzzer_sys::fuzz_target;
use dlx_wire::{ByteCursor, MAX_STRING_LEN};

// Fuzz target: null-terminated Latin-1 string reads.
//
// Checks that the cap holds, the cursor never overruns, and every string
// read makes progress until the buffer is empty.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    while !cursor.is_empty() {
        let before = cursor.position();
        let s = cursor.read_cstring();
        assert!(s.text.chars().count() <= MAX_STRING_LEN);
        assert!(cursor.position() > before);
        assert!(cursor.position() <= data.len());
    }
});
