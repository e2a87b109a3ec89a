//! CRC-16/CCITT-FALSE, the frame checksum of DLX3 files.
//!
//! ```text
//! ┌───────────────┬──────────┐
//! │ Parameter     │ Value    │
//! ├───────────────┼──────────┤
//! │ polynomial    │ 0x1021   │
//! │ initial value │ 0xFFFF   │
//! │ reflect in    │ no       │
//! │ reflect out   │ no       │
//! │ final XOR     │ 0x0000   │
//! │ check "12..9" │ 0x29B1   │
//! └───────────────┴──────────┘
//! ```
//!
//! The lookup table is computed by a `const fn`, so it lives in the
//! binary's read-only data and is never built or mutated at runtime.

const POLYNOMIAL: u16 = 0x1021;

/// Register value before the first byte is folded in.
pub const INITIAL: u16 = 0xFFFF;

static TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut value: u16 = 0;
        let mut temp = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            if (value ^ temp) & 0x8000 != 0 {
                value = (value << 1) ^ POLYNOMIAL;
            } else {
                value <<= 1;
            }
            temp <<= 1;
            bit += 1;
        }
        table[i] = value;
        i += 1;
    }
    table
}

/// Fold `bytes` into a running CRC register.
///
/// `update(update(INITIAL, a), b)` equals `checksum(a ++ b)`, which lets
/// the frame reader checksum tag and payload without concatenating them.
#[must_use]
pub fn update(mut crc: u16, bytes: &[u8]) -> u16 {
    for &byte in bytes {
        crc = (crc << 8) ^ TABLE[usize::from((crc >> 8) ^ u16::from(byte))];
    }
    crc
}

/// CRC-16/CCITT-FALSE of a byte sequence.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u16 {
    update(INITIAL, bytes)
}

/// The checksum a frame trailer must carry: CRC over the 4-byte tag
/// followed by the payload. The trailer itself is never included.
#[must_use]
pub fn frame_checksum(tag: &[u8; 4], payload: &[u8]) -> u16 {
    update(update(INITIAL, tag), payload)
}
