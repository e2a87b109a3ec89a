use dlx_wire::TypeTag;

/// A non-fatal problem found while decoding one block.
///
/// Warnings are data, not control flow: a block that produced warnings
/// is still part of the decoded file, carrying whatever its grammar could
/// recover. Only the frame reader can stop a file, and it reports that
/// through its own error type.
///
/// ```text
/// ┌──────────────────────┬──────────────────────────────────────────┐
/// │ Variant              │ Raised by                                │
/// ├──────────────────────┼──────────────────────────────────────────┤
/// │ TooShort             │ any grammar, payload below its minimum   │
/// │ MisalignedTail       │ record loops with leftover bytes         │
/// │ UnexpectedTrailing   │ bytes after the last defined field       │
/// │ UnexpectedValue      │ header revision / geodetic system        │
/// │ MissingField         │ optional trailing field absent           │
/// │ IncompleteRecord     │ CONF group or FORM car cut short         │
/// │ MalformedPair        │ key:value text that does not parse       │
/// │ StringCapped         │ string hit the 1000-byte cap             │
/// │ ChecksumMismatch     │ frame reader, trailer disagrees          │
/// │ UnknownTag           │ frame reader, no grammar registered      │
/// │ DataAfterFileEnd     │ frame reader, bytes after FEND           │
/// │ Internal             │ primitive read fault inside a grammar    │
/// └──────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecodeWarning {
    #[error("payload too short: needed {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// A record loop stopped with bytes left over that do not form a
    /// whole record. Raised at most once per block.
    #[error("{remaining} bytes left over, not a multiple of the {record_size}-byte record")]
    MisalignedTail { remaining: usize, record_size: usize },

    #[error("{bytes} unexpected trailing bytes")]
    UnexpectedTrailing { bytes: usize },

    #[error("unexpected {field}: found {found}, expected {expected}")]
    UnexpectedValue {
        field: &'static str,
        found: u32,
        expected: u32,
    },

    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    /// Sub-record `index` (0-based) could not be decoded in full.
    #[error("incomplete record {index}: {reason}")]
    IncompleteRecord { index: usize, reason: &'static str },

    #[error("malformed key:value pair {pair:?}")]
    MalformedPair { pair: String },

    /// `offset` is the payload position where the string started.
    #[error("string at offset {offset} truncated at {cap} bytes")]
    StringCapped { offset: usize, cap: usize },

    #[error("checksum mismatch: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { stored: u16, computed: u16 },

    #[error("no grammar registered for tag {tag}")]
    UnknownTag { tag: TypeTag },

    #[error("{bytes} bytes after the file end block")]
    DataAfterFileEnd { bytes: usize },

    #[error("internal decode fault: {detail}")]
    Internal { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let w = DecodeWarning::ChecksumMismatch {
            stored: 0xBEEF,
            computed: 0x1D1B,
        };
        assert_eq!(w.to_string(), "checksum mismatch: stored 0xbeef, computed 0x1d1b");

        let w = DecodeWarning::UnknownTag {
            tag: TypeTag::new(*b"XXXX"),
        };
        assert_eq!(w.to_string(), "no grammar registered for tag XXXX");

        let w = DecodeWarning::MisalignedTail {
            remaining: 3,
            record_size: 11,
        };
        assert!(w.to_string().contains("11-byte record"));
    }
}
