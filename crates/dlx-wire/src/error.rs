/// Errors raised by the byte-level layer: cursor reads and envelope I/O.
///
/// These are the lowest-level failures in the workspace. The grammar layer
/// (`dlx-types`) never lets a `WireError` escape a block; it converts them
/// into warnings at the grammar boundary. The frame reader (`dlx-decoder`)
/// maps truncation inside a frame into its own fatal error, tagged with the
/// frame phase that ran out of bytes.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remained than a read required.
    ///
    /// `offset` is the cursor position where the read was attempted,
    /// relative to the start of the buffer the cursor was built over.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A payload does not fit the 16-bit length field of a frame.
    #[error("payload of {len} bytes exceeds the 65535-byte frame limit")]
    PayloadTooLarge { len: usize },

    /// I/O error while writing an envelope.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
