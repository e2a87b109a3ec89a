/// What the frame reader does when a trailer does not match the CRC of
/// its frame.
///
/// ```text
/// ┌────────┬─────────────────────────────────────────────────┐
/// │ Policy │ Behavior                                        │
/// ├────────┼─────────────────────────────────────────────────┤
/// │ Ignore │ Decode the block as if the checksum matched     │
/// │ Warn   │ Decode the block, attach ChecksumMismatch       │
/// │ Reject │ Stop decoding with DecodeError::ChecksumMismatch│
/// └────────┴─────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChecksumPolicy {
    Ignore,
    #[default]
    Warn,
    Reject,
}

/// Configuration for the DLX3 frame reader.
///
/// ```text
/// ┌──────────────────┬──────────┬─────────────────────────────────────┐
/// │ Field            │ Default  │ Purpose                             │
/// ├──────────────────┼──────────┼─────────────────────────────────────┤
/// │ checksum_policy  │ Warn     │ Handling of bad frame trailers      │
/// │ stop_at_file_end │ true     │ End decoding after the FEND block   │
/// └──────────────────┴──────────┴─────────────────────────────────────┘
/// ```
///
/// With `stop_at_file_end` off, frames after FEND are decoded like any
/// other; with it on, they are skipped and their byte count is reported
/// as a `DataAfterFileEnd` warning on the FEND block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub checksum_policy: ChecksumPolicy,
    pub stop_at_file_end: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::default(),
            stop_at_file_end: true,
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    #[must_use]
    pub fn with_stop_at_file_end(mut self, stop: bool) -> Self {
        self.stop_at_file_end = stop;
        self
    }
}
