use std::fmt;

use dlx_wire::{TypeTag, WireError};

/// The part of a frame the reader was consuming when input ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePhase {
    /// The 6-byte tag and length prefix.
    Header,
    /// The `length` payload bytes.
    Payload,
    /// The 2-byte CRC trailer.
    Checksum,
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Payload => "payload",
            Self::Checksum => "checksum",
        })
    }
}

/// Errors that stop the frame reader.
///
/// Everything a single grammar can get wrong is a
/// [`DecodeWarning`](dlx_types::DecodeWarning) on its block instead; a
/// `DecodeError` means the byte stream itself can no longer be framed.
/// Blocks decoded before the error are kept.
///
/// ```text
///   DecodeError
///   ├── Truncated         ← input ends inside a frame
///   ├── ChecksumMismatch  ← only under ChecksumPolicy::Reject
///   └── Wire(WireError)   ← any other low-level fault
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Input ended inside a frame. `offset` is where the failing read
    /// started, `needed` how many bytes it wanted.
    #[error("truncated frame {phase} at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        phase: FramePhase,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A frame trailer does not match the CRC of its tag and payload.
    /// `offset` is the start of the frame.
    #[error("checksum mismatch in {tag} frame at offset {offset}: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        tag: TypeTag,
        offset: usize,
        stored: u16,
        computed: u16,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl DecodeError {
    pub(crate) fn in_phase(phase: FramePhase, err: WireError) -> Self {
        match err {
            WireError::Truncated {
                offset,
                needed,
                available,
            } => Self::Truncated {
                phase,
                offset,
                needed,
                available,
            },
            other => Self::Wire(other),
        }
    }

    /// Byte offset in the input the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Truncated { offset, .. } | Self::ChecksumMismatch { offset, .. } => Some(*offset),
            Self::Wire(_) => None,
        }
    }
}
