#![warn(clippy::pedantic)]

pub mod crc16;
pub mod cursor;
pub mod envelope;
pub mod error;

pub use cursor::{ByteCursor, Endian, MAX_STRING_LEN, TerminatedString};
pub use envelope::{BlockEnvelope, CHECKSUM_SIZE, FRAME_HEADER_SIZE, FrameHeader, TypeTag};
pub use error::WireError;
