use std::fmt;

use crate::crc16;
use crate::cursor::{ByteCursor, Endian};
use crate::error::WireError;

/// Size of the tag + length prefix that opens every frame.
pub const FRAME_HEADER_SIZE: usize = 6;

/// Size of the big-endian CRC trailer that closes every frame.
pub const CHECKSUM_SIZE: usize = 2;

/// Largest payload a 16-bit length field can describe.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Four-byte block type code, e.g. `FHDR` or `rFMS`.
///
/// Tags are case-sensitive ASCII on the wire, but any four bytes are
/// representable so that unknown or corrupt tags survive decoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag([u8; 4]);

impl TypeTag {
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// The tag as text, or `None` when it is not valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl From<[u8; 4]> for TypeTag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&str> for TypeTag {
    type Error = usize;

    /// Build a tag from a four-byte string. The error is the actual length.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        <[u8; 4]>::try_from(s.as_bytes())
            .map(Self)
            .map_err(|_| s.len())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", char::from(b))?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The fixed prefix of a frame: tag and declared payload length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub tag: TypeTag,
    pub length: u16,
}

impl FrameHeader {
    /// Read a header at the cursor position.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] if fewer than [`FRAME_HEADER_SIZE`] bytes
    /// remain. The cursor is not advanced in that case.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Self, WireError> {
        if cursor.remaining() < FRAME_HEADER_SIZE {
            return Err(WireError::Truncated {
                offset: cursor.position(),
                needed: FRAME_HEADER_SIZE,
                available: cursor.remaining(),
            });
        }
        let tag = TypeTag(cursor.read_array::<4>()?);
        let length = cursor.read_u16(Endian::Big)?;
        Ok(Self { tag, length })
    }
}

/// One frame of a DLX3 file.
///
/// ```text
/// ┌───────────────────────────────────────────┐
/// │ tag        [4 bytes, ASCII]               │
/// │ length     (u16 BE)                       │
/// │ payload    [length bytes]                 │
/// │ checksum   (u16 BE, CRC over tag+payload) │
/// └───────────────────────────────────────────┘
/// ```
///
/// The declared length is always `payload.len()`; there is no way to
/// build an envelope whose length field disagrees with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockEnvelope {
    tag: TypeTag,
    payload: Vec<u8>,
    checksum: u16,
}

impl BlockEnvelope {
    /// Wrap a payload with a freshly computed checksum.
    ///
    /// # Errors
    ///
    /// [`WireError::PayloadTooLarge`] if the payload exceeds 65535 bytes.
    pub fn new(tag: TypeTag, payload: Vec<u8>) -> Result<Self, WireError> {
        let checksum = crc16::frame_checksum(tag.bytes(), &payload);
        Self::with_checksum(tag, payload, checksum)
    }

    /// Wrap a payload with an explicit trailer value, valid or not.
    ///
    /// # Errors
    ///
    /// [`WireError::PayloadTooLarge`] if the payload exceeds 65535 bytes.
    pub fn with_checksum(tag: TypeTag, payload: Vec<u8>, checksum: u16) -> Result<Self, WireError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(WireError::PayloadTooLarge { len: payload.len() });
        }
        Ok(Self {
            tag,
            payload,
            checksum,
        })
    }

    #[must_use]
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// The stored trailer value.
    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_PAYLOAD_LEN at construction
    pub fn declared_length(&self) -> u16 {
        self.payload.len() as u16
    }

    /// CRC-16 over tag and payload, what a valid trailer would hold.
    #[must_use]
    pub fn expected_checksum(&self) -> u16 {
        crc16::frame_checksum(self.tag.bytes(), &self.payload)
    }

    #[must_use]
    pub fn checksum_matches(&self) -> bool {
        self.checksum == self.expected_checksum()
    }

    /// Total bytes this envelope occupies on the wire.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }

    /// Write the frame to `w`.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// [`WireError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        w.write_all(self.tag.bytes())?;
        w.write_all(&self.declared_length().to_be_bytes())?;
        w.write_all(&self.payload)?;
        w.write_all(&self.checksum.to_be_bytes())?;
        Ok(self.encoded_len())
    }

    /// Encode the frame into a new buffer, byte-for-byte what
    /// [`write_to`](Self::write_to) writes. Writing into a `Vec` cannot
    /// fail, so no `Result`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(self.tag.bytes());
        out.extend_from_slice(&self.declared_length().to_be_bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out
    }

    /// Read one complete frame at the cursor position.
    ///
    /// The checksum is read but not verified; callers decide what a
    /// mismatch means.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] if the header, payload or trailer is cut
    /// short. The cursor may have advanced past the parts that were read.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Self, WireError> {
        let header = FrameHeader::read_from(cursor)?;
        let payload = cursor.read_bytes(usize::from(header.length))?.to_vec();
        let checksum = cursor.read_u16(Endian::Big)?;
        Ok(Self {
            tag: header.tag,
            payload,
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> TypeTag {
        TypeTag::try_from(s).unwrap()
    }

    #[test]
    fn file_end_frame_bytes() {
        let env = BlockEnvelope::new(tag("FEND"), Vec::new()).unwrap();
        assert_eq!(env.to_bytes(), [b'F', b'E', b'N', b'D', 0x00, 0x00, 0x1D, 0x1B]);
        assert!(env.checksum_matches());
    }

    #[test]
    fn write_then_read() {
        let env = BlockEnvelope::new(tag("CDAT"), vec![1, 2, 3, 4, 0, 0]).unwrap();
        let mut buf = Vec::new();
        let written = env.write_to(&mut buf).unwrap();
        assert_eq!(written, 14);
        assert_eq!(buf, env.to_bytes());

        let mut cur = ByteCursor::new(&buf);
        let back = BlockEnvelope::read_from(&mut cur).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.declared_length(), 6);
        assert_eq!(back.checksum(), 0x3DB7);
        assert!(cur.is_empty());
    }

    #[test]
    fn to_bytes_matches_write_to_for_stored_checksum() {
        let env = BlockEnvelope::with_checksum(tag("PDWN"), vec![0, 0, 0, 9], 0xBEEF).unwrap();
        let mut buf = Vec::new();
        env.write_to(&mut buf).unwrap();
        assert_eq!(env.to_bytes(), buf);
        assert_eq!(buf[buf.len() - 2..], [0xBE, 0xEF]);
    }

    #[test]
    fn explicit_bad_checksum_is_kept() {
        let env = BlockEnvelope::with_checksum(tag("FEND"), Vec::new(), 0xBEEF).unwrap();
        assert_eq!(env.checksum(), 0xBEEF);
        assert_eq!(env.expected_checksum(), 0x1D1B);
        assert!(!env.checksum_matches());
    }

    #[test]
    fn oversized_payload_rejected() {
        let err = BlockEnvelope::new(tag("DIAG"), vec![0; MAX_PAYLOAD_LEN + 1]).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { len } if len == MAX_PAYLOAD_LEN + 1));
        assert!(BlockEnvelope::new(tag("DIAG"), vec![0; MAX_PAYLOAD_LEN]).is_ok());
    }

    #[test]
    fn short_header_does_not_advance() {
        let data = [b'F', b'H', b'D', b'R', 0x00];
        let mut cur = ByteCursor::new(&data);
        let err = FrameHeader::read_from(&mut cur).unwrap_err();
        assert!(matches!(
            err,
            WireError::Truncated {
                offset: 0,
                needed: 6,
                available: 5
            }
        ));
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn truncated_payload() {
        let data = [b'C', b'D', b'A', b'T', 0x00, 0x08, 1, 2, 3];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            BlockEnvelope::read_from(&mut cur),
            Err(WireError::Truncated { needed: 8, available: 3, .. })
        ));
    }

    #[test]
    fn tag_display_escapes_non_printable() {
        assert_eq!(tag("rFMS").to_string(), "rFMS");
        assert_eq!(TypeTag::new([b'A', 0x00, b'B', 0xFF]).to_string(), "A\\x00B\\xff");
        assert_eq!(format!("{:?}", tag("WAYP")), "TypeTag(WAYP)");
    }

    #[test]
    fn tag_from_str_requires_four_bytes() {
        assert_eq!(TypeTag::try_from("FHD"), Err(3));
        assert_eq!(TypeTag::try_from("FHDRX"), Err(5));
        assert_eq!(tag("FHDR").as_str(), Some("FHDR"));
        assert_eq!(TypeTag::new([0xFF; 4]).as_str(), None);
    }
}
