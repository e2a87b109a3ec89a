use dlx_wire::{ByteCursor, Endian, MAX_STRING_LEN, TerminatedString, WireError};

use crate::error::DecodeWarning;

/// Big-endian field reader over one block payload.
///
/// Wraps a [`ByteCursor`] bounded to the payload and collects the
/// warnings a grammar raises while it walks the fields. Grammars take a
/// `&mut PayloadReader`; the shared boundary in
/// [`BlockGrammar::decode`](crate::grammar::BlockGrammar::decode) turns
/// the collected warnings into the block's warning list.
#[derive(Debug)]
pub struct PayloadReader<'a> {
    cursor: ByteCursor<'a>,
    warnings: Vec<DecodeWarning>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(payload),
            warnings: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn peek_u8_at(&self, ahead: usize) -> Option<u8> {
        self.cursor.peek_u8_at(ahead)
    }

    pub fn u8(&mut self) -> Result<u8, WireError> {
        self.cursor.read_u8()
    }

    pub fn u16(&mut self) -> Result<u16, WireError> {
        self.cursor.read_u16(Endian::Big)
    }

    pub fn i16(&mut self) -> Result<i16, WireError> {
        self.cursor.read_i16(Endian::Big)
    }

    pub fn u32(&mut self) -> Result<u32, WireError> {
        self.cursor.read_u32(Endian::Big)
    }

    pub fn i32(&mut self) -> Result<i32, WireError> {
        self.cursor.read_i32(Endian::Big)
    }

    /// Consume and return everything left in the payload.
    pub fn rest(&mut self) -> &'a [u8] {
        self.cursor
            .read_bytes(self.cursor.remaining())
            .unwrap_or_default()
    }

    /// Read a null-terminated string, raising [`DecodeWarning::StringCapped`]
    /// if it hit the length cap.
    pub fn string(&mut self) -> TerminatedString {
        let offset = self.cursor.position();
        let s = self.cursor.read_cstring();
        if s.capped {
            self.warn(DecodeWarning::StringCapped {
                offset,
                cap: MAX_STRING_LEN,
            });
        }
        s
    }

    /// Read a string if any bytes remain, `None` at end of payload.
    pub fn optional_string(&mut self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.string().text)
        }
    }

    pub fn warn(&mut self, warning: DecodeWarning) {
        self.warnings.push(warning);
    }

    /// Close a fixed-size record loop: any bytes left are a misaligned tail.
    pub fn finish_records(&mut self, record_size: usize) {
        let remaining = self.remaining();
        if remaining > 0 {
            self.warn(DecodeWarning::MisalignedTail {
                remaining,
                record_size,
            });
        }
    }

    /// Close a grammar with no repeating part: any bytes left are trailing.
    pub fn finish(&mut self) {
        let bytes = self.remaining();
        if bytes > 0 {
            self.warn(DecodeWarning::UnexpectedTrailing { bytes });
        }
    }

    pub fn into_warnings(self) -> Vec<DecodeWarning> {
        self.warnings
    }
}
