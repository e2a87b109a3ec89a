use crate::error::WireError;

/// Longest null-terminated string a cursor will accumulate, in bytes.
///
/// DLX3 strings are short identifiers (serial numbers, stop ids, door
/// names). A run longer than this means the payload is corrupt or the
/// grammar is misaligned, so accumulation stops here.
pub const MAX_STRING_LEN: usize = 1000;

/// Byte order for fixed-width integer reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endian {
    /// Most significant byte first. Every DLX3 field uses this order.
    #[default]
    Big,
    Little,
}

/// A string read up to (and consuming) a zero byte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerminatedString {
    /// Latin-1 decoded text, terminator excluded.
    pub text: String,
    /// A zero byte ended the string (as opposed to end of buffer or cap).
    pub terminated: bool,
    /// Accumulation stopped at [`MAX_STRING_LEN`] bytes.
    pub capped: bool,
}

/// Bounds-checked read cursor over a byte slice.
///
/// The cursor can only see the slice it was built over; a payload cursor
/// built from `&frame[start..start + len]` cannot wander into the next
/// frame even when the backing storage continues. Every read either
/// succeeds and advances, or fails with [`WireError::Truncated`] and
/// leaves the position untouched.
///
/// ```text
///   buf: [ consumed ........ | remaining .............. ]
///                            ^ pos
/// ```
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

macro_rules! read_int {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// [`WireError::Truncated`] if fewer bytes remain than the width.
        pub fn $name(&mut self, endian: Endian) -> Result<$ty, WireError> {
            let raw = self.take::<{ size_of::<$ty>() }>()?;
            Ok(match endian {
                Endian::Big => <$ty>::from_be_bytes(raw),
                Endian::Little => <$ty>::from_le_bytes(raw),
            })
        }
    };
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread bytes, without consuming them.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Look at the byte `ahead` positions past the cursor without moving.
    #[must_use]
    pub fn peek_u8_at(&self, ahead: usize) -> Option<u8> {
        self.buf.get(self.pos.checked_add(ahead)?).copied()
    }

    fn truncated(&self, needed: usize) -> WireError {
        WireError::Truncated {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read exactly `n` raw bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if self.remaining() < n {
            return Err(self.truncated(n));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read a fixed-size array, e.g. a 4-byte type tag.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        self.take::<N>()
    }

    /// Advance past `n` bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Read a single byte.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] at end of buffer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take::<1>()?[0])
    }

    /// Read a single signed byte.
    ///
    /// # Errors
    ///
    /// [`WireError::Truncated`] at end of buffer.
    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_be_bytes(self.take::<1>()?))
    }

    read_int!(
        /// Read an unsigned 16-bit integer.
        read_u16, u16
    );
    read_int!(
        /// Read a signed 16-bit integer.
        read_i16, i16
    );
    read_int!(
        /// Read an unsigned 32-bit integer.
        read_u32, u32
    );
    read_int!(
        /// Read a signed 32-bit integer.
        read_i32, i32
    );
    read_int!(
        /// Read an unsigned 64-bit integer.
        read_u64, u64
    );
    read_int!(
        /// Read a signed 64-bit integer.
        read_i64, i64
    );

    /// Read a null-terminated Latin-1 string.
    ///
    /// Accumulates bytes until a zero byte (consumed, not included) or the
    /// end of the buffer. Latin-1 maps each byte to the code point of the
    /// same value, so decoding cannot fail. At end of buffer the result is
    /// an empty, unterminated string.
    ///
    /// A string of up to [`MAX_STRING_LEN`] bytes plus its terminator reads
    /// normally. A longer run is capped: the cursor stops right after the
    /// first [`MAX_STRING_LEN`] bytes and the rest is left unread.
    pub fn read_cstring(&mut self) -> TerminatedString {
        let rest = self.rest();
        let scan = &rest[..rest.len().min(MAX_STRING_LEN + 1)];

        let (body, terminated) = match scan.iter().position(|&b| b == 0) {
            Some(nul) => (&scan[..nul], true),
            None => (&scan[..scan.len().min(MAX_STRING_LEN)], false),
        };
        let capped = !terminated && rest.len() > MAX_STRING_LEN;

        self.pos += body.len() + usize::from(terminated);

        TerminatedString {
            text: body.iter().copied().map(char::from).collect(),
            terminated,
            capped,
        }
    }
}
