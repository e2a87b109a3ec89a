use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::reader::PayloadReader;

/// A decoded value together with the warnings raised while decoding it.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<DecodeWarning>,
}

impl<T> Decoded<T> {
    pub fn new(value: T, warnings: Vec<DecodeWarning>) -> Self {
        Self { value, warnings }
    }

    /// A value decoded without any warnings.
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// The decoding grammar of one block type.
///
/// Implementors describe only the happy path in [`parse`](Self::parse),
/// reading fields with `?`. The provided [`decode`](Self::decode) wraps it
/// with the policy every grammar shares:
///
/// ```text
///   payload.len() < MIN_LEN  ──▶ Default + TooShort
///   parse(..) == Ok(v)       ──▶ v + warnings raised during parse
///   parse(..) == Err(e)      ──▶ Default + warnings + Internal(e)
/// ```
///
/// `decode` is a pure function of the payload and returns a fresh value
/// on every call.
pub trait BlockGrammar: Default + Sized {
    const BLOCK_TYPE: BlockType;

    /// Shortest payload the grammar will attempt to parse.
    const MIN_LEN: usize;

    /// Parse the payload fields.
    ///
    /// # Errors
    ///
    /// A [`WireError`] from any primitive read. Grammars check lengths
    /// before reading, so an error here means the grammar itself is at
    /// fault; `decode` reports it as [`DecodeWarning::Internal`].
    fn parse(reader: &mut PayloadReader<'_>) -> Result<Self, WireError>;

    fn decode(payload: &[u8]) -> Decoded<Self> {
        decode_with(Self::BLOCK_TYPE, Self::MIN_LEN, payload, Self::parse)
    }
}

/// The shared grammar boundary, for grammars with more than one entry
/// point (e.g. the two waypoint layouts).
pub(crate) fn decode_with<T: Default>(
    block_type: BlockType,
    min_len: usize,
    payload: &[u8],
    parse: impl FnOnce(&mut PayloadReader<'_>) -> Result<T, WireError>,
) -> Decoded<T> {
    if payload.len() < min_len {
        return Decoded::new(
            T::default(),
            vec![DecodeWarning::TooShort {
                needed: min_len,
                actual: payload.len(),
            }],
        );
    }

    let mut reader = PayloadReader::new(payload);
    match parse(&mut reader) {
        Ok(value) => Decoded::new(value, reader.into_warnings()),
        Err(err) => {
            let mut warnings = reader.into_warnings();
            warnings.push(DecodeWarning::Internal {
                detail: format!("{block_type}: {err}"),
            });
            Decoded::new(T::default(), warnings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair(u16, u16);

    impl BlockGrammar for Pair {
        const BLOCK_TYPE: BlockType = BlockType::FileEnd;
        const MIN_LEN: usize = 2;

        fn parse(reader: &mut PayloadReader<'_>) -> Result<Self, WireError> {
            // Deliberately reads past MIN_LEN to exercise the fault path.
            Ok(Self(reader.u16()?, reader.u16()?))
        }
    }

    #[test]
    fn below_minimum_is_default_and_too_short() {
        let d = Pair::decode(&[1]);
        assert_eq!(d.value, Pair::default());
        assert_eq!(
            d.warnings,
            vec![DecodeWarning::TooShort {
                needed: 2,
                actual: 1
            }]
        );
    }

    #[test]
    fn read_fault_becomes_internal_warning() {
        let d = Pair::decode(&[0, 1, 0]);
        assert_eq!(d.value, Pair::default());
        assert_eq!(d.warnings.len(), 1);
        assert!(matches!(&d.warnings[0], DecodeWarning::Internal { detail } if detail.starts_with("FEND")));
    }

    #[test]
    fn clean_parse() {
        let d = Pair::decode(&[0, 1, 0, 2]);
        assert!(d.is_clean());
        assert_eq!(d.value, Pair(1, 2));
        assert_eq!(d.map(|p| p.0 + p.1).value, 3);
    }
}
