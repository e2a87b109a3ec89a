use std::iter::FusedIterator;
use std::mem;

use dlx_types::{Block, BlockContent, BlockType, DecodeWarning, FileHeaderBlock};
use dlx_wire::{ByteCursor, Endian, FrameHeader, crc16};

use crate::config::{ChecksumPolicy, DecoderConfig};
use crate::error::{DecodeError, FramePhase};
use crate::registry::BlockRegistry;

/// The result of decoding a whole buffer.
///
/// `blocks` is every frame that was read before decoding stopped, in file
/// order. `error` is the fault that stopped it, if any. `consumed` is the
/// number of input bytes covered by `blocks`: the end of the last decoded
/// frame.
#[derive(Debug)]
pub struct DecodedFile {
    pub blocks: Vec<Block>,
    pub error: Option<DecodeError>,
    pub consumed: usize,
}

impl DecodedFile {
    /// True if the input was decoded to its end (or to FEND) without a
    /// fatal error. Blocks may still carry warnings.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The first FHDR block, if any.
    pub fn header(&self) -> Option<&FileHeaderBlock> {
        self.blocks.iter().find_map(|block| match &block.content {
            BlockContent::FileHeader(header) => Some(header),
            _ => None,
        })
    }

    pub fn blocks_of(&self, block_type: BlockType) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |block| block.block_type() == block_type)
    }

    pub fn has_file_end(&self) -> bool {
        self.blocks_of(BlockType::FileEnd).next().is_some()
    }

    pub fn warning_count(&self) -> usize {
        self.blocks.iter().map(|block| block.warnings.len()).sum()
    }
}

/// Decoder for DLX3 log files.
///
/// Borrows a [`BlockRegistry`] for dispatching payloads to grammars; the
/// registry is not modified, so one registry can serve many decoders.
///
/// # Example
///
/// ```rust
/// use dlx_decoder::{BlockRegistry, Dlx3Decoder};
///
/// let registry = BlockRegistry::default();
/// let decoder = Dlx3Decoder::new(&registry);
/// // FEND frame with an empty payload.
/// let file = decoder.decode(&[b'F', b'E', b'N', b'D', 0x00, 0x00, 0x1D, 0x1B]);
/// assert!(file.is_complete());
/// assert!(file.has_file_end());
/// ```
#[derive(Debug, Clone)]
pub struct Dlx3Decoder<'r> {
    registry: &'r BlockRegistry,
    config: DecoderConfig,
}

impl<'r> Dlx3Decoder<'r> {
    pub fn new(registry: &'r BlockRegistry) -> Self {
        Self::with_config(registry, DecoderConfig::default())
    }

    pub fn with_config(registry: &'r BlockRegistry, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Iterate over the frames of `input` one block at a time.
    pub fn frames<'a>(&self, input: &'a [u8]) -> FrameReader<'a, 'r> {
        FrameReader {
            cursor: ByteCursor::new(input),
            registry: self.registry,
            config: self.config.clone(),
            state: ReadState::Start,
            consumed: 0,
        }
    }

    /// Decode every frame of `input`.
    ///
    /// Never panics and never fails outright: a fatal fault ends decoding
    /// and is returned in [`DecodedFile::error`] next to the blocks read
    /// before it.
    pub fn decode(&self, input: &[u8]) -> DecodedFile {
        let mut frames = self.frames(input);
        let mut blocks = Vec::new();
        let mut error = None;
        for item in frames.by_ref() {
            match item {
                Ok(block) => blocks.push(block),
                Err(err) => {
                    error = Some(err);
                    break;
                }
            }
        }
        log::debug!(
            "decoded {} blocks from {} of {} bytes",
            blocks.len(),
            frames.consumed(),
            input.len()
        );
        DecodedFile {
            blocks,
            error,
            consumed: frames.consumed(),
        }
    }
}

/// Internal state machine of the frame reader.
///
/// ```text
///   Start → ReadHeader → ReadPayload → ReadChecksum → Dispatch ─┐
///              ▲                                                 │
///              └──────────────── next frame ─────────────────────┤
///                                                                ▼
///                            end of input / FEND / fatal error → End
/// ```
enum ReadState<'a> {
    Start,
    ReadHeader,
    ReadPayload {
        offset: usize,
        header: FrameHeader,
    },
    ReadChecksum {
        offset: usize,
        header: FrameHeader,
        payload: &'a [u8],
    },
    Dispatch {
        offset: usize,
        header: FrameHeader,
        payload: &'a [u8],
        checksum: u16,
        checksum_warning: Option<DecodeWarning>,
    },
    End,
}

/// Iterator over the blocks of a DLX3 buffer.
///
/// Yields `Ok(Block)` for every frame and at most one `Err`, after which
/// it is exhausted.
pub struct FrameReader<'a, 'r> {
    cursor: ByteCursor<'a>,
    registry: &'r BlockRegistry,
    config: DecoderConfig,
    state: ReadState<'a>,
    consumed: usize,
}

impl FrameReader<'_, '_> {
    /// Bytes covered by the blocks yielded so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn fail(&mut self, err: DecodeError) -> Option<Result<Block, DecodeError>> {
        log::warn!("decoding stopped: {err}");
        self.state = ReadState::End;
        Some(Err(err))
    }

    fn dispatch(
        &mut self,
        offset: usize,
        header: FrameHeader,
        payload: &[u8],
        checksum: u16,
        checksum_warning: Option<DecodeWarning>,
    ) -> Block {
        let mut warnings: Vec<DecodeWarning> = checksum_warning.into_iter().collect();

        let content = match self.registry.construct(header.tag, payload) {
            Some(decoded) => {
                warnings.extend(decoded.warnings);
                decoded.value
            }
            None => {
                log::warn!("no grammar for tag {} at offset {offset}", header.tag);
                warnings.push(DecodeWarning::UnknownTag { tag: header.tag });
                BlockContent::Unknown { tag: header.tag }
            }
        };

        self.consumed = self.cursor.position();
        self.state = ReadState::ReadHeader;

        if self.config.stop_at_file_end && header.tag == BlockType::FileEnd.tag() {
            let trailing = self.cursor.remaining();
            if trailing > 0 {
                log::warn!("{trailing} bytes after FEND at offset {}", self.consumed);
                warnings.push(DecodeWarning::DataAfterFileEnd { bytes: trailing });
            }
            self.state = ReadState::End;
        }

        log::debug!(
            "{} block at offset {offset}, {} payload bytes",
            header.tag,
            header.length
        );
        for warning in &warnings {
            log::trace!("{} at offset {offset}: {warning}", header.tag);
        }

        Block {
            tag: header.tag,
            declared_length: header.length,
            checksum,
            payload: payload.to_vec(),
            offset,
            content,
            warnings,
        }
    }
}

impl Iterator for FrameReader<'_, '_> {
    type Item = Result<Block, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.state, ReadState::End) {
                ReadState::Start => {
                    log::trace!("reading {} bytes", self.cursor.remaining());
                    self.state = ReadState::ReadHeader;
                }
                ReadState::ReadHeader => {
                    if self.cursor.is_empty() {
                        return None;
                    }
                    let offset = self.cursor.position();
                    match FrameHeader::read_from(&mut self.cursor) {
                        Ok(header) => self.state = ReadState::ReadPayload { offset, header },
                        Err(err) => return self.fail(DecodeError::in_phase(FramePhase::Header, err)),
                    }
                }
                ReadState::ReadPayload { offset, header } => {
                    match self.cursor.read_bytes(usize::from(header.length)) {
                        Ok(payload) => {
                            self.state = ReadState::ReadChecksum {
                                offset,
                                header,
                                payload,
                            };
                        }
                        Err(err) => return self.fail(DecodeError::in_phase(FramePhase::Payload, err)),
                    }
                }
                ReadState::ReadChecksum {
                    offset,
                    header,
                    payload,
                } => {
                    let stored = match self.cursor.read_u16(Endian::Big) {
                        Ok(stored) => stored,
                        Err(err) => return self.fail(DecodeError::in_phase(FramePhase::Checksum, err)),
                    };
                    let computed = crc16::frame_checksum(header.tag.bytes(), payload);
                    let mut checksum_warning = None;
                    if stored != computed {
                        match self.config.checksum_policy {
                            ChecksumPolicy::Ignore => {}
                            ChecksumPolicy::Warn => {
                                log::warn!(
                                    "checksum mismatch in {} frame at offset {offset}: stored {stored:#06x}, computed {computed:#06x}",
                                    header.tag
                                );
                                checksum_warning = Some(DecodeWarning::ChecksumMismatch { stored, computed });
                            }
                            ChecksumPolicy::Reject => {
                                return self.fail(DecodeError::ChecksumMismatch {
                                    tag: header.tag,
                                    offset,
                                    stored,
                                    computed,
                                });
                            }
                        }
                    }
                    self.state = ReadState::Dispatch {
                        offset,
                        header,
                        payload,
                        checksum: stored,
                        checksum_warning,
                    };
                }
                ReadState::Dispatch {
                    offset,
                    header,
                    payload,
                    checksum,
                    checksum_warning,
                } => {
                    return Some(Ok(self.dispatch(offset, header, payload, checksum, checksum_warning)));
                }
                ReadState::End => return None,
            }
        }
    }
}

impl FusedIterator for FrameReader<'_, '_> {}
