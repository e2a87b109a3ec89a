use dlx_wire::{BlockEnvelope, TypeTag, WireError};

use crate::block_type::BlockType;
use crate::diagnostic::DiagnosticBlock;
use crate::door_config::DoorConfigBlock;
use crate::door_count::DoorCountBlock;
use crate::error::DecodeWarning;
use crate::exchange_time::ExchangeTimeBlock;
use crate::file_end::FileEndBlock;
use crate::file_header::FileHeaderBlock;
use crate::fleet_telemetry::FleetTelemetryBlock;
use crate::grammar::{BlockGrammar, Decoded};
use crate::intermediate_count::IntermediateCountBlock;
use crate::passenger_info::PassengerInfoBlock;
use crate::power_down::PowerDownBlock;
use crate::train_formation::TrainFormationBlock;
use crate::user_event::UserEventBlock;
use crate::waypoint::WaypointBlock;

/// One decoded frame of a DLX3 file.
///
/// Keeps the raw envelope fields next to the typed content so that a
/// consumer can re-verify or re-encode the frame, and records where in
/// the input the frame started.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    pub tag: TypeTag,
    pub declared_length: u16,
    /// Trailer value as stored in the file, valid or not.
    pub checksum: u16,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub payload: Vec<u8>,
    /// Byte offset of the frame's first tag byte in the input.
    pub offset: usize,
    pub content: BlockContent,
    pub warnings: Vec<DecodeWarning>,
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        BlockType::from_tag(self.tag)
    }

    /// Rebuild the wire envelope, keeping the stored checksum.
    ///
    /// # Errors
    ///
    /// [`WireError::PayloadTooLarge`] if the payload was modified past the
    /// 16-bit length limit.
    pub fn envelope(&self) -> Result<BlockEnvelope, WireError> {
        BlockEnvelope::with_checksum(self.tag, self.payload.clone(), self.checksum)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// The typed content of a block.
///
/// ```text
/// ┌────────────────────┬──────┐
/// │ Variant            │ Tag  │
/// ├────────────────────┼──────┤
/// │ FileHeader         │ FHDR │
/// │ FileEnd            │ FEND │
/// │ DoorCount          │ CDAT │
/// │ DoorConfig         │ CONF │
/// │ Diagnostic         │ DIAG │
/// │ IntermediateCount  │ FSTP │
/// │ TrainFormation     │ FORM │
/// │ UserEvent          │ EVNT │
/// │ PowerDown          │ PDWN │
/// │ PassengerInfo      │ PISM │
/// │ Waypoint           │ WAYP │
/// │ FleetTelemetry     │ rFMS │
/// │ ExchangeTime       │ rPET │
/// │ Unknown            │ any  │
/// └────────────────────┴──────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum BlockContent {
    FileHeader(FileHeaderBlock),
    FileEnd(FileEndBlock),
    DoorCount(DoorCountBlock),
    DoorConfig(DoorConfigBlock),
    Diagnostic(DiagnosticBlock),
    IntermediateCount(IntermediateCountBlock),
    TrainFormation(TrainFormationBlock),
    UserEvent(UserEventBlock),
    PowerDown(PowerDownBlock),
    PassengerInfo(PassengerInfoBlock),
    Waypoint(WaypointBlock),
    FleetTelemetry(FleetTelemetryBlock),
    ExchangeTime(ExchangeTimeBlock),
    /// A tag with no grammar. The payload stays on the [`Block`].
    Unknown { tag: TypeTag },
}

impl BlockContent {
    /// Decode a payload with the built-in grammar for `block_type`.
    ///
    /// `Unknown` types decode to [`BlockContent::Unknown`] without a
    /// warning; reporting an unregistered tag is the frame reader's job.
    pub fn decode(block_type: BlockType, payload: &[u8]) -> Decoded<Self> {
        match block_type {
            BlockType::FileHeader => FileHeaderBlock::decode(payload).map(Self::FileHeader),
            BlockType::FileEnd => FileEndBlock::decode(payload).map(Self::FileEnd),
            BlockType::DoorCount => DoorCountBlock::decode(payload).map(Self::DoorCount),
            BlockType::DoorConfig => DoorConfigBlock::decode(payload).map(Self::DoorConfig),
            BlockType::Diagnostic => DiagnosticBlock::decode(payload).map(Self::Diagnostic),
            BlockType::IntermediateCount => {
                IntermediateCountBlock::decode(payload).map(Self::IntermediateCount)
            }
            BlockType::TrainFormation => {
                TrainFormationBlock::decode(payload).map(Self::TrainFormation)
            }
            BlockType::UserEvent => UserEventBlock::decode(payload).map(Self::UserEvent),
            BlockType::PowerDown => PowerDownBlock::decode(payload).map(Self::PowerDown),
            BlockType::PassengerInfo => {
                PassengerInfoBlock::decode(payload).map(Self::PassengerInfo)
            }
            BlockType::Waypoint => WaypointBlock::decode(payload).map(Self::Waypoint),
            BlockType::FleetTelemetry => {
                FleetTelemetryBlock::decode(payload).map(Self::FleetTelemetry)
            }
            BlockType::ExchangeTime => ExchangeTimeBlock::decode(payload).map(Self::ExchangeTime),
            BlockType::Unknown(tag) => Decoded::clean(Self::Unknown { tag }),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Self::FileHeader(_) => BlockType::FileHeader,
            Self::FileEnd(_) => BlockType::FileEnd,
            Self::DoorCount(_) => BlockType::DoorCount,
            Self::DoorConfig(_) => BlockType::DoorConfig,
            Self::Diagnostic(_) => BlockType::Diagnostic,
            Self::IntermediateCount(_) => BlockType::IntermediateCount,
            Self::TrainFormation(_) => BlockType::TrainFormation,
            Self::UserEvent(_) => BlockType::UserEvent,
            Self::PowerDown(_) => BlockType::PowerDown,
            Self::PassengerInfo(_) => BlockType::PassengerInfo,
            Self::Waypoint(_) => BlockType::Waypoint,
            Self::FleetTelemetry(_) => BlockType::FleetTelemetry,
            Self::ExchangeTime(_) => BlockType::ExchangeTime,
            Self::Unknown { tag } => BlockType::Unknown(*tag),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_type_dispatches_to_its_variant() {
        for block_type in BlockType::KNOWN {
            let d = BlockContent::decode(block_type, &[]);
            assert_eq!(d.value.block_type(), block_type);
            // Every grammar but FEND needs at least a timestamp.
            if block_type != BlockType::FileEnd {
                assert!(
                    matches!(d.warnings.as_slice(), [DecodeWarning::TooShort { actual: 0, .. }]),
                    "{block_type}: {:?}",
                    d.warnings
                );
            }
        }
    }

    #[test]
    fn unknown_type_has_no_warning() {
        let tag = TypeTag::new(*b"ZZZZ");
        let d = BlockContent::decode(BlockType::Unknown(tag), b"whatever");
        assert!(d.is_clean());
        assert!(d.value.is_unknown());
        assert_eq!(d.value.block_type(), BlockType::Unknown(tag));
    }

    #[test]
    fn envelope_keeps_stored_checksum() {
        let block = Block {
            tag: BlockType::FileEnd.tag(),
            declared_length: 0,
            checksum: 0x1234,
            payload: Vec::new(),
            offset: 0,
            content: BlockContent::FileEnd(FileEndBlock),
            warnings: Vec::new(),
        };
        let env = block.envelope().unwrap();
        assert_eq!(env.checksum(), 0x1234);
        assert_eq!(env.expected_checksum(), 0x1D1B);
        assert_eq!(block.block_type(), BlockType::FileEnd);
    }
}
