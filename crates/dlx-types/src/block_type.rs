use std::fmt;

use dlx_wire::TypeTag;

/// Block type identifiers.
///
/// Each variant maps to the four-byte tag that opens its frame. Tags are
/// case-sensitive: the two fleet-management blocks use a lowercase `r`.
/// Tags with no known grammar are captured by `Unknown(tag)` so that a
/// file written by newer firmware still decodes.
///
/// ```text
/// ┌──────┬───────────────────┬────────────────────────────────────┐
/// │ Tag  │ Variant           │ Description                        │
/// ├──────┼───────────────────┼────────────────────────────────────┤
/// │ FHDR │ FileHeader        │ Revision, device, vehicle          │
/// │ FEND │ FileEnd           │ End-of-file marker                 │
/// │ CDAT │ DoorCount         │ Completed counts per door          │
/// │ CONF │ DoorConfig        │ Door sensor configuration          │
/// │ DIAG │ Diagnostic        │ Diagnostic message log             │
/// │ FSTP │ IntermediateCount │ Intermediate counts per door       │
/// │ FORM │ TrainFormation    │ Coupled cars of a train            │
/// │ EVNT │ UserEvent         │ Stop reached/left, power on/off    │
/// │ PDWN │ PowerDown         │ Legacy power outage record         │
/// │ PISM │ PassengerInfo     │ Passenger information message      │
/// │ WAYP │ Waypoint          │ GPS waypoint                       │
/// │ rFMS │ FleetTelemetry    │ Fleet management telemetry         │
/// │ rPET │ ExchangeTime      │ Passenger exchange time per door   │
/// └──────┴───────────────────┴────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    FileHeader,
    FileEnd,
    DoorCount,
    DoorConfig,
    Diagnostic,
    IntermediateCount,
    TrainFormation,
    UserEvent,
    PowerDown,
    PassengerInfo,
    Waypoint,
    FleetTelemetry,
    ExchangeTime,
    /// A tag with no grammar in this crate. The raw tag is preserved.
    Unknown(TypeTag),
}

impl BlockType {
    /// Every type with a grammar, in tag-table order.
    pub const KNOWN: [Self; 13] = [
        Self::FileHeader,
        Self::FileEnd,
        Self::DoorCount,
        Self::DoorConfig,
        Self::Diagnostic,
        Self::IntermediateCount,
        Self::TrainFormation,
        Self::UserEvent,
        Self::PowerDown,
        Self::PassengerInfo,
        Self::Waypoint,
        Self::FleetTelemetry,
        Self::ExchangeTime,
    ];

    pub const fn tag(&self) -> TypeTag {
        TypeTag::new(match self {
            Self::FileHeader => *b"FHDR",
            Self::FileEnd => *b"FEND",
            Self::DoorCount => *b"CDAT",
            Self::DoorConfig => *b"CONF",
            Self::Diagnostic => *b"DIAG",
            Self::IntermediateCount => *b"FSTP",
            Self::TrainFormation => *b"FORM",
            Self::UserEvent => *b"EVNT",
            Self::PowerDown => *b"PDWN",
            Self::PassengerInfo => *b"PISM",
            Self::Waypoint => *b"WAYP",
            Self::FleetTelemetry => *b"rFMS",
            Self::ExchangeTime => *b"rPET",
            Self::Unknown(tag) => *tag.bytes(),
        })
    }

    pub fn from_tag(tag: TypeTag) -> Self {
        match tag.bytes() {
            b"FHDR" => Self::FileHeader,
            b"FEND" => Self::FileEnd,
            b"CDAT" => Self::DoorCount,
            b"CONF" => Self::DoorConfig,
            b"DIAG" => Self::Diagnostic,
            b"FSTP" => Self::IntermediateCount,
            b"FORM" => Self::TrainFormation,
            b"EVNT" => Self::UserEvent,
            b"PDWN" => Self::PowerDown,
            b"PISM" => Self::PassengerInfo,
            b"WAYP" => Self::Waypoint,
            b"rFMS" => Self::FleetTelemetry,
            b"rPET" => Self::ExchangeTime,
            _ => Self::Unknown(tag),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tag(), f)
    }
}
