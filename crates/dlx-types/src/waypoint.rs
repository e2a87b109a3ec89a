use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::{BlockGrammar, Decoded, decode_with};
use crate::reader::PayloadReader;

/// Why the vehicle recorded a waypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WaypointKind {
    Halted,
    #[default]
    Passed,
    /// The vehicle halted at the first or last stop of a trip.
    FirstOrLastStop,
    Other(u8),
}

impl WaypointKind {
    pub fn from_wire_byte(b: u8) -> Self {
        match b {
            1 => Self::Halted,
            2 => Self::Passed,
            3 => Self::FirstOrLastStop,
            other => Self::Other(other),
        }
    }

    pub fn to_wire_byte(self) -> u8 {
        match self {
            Self::Halted => 1,
            Self::Passed => 2,
            Self::FirstOrLastStop => 3,
            Self::Other(b) => b,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// The two on-wire waypoint layouts.
///
/// ```text
/// legacy (16 bytes)                 current (20+ bytes)
/// ┌────────┬───────────────┐        ┌────────┬─────────────────┐
/// │ 0      │ timestamp u32 │        │ 0      │ departure u32   │
/// │ 4      │ lat i32 (µ°)  │        │ 4      │ arrival u32     │
/// │ 8      │ lon i32 (µ°)  │        │ 8      │ kind u8         │
/// │ 12     │ speed i16 cm/s│        │ 9      │ lat i32         │
/// │ 14     │ course i16    │        │ 13     │ lon i32         │
/// └────────┴───────────────┘        │ 17     │ satellites u8   │
///                                   │ 18     │ distance i16    │
///                                   │ 20     │ speed i16       │
///                                   │ 22     │ stop id string  │
///                                   └────────┴─────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WaypointFormat {
    Legacy,
    #[default]
    Current,
}

impl WaypointFormat {
    pub const LEGACY_LEN: usize = 16;
    /// Current layout up to and including the travelled distance.
    pub const CURRENT_MIN_LEN: usize = 20;
    const KIND_OFFSET: usize = 8;

    /// Pick the layout of a WAYP payload.
    ///
    /// A payload of at least 20 bytes whose byte 8 is a known waypoint
    /// kind is current; otherwise one of at least 16 bytes is legacy.
    /// Anything shorter is `None`.
    pub fn detect(payload: &[u8]) -> Option<Self> {
        Self::classify(payload.len(), payload.get(Self::KIND_OFFSET).copied())
    }

    fn classify(len: usize, kind_byte: Option<u8>) -> Option<Self> {
        let known_kind = kind_byte.is_some_and(|b| WaypointKind::from_wire_byte(b).is_known());
        if len >= Self::CURRENT_MIN_LEN && known_kind {
            Some(Self::Current)
        } else if len >= Self::LEGACY_LEN {
            Some(Self::Legacy)
        } else {
            None
        }
    }
}

/// Speed value meaning "not measurable".
pub const SPEED_UNKNOWN: i16 = -1;

/// WAYP block: a GPS waypoint.
///
/// Both layouts decode into the current representation: coordinates in
/// 0.0001 arc-minutes and speed in 0.1 km/h. Legacy values are converted
/// with truncation toward zero, the single timestamp fills both departure
/// and arrival, and `course` is only present for legacy payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WaypointBlock {
    pub format: WaypointFormat,
    pub departure: u32,
    pub arrival: u32,
    pub kind: WaypointKind,
    /// 0.0001 arc-minutes, south negative, 0 = unknown.
    pub latitude: i32,
    /// 0.0001 arc-minutes, west negative, 0 = unknown.
    pub longitude: i32,
    pub satellites: u8,
    /// Metres since the previous waypoint, negative = not measurable.
    pub distance: i16,
    /// 0.1 km/h, negative = not measurable.
    pub speed: i16,
    /// Heading in 0.01 degrees.
    pub course: Option<i16>,
    pub stop_id: String,
}

#[allow(clippy::cast_possible_truncation)] // |v * 0.6| <= |v|
fn micro_degrees_to_ten_thousandth_minutes(v: i32) -> i32 {
    (i64::from(v) * 6 / 10) as i32
}

#[allow(clippy::cast_possible_truncation)] // |v * 0.36| <= |v|
fn cm_per_sec_to_tenth_kmh(v: i16) -> i16 {
    (i32::from(v) * 36 / 100) as i16
}

fn minutes_to_degrees(v: i32) -> Option<f64> {
    (v != 0).then(|| f64::from(v) * 0.0001 / 60.0)
}

impl WaypointBlock {
    /// Decode a payload known to use the legacy layout.
    pub fn decode_legacy(payload: &[u8]) -> Decoded<Self> {
        decode_with(
            BlockType::Waypoint,
            WaypointFormat::LEGACY_LEN,
            payload,
            Self::parse_legacy,
        )
    }

    /// Decode a payload known to use the current layout.
    pub fn decode_current(payload: &[u8]) -> Decoded<Self> {
        decode_with(
            BlockType::Waypoint,
            WaypointFormat::CURRENT_MIN_LEN,
            payload,
            Self::parse_current,
        )
    }

    fn parse_legacy(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let latitude = r.i32()?;
        let longitude = r.i32()?;
        let speed = r.i16()?;
        let course = r.i16()?;
        r.finish();
        Ok(Self {
            format: WaypointFormat::Legacy,
            departure: timestamp,
            arrival: timestamp,
            kind: WaypointKind::Passed,
            latitude: micro_degrees_to_ten_thousandth_minutes(latitude),
            longitude: micro_degrees_to_ten_thousandth_minutes(longitude),
            satellites: 0,
            distance: 0,
            speed: cm_per_sec_to_tenth_kmh(speed),
            course: Some(course),
            stop_id: String::new(),
        })
    }

    fn parse_current(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let mut wp = Self {
            format: WaypointFormat::Current,
            departure: r.u32()?,
            arrival: r.u32()?,
            kind: WaypointKind::from_wire_byte(r.u8()?),
            latitude: r.i32()?,
            longitude: r.i32()?,
            satellites: r.u8()?,
            distance: r.i16()?,
            speed: SPEED_UNKNOWN,
            course: None,
            stop_id: String::new(),
        };
        if !wp.kind.is_known() {
            r.warn(DecodeWarning::UnexpectedValue {
                field: "waypoint kind",
                found: wp.kind.to_wire_byte().into(),
                expected: WaypointKind::FirstOrLastStop.to_wire_byte().into(),
            });
        }

        if r.remaining() >= 2 {
            wp.speed = r.i16()?;
            wp.stop_id = r.optional_string().unwrap_or_default();
        } else {
            r.warn(DecodeWarning::MissingField { field: "speed" });
        }
        r.finish();
        Ok(wp)
    }

    /// Arrival time; for legacy waypoints the only recorded time.
    pub fn timestamp(&self) -> u32 {
        self.arrival
    }

    pub fn latitude_degrees(&self) -> Option<f64> {
        minutes_to_degrees(self.latitude)
    }

    pub fn longitude_degrees(&self) -> Option<f64> {
        minutes_to_degrees(self.longitude)
    }

    pub fn speed_kmh(&self) -> Option<f64> {
        (self.speed >= 0).then(|| f64::from(self.speed) * 0.1)
    }

    pub fn course_degrees(&self) -> Option<f64> {
        self.course.map(|c| f64::from(c) / 100.0)
    }
}

impl BlockGrammar for WaypointBlock {
    const BLOCK_TYPE: BlockType = BlockType::Waypoint;
    const MIN_LEN: usize = WaypointFormat::LEGACY_LEN;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        match WaypointFormat::classify(r.remaining(), r.peek_u8_at(WaypointFormat::KIND_OFFSET)) {
            Some(WaypointFormat::Current) => Self::parse_current(r),
            // `decode` has already rejected payloads below LEGACY_LEN.
            Some(WaypointFormat::Legacy) | None => Self::parse_legacy(r),
        }
    }
}
