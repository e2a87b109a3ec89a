use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// FHDR block: opens every file and identifies the recording device.
///
/// ```text
/// ┌────────┬──────────────────┬──────────────────────────────────┐
/// │ Offset │ Field            │ Notes                            │
/// ├────────┼──────────────────┼──────────────────────────────────┤
/// │ 0      │ revision u8      │ 'D' (68) for this format         │
/// │ 1      │ creation u32     │ Unix seconds                     │
/// │ 5      │ previous u32     │ previous file creation, 0 = none │
/// │ 9      │ geodetic u8      │ 1 = WGS84                        │
/// │ 10     │ 5 × string       │ tz, model, serial, operator, veh │
/// └────────┴──────────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileHeaderBlock {
    pub revision: u8,
    pub creation_time: u32,
    pub previous_file_time: u32,
    pub geodetic_system: u8,
    pub time_zone: String,
    pub device_model: String,
    pub device_serial: String,
    pub operator: String,
    pub vehicle_id: String,
}

impl FileHeaderBlock {
    pub const EXPECTED_REVISION: u8 = b'D';
    pub const WGS84: u8 = 1;

    pub fn has_previous_file(&self) -> bool {
        self.previous_file_time != 0
    }

    pub fn is_expected_revision(&self) -> bool {
        self.revision == Self::EXPECTED_REVISION
    }

    pub fn is_wgs84(&self) -> bool {
        self.geodetic_system == Self::WGS84
    }
}

impl BlockGrammar for FileHeaderBlock {
    const BLOCK_TYPE: BlockType = BlockType::FileHeader;
    const MIN_LEN: usize = 10;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let revision = r.u8()?;
        if revision != Self::EXPECTED_REVISION {
            r.warn(DecodeWarning::UnexpectedValue {
                field: "revision",
                found: revision.into(),
                expected: Self::EXPECTED_REVISION.into(),
            });
        }
        let creation_time = r.u32()?;
        let previous_file_time = r.u32()?;
        let geodetic_system = r.u8()?;
        if geodetic_system != Self::WGS84 {
            r.warn(DecodeWarning::UnexpectedValue {
                field: "geodetic system",
                found: geodetic_system.into(),
                expected: Self::WGS84.into(),
            });
        }

        let header = Self {
            revision,
            creation_time,
            previous_file_time,
            geodetic_system,
            time_zone: header_string(r, "time zone"),
            device_model: header_string(r, "device model"),
            device_serial: header_string(r, "device serial"),
            operator: header_string(r, "operator"),
            vehicle_id: header_string(r, "vehicle id"),
        };
        r.finish();
        Ok(header)
    }
}

/// Header strings are mandatory; an absent or unterminated one is kept
/// as read and flagged.
fn header_string(r: &mut PayloadReader<'_>, field: &'static str) -> String {
    let s = r.string();
    if !s.terminated && !s.capped {
        r.warn(DecodeWarning::MissingField { field });
    }
    s.text
}
