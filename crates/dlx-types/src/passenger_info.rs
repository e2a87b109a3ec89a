use std::collections::BTreeMap;

use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::BlockGrammar;
use crate::pairs::collect_pairs;
use crate::reader::PayloadReader;

/// Source protocol of a passenger information message.
///
/// ```text
/// ┌──────┬──────────┐
/// │ Wire │ Variant  │
/// ├──────┼──────────┤
/// │ 0    │ Unknown  │
/// │ 1    │ Ibis     │
/// │ 2    │ J1587    │
/// │ 3    │ J1939    │
/// │ 4    │ Csv      │
/// │ 5    │ TripData │
/// └──────┴──────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PisProtocol {
    #[default]
    Unknown,
    Ibis,
    J1587,
    J1939,
    Csv,
    TripData,
    /// A protocol byte outside the defined range, preserved as-is.
    Other(u8),
}

impl PisProtocol {
    pub fn from_wire_byte(b: u8) -> Self {
        match b {
            0 => Self::Unknown,
            1 => Self::Ibis,
            2 => Self::J1587,
            3 => Self::J1939,
            4 => Self::Csv,
            5 => Self::TripData,
            other => Self::Other(other),
        }
    }

    pub fn to_wire_byte(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Ibis => 1,
            Self::J1587 => 2,
            Self::J1939 => 3,
            Self::Csv => 4,
            Self::TripData => 5,
            Self::Other(b) => b,
        }
    }
}

/// PISM block: a message captured from the passenger information system.
///
/// Layout: timestamp `u32`, protocol `u8`, optional string. For
/// [`PisProtocol::TripData`] the string is parsed as `key:value` pairs
/// into [`trip_data`](Self::trip_data); for every other protocol only
/// the raw text is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PassengerInfoBlock {
    pub timestamp: u32,
    pub protocol: PisProtocol,
    pub message: Option<String>,
    pub trip_data: BTreeMap<String, String>,
}

impl PassengerInfoBlock {
    /// A trip data value. Always `None` unless the protocol is trip data.
    pub fn trip_value(&self, key: &str) -> Option<&str> {
        if self.protocol != PisProtocol::TripData {
            return None;
        }
        self.trip_data.get(key).map(String::as_str)
    }

    pub fn line(&self) -> Option<&str> {
        self.trip_value("line")
    }

    pub fn route(&self) -> Option<&str> {
        self.trip_value("route")
    }

    pub fn trip(&self) -> Option<&str> {
        self.trip_value("trip")
    }

    pub fn stop(&self) -> Option<&str> {
        self.trip_value("stop")
    }

    pub fn stop_id(&self) -> Option<&str> {
        self.trip_value("stopid")
    }

    pub fn next_stop(&self) -> Option<&str> {
        self.trip_value("nextstop")
    }

    pub fn next_stop_id(&self) -> Option<&str> {
        self.trip_value("nextstopid")
    }

    pub fn stops_left(&self) -> Option<i32> {
        self.trip_value("stopsleft")?.parse().ok()
    }

    pub fn destination(&self) -> Option<&str> {
        self.trip_value("destination")
    }

    pub fn course(&self) -> Option<&str> {
        self.trip_value("course")
    }
}

impl BlockGrammar for PassengerInfoBlock {
    const BLOCK_TYPE: BlockType = BlockType::PassengerInfo;
    const MIN_LEN: usize = 5;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let protocol = PisProtocol::from_wire_byte(r.u8()?);
        let message = r.optional_string();
        let trip_data = match (&message, protocol) {
            (Some(text), PisProtocol::TripData) => collect_pairs(text, r),
            _ => BTreeMap::new(),
        };
        r.finish();
        Ok(Self {
            timestamp,
            protocol,
            message,
            trip_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeWarning;

    fn payload(protocol: u8, text: &str) -> Vec<u8> {
        let mut p = 1000u32.to_be_bytes().to_vec();
        p.push(protocol);
        p.extend_from_slice(text.as_bytes());
        p.push(0);
        p
    }

    #[test]
    fn trip_data_accessors() {
        let d = PassengerInfoBlock::decode(&payload(
            5,
            "line:12,route:A,trip:0815,stop:Main St,stopid:MS1,nextstop:Park,nextstopid:PK2,stopsleft:4,destination:Depot,course:7",
        ));
        assert!(d.is_clean(), "{:?}", d.warnings);
        let b = d.value;
        assert_eq!(b.protocol, PisProtocol::TripData);
        assert_eq!(b.line(), Some("12"));
        assert_eq!(b.route(), Some("A"));
        assert_eq!(b.trip(), Some("0815"));
        assert_eq!(b.stop(), Some("Main St"));
        assert_eq!(b.stop_id(), Some("MS1"));
        assert_eq!(b.next_stop(), Some("Park"));
        assert_eq!(b.next_stop_id(), Some("PK2"));
        assert_eq!(b.stops_left(), Some(4));
        assert_eq!(b.destination(), Some("Depot"));
        assert_eq!(b.course(), Some("7"));
    }

    #[test]
    fn other_protocols_keep_raw_text() {
        let d = PassengerInfoBlock::decode(&payload(1, "line:12"));
        assert!(d.is_clean());
        assert_eq!(d.value.protocol, PisProtocol::Ibis);
        assert_eq!(d.value.message.as_deref(), Some("line:12"));
        assert!(d.value.trip_data.is_empty());
        assert_eq!(d.value.line(), None);
    }

    #[test]
    fn no_message() {
        let d = PassengerInfoBlock::decode(&[0, 0, 0, 1, 5]);
        assert!(d.is_clean());
        assert_eq!(d.value.message, None);
    }

    #[test]
    fn unparsable_stops_left() {
        let d = PassengerInfoBlock::decode(&payload(5, "stopsleft:many"));
        assert_eq!(d.value.stops_left(), None);
    }

    #[test]
    fn malformed_trip_pair() {
        let d = PassengerInfoBlock::decode(&payload(5, "line:3,garbage"));
        assert_eq!(d.value.line(), Some("3"));
        assert_eq!(
            d.warnings,
            vec![DecodeWarning::MalformedPair {
                pair: "garbage".into()
            }]
        );
    }

    #[test]
    fn protocol_byte_preserved() {
        assert_eq!(PisProtocol::from_wire_byte(42), PisProtocol::Other(42));
        for b in 0..=6u8 {
            assert_eq!(PisProtocol::from_wire_byte(b).to_wire_byte(), b);
        }
    }
}
