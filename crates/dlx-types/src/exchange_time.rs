use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::{BlockGrammar, Decoded, decode_with};
use crate::reader::PayloadReader;

/// Passenger exchange timing for one door. A timestamp of 0 means the
/// device did not record that moment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorExchangeTime {
    pub device_id: u32,
    pub instance: u8,
    pub first_movement: u32,
    pub last_movement: u32,
    pub first_opening: u32,
    pub last_closing: u32,
}

fn recorded(ts: u32) -> Option<u32> {
    (ts != 0).then_some(ts)
}

fn span(from: u32, to: u32) -> Option<i64> {
    Some(i64::from(recorded(to)?) - i64::from(recorded(from)?))
}

impl DoorExchangeTime {
    pub const RECORD_SIZE: usize = 17;

    pub fn first_movement_at(&self) -> Option<u32> {
        recorded(self.first_movement)
    }

    pub fn last_movement_at(&self) -> Option<u32> {
        recorded(self.last_movement)
    }

    pub fn first_opening_at(&self) -> Option<u32> {
        recorded(self.first_opening)
    }

    pub fn last_closing_at(&self) -> Option<u32> {
        recorded(self.last_closing)
    }

    /// Seconds from the first to the last passenger movement.
    pub fn exchange_secs(&self) -> Option<i64> {
        span(self.first_movement, self.last_movement)
    }

    /// Seconds the door was open.
    pub fn door_open_secs(&self) -> Option<i64> {
        span(self.first_opening, self.last_closing)
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            device_id: r.u32()?,
            instance: r.u8()?,
            first_movement: r.u32()?,
            last_movement: r.u32()?,
            first_opening: r.u32()?,
            last_closing: r.u32()?,
        })
    }
}

/// The two rPET payload layouts.
///
/// ```text
/// records: timestamp u32 │ 17-byte door record × n
/// legacy:  timestamp u32 │ door u8 │ boarding u16 │ alighting u16
/// ```
///
/// Legacy payloads are recognised by length alone: after the timestamp
/// there is room for the 5-byte legacy record but not for one full door
/// record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExchangeTimeFormat {
    #[default]
    Records,
    Legacy,
}

impl ExchangeTimeFormat {
    const TIMESTAMP_SIZE: usize = 4;
    pub const LEGACY_RECORD_SIZE: usize = 5;

    pub fn detect(payload: &[u8]) -> Option<Self> {
        let body = payload.len().checked_sub(Self::TIMESTAMP_SIZE)?;
        Some(Self::classify(body))
    }

    fn classify(body: usize) -> Self {
        if (Self::LEGACY_RECORD_SIZE..DoorExchangeTime::RECORD_SIZE).contains(&body) {
            Self::Legacy
        } else {
            Self::Records
        }
    }
}

/// rPET block: passenger exchange times per door.
///
/// A legacy payload decodes into a single [`DoorExchangeTime`] with
/// device id 0, the door id as instance, the boarding and alighting
/// times as first and last movement, and no opening or closing time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExchangeTimeBlock {
    pub format: ExchangeTimeFormat,
    pub timestamp: u32,
    pub doors: Vec<DoorExchangeTime>,
}

impl ExchangeTimeBlock {
    /// Decode a payload as a list of 17-byte door records.
    pub fn decode_records(payload: &[u8]) -> Decoded<Self> {
        decode_with(Self::BLOCK_TYPE, Self::MIN_LEN, payload, Self::parse_records)
    }

    /// Decode a payload as one legacy 5-byte record.
    pub fn decode_legacy(payload: &[u8]) -> Decoded<Self> {
        decode_with(
            Self::BLOCK_TYPE,
            ExchangeTimeFormat::TIMESTAMP_SIZE + ExchangeTimeFormat::LEGACY_RECORD_SIZE,
            payload,
            Self::parse_legacy,
        )
    }

    fn parse_records(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let mut doors = Vec::with_capacity(r.remaining() / DoorExchangeTime::RECORD_SIZE);
        while r.remaining() >= DoorExchangeTime::RECORD_SIZE {
            doors.push(DoorExchangeTime::read(r)?);
        }
        r.finish_records(DoorExchangeTime::RECORD_SIZE);
        Ok(Self {
            format: ExchangeTimeFormat::Records,
            timestamp,
            doors,
        })
    }

    fn parse_legacy(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let door = DoorExchangeTime {
            device_id: 0,
            instance: r.u8()?,
            first_movement: r.u16()?.into(),
            last_movement: r.u16()?.into(),
            first_opening: 0,
            last_closing: 0,
        };
        r.finish();
        Ok(Self {
            format: ExchangeTimeFormat::Legacy,
            timestamp,
            doors: vec![door],
        })
    }
}

impl BlockGrammar for ExchangeTimeBlock {
    const BLOCK_TYPE: BlockType = BlockType::ExchangeTime;
    const MIN_LEN: usize = ExchangeTimeFormat::TIMESTAMP_SIZE;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let body = r.remaining().saturating_sub(ExchangeTimeFormat::TIMESTAMP_SIZE);
        match ExchangeTimeFormat::classify(body) {
            ExchangeTimeFormat::Records => Self::parse_records(r),
            ExchangeTimeFormat::Legacy => Self::parse_legacy(r),
        }
    }
}
