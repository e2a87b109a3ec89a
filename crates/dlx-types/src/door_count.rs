use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// Per-door counter deltas, shared by CDAT and FSTP.
///
/// ```text
/// ┌────────┬────────────────┐
/// │ Offset │ Field          │
/// ├────────┼────────────────┤
/// │ 0      │ device_id u32  │
/// │ 4      │ instance  u8   │
/// │ 5      │ boarding  i16  │
/// │ 7      │ alighting i16  │
/// │ 9      │ uncertain i16  │
/// └────────┴────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorCounter {
    pub device_id: u32,
    pub instance: u8,
    pub boarding: i16,
    pub alighting: i16,
    /// Movements the sensor could not attribute to a direction.
    pub uncertain: i16,
}

impl DoorCounter {
    pub const RECORD_SIZE: usize = 11;

    /// Boarding plus alighting.
    pub fn total(&self) -> i32 {
        i32::from(self.boarding) + i32::from(self.alighting)
    }

    fn read(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            device_id: r.u32()?,
            instance: r.u8()?,
            boarding: r.i16()?,
            alighting: r.i16()?,
            uncertain: r.i16()?,
        })
    }
}

/// Read whole door counter records until fewer than one record remains.
pub(crate) fn read_door_counters(r: &mut PayloadReader<'_>) -> Result<Vec<DoorCounter>, WireError> {
    let mut doors = Vec::with_capacity(r.remaining() / DoorCounter::RECORD_SIZE);
    while r.remaining() >= DoorCounter::RECORD_SIZE {
        doors.push(DoorCounter::read(r)?);
    }
    r.finish_records(DoorCounter::RECORD_SIZE);
    Ok(doors)
}

/// CDAT block: completed passenger counts, written when the doors close.
///
/// Layout: timestamp `u32`, exchange time `u16` (seconds the doors were
/// open for passenger exchange), then zero or more [`DoorCounter`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorCountBlock {
    pub timestamp: u32,
    pub exchange_time: u16,
    pub doors: Vec<DoorCounter>,
}

impl DoorCountBlock {
    pub fn total_boarding(&self) -> i32 {
        self.doors.iter().map(|d| i32::from(d.boarding)).sum()
    }

    pub fn total_alighting(&self) -> i32 {
        self.doors.iter().map(|d| i32::from(d.alighting)).sum()
    }
}

impl BlockGrammar for DoorCountBlock {
    const BLOCK_TYPE: BlockType = BlockType::DoorCount;
    const MIN_LEN: usize = 6;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            timestamp: r.u32()?,
            exchange_time: r.u16()?,
            doors: read_door_counters(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeWarning;

    fn door(device: u32, instance: u8, b: i16, a: i16, u: i16) -> Vec<u8> {
        let mut out = device.to_be_bytes().to_vec();
        out.push(instance);
        out.extend_from_slice(&b.to_be_bytes());
        out.extend_from_slice(&a.to_be_bytes());
        out.extend_from_slice(&u.to_be_bytes());
        out
    }

    #[test]
    fn header_only() {
        let d = DoorCountBlock::decode(&[0x01, 0x02, 0x03, 0x04, 0x00, 0x00]);
        assert!(d.is_clean());
        assert_eq!(d.value.timestamp, 0x0102_0304);
        assert_eq!(d.value.exchange_time, 0);
        assert!(d.value.doors.is_empty());
    }

    #[test]
    fn two_doors() {
        let mut p = vec![0, 0, 0, 1, 0, 12];
        p.extend(door(1001, 1, 5, 3, 0));
        p.extend(door(1002, 2, -1, 7, 2));
        let d = DoorCountBlock::decode(&p);
        assert!(d.is_clean());
        assert_eq!(d.value.exchange_time, 12);
        assert_eq!(d.value.doors.len(), 2);
        assert_eq!(d.value.doors[1].boarding, -1);
        assert_eq!(d.value.doors[1].uncertain, 2);
        assert_eq!(d.value.doors[0].total(), 8);
        assert_eq!(d.value.total_boarding(), 4);
        assert_eq!(d.value.total_alighting(), 10);
    }

    #[test]
    fn partial_record_is_one_misaligned_tail() {
        for extra in 1..DoorCounter::RECORD_SIZE {
            let mut p = vec![0; 6];
            p.extend(door(7, 1, 1, 1, 0));
            p.extend(std::iter::repeat_n(0xAA, extra));
            let d = DoorCountBlock::decode(&p);
            assert_eq!(d.value.doors.len(), 1);
            assert_eq!(
                d.warnings,
                vec![DecodeWarning::MisalignedTail {
                    remaining: extra,
                    record_size: 11
                }]
            );
        }
    }

    #[test]
    fn too_short() {
        let d = DoorCountBlock::decode(&[0; 5]);
        assert_eq!(d.value, DoorCountBlock::default());
        assert_eq!(d.warnings, vec![DecodeWarning::TooShort { needed: 6, actual: 5 }]);
    }
}
