use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// One configured door sensor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorConfig {
    pub device_id: u32,
    pub instance: u8,
    pub device_model: String,
    pub door_name: String,
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub operator: String,
}

/// Bytes of the fixed part of a group: device id and instance.
const GROUP_HEADER_SIZE: usize = 5;

/// CONF block: the door sensor configuration of the vehicle.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────┐
/// │ timestamp u32 │ group₀ │ group₁ │ ...                        │
/// └───────────────┴──────────────────────────────────────────────┘
///   group = device_id u32, instance u8, then five strings:
///           device model, door name, vehicle id, vehicle type, operator
/// ```
///
/// Groups are variable-length. A group whose strings run out before the
/// fifth, or that has an empty string, is dropped with
/// [`DecodeWarning::IncompleteRecord`]. Running out of bytes also ends
/// the block; an empty string does not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorConfigBlock {
    pub timestamp: u32,
    pub doors: Vec<DoorConfig>,
}

impl BlockGrammar for DoorConfigBlock {
    const BLOCK_TYPE: BlockType = BlockType::DoorConfig;
    const MIN_LEN: usize = 4;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let mut doors = Vec::new();

        let mut index = 0;
        while !r.is_empty() {
            if r.remaining() < GROUP_HEADER_SIZE {
                r.finish_records(GROUP_HEADER_SIZE);
                break;
            }
            let device_id = r.u32()?;
            let instance = r.u8()?;

            let mut strings: [String; 5] = Default::default();
            let mut cut_short = false;
            for slot in &mut strings {
                match r.optional_string() {
                    Some(s) => *slot = s,
                    None => {
                        cut_short = true;
                        break;
                    }
                }
            }

            if cut_short {
                r.warn(DecodeWarning::IncompleteRecord {
                    index,
                    reason: "door configuration cut off by end of payload",
                });
                break;
            }
            if strings.iter().any(String::is_empty) {
                r.warn(DecodeWarning::IncompleteRecord {
                    index,
                    reason: "door configuration has an empty string",
                });
            } else {
                let [device_model, door_name, vehicle_id, vehicle_type, operator] = strings;
                doors.push(DoorConfig {
                    device_id,
                    instance,
                    device_model,
                    door_name,
                    vehicle_id,
                    vehicle_type,
                    operator,
                });
            }
            index += 1;
        }

        Ok(Self { timestamp, doors })
    }
}
