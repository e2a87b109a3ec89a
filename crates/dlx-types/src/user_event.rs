use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// Well-known event type codes. The full catalog with descriptions is
/// maintained outside this crate.
pub mod event_code {
    pub const POWER_OFF: u8 = 8;
    pub const POWER_ON: u8 = 9;
    pub const STOP_REACHED: u8 = 10;
    pub const STOP_LEFT: u8 = 11;
}

/// EVNT block: a user or vehicle event.
///
/// Layout: timestamp `u32`, event type `u8`, then opaque event data to
/// the end of the payload. A payload holding only the timestamp decodes
/// as event type 0 with [`DecodeWarning::MissingField`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UserEventBlock {
    pub timestamp: u32,
    pub event_type: u8,
    pub data: Vec<u8>,
}

impl UserEventBlock {
    pub fn is_stop_reached(&self) -> bool {
        self.event_type == event_code::STOP_REACHED
    }

    pub fn is_stop_left(&self) -> bool {
        self.event_type == event_code::STOP_LEFT
    }

    pub fn is_power_off(&self) -> bool {
        self.event_type == event_code::POWER_OFF
    }

    pub fn is_power_on(&self) -> bool {
        self.event_type == event_code::POWER_ON
    }
}

impl BlockGrammar for UserEventBlock {
    const BLOCK_TYPE: BlockType = BlockType::UserEvent;
    const MIN_LEN: usize = 4;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let event_type = if r.is_empty() {
            r.warn(DecodeWarning::MissingField { field: "event type" });
            0
        } else {
            r.u8()?
        };
        Ok(Self {
            timestamp,
            event_type,
            data: r.rest().to_vec(),
        })
    }
}
