use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// PDWN block (legacy): a power outage between two timestamps, with an
/// optional reason code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PowerDownBlock {
    pub power_off: u32,
    pub power_on: u32,
    pub reason: Option<u8>,
}

impl PowerDownBlock {
    /// Seconds between power off and power on. Negative if the clock
    /// went backwards across the outage.
    pub fn outage_secs(&self) -> i64 {
        i64::from(self.power_on) - i64::from(self.power_off)
    }
}

impl BlockGrammar for PowerDownBlock {
    const BLOCK_TYPE: BlockType = BlockType::PowerDown;
    const MIN_LEN: usize = 8;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let power_off = r.u32()?;
        let power_on = r.u32()?;
        let reason = if r.is_empty() { None } else { Some(r.u8()?) };
        r.finish();
        Ok(Self {
            power_off,
            power_on,
            reason,
        })
    }
}
