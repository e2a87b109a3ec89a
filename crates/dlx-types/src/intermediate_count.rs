use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::door_count::{DoorCounter, read_door_counters};
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// FSTP block: intermediate counts, written while doors are still open.
///
/// Same door records as CDAT but without the exchange time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IntermediateCountBlock {
    pub timestamp: u32,
    pub doors: Vec<DoorCounter>,
}

impl BlockGrammar for IntermediateCountBlock {
    const BLOCK_TYPE: BlockType = BlockType::IntermediateCount;
    const MIN_LEN: usize = 4;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            timestamp: r.u32()?,
            doors: read_door_counters(r)?,
        })
    }
}
