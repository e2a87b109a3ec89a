use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// FEND block: the end-of-file marker. It has no payload; any bytes
/// present are reported as trailing and otherwise ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileEndBlock;

impl BlockGrammar for FileEndBlock {
    const BLOCK_TYPE: BlockType = BlockType::FileEnd;
    const MIN_LEN: usize = 0;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        r.finish();
        Ok(Self)
    }
}
