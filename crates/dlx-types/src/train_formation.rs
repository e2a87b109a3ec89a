use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::BlockGrammar;
use crate::reader::PayloadReader;

/// One car of a coupled train.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrainCar {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub operator: String,
}

/// FORM block: the cars that make up the train, in coupling order.
///
/// Layout: timestamp `u32`, then three strings per car until the payload
/// is exhausted. A car whose strings are cut off by the end of the
/// payload is kept with what was read and flagged
/// [`DecodeWarning::IncompleteRecord`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrainFormationBlock {
    pub timestamp: u32,
    pub cars: Vec<TrainCar>,
}

impl BlockGrammar for TrainFormationBlock {
    const BLOCK_TYPE: BlockType = BlockType::TrainFormation;
    const MIN_LEN: usize = 4;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let mut cars = Vec::new();

        while !r.is_empty() {
            let mut complete = true;
            let mut field = || {
                let s = r.string();
                complete &= s.terminated;
                s.text
            };
            let car = TrainCar {
                vehicle_id: field(),
                vehicle_type: field(),
                operator: field(),
            };
            if !complete {
                r.warn(DecodeWarning::IncompleteRecord {
                    index: cars.len(),
                    reason: "train car cut off by end of payload",
                });
            }
            cars.push(car);
        }

        Ok(Self { timestamp, cars })
    }
}
