use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::error::DecodeWarning;
use crate::grammar::BlockGrammar;
use crate::pairs::split_pairs;
use crate::reader::PayloadReader;

/// Module id of the door controller (PCU/TSL). Its message text carries
/// `key:value` device information.
pub const DOOR_CONTROLLER_MODULE: u8 = 20;

/// Fixed part of a diagnostic record: timestamp and four id bytes.
const RECORD_HEADER_SIZE: usize = 8;

/// Device information parsed from a door controller message.
///
/// ```text
/// ┌──────────────────┬───────────────┐
/// │ Key              │ Field         │
/// ├──────────────────┼───────────────┤
/// │ addr, address    │ device_id     │
/// │ inst, instance   │ door_instance │
/// │ info, time       │ info          │
/// └──────────────────┴───────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorControllerInfo {
    pub device_id: Option<u32>,
    pub door_instance: Option<u8>,
    pub info: Option<String>,
}

impl DoorControllerInfo {
    fn parse(text: &str, r: &mut PayloadReader<'_>) -> Self {
        let mut out = Self::default();
        for entry in split_pairs(text) {
            let (key, value) = match entry {
                Ok(kv) => kv,
                Err(warning) => {
                    r.warn(warning);
                    continue;
                }
            };
            let parsed = match key {
                "addr" | "address" => value.parse().map(|v| out.device_id = Some(v)).is_ok(),
                "inst" | "instance" => value.parse().map(|v| out.door_instance = Some(v)).is_ok(),
                "info" | "time" => {
                    out.info = Some(value.to_string());
                    true
                }
                _ => true,
            };
            if !parsed {
                r.warn(DecodeWarning::MalformedPair {
                    pair: format!("{key}:{value}"),
                });
            }
        }
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagnosticMessage {
    pub timestamp: u32,
    pub module_id: u8,
    pub submodule_id: u8,
    pub message_id: u8,
    pub category: u8,
    pub text: Option<String>,
    /// Present only for door controller messages with text.
    pub device_info: Option<DoorControllerInfo>,
}

impl DiagnosticMessage {
    pub fn is_door_controller(&self) -> bool {
        self.module_id == DOOR_CONTROLLER_MODULE
    }
}

/// DIAG block: a log of diagnostic messages.
///
/// Each record is an 8-byte header (timestamp `u32`, module, submodule,
/// message id, category) followed by a string whenever payload bytes
/// remain. Translating the ids to text is left to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagnosticBlock {
    pub messages: Vec<DiagnosticMessage>,
}

impl BlockGrammar for DiagnosticBlock {
    const BLOCK_TYPE: BlockType = BlockType::Diagnostic;
    const MIN_LEN: usize = RECORD_HEADER_SIZE;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let mut messages = Vec::new();
        while r.remaining() >= RECORD_HEADER_SIZE {
            let mut msg = DiagnosticMessage {
                timestamp: r.u32()?,
                module_id: r.u8()?,
                submodule_id: r.u8()?,
                message_id: r.u8()?,
                category: r.u8()?,
                text: r.optional_string(),
                device_info: None,
            };
            if msg.is_door_controller() {
                if let Some(text) = msg.text.as_deref().filter(|t| !t.is_empty()) {
                    msg.device_info = Some(DoorControllerInfo::parse(text, r));
                }
            }
            messages.push(msg);
        }
        r.finish_records(RECORD_HEADER_SIZE);
        Ok(Self { messages })
    }
}
