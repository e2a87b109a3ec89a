use std::collections::BTreeMap;

use dlx_wire::WireError;

use crate::block_type::BlockType;
use crate::grammar::BlockGrammar;
use crate::pairs::collect_pairs;
use crate::reader::PayloadReader;

/// Source protocol of a telemetry record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FmsProtocol {
    #[default]
    Unknown,
    /// FMS over CAN bus.
    CanFms,
    /// FMS over a 1-Wire bus.
    OneWireFms,
    Csv,
    Other(u8),
}

impl FmsProtocol {
    pub fn from_wire_byte(b: u8) -> Self {
        match b {
            0 => Self::Unknown,
            1 => Self::CanFms,
            2 => Self::OneWireFms,
            3 => Self::Csv,
            other => Self::Other(other),
        }
    }

    pub fn to_wire_byte(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::CanFms => 1,
            Self::OneWireFms => 2,
            Self::Csv => 3,
            Self::Other(b) => b,
        }
    }

    /// Whether messages of this protocol carry `key:value` pairs.
    pub fn has_pairs(self) -> bool {
        matches!(self, Self::CanFms | Self::OneWireFms)
    }
}

/// Telemetry value marking a signal the vehicle did not report.
pub const NOT_AVAILABLE: &str = "*";

/// rFMS block: fleet management telemetry.
///
/// Layout: timestamp `u32`, protocol `u8`, optional string. CAN and
/// 1-Wire FMS messages are parsed into [`values`](Self::values), where
/// a reported value of `*` is stored as `None`.
///
/// ```text
/// ┌───────────────────┬─────────────────────────┬────────┐
/// │ Key               │ Accessor                │ Type   │
/// ├───────────────────┼─────────────────────────┼────────┤
/// │ FUEL_ECO_L_PER_H  │ fuel_economy_l_per_h    │ f64    │
/// │ FUEL_ECO_KM_PER_L │ fuel_economy_km_per_l   │ f64    │
/// │ FUEL_LEV          │ fuel_level              │ f64    │
/// │ FUEL_C            │ fuel_consumed           │ f64    │
/// │ FMS_FUEL_LEVEL    │ fuel_level_indicator    │ text   │
/// │ VEH_SPEED         │ vehicle_speed           │ f64    │
/// │ DISTANCE          │ distance                │ f64    │
/// └───────────────────┴─────────────────────────┴────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FleetTelemetryBlock {
    pub timestamp: u32,
    pub protocol: FmsProtocol,
    pub message: Option<String>,
    pub values: BTreeMap<String, Option<String>>,
}

impl FleetTelemetryBlock {
    /// A reported value, `None` if absent or reported as not available.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.as_deref()
    }

    /// A reported value parsed as a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key)?.parse().ok()
    }

    pub fn fuel_economy_l_per_h(&self) -> Option<f64> {
        self.number("FUEL_ECO_L_PER_H")
    }

    pub fn fuel_economy_km_per_l(&self) -> Option<f64> {
        self.number("FUEL_ECO_KM_PER_L")
    }

    pub fn fuel_level(&self) -> Option<f64> {
        self.number("FUEL_LEV")
    }

    pub fn fuel_consumed(&self) -> Option<f64> {
        self.number("FUEL_C")
    }

    pub fn fuel_level_indicator(&self) -> Option<&str> {
        self.value("FMS_FUEL_LEVEL")
    }

    pub fn vehicle_speed(&self) -> Option<f64> {
        self.number("VEH_SPEED")
    }

    pub fn distance(&self) -> Option<f64> {
        self.number("DISTANCE")
    }
}

impl BlockGrammar for FleetTelemetryBlock {
    const BLOCK_TYPE: BlockType = BlockType::FleetTelemetry;
    const MIN_LEN: usize = 5;

    fn parse(r: &mut PayloadReader<'_>) -> Result<Self, WireError> {
        let timestamp = r.u32()?;
        let protocol = FmsProtocol::from_wire_byte(r.u8()?);
        let message = r.optional_string();
        let values = match &message {
            Some(text) if protocol.has_pairs() => collect_pairs(text, r)
                .into_iter()
                .map(|(k, v)| (k, (v != NOT_AVAILABLE).then_some(v)))
                .collect(),
            _ => BTreeMap::new(),
        };
        r.finish();
        Ok(Self {
            timestamp,
            protocol,
            message,
            values,
        })
    }
}
