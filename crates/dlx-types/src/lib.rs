#![warn(clippy::pedantic)]

pub mod error;
pub mod reader;
pub mod grammar;
pub mod pairs;
pub mod block_type;
pub mod file_header;
pub mod file_end;
pub mod door_count;
pub mod door_config;
pub mod diagnostic;
pub mod intermediate_count;
pub mod train_formation;
pub mod user_event;
pub mod power_down;
pub mod passenger_info;
pub mod waypoint;
pub mod fleet_telemetry;
pub mod exchange_time;
pub mod block;

pub use block::{Block, BlockContent};
pub use block_type::BlockType;
pub use diagnostic::{DiagnosticBlock, DiagnosticMessage, DoorControllerInfo};
pub use door_config::{DoorConfig, DoorConfigBlock};
pub use door_count::{DoorCountBlock, DoorCounter};
pub use error::DecodeWarning;
pub use exchange_time::{DoorExchangeTime, ExchangeTimeBlock, ExchangeTimeFormat};
pub use file_end::FileEndBlock;
pub use file_header::FileHeaderBlock;
pub use fleet_telemetry::{FleetTelemetryBlock, FmsProtocol};
pub use grammar::{BlockGrammar, Decoded};
pub use intermediate_count::IntermediateCountBlock;
pub use passenger_info::{PassengerInfoBlock, PisProtocol};
pub use power_down::PowerDownBlock;
pub use reader::PayloadReader;
pub use train_formation::{TrainCar, TrainFormationBlock};
pub use user_event::UserEventBlock;
pub use waypoint::{WaypointBlock, WaypointFormat, WaypointKind};
