//! Shared fixture builders for the DLX3 integration tests, benchmarks and
//! the golden file generator.
//!
//! Nothing here is production code: builders panic on misuse and
//! [`render`] exists only to give snapshots a stable text form.

use dlx_decoder::DecodedFile;
use dlx_types::{BlockContent, DoorCounter};
use dlx_wire::{BlockEnvelope, TypeTag};

/// Big-endian payload builder mirroring the field reads of the grammars.
#[derive(Clone, Debug, Default)]
pub struct PayloadBuilder {
    buf: Vec<u8>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    #[must_use]
    pub fn u16(mut self, v: u16) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[must_use]
    pub fn i16(mut self, v: i16) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[must_use]
    pub fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    #[must_use]
    pub fn i32(mut self, v: i32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// A null-terminated string.
    #[must_use]
    pub fn string(mut self, s: &str) -> Self {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    /// Raw bytes, no terminator.
    #[must_use]
    pub fn bytes(mut self, b: &[u8]) -> Self {
        self.buf.extend_from_slice(b);
        self
    }

    /// One 11-byte door counter record.
    #[must_use]
    pub fn door(self, device_id: u32, instance: u8, boarding: i16, alighting: i16, uncertain: i16) -> Self {
        self.u32(device_id)
            .u8(instance)
            .i16(boarding)
            .i16(alighting)
            .i16(uncertain)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

pub fn tag(s: &str) -> TypeTag {
    TypeTag::try_from(s).unwrap_or_else(|len| panic!("tag {s:?} is {len} bytes, not 4"))
}

/// A complete frame with a valid checksum.
pub fn frame(t: &str, payload: &[u8]) -> Vec<u8> {
    BlockEnvelope::new(tag(t), payload.to_vec())
        .expect("fixture payload fits a frame")
        .to_bytes()
}

/// A complete frame with an explicit, possibly wrong, checksum.
pub fn frame_with_checksum(t: &str, payload: &[u8], checksum: u16) -> Vec<u8> {
    BlockEnvelope::with_checksum(tag(t), payload.to_vec(), checksum)
        .expect("fixture payload fits a frame")
        .to_bytes()
}

pub const CREATED: u32 = 1_700_000_000;

/// One frame of every built-in block type, as a bus would record them
/// over a single stop. Decodes without warnings.
pub fn sample_frames() -> Vec<(&'static str, Vec<u8>)> {
    let p = PayloadBuilder::new;
    vec![
        (
            "FHDR",
            p().u8(b'D')
                .u32(CREATED)
                .u32(CREATED - 10_000)
                .u8(1)
                .string("Europe/Berlin")
                .string("DLX3-100")
                .string("SN0042")
                .string("ACME Transit")
                .string("BUS-17")
                .build(),
        ),
        (
            "CONF",
            p().u32(CREATED + 10)
                .u32(1001)
                .u8(1)
                .string("IRMA-MATRIX")
                .string("Door 1")
                .string("BUS-17")
                .string("Citaro")
                .string("ACME Transit")
                .u32(1002)
                .u8(2)
                .string("IRMA-MATRIX")
                .string("Door 2")
                .string("BUS-17")
                .string("Citaro")
                .string("ACME Transit")
                .build(),
        ),
        (
            "FORM",
            p().u32(CREATED + 20)
                .string("BUS-17")
                .string("Citaro")
                .string("ACME Transit")
                .build(),
        ),
        ("EVNT", p().u32(CREATED + 100).u8(10).bytes(&[0x01, 0x02]).build()),
        ("FSTP", p().u32(CREATED + 110).door(1001, 1, 3, 1, 0).build()),
        (
            "CDAT",
            p().u32(CREATED + 130)
                .u16(25)
                .door(1001, 1, 5, 2, 0)
                .door(1002, 2, 1, 4, 1)
                .build(),
        ),
        (
            "rPET",
            p().u32(CREATED + 130)
                .u32(1001)
                .u8(1)
                .u32(CREATED + 105)
                .u32(CREATED + 125)
                .u32(CREATED + 102)
                .u32(CREATED + 128)
                .build(),
        ),
        (
            "WAYP",
            p().u32(CREATED + 140)
                .u32(CREATED + 100)
                .u8(1)
                .i32(31_500_000)
                .i32(8_040_000)
                .u8(9)
                .i16(350)
                .i16(123)
                .string("4711")
                .build(),
        ),
        (
            "PISM",
            p().u32(CREATED + 150)
                .u8(5)
                .string("line:42,stop:Alexanderplatz,stopsleft:7")
                .build(),
        ),
        (
            "rFMS",
            p().u32(CREATED + 160)
                .u8(1)
                .string("VEH_SPEED:55.5,FUEL_LEV:*")
                .build(),
        ),
        (
            "DIAG",
            p().u32(CREATED + 170)
                .u8(20)
                .u8(1)
                .u8(3)
                .u8(2)
                .string("addr:1001,inst:1,info:door stuck")
                .build(),
        ),
        ("PDWN", p().u32(CREATED + 200).u32(CREATED + 260).u8(2).build()),
        ("FEND", Vec::new()),
    ]
}

/// [`sample_frames`] concatenated into one file.
pub fn sample_file() -> Vec<u8> {
    sample_frames()
        .iter()
        .flat_map(|(t, payload)| frame(t, payload))
        .collect()
}

/// A file exercising the non-fatal fault paths: an unknown tag, a bad
/// checksum, short and misaligned payloads, and bytes after FEND.
pub fn damaged_file() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(frame("ZZZZ", b"opaque"));
    out.extend(frame_with_checksum("FSTP", &PayloadBuilder::new().u32(7).build(), 0xBEEF));
    out.extend(frame("CDAT", &[0x01, 0x02]));
    out.extend(frame(
        "FSTP",
        &PayloadBuilder::new().u32(8).door(5, 1, 1, 1, 0).bytes(&[0xAA; 3]).build(),
    ));
    out.extend(frame("PDWN", &PayloadBuilder::new().u32(100).u32(160).u8(1).u8(0xFF).build()));
    out.extend(frame("FEND", &[]));
    out.extend_from_slice(b"junk");
    out
}

fn doors(doors: &[DoorCounter]) -> String {
    doors
        .iter()
        .map(|d| format!("{}/{} +{} -{} ?{}", d.device_id, d.instance, d.boarding, d.alighting, d.uncertain))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One-line summary of a block's content.
pub fn describe(content: &BlockContent) -> String {
    match content {
        BlockContent::FileHeader(h) => format!(
            "header rev={} created={} previous={} wgs84={} tz={} model={} serial={} operator={} vehicle={}",
            char::from(h.revision),
            h.creation_time,
            h.previous_file_time,
            h.is_wgs84(),
            h.time_zone,
            h.device_model,
            h.device_serial,
            h.operator,
            h.vehicle_id
        ),
        BlockContent::FileEnd(_) => "end of file".to_string(),
        BlockContent::DoorCount(b) => format!(
            "count ts={} exchange={}s boarding={} alighting={} doors=[{}]",
            b.timestamp,
            b.exchange_time,
            b.total_boarding(),
            b.total_alighting(),
            doors(&b.doors)
        ),
        BlockContent::DoorConfig(b) => format!(
            "config ts={} doors=[{}]",
            b.timestamp,
            b.doors
                .iter()
                .map(|d| format!("{}/{} {} ({}) {} {} {}", d.device_id, d.instance, d.door_name, d.device_model, d.vehicle_id, d.vehicle_type, d.operator))
                .collect::<Vec<_>>()
                .join("; ")
        ),
        BlockContent::Diagnostic(b) => format!(
            "diagnostic [{}]",
            b.messages
                .iter()
                .map(|m| {
                    let mut s = format!(
                        "{} {}.{}.{} cat={} text={:?}",
                        m.timestamp, m.module_id, m.submodule_id, m.message_id, m.category, m.text
                    );
                    if let Some(info) = &m.device_info {
                        s.push_str(&format!(
                            " device={:?} door={:?} info={:?}",
                            info.device_id, info.door_instance, info.info
                        ));
                    }
                    s
                })
                .collect::<Vec<_>>()
                .join("; ")
        ),
        BlockContent::IntermediateCount(b) => {
            format!("intermediate ts={} doors=[{}]", b.timestamp, doors(&b.doors))
        }
        BlockContent::TrainFormation(b) => format!(
            "formation ts={} cars=[{}]",
            b.timestamp,
            b.cars
                .iter()
                .map(|c| format!("{} {} {}", c.vehicle_id, c.vehicle_type, c.operator))
                .collect::<Vec<_>>()
                .join("; ")
        ),
        BlockContent::UserEvent(b) => format!(
            "event ts={} type={} data={}",
            b.timestamp,
            b.event_type,
            hex::encode(&b.data)
        ),
        BlockContent::PowerDown(b) => format!(
            "power down off={} on={} outage={}s reason={:?}",
            b.power_off,
            b.power_on,
            b.outage_secs(),
            b.reason
        ),
        BlockContent::PassengerInfo(b) => format!(
            "passenger info ts={} protocol={:?} message={:?} trip={{{}}}",
            b.timestamp,
            b.protocol,
            b.message,
            b.trip_data
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        BlockContent::Waypoint(w) => format!(
            "waypoint {:?} kind={:?} dep={} arr={} lat={} lon={} sats={} dist={} speed={} course={:?} stop={:?}",
            w.format,
            w.kind,
            w.departure,
            w.arrival,
            w.latitude,
            w.longitude,
            w.satellites,
            w.distance,
            w.speed,
            w.course,
            w.stop_id
        ),
        BlockContent::FleetTelemetry(b) => format!(
            "telemetry ts={} protocol={:?} values={{{}}}",
            b.timestamp,
            b.protocol,
            b.values
                .iter()
                .map(|(k, v)| format!("{k}={}", v.as_deref().unwrap_or("n/a")))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        BlockContent::ExchangeTime(b) => format!(
            "exchange {:?} ts={} doors=[{}]",
            b.format,
            b.timestamp,
            b.doors
                .iter()
                .map(|d| format!(
                    "{}/{} move {}..{} open {}..{}",
                    d.device_id, d.instance, d.first_movement, d.last_movement, d.first_opening, d.last_closing
                ))
                .collect::<Vec<_>>()
                .join("; ")
        ),
        BlockContent::Unknown { tag } => format!("unknown {tag}"),
    }
}

/// Stable text rendering of a decoded file for snapshots.
///
/// ```text
/// 13 blocks
///     0 FHDR len=56 crc=1a2b
///       header rev=D ...
///       ! warning, one line each
/// complete
/// consumed 123 bytes
/// ```
pub fn render(file: &DecodedFile) -> String {
    let mut lines = vec![format!("{} blocks", file.blocks.len())];
    for block in &file.blocks {
        lines.push(format!(
            "{:>5} {} len={} crc={:04x}",
            block.offset, block.tag, block.declared_length, block.checksum
        ));
        lines.push(format!("      {}", describe(&block.content)));
        for warning in &block.warnings {
            lines.push(format!("      ! {warning}"));
        }
    }
    lines.push(match &file.error {
        Some(err) => format!("error: {err}"),
        None => "complete".to_string(),
    });
    lines.push(format!("consumed {} bytes", file.consumed));
    lines.join("\n")
}
