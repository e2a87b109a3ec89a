//! Edge case integration tests for the DLX3 decoder.
//!
//! - **Format heuristics**: waypoint payloads at the legacy/current
//!   boundary lengths.
//! - **Record alignment**: door-record blocks at every tail length.
//! - **Truncation**: a file cut anywhere inside frame k keeps the k−1
//!   blocks before it and reports the phase that ran out.
//! - **Registry**: stub grammars, unknown tags, no aliasing between
//!   repeated blocks.
//! - **Policies**: checksum handling and bytes after FEND.

use dlx_decoder::{
    BlockRegistry, ChecksumPolicy, DecodeError, DecoderConfig, Dlx3Decoder, FramePhase, decode,
};
use dlx_tests::{PayloadBuilder, frame, frame_with_checksum, sample_file, sample_frames, tag};
use dlx_types::{
    BlockContent, BlockGrammar, BlockType, DecodeWarning, Decoded, DoorCountBlock, DoorCounter,
    FileEndBlock, FleetTelemetryBlock, IntermediateCountBlock, PassengerInfoBlock, TrainFormationBlock,
    WaypointBlock, WaypointFormat, WaypointKind,
};
use dlx_wire::{FRAME_HEADER_SIZE, MAX_STRING_LEN};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── Waypoint heuristics ───────────────────────────────────────────────────────

fn waypoint_payload(len: usize, kind: u8) -> Vec<u8> {
    let mut p = vec![0u8; len];
    if let Some(b) = p.get_mut(8) {
        *b = kind;
    }
    p
}

#[test]
fn waypoint_15_bytes_is_too_short() {
    let d = WaypointBlock::decode(&waypoint_payload(15, 2));
    assert_eq!(d.value, WaypointBlock::default());
    assert_eq!(d.warnings, vec![DecodeWarning::TooShort { needed: 16, actual: 15 }]);
    assert_eq!(WaypointFormat::detect(&waypoint_payload(15, 2)), None);
}

#[test]
fn waypoint_16_bytes_is_legacy() {
    let d = WaypointBlock::decode(&waypoint_payload(16, 2));
    assert!(d.is_clean());
    assert_eq!(d.value.format, WaypointFormat::Legacy);
    assert_eq!(d.value.kind, WaypointKind::Passed);
}

#[test]
fn waypoint_19_bytes_is_legacy_with_trailing() {
    let d = WaypointBlock::decode(&waypoint_payload(19, 1));
    assert_eq!(d.value.format, WaypointFormat::Legacy);
    assert_eq!(d.warnings, vec![DecodeWarning::UnexpectedTrailing { bytes: 3 }]);
}

#[test]
fn waypoint_20_bytes_with_known_kind_is_current() {
    let d = WaypointBlock::decode(&waypoint_payload(20, 3));
    assert_eq!(d.value.format, WaypointFormat::Current);
    assert_eq!(d.value.kind, WaypointKind::FirstOrLastStop);
    assert_eq!(d.value.speed, dlx_types::waypoint::SPEED_UNKNOWN);
    assert_eq!(d.value.speed_kmh(), None);
    assert_eq!(d.warnings, vec![DecodeWarning::MissingField { field: "speed" }]);
}

#[test]
fn waypoint_20_bytes_with_unknown_kind_is_legacy() {
    let d = WaypointBlock::decode(&waypoint_payload(20, 0));
    assert_eq!(d.value.format, WaypointFormat::Legacy);
    assert_eq!(d.warnings, vec![DecodeWarning::UnexpectedTrailing { bytes: 4 }]);
}

#[test]
fn forced_current_layout_flags_unknown_kind() {
    let d = WaypointBlock::decode_current(&waypoint_payload(22, 7));
    assert_eq!(d.value.kind, WaypointKind::Other(7));
    assert!(d.warnings.contains(&DecodeWarning::UnexpectedValue {
        field: "waypoint kind",
        found: 7,
        expected: 3
    }));
}

#[test]
fn forced_legacy_layout_is_independent_of_kind_byte() {
    let d = WaypointBlock::decode_legacy(&waypoint_payload(16, 1));
    assert!(d.is_clean());
    assert_eq!(d.value.format, WaypointFormat::Legacy);
}

// ── Telemetry pairs ───────────────────────────────────────────────────────────

#[test]
fn telemetry_not_available_marker() {
    let payload = PayloadBuilder::new().u32(1).u8(1).string("SPEED:55.5,FUEL:*").build();
    let d = FleetTelemetryBlock::decode(&payload);
    assert!(d.is_clean());
    assert_eq!(d.value.value("SPEED"), Some("55.5"));
    assert_eq!(d.value.value("FUEL"), None);
    assert_eq!(d.value.number("SPEED"), Some(55.5));
}

#[test]
fn telemetry_malformed_pair_is_skipped() {
    let payload = PayloadBuilder::new().u32(1).u8(1).string("SPEED:5,garbage,:x").build();
    let d = FleetTelemetryBlock::decode(&payload);
    assert_eq!(d.value.values.len(), 1);
    assert_eq!(
        d.warnings,
        vec![
            DecodeWarning::MalformedPair { pair: "garbage".into() },
            DecodeWarning::MalformedPair { pair: ":x".into() },
        ]
    );
}

#[test]
fn csv_telemetry_keeps_raw_message_only() {
    let payload = PayloadBuilder::new().u32(1).u8(3).string("1;2;3").build();
    let d = FleetTelemetryBlock::decode(&payload);
    assert!(d.is_clean());
    assert!(d.value.values.is_empty());
    assert_eq!(d.value.message.as_deref(), Some("1;2;3"));
}

// ── Door records ──────────────────────────────────────────────────────────────

#[test]
fn door_count_minimal_payload() {
    let d = DoorCountBlock::decode(&[0x01, 0x02, 0x03, 0x04, 0x00, 0x00]);
    assert!(d.is_clean());
    assert_eq!(d.value.timestamp, 0x0102_0304);
    assert_eq!(d.value.exchange_time, 0);
    assert!(d.value.doors.is_empty());
}

#[test]
fn door_records_at_every_tail_length() {
    for doors in 0..3 {
        for tail in 0..DoorCounter::RECORD_SIZE {
            let mut builder = PayloadBuilder::new().u32(9).u16(1);
            for i in 0..doors {
                builder = builder.door(i, 1, 1, 0, 0);
            }
            let payload = builder.bytes(&vec![0xEE; tail]).build();
            let d = DoorCountBlock::decode(&payload);
            assert_eq!(d.value.doors.len(), doors as usize, "doors={doors} tail={tail}");
            if tail == 0 {
                assert!(d.is_clean(), "doors={doors}: {:?}", d.warnings);
            } else {
                assert_eq!(
                    d.warnings,
                    vec![DecodeWarning::MisalignedTail {
                        remaining: tail,
                        record_size: DoorCounter::RECORD_SIZE
                    }]
                );
            }
        }
    }
}

#[test]
fn intermediate_count_shares_door_records() {
    let payload = PayloadBuilder::new().u32(3).door(1, 1, 2, 3, 4).build();
    let d = IntermediateCountBlock::decode(&payload);
    assert!(d.is_clean());
    assert_eq!(d.value.doors[0].uncertain, 4);
}

// ── Strings ───────────────────────────────────────────────────────────────────

#[test]
fn strings_decode_as_latin1() {
    let payload = PayloadBuilder::new().u32(1).bytes(b"K\xF6ln\0Caf\xE9\0\xC5\0").build();
    let d = TrainFormationBlock::decode(&payload);
    assert!(d.is_clean());
    assert_eq!(d.value.cars[0].vehicle_id, "Köln");
    assert_eq!(d.value.cars[0].vehicle_type, "Café");
    assert_eq!(d.value.cars[0].operator, "Å");
}

#[test]
fn capped_string_is_a_warning() {
    let long = "a".repeat(MAX_STRING_LEN + 200);
    let payload = PayloadBuilder::new().u32(1).u8(4).string(&long).build();
    let d = PassengerInfoBlock::decode(&payload);
    assert_eq!(d.value.message.as_deref().map(str::len), Some(MAX_STRING_LEN));
    assert_eq!(
        d.warnings,
        vec![
            DecodeWarning::StringCapped { offset: 5, cap: MAX_STRING_LEN },
            DecodeWarning::UnexpectedTrailing { bytes: 201 },
        ]
    );
}

#[test]
fn string_of_cap_length_is_not_capped() {
    let line = "9".repeat(MAX_STRING_LEN);
    let payload = PayloadBuilder::new().u32(1).string(&line).string("B").string("C").build();
    let d = TrainFormationBlock::decode(&payload);
    assert!(d.is_clean(), "{:?}", d.warnings);
    assert_eq!(d.value.cars.len(), 1);
    assert_eq!(d.value.cars[0].vehicle_id.len(), MAX_STRING_LEN);
    assert_eq!(d.value.cars[0].vehicle_type, "B");
    assert_eq!(d.value.cars[0].operator, "C");
}

#[test]
fn formation_keeps_cut_off_car() {
    let payload = PayloadBuilder::new().u32(1).string("A").bytes(b"B").build();
    let d = TrainFormationBlock::decode(&payload);
    assert_eq!(d.value.cars.len(), 1);
    assert_eq!(d.value.cars[0].vehicle_type, "B");
    assert_eq!(d.value.cars[0].operator, "");
    assert!(matches!(d.warnings[..], [DecodeWarning::IncompleteRecord { index: 0, .. }]));
}

// ── Grammar robustness ────────────────────────────────────────────────────────

#[test]
fn every_prefix_of_every_payload_decodes() {
    for (t, payload) in sample_frames() {
        let block_type = BlockType::from_tag(tag(t));
        for len in 0..=payload.len() {
            let d = BlockContent::decode(block_type, &payload[..len]);
            assert_eq!(d.value.block_type(), block_type);
            assert!(
                !d.warnings.iter().any(|w| matches!(w, DecodeWarning::Internal { .. })),
                "{t}[..{len}]: {:?}",
                d.warnings
            );
        }
    }
}

// ── Frame reader ──────────────────────────────────────────────────────────────

#[test]
fn truncation_inside_frame_k_keeps_earlier_blocks() {
    init_logger();
    let input = sample_file();
    let frames = sample_frames();
    let mut start = 0;
    for (k, (_, payload)) in frames.iter().enumerate() {
        let payload_start = start + FRAME_HEADER_SIZE;
        let checksum_start = payload_start + payload.len();
        let end = checksum_start + 2;
        for cut in start + 1..end {
            let file = decode(&input[..cut]);
            assert_eq!(file.blocks.len(), k, "cut at {cut}");
            assert_eq!(file.consumed, start);
            let expected_phase = if cut < payload_start {
                FramePhase::Header
            } else if cut < checksum_start {
                FramePhase::Payload
            } else {
                FramePhase::Checksum
            };
            match file.error {
                Some(DecodeError::Truncated { phase, .. }) => assert_eq!(phase, expected_phase, "cut at {cut}"),
                other => panic!("cut at {cut}: expected truncation, got {other:?}"),
            }
        }
        start = end;
    }
    assert_eq!(start, input.len());
}

#[test]
fn repeated_blocks_do_not_alias() {
    init_logger();
    let mut input = frame("FSTP", &PayloadBuilder::new().u32(1).door(1, 1, 1, 0, 0).build());
    input.extend(frame("FSTP", &PayloadBuilder::new().u32(2).door(2, 2, 0, 5, 0).build()));
    let mut file = decode(&input);
    assert_eq!(file.blocks.len(), 2);
    assert_ne!(file.blocks[0].content, file.blocks[1].content);

    let before = file.blocks[1].content.clone();
    if let BlockContent::IntermediateCount(b) = &mut file.blocks[0].content {
        b.doors.clear();
        b.timestamp = 99;
    }
    assert_eq!(file.blocks[1].content, before);
}

#[test]
fn stub_grammar_overrides_builtin() {
    init_logger();
    let mut registry = BlockRegistry::default();
    registry.register(BlockType::DoorCount.tag(), |payload| {
        Decoded::clean(BlockContent::DoorCount(DoorCountBlock {
            timestamp: u32::try_from(payload.len()).unwrap_or(u32::MAX),
            ..DoorCountBlock::default()
        }))
    });
    let file = Dlx3Decoder::new(&registry).decode(&frame("CDAT", &[0; 3]));
    assert_eq!(file.blocks[0].content, BlockContent::DoorCount(DoorCountBlock {
        timestamp: 3,
        ..DoorCountBlock::default()
    }));
    assert!(file.blocks[0].warnings.is_empty());
}

#[test]
fn empty_registry_makes_everything_unknown() {
    init_logger();
    let registry = BlockRegistry::new();
    let file = Dlx3Decoder::new(&registry).decode(&sample_file());
    assert!(file.is_complete());
    assert_eq!(file.blocks.len(), sample_frames().len());
    for block in &file.blocks {
        assert!(block.content.is_unknown());
        assert_eq!(block.warnings, vec![DecodeWarning::UnknownTag { tag: block.tag }]);
    }
}

#[test]
fn unknown_tag_mid_file() {
    init_logger();
    let mut input = frame("FSTP", &[0, 0, 0, 1]);
    input.extend(frame("XYZ1", &[1, 2, 3]));
    input.extend(frame("FEND", &[]));
    let file = decode(&input);
    assert!(file.is_complete());
    assert_eq!(file.blocks.len(), 3);
    assert_eq!(file.blocks[1].content, BlockContent::Unknown { tag: tag("XYZ1") });
    assert_eq!(file.blocks[1].payload, [1, 2, 3]);
    assert_eq!(file.blocks[2].content, BlockContent::FileEnd(FileEndBlock));
}

#[test]
fn reject_policy_keeps_blocks_so_far() {
    init_logger();
    let mut input = frame("FSTP", &[0, 0, 0, 1]);
    let bad_offset = input.len();
    input.extend(frame_with_checksum("FSTP", &[0, 0, 0, 2], 0x0000));
    input.extend(frame("FEND", &[]));

    let registry = BlockRegistry::default();
    let config = DecoderConfig::default().with_checksum_policy(ChecksumPolicy::Reject);
    let file = Dlx3Decoder::with_config(&registry, config).decode(&input);
    assert_eq!(file.blocks.len(), 1);
    assert_eq!(file.consumed, bad_offset);
    match file.error {
        Some(DecodeError::ChecksumMismatch { tag: t, offset, stored, .. }) => {
            assert_eq!(t, tag("FSTP"));
            assert_eq!(offset, bad_offset);
            assert_eq!(stored, 0);
        }
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
}

#[test]
fn data_after_file_end() {
    init_logger();
    let mut input = sample_file();
    let len = input.len();
    input.extend(frame("FSTP", &[0, 0, 0, 1]));

    let file = decode(&input);
    assert!(file.is_complete());
    assert_eq!(file.consumed, len);
    let fend = file.blocks.last().unwrap();
    assert_eq!(fend.block_type(), BlockType::FileEnd);
    assert_eq!(fend.warnings, vec![DecodeWarning::DataAfterFileEnd { bytes: 12 }]);

    let registry = BlockRegistry::default();
    let config = DecoderConfig::default().with_stop_at_file_end(false);
    let file = Dlx3Decoder::with_config(&registry, config).decode(&input);
    assert_eq!(file.blocks.len(), sample_frames().len() + 1);
    assert_eq!(file.consumed, input.len());
}

#[test]
fn file_without_file_end_is_complete() {
    init_logger();
    let file = decode(&frame("FSTP", &[0, 0, 0, 1]));
    assert!(file.is_complete());
    assert!(!file.has_file_end());
}

#[test]
fn one_registry_many_threads() {
    init_logger();
    let registry = &BlockRegistry::default();
    let input = &sample_file();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || Dlx3Decoder::new(registry).decode(input).blocks.len()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), sample_frames().len());
        }
    });
}
