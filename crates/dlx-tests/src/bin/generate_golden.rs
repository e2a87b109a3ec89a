//! Golden fixture generator for the DLX3 conformance tests.
//!
//! Writes the binary fixtures under `tests/golden/` together with a
//! `manifest.json` describing what each one decodes to. The conformance
//! suite checks the committed fixtures against the in-code builders, so
//! rerun this after changing a builder:
//!
//! ```bash
//! cargo run --bin generate_golden -p dlx-tests
//! ```
//!
//! | File          | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | sample.dlx    | One frame of every block type, ends with FEND     |
//! | damaged.dlx   | Unknown tag, bad checksum, short and odd payloads |
//! | manifest.json | Decoded blocks of each fixture, as JSON           |

#![allow(clippy::pedantic)]

use std::path::{Path, PathBuf};

use serde_json::json;

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}

fn main() {
    env_logger::init();

    let golden_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/golden");
    let fixtures = [
        ("sample.dlx", dlx_tests::sample_file()),
        ("damaged.dlx", dlx_tests::damaged_file()),
    ];

    let mut manifest = Vec::new();
    for (name, bytes) in &fixtures {
        write_file(&golden_dir.join(name), bytes);
        let decoded = dlx_decoder::decode(bytes);
        manifest.push(json!({
            "file": name,
            "bytes": bytes.len(),
            "head": hex::encode(&bytes[..bytes.len().min(8)]),
            "consumed": decoded.consumed,
            "error": decoded.error.as_ref().map(ToString::to_string),
            "warnings": decoded.warning_count(),
            "blocks": decoded.blocks,
        }));
    }

    let json = serde_json::to_string_pretty(&manifest).expect("manifest serializes");
    write_file(&golden_dir.join("manifest.json"), json.as_bytes());

    println!("All golden fixtures written to {}", golden_dir.display());
}
