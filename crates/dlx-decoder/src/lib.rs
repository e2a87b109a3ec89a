#![warn(clippy::pedantic)]

//! Frame reader for DLX3 passenger-counter log files.
//!
//! ```text
//!   &[u8] ──▶ FrameReader ──▶ BlockRegistry ──▶ Block { content, warnings }
//!               │                                     │
//!               └── DecodeError (fatal, at most one)  └──▶ DecodedFile
//! ```
//!
//! Most callers only need [`decode`]; build a [`Dlx3Decoder`] to supply
//! a custom [`BlockRegistry`] or [`DecoderConfig`].

pub mod config;
pub mod decoder;
pub mod error;
pub mod registry;

pub use config::{ChecksumPolicy, DecoderConfig};
pub use decoder::{DecodedFile, Dlx3Decoder, FrameReader};
pub use error::{DecodeError, FramePhase};
pub use registry::{BlockRegistry, GrammarFn};

/// Decode `input` with the built-in grammars and the default config.
pub fn decode(input: &[u8]) -> DecodedFile {
    let registry = BlockRegistry::default();
    Dlx3Decoder::new(&registry).decode(input)
}
