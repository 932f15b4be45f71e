//! Core library for vocalize: text chunking, cost/duration estimation,
//! conversion orchestration, playback selection, and exports.
//!
//! The binary in `main.rs` is one caller; the library holds all conversion
//! logic so embedding frontends can drive it directly.

pub mod config;
pub mod convert;
pub mod estimate;
pub mod export;
pub mod playback;
pub mod text;

pub use config::VocalizeConfig;
pub use convert::{
    CancelToken, ChunkResult, ChunkState, ConversionError, ConversionSettings, Orchestrator,
    RunLedger,
};
pub use playback::{PlaybackError, PlaybackSession};
pub use text::{ChunkSpec, split_text};
