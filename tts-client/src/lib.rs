//! Shared speech-synthesis client library for the vocalize workspace
//!
//! Provides a unified interface over speech backends:
//! - OpenAI speech API (HTTP)
//! - Deterministic mock (testing)

pub mod backend;
pub mod backends;
pub mod error;
pub mod voice;

pub use backend::{AudioHandle, SpeechBackend, SpeechRequest};
pub use backends::{MockSpeech, OpenAiSpeech};
pub use error::{Result, TtsError};
pub use voice::{ApiCredential, QualityTier, Voice};
