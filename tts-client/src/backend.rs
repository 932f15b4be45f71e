use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::voice::{ApiCredential, QualityTier, Voice};

/// Request sent to a speech backend for one chunk of text.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Voice,
    pub quality: QualityTier,
    pub credential: ApiCredential,
}

/// Opaque handle to a backend-produced audio object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioHandle {
    /// Where the audio was stored
    pub path: PathBuf,
    /// Size of the stored audio in bytes
    pub size_bytes: u64,
}

/// Trait for speech backends - all synthesis engines implement this.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize one chunk of text, writing the audio to `output_path`.
    async fn synthesize(&self, request: &SpeechRequest, output_path: &Path)
    -> Result<AudioHandle>;

    /// Get the backend name for display
    fn name(&self) -> &'static str;
}
