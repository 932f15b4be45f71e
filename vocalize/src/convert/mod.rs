//! Conversion pipeline: settings, the per-run chunk ledger, and the
//! orchestrator that drives the synthesis backend.

mod orchestrator;

pub use orchestrator::Orchestrator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tts_client::{ApiCredential, AudioHandle, QualityTier, Voice};

use crate::text::ChunkSpec;

/// Characters of chunk text kept for display.
const PREVIEW_CHARS: usize = 100;

/// Settings for one conversion run. Passed into `run` explicitly so the
/// orchestrator carries no ambient state.
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    pub voice: Voice,
    pub quality: QualityTier,
    pub credential: ApiCredential,
}

/// Pre-run validation failures. Backend failures never surface here; they
/// are recorded per chunk in the ledger.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversionError {
    #[error("nothing to convert: the chunk list is empty")]
    EmptyRun,

    #[error("missing API credential")]
    MissingCredential,
}

/// Lifecycle state of a single chunk within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkState {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

/// Outcome record for a single chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResult {
    /// 1-based sequence number matching the source chunk
    pub sequence: u32,
    /// Bounded prefix of the chunk text for display
    pub preview: String,
    /// Lifecycle state
    pub state: ChunkState,
    /// Handle to the produced audio (present only when completed)
    pub artifact: Option<AudioHandle>,
    /// Failure detail (present only when failed)
    pub error: Option<String>,
}

impl ChunkResult {
    fn new(chunk: &ChunkSpec) -> Self {
        Self {
            sequence: chunk.sequence,
            preview: preview_of(&chunk.content),
            state: ChunkState::Pending,
            artifact: None,
            error: None,
        }
    }

    pub(crate) fn mark_in_progress(&mut self) {
        self.state = ChunkState::InProgress;
    }

    pub(crate) fn mark_completed(&mut self, artifact: AudioHandle) {
        self.state = ChunkState::Completed;
        self.artifact = Some(artifact);
        self.error = None;
    }

    pub(crate) fn mark_failed(&mut self, error: String) {
        self.state = ChunkState::Failed;
        self.error = Some(error);
        self.artifact = None;
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.state = ChunkState::Cancelled;
    }
}

fn preview_of(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

/// The ordered collection of per-chunk outcomes for one run. Owned and
/// mutated only by the orchestrator executing that run; everyone else
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLedger {
    pub chunks: Vec<ChunkResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub cancelled: bool,
}

impl RunLedger {
    pub(crate) fn new(chunks: &[ChunkSpec]) -> Self {
        Self {
            chunks: chunks.iter().map(ChunkResult::new).collect(),
            started_at: Utc::now(),
            finished_at: None,
            cancelled: false,
        }
    }

    /// Look up a chunk by sequence number.
    pub fn get(&self, sequence: u32) -> Option<&ChunkResult> {
        self.chunks.iter().find(|c| c.sequence == sequence)
    }

    /// Completed chunks in sequence order.
    pub fn completed(&self) -> impl Iterator<Item = &ChunkResult> {
        self.chunks
            .iter()
            .filter(|c| c.state == ChunkState::Completed)
    }

    pub fn completed_count(&self) -> usize {
        self.completed().count()
    }

    pub fn failed_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.state == ChunkState::Failed)
            .count()
    }
}

/// Cooperative cancellation flag shared between a run and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
