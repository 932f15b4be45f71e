//! Sequential conversion orchestrator.
//!
//! Submits chunks to the synthesis backend one at a time, in sequence
//! order, and records each outcome in the run ledger. One request is in
//! flight at any moment; chunk N+1 is never submitted before chunk N has
//! resolved.

use std::path::PathBuf;
use std::time::Duration;
use tts_client::{SpeechBackend, SpeechRequest};

use super::{CancelToken, ChunkResult, ConversionError, ConversionSettings, RunLedger};
use crate::text::ChunkSpec;

pub struct Orchestrator<'a> {
    backend: &'a dyn SpeechBackend,
    output_dir: PathBuf,
    request_gap: Duration,
}

impl<'a> Orchestrator<'a> {
    pub fn new(backend: &'a dyn SpeechBackend, output_dir: PathBuf) -> Self {
        Self {
            backend,
            output_dir,
            request_gap: Duration::ZERO,
        }
    }

    /// Pause between requests, a courtesy to backend rate limits.
    pub fn with_request_gap(mut self, gap: Duration) -> Self {
        self.request_gap = gap;
        self
    }

    /// Convert every chunk, in order, reporting each ledger transition
    /// through `on_progress`.
    ///
    /// Validation failures (empty run, missing credential) reject the run
    /// before any backend call. Per-chunk backend failures are recorded in
    /// the ledger and never abort the run. Cancellation is checked before
    /// each submission: chunks not yet started become `Cancelled`, settled
    /// chunks keep their state.
    pub async fn run<F>(
        &self,
        chunks: &[ChunkSpec],
        settings: &ConversionSettings,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<RunLedger, ConversionError>
    where
        F: FnMut(&ChunkResult),
    {
        if chunks.is_empty() {
            return Err(ConversionError::EmptyRun);
        }
        if settings.credential.is_empty() {
            return Err(ConversionError::MissingCredential);
        }

        let mut ledger = RunLedger::new(chunks);

        for (index, chunk) in chunks.iter().enumerate() {
            if cancel.is_cancelled() {
                log::debug!(
                    "cancellation requested, {} chunks not submitted",
                    chunks.len() - index
                );
                for rest in &mut ledger.chunks[index..] {
                    rest.mark_cancelled();
                    on_progress(rest);
                }
                ledger.cancelled = true;
                break;
            }

            let result = &mut ledger.chunks[index];
            result.mark_in_progress();
            on_progress(result);

            let output_path = self.output_dir.join(chunk_file_name(chunk.sequence));
            let request = SpeechRequest {
                text: chunk.content.clone(),
                voice: settings.voice,
                quality: settings.quality,
                credential: settings.credential.clone(),
            };

            match self.backend.synthesize(&request, &output_path).await {
                Ok(artifact) => {
                    log::debug!(
                        "chunk {} synthesized, {} bytes",
                        chunk.sequence,
                        artifact.size_bytes
                    );
                    result.mark_completed(artifact);
                }
                Err(e) => {
                    log::debug!("chunk {} failed: {}", chunk.sequence, e);
                    result.mark_failed(e.to_string());
                }
            }
            on_progress(&ledger.chunks[index]);

            if !self.request_gap.is_zero() && index + 1 < chunks.len() {
                tokio::time::sleep(self.request_gap).await;
            }
        }

        ledger.finished_at = Some(chrono::Utc::now());
        Ok(ledger)
    }
}

/// Output file name for a chunk, zero-padded so directory listings sort
/// in sequence order.
pub fn chunk_file_name(sequence: u32) -> String {
    format!("chunk_{:04}.mp3", sequence)
}
