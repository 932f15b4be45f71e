//! Playback selection over a run's completed chunks.

use thiserror::Error;

use crate::convert::{ChunkState, RunLedger};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("chunk {0} does not exist in the current run")]
    ChunkNotFound(u32),

    #[error("chunk {0} has no completed audio to play")]
    ChunkNotCompleted(u32),
}

/// Tracks which single chunk, if any, is selected for playback.
///
/// At most one chunk is selected at a time; selecting another chunk
/// replaces the selection, selecting the current one again clears it.
/// The session holds only a sequence number, never ledger data, so it
/// survives the ledger being replaced by a new run (callers reset it
/// when that happens).
#[derive(Debug, Default)]
pub struct PlaybackSession {
    selected: Option<u32>,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Select a completed chunk for playback, with toggle semantics.
    ///
    /// Returns the selection after the operation. Selecting a chunk that
    /// is missing or not completed is rejected without changing state.
    pub fn select(
        &mut self,
        sequence: u32,
        ledger: &RunLedger,
    ) -> Result<Option<u32>, PlaybackError> {
        if self.selected == Some(sequence) {
            self.selected = None;
            return Ok(None);
        }

        let chunk = ledger
            .get(sequence)
            .ok_or(PlaybackError::ChunkNotFound(sequence))?;
        if chunk.state != ChunkState::Completed {
            return Err(PlaybackError::ChunkNotCompleted(sequence));
        }

        self.selected = Some(sequence);
        Ok(self.selected)
    }

    /// Clear the selection. Called unconditionally when a new run starts.
    pub fn reset(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::RunLedger;
    use crate::text::ChunkSpec;
    use std::path::PathBuf;
    use tts_client::AudioHandle;

    /// Ledger with chunks 1..=3 where 1 and 3 completed, 2 failed.
    fn ledger() -> RunLedger {
        let specs: Vec<ChunkSpec> = (1..=3)
            .map(|i| ChunkSpec::new(i, format!("chunk {}", i)))
            .collect();
        let mut ledger = RunLedger::new(&specs);
        for index in [0, 2] {
            ledger.chunks[index].mark_completed(AudioHandle {
                path: PathBuf::from(format!("/tmp/{}.mp3", index + 1)),
                size_bytes: 1,
            });
        }
        ledger.chunks[1].mark_failed("backend error".to_string());
        ledger
    }

    #[test]
    fn test_select_completed_chunk() {
        let mut session = PlaybackSession::new();
        assert_eq!(session.select(1, &ledger()), Ok(Some(1)));
        assert_eq!(session.selected(), Some(1));
    }

    #[test]
    fn test_reselect_toggles_off() {
        let mut session = PlaybackSession::new();
        let ledger = ledger();
        session.select(1, &ledger).unwrap();
        assert_eq!(session.select(1, &ledger), Ok(None));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_selecting_second_chunk_replaces_first() {
        let mut session = PlaybackSession::new();
        let ledger = ledger();
        session.select(1, &ledger).unwrap();
        assert_eq!(session.select(3, &ledger), Ok(Some(3)));
        assert_eq!(session.selected(), Some(3));
    }

    #[test]
    fn test_selecting_failed_chunk_is_rejected_without_change() {
        let mut session = PlaybackSession::new();
        let ledger = ledger();
        session.select(1, &ledger).unwrap();

        assert_eq!(
            session.select(2, &ledger),
            Err(PlaybackError::ChunkNotCompleted(2))
        );
        assert_eq!(session.selected(), Some(1));
    }

    #[test]
    fn test_selecting_unknown_chunk_is_rejected() {
        let mut session = PlaybackSession::new();
        assert_eq!(
            session.select(99, &ledger()),
            Err(PlaybackError::ChunkNotFound(99))
        );
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut session = PlaybackSession::new();
        session.select(3, &ledger()).unwrap();
        session.reset();
        assert_eq!(session.selected(), None);
    }
}
