//! Mock speech backend for testing
//!
//! Provides a configurable fake that can script per-call failures while
//! recording what it was asked to synthesize.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{AudioHandle, SpeechBackend, SpeechRequest};
use crate::error::{Result, TtsError};

/// Placeholder bytes written for each successful synthesis.
const FAKE_AUDIO: &[u8] = b"RIFF-fake-audio";

/// A mock backend for testing orchestration and failure handling
pub struct MockSpeech {
    /// 1-based call numbers that should fail (empty = never fail)
    fail_calls: HashSet<usize>,
    /// Whether every call should fail regardless of `fail_calls`
    always_fail: bool,
    /// Error to return on failure
    fail_with: Mutex<Option<TtsError>>,
    /// Current call count
    call_count: AtomicUsize,
    /// Text of every request received, in call order
    received: Mutex<Vec<String>>,
}

impl MockSpeech {
    /// Create a backend that succeeds on every call
    pub fn always_succeeds() -> Self {
        Self {
            fail_calls: HashSet::new(),
            always_fail: false,
            fail_with: Mutex::new(None),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend that always fails with the given error
    pub fn always_fails(error: TtsError) -> Self {
        Self {
            fail_calls: HashSet::new(),
            always_fail: true,
            fail_with: Mutex::new(Some(error)),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend that fails on the given 1-based call numbers
    pub fn fails_on(calls: &[usize], error: TtsError) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            always_fail: false,
            fail_with: Mutex::new(Some(error)),
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the text of every request received, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechBackend for MockSpeech {
    async fn synthesize(
        &self,
        request: &SpeechRequest,
        output_path: &Path,
    ) -> Result<AudioHandle> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.received.lock().unwrap().push(request.text.clone());

        if self.always_fail || self.fail_calls.contains(&call_num) {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        std::fs::write(output_path, FAKE_AUDIO)?;
        Ok(AudioHandle {
            path: output_path.to_path_buf(),
            size_bytes: FAKE_AUDIO.len() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Clone a TtsError (needed because TtsError doesn't implement Clone)
fn clone_error(err: &TtsError) -> TtsError {
    match err {
        TtsError::MissingCredential => TtsError::MissingCredential,
        TtsError::InvalidCredential(s) => TtsError::InvalidCredential(s.clone()),
        TtsError::RateLimited { retry_after } => TtsError::RateLimited {
            retry_after: *retry_after,
        },
        TtsError::QuotaExceeded(s) => TtsError::QuotaExceeded(s.clone()),
        TtsError::ApiError {
            message,
            status_code,
        } => TtsError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::ConfigError(s) => TtsError::ConfigError(s.clone()),
        // IO errors can't be cloned, so degrade to a generic error
        TtsError::Io(_) => TtsError::ApiError {
            message: "IO error (mock)".to_string(),
            status_code: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{ApiCredential, QualityTier, Voice};
    use tempfile::TempDir;

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest {
            text: text.to_string(),
            voice: Voice::Nova,
            quality: QualityTier::High,
            credential: ApiCredential::new("sk-test"),
        }
    }

    #[tokio::test]
    async fn test_always_succeeds_writes_audio() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("chunk.mp3");
        let backend = MockSpeech::always_succeeds();

        let handle = backend.synthesize(&request("hello"), &out).await.unwrap();
        assert_eq!(handle.path, out);
        assert_eq!(handle.size_bytes, FAKE_AUDIO.len() as u64);
        assert!(out.exists());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let temp = TempDir::new().unwrap();
        let backend = MockSpeech::always_fails(TtsError::ApiError {
            message: "overloaded".to_string(),
            status_code: Some(503),
        });

        for i in 0..3 {
            let out = temp.path().join(format!("{}.mp3", i));
            assert!(backend.synthesize(&request("x"), &out).await.is_err());
            assert!(!out.exists());
        }
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fails_on_specific_calls() {
        let temp = TempDir::new().unwrap();
        let backend = MockSpeech::fails_on(
            &[2],
            TtsError::RateLimited { retry_after: Some(5) },
        );

        let first = backend
            .synthesize(&request("one"), &temp.path().join("1.mp3"))
            .await;
        let second = backend
            .synthesize(&request("two"), &temp.path().join("2.mp3"))
            .await;
        let third = backend
            .synthesize(&request("three"), &temp.path().join("3.mp3"))
            .await;

        assert!(first.is_ok());
        assert!(second.is_err());
        assert!(third.is_ok());
        assert_eq!(backend.received_texts(), vec!["one", "two", "three"]);
    }
}
